//! File loading and merging for codeagent configuration.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::types::{default_model, AgentConfig, Config, ProviderConfig, ProviderEntry};
use crate::constants::{
    DEFAULT_PROVIDER, OLLAMA_DEFAULT_BASE_URL, SCRIPT_DEFAULT_INTERPRETER,
    SCRIPT_DEFAULT_TIMEOUT_SECS, MAX_AGENT_ITERATIONS,
};

impl Config {
    /// Loads the global config from `~/.config/codeagent/config.toml`.
    ///
    /// If no config file exists, creates one with sensible defaults
    /// (including `{env:VAR}` placeholders for API keys) and returns it.
    pub(super) fn load_global() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            let default_toml = Self::default_toml();
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, &default_toml)
                .with_context(|| format!("Failed to write default config to {:?}", path))?;
            tracing::info!(path = %path.display(), "created default config");
            let config: Config = toml::from_str(&default_toml)
                .with_context(|| "Failed to parse default config".to_string())?;
            return Ok(config);
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config at {:?}", path))?;
        Ok(config)
    }

    /// Contents written to a fresh global config file.
    fn default_toml() -> String {
        format!(
            r#"model = "{model}"
default_provider = "{provider}"

[provider]

[provider.gemini]
api_key = "{{env:GEMINI_API_KEY}}"

[provider.anthropic]
api_key = "{{env:ANTHROPIC_API_KEY}}"

[provider.openai]
api_key = "{{env:OPENAI_API_KEY}}"

[provider.openrouter]
api_key = "{{env:OPENROUTER_API_KEY}}"

[provider.ollama]
base_url = "{ollama}"

[agent]
max_iterations = {iterations}
script_timeout_secs = {timeout}
interpreter = "{interpreter}"
"#,
            model = default_model(),
            provider = DEFAULT_PROVIDER,
            ollama = OLLAMA_DEFAULT_BASE_URL,
            iterations = MAX_AGENT_ITERATIONS,
            timeout = SCRIPT_DEFAULT_TIMEOUT_SECS,
            interpreter = SCRIPT_DEFAULT_INTERPRETER,
        )
    }

    /// Look for codeagent.toml in `start`, then walk up to git root.
    pub(super) fn load_project(start: &Path) -> Result<Option<Config>> {
        let mut dir = start.to_path_buf();
        loop {
            let candidate = dir.join(crate::constants::PROJECT_CONFIG_FILENAME);
            if candidate.exists() {
                let contents = fs::read_to_string(&candidate)
                    .with_context(|| format!("Failed to read config from {:?}", candidate))?;
                let config: Config = toml::from_str(&contents)
                    .with_context(|| format!("Failed to parse config at {:?}", candidate))?;
                tracing::debug!(path = %candidate.display(), "loaded project config");
                return Ok(Some(config));
            }
            // Stop at git root or filesystem root
            if dir.join(".git").exists() || !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Merge project config over global config.
    /// Project values win when present.
    pub(super) fn merge(global: Config, project: Config) -> Config {
        Config {
            model: if project.model != default_model() {
                project.model
            } else {
                global.model
            },
            provider: ProviderConfig {
                gemini: merge_entry(global.provider.gemini, project.provider.gemini),
                openai: merge_entry(global.provider.openai, project.provider.openai),
                anthropic: merge_entry(global.provider.anthropic, project.provider.anthropic),
                ollama: merge_entry(global.provider.ollama, project.provider.ollama),
                openrouter: merge_entry(global.provider.openrouter, project.provider.openrouter),
            },
            default_provider: project.default_provider.or(global.default_provider),
            agent: AgentConfig {
                max_iterations: project.agent.max_iterations.or(global.agent.max_iterations),
                script_timeout_secs: project
                    .agent
                    .script_timeout_secs
                    .or(global.agent.script_timeout_secs),
                interpreter: project.agent.interpreter.or(global.agent.interpreter),
            },
        }
    }
}

/// Field-wise merge of one provider entry.
fn merge_entry(global: Option<ProviderEntry>, project: Option<ProviderEntry>) -> Option<ProviderEntry> {
    match (global, project) {
        (Some(g), Some(p)) => Some(ProviderEntry {
            api_key: p.api_key.or(g.api_key),
            base_url: p.base_url.or(g.base_url),
            model: p.model.or(g.model),
        }),
        (g, p) => p.or(g),
    }
}
