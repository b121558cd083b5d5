//! Environment variable substitution and setting accessors.

use std::time::Duration;

use super::types::{Config, ProviderEntry};

use crate::constants::{MAX_AGENT_ITERATIONS, SCRIPT_DEFAULT_INTERPRETER, SCRIPT_DEFAULT_TIMEOUT_SECS};
use crate::tools::run_script::ScriptSettings;

impl Config {
    /// Resolve {env:VAR_NAME} patterns in string fields.
    pub(super) fn resolve_substitutions(&mut self) {
        self.model = Self::resolve_str(&self.model);
        if let Some(ref mut dp) = self.default_provider {
            *dp = Self::resolve_str(dp);
        }
        if let Some(ref mut interpreter) = self.agent.interpreter {
            *interpreter = Self::resolve_str(interpreter);
        }
        Self::resolve_provider_entry(&mut self.provider.gemini);
        Self::resolve_provider_entry(&mut self.provider.openai);
        Self::resolve_provider_entry(&mut self.provider.anthropic);
        Self::resolve_provider_entry(&mut self.provider.ollama);
        Self::resolve_provider_entry(&mut self.provider.openrouter);
    }

    /// Resolves `{env:VAR}` patterns in a single provider entry's `api_key` and `base_url`.
    fn resolve_provider_entry(entry: &mut Option<ProviderEntry>) {
        if let Some(ref mut e) = entry {
            if let Some(ref mut key) = e.api_key {
                *key = Self::resolve_str(key);
            }
            if let Some(ref mut url) = e.base_url {
                *url = Self::resolve_str(url);
            }
        }
    }

    /// Replace {env:VAR} with the environment variable value.
    fn resolve_str(s: &str) -> String {
        let mut result = s.to_string();
        while let Some(start) = result.find("{env:") {
            if let Some(end) = result[start..].find('}') {
                let var_name = &result[start + 5..start + end];
                let value = std::env::var(var_name).unwrap_or_default();
                result = format!(
                    "{}{}{}",
                    &result[..start],
                    value,
                    &result[start + end + 1..]
                );
            } else {
                break;
            }
        }
        result
    }

    /// Resolve API key for a provider: env var first, then config value.
    pub fn resolve_api_key(&self, provider: &str) -> Option<String> {
        // GEMINI_API_KEY, ANTHROPIC_API_KEY, etc.
        let env_key = format!("{}_API_KEY", provider.to_uppercase());
        if let Ok(val) = std::env::var(&env_key) {
            if !val.is_empty() {
                return Some(val);
            }
        }

        // An unset {env:} placeholder resolves to "", which is no key at all.
        self.provider
            .entry(provider)
            .and_then(|e| e.api_key.clone())
            .filter(|key| !key.is_empty())
    }

    /// Get the configured default provider name, if any.
    pub fn provider_name(&self) -> Option<&str> {
        self.default_provider.as_deref()
    }

    /// Get the model name from config, stripping provider prefix if present.
    /// Returns None if the model is the compile-time default (meaning user hasn't configured it).
    pub fn model_name(&self) -> Option<String> {
        let m = &self.model;
        if m == crate::constants::DEFAULT_MODEL {
            return None;
        }
        if let Some((_prov, model)) = m.split_once('/') {
            Some(model.to_string())
        } else {
            Some(m.to_string())
        }
    }

    /// Model configured under `[provider.<name>]`, if any.
    pub fn provider_model(&self, provider: &str) -> Option<String> {
        self.provider
            .entry(provider)
            .and_then(|e| e.model.clone())
            .filter(|m| !m.is_empty())
    }

    /// Base URL configured under `[provider.<name>]`, if any.
    pub fn provider_base_url(&self, provider: &str) -> Option<String> {
        self.provider
            .entry(provider)
            .and_then(|e| e.base_url.clone())
            .filter(|url| !url.is_empty())
    }

    /// Generation budget per request.
    pub fn max_iterations(&self) -> usize {
        self.agent
            .max_iterations
            .filter(|n| *n > 0)
            .unwrap_or(MAX_AGENT_ITERATIONS)
    }

    /// How `run_script` launches scripts.
    pub fn script_settings(&self) -> ScriptSettings {
        ScriptSettings {
            interpreter: self
                .agent
                .interpreter
                .clone()
                .filter(|i| !i.trim().is_empty())
                .unwrap_or_else(|| SCRIPT_DEFAULT_INTERPRETER.to_string()),
            timeout: Duration::from_secs(
                self.agent
                    .script_timeout_secs
                    .filter(|s| *s > 0)
                    .unwrap_or(SCRIPT_DEFAULT_TIMEOUT_SECS),
            ),
        }
    }
}
