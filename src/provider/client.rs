//! rig-core backed implementation of [`ChatProvider`].
//!
//! Contains the [`Provider`] struct which wraps rig-core provider clients
//! behind enum dispatch. Each [`ChatProvider::generate`] call is one
//! non-streaming completion request; tool execution is left to the turn loop.

use anyhow::{anyhow, Context, Result};
use rig::client::CompletionClient;
use rig::completion::CompletionModel;
use rig::providers::{anthropic, gemini, openai, openrouter};

use super::convert::{from_rig_choice, split_prompt, to_rig_messages, tool_definitions};
use super::kind::ProviderKind;
use super::resolve::ModelSelection;
use super::{ChatProvider, ModelResponse};
use crate::config::Config;
use crate::constants::{MAX_TOKENS, OLLAMA_DEFAULT_BASE_URL};
use crate::message::Message;
use crate::tools::ToolSpec;

/// Internal enum wrapping provider-specific clients.
enum ClientKind {
    Gemini(gemini::Client),
    Anthropic(anthropic::Client),
    OpenAI(openai::Client),
    OpenRouter(openrouter::Client),
    Ollama(openai::Client),
}

/// A configured LLM provider ready to handle completion requests.
pub struct Provider {
    client: ClientKind,
    kind: ProviderKind,
    model: String,
}

/// Dispatches an operation across provider-specific clients.
///
/// Matches on [`ClientKind`] and executes the same block for each variant,
/// letting the compiler monomorphize per provider.
macro_rules! dispatch {
    ($self:expr, |$client:ident| $body:expr) => {
        match &$self.client {
            ClientKind::Gemini($client) => $body,
            ClientKind::Anthropic($client) => $body,
            ClientKind::OpenAI($client) => $body,
            ClientKind::OpenRouter($client) => $body,
            ClientKind::Ollama($client) => $body,
        }
    };
}

impl Provider {
    /// Creates a new [`Provider`] from the loaded application config.
    ///
    /// Resolves the API key through the config precedence chain
    /// (env var → config file → substitution) and builds the matching client.
    ///
    /// # Errors
    ///
    /// Returns an error if no API key is found for the selected provider
    /// or if client construction fails.
    pub fn from_config(config: &Config, selection: &ModelSelection) -> Result<Self> {
        let client = match selection.provider {
            ProviderKind::Gemini => {
                let api_key = config
                    .resolve_api_key("gemini")
                    .context("No API key found for Gemini. Set GEMINI_API_KEY or configure it in config.toml")?;
                ClientKind::Gemini(
                    gemini::Client::new(&api_key).context("Failed to create Gemini client")?,
                )
            }
            ProviderKind::Anthropic => {
                let api_key = config
                    .resolve_api_key("anthropic")
                    .context("No API key found for Anthropic. Set ANTHROPIC_API_KEY or configure it in config.toml")?;
                ClientKind::Anthropic(
                    anthropic::Client::new(&api_key)
                        .context("Failed to create Anthropic client")?,
                )
            }
            ProviderKind::OpenAI => {
                let api_key = config
                    .resolve_api_key("openai")
                    .context("No API key found for OpenAI. Set OPENAI_API_KEY or configure it in config.toml")?;
                ClientKind::OpenAI(
                    openai::Client::new(&api_key).context("Failed to create OpenAI client")?,
                )
            }
            ProviderKind::OpenRouter => {
                let api_key = config
                    .resolve_api_key("openrouter")
                    .context("No API key found for OpenRouter. Set OPENROUTER_API_KEY or configure it in config.toml")?;
                ClientKind::OpenRouter(
                    openrouter::Client::new(&api_key)
                        .context("Failed to create OpenRouter client")?,
                )
            }
            ProviderKind::Ollama => {
                let base_url = config
                    .provider_base_url("ollama")
                    .unwrap_or_else(|| OLLAMA_DEFAULT_BASE_URL.to_string());
                ClientKind::Ollama(
                    openai::Client::builder()
                        .api_key("ollama")
                        .base_url(format!("{}/v1", base_url))
                        .build()
                        .context("Failed to create Ollama client")?,
                )
            }
        };

        Ok(Self {
            client,
            kind: selection.provider,
            model: selection.model.clone(),
        })
    }
}

#[async_trait::async_trait]
impl ChatProvider for Provider {
    fn name(&self) -> String {
        format!("{}/{}", self.kind.as_str(), self.model)
    }

    async fn generate(
        &self,
        history: &[Message],
        tools: &[ToolSpec],
        system_instruction: &str,
    ) -> Result<ModelResponse> {
        let (prompt, chat_history) =
            split_prompt(to_rig_messages(history)).ok_or_else(|| anyhow!("empty conversation"))?;
        let sanitize = self.kind.needs_schema_sanitizing();

        dispatch!(self, |client| {
            // Definitions are rebuilt per arm so each gets its own Vec.
            let definitions = tool_definitions(tools, sanitize);
            let response = client
                .completion_model(&self.model)
                .completion_request(prompt.clone())
                .preamble(system_instruction.to_string())
                .messages(chat_history.clone())
                .tools(definitions)
                .max_tokens(MAX_TOKENS)
                .send()
                .await
                .with_context(|| format!("{} completion request failed", self.name()))?;
            Ok(from_rig_choice(response.choice))
        })
    }
}
