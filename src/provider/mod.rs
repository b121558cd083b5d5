//! LLM provider abstraction for codeagent.
//!
//! The turn loop talks to every backend through one operation,
//! [`ChatProvider::generate`]. The rig-core backed [`Provider`] implements it
//! for Gemini, Anthropic, OpenAI, OpenRouter and Ollama; backend quirks such as
//! schema cleaning and response normalization stay inside this module.

mod client;
mod convert;
mod kind;
mod resolve;
mod schema;

pub use client::Provider;
pub use resolve::resolve_model;

use anyhow::Result;

use crate::message::{Message, Part, ToolCallRequest};
use crate::tools::ToolSpec;

/// A provider-agnostic model response: optional text plus requested tool calls.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelResponse {
    pub text: Option<String>,
    pub tool_calls: Vec<ToolCallRequest>,
}

impl ModelResponse {
    /// Text with surrounding whitespace removed, if any remains.
    pub fn trimmed_text(&self) -> Option<&str> {
        self.text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// The assistant message appended to history for this response.
    pub fn to_message(&self) -> Message {
        let mut parts = Vec::with_capacity(self.tool_calls.len() + 1);
        if let Some(text) = self.text.as_ref().filter(|t| !t.trim().is_empty()) {
            parts.push(Part::Text(text.clone()));
        }
        parts.extend(self.tool_calls.iter().cloned().map(Part::ToolCall));
        Message::assistant(parts)
    }
}

/// One chat-completion backend.
#[async_trait::async_trait]
pub trait ChatProvider: Send + Sync {
    /// Short label used in logs, e.g. `gemini/gemini-2.0-flash-001`.
    fn name(&self) -> String;

    /// Generates the next assistant turn for `history`.
    async fn generate(
        &self,
        history: &[Message],
        tools: &[ToolSpec],
        system_instruction: &str,
    ) -> Result<ModelResponse>;
}
