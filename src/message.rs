//! Message types for the agent's conversation history.
//!
//! A [`Message`] is a [`Role`] plus an ordered list of [`Part`]s. Parts are a
//! closed tagged union: plain text, a tool call requested by the model, or the
//! result of dispatching one. These are codeagent's internal types, converted
//! to provider-specific formats (e.g. rig-core's `Message`) when sent to the LLM.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A tool invocation requested by the LLM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// Identifier used to pair the call with its result.
    pub id: String,
    /// Secondary id some providers require on the result (OpenAI Responses API).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_id: Option<String>,
    /// Opaque signature some providers attach to a call and expect echoed back (Gemini).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    /// Name of the tool to invoke.
    pub name: String,
    /// JSON arguments to pass to the tool.
    pub arguments: Value,
}

impl ToolCallRequest {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: Value) -> Self {
        Self {
            id: id.into(),
            call_id: None,
            signature: None,
            name: name.into(),
            arguments,
        }
    }

    /// Returns a string argument by key, if present.
    pub fn str_arg(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(Value::as_str)
    }
}

/// Outcome of a dispatched tool call, as fed back to the model.
///
/// Serializes to `{"result": "..."}` or `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolPayload {
    Result(String),
    Error(String),
}

impl ToolPayload {
    /// Renders the payload as the single string sent back to the model.
    ///
    /// Results are passed through verbatim; structured errors are sent as
    /// their JSON form so the model can tell them apart from tool output.
    pub fn to_model_string(&self) -> String {
        match self {
            ToolPayload::Result(text) => text.clone(),
            ToolPayload::Error(_) => {
                serde_json::to_string(self).unwrap_or_else(|_| String::from("{}"))
            }
        }
    }
}

/// The result of one [`ToolCallRequest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Id of the call this result answers.
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_id: Option<String>,
    /// Name of the tool that was requested.
    pub name: String,
    pub payload: ToolPayload,
}

impl ToolResult {
    /// Creates a result answering `call`.
    pub fn for_call(call: &ToolCallRequest, payload: ToolPayload) -> Self {
        Self {
            id: call.id.clone(),
            call_id: call.call_id.clone(),
            name: call.name.clone(),
            payload,
        }
    }
}

/// One piece of a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Part {
    Text(String),
    ToolCall(ToolCallRequest),
    ToolResult(ToolResult),
}

/// The role of a message sender in the conversation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    Tool,
}

/// A single message in a conversation. Never mutated once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub parts: Vec<Part>,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            parts: vec![Part::Text(text.into())],
        }
    }

    pub fn assistant(parts: Vec<Part>) -> Self {
        Self {
            role: Role::Assistant,
            parts,
        }
    }

    /// Creates the single tool-role message answering one model turn.
    pub fn tool_results(results: Vec<ToolResult>) -> Self {
        Self {
            role: Role::Tool,
            parts: results.into_iter().map(Part::ToolResult).collect(),
        }
    }

    /// Concatenated text parts, joined by a space.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| match p {
                Part::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn tool_calls(&self) -> impl Iterator<Item = &ToolCallRequest> {
        self.parts.iter().filter_map(|p| match p {
            Part::ToolCall(call) => Some(call),
            _ => None,
        })
    }

    pub fn tool_results_iter(&self) -> impl Iterator<Item = &ToolResult> {
        self.parts.iter().filter_map(|p| match p {
            Part::ToolResult(result) => Some(result),
            _ => None,
        })
    }
}
