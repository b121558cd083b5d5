pub mod error;
pub mod list_directory;
pub mod read_file;
pub mod remote;
pub mod run_script;
pub mod sandbox;
pub mod write_file;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::message::{ToolCallRequest, ToolPayload, ToolResult};

use error::ToolError;
use list_directory::ListDirectoryTool;
use read_file::ReadFileTool;
use remote::{ExternalToolSource, RemoteTool};
use run_script::{RunScriptTool, ScriptSettings};
use write_file::WriteFileTool;

/// What a tool hands back. Tools never fail past this point: internal
/// errors arrive here already rendered as `"Error: ..."` text.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub content: String,
    pub is_error: bool,
}

impl ToolOutput {
    pub fn success(content: String) -> Self {
        Self {
            content,
            is_error: false,
        }
    }

    pub fn error(content: String) -> Self {
        Self {
            content,
            is_error: true,
        }
    }
}

impl From<Result<String, ToolError>> for ToolOutput {
    fn from(result: Result<String, ToolError>) -> Self {
        match result {
            Ok(content) => Self::success(content),
            Err(e) => Self::error(format!("Error: {e}")),
        }
    }
}

/// Declaration sent to the LLM so it knows what tools are available.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters: Value, // JSON Schema
}

/// Every tool implements this trait.
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    /// Unique name the LLM uses to call this tool.
    fn name(&self) -> &str;

    /// Human-readable description for the LLM.
    fn description(&self) -> &str;

    /// JSON Schema describing the tool's input parameters.
    fn schema(&self) -> Value;

    /// Execute the tool inside `working_directory` with the given JSON input.
    async fn execute(&self, working_directory: &Path, input: Value) -> ToolOutput;

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.schema(),
        }
    }
}

/// Holds all registered tools and dispatches calls by name.
///
/// Owns the working directory every tool is confined to.
pub struct ToolRegistry {
    working_directory: PathBuf,
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new(working_directory: PathBuf) -> Self {
        Self {
            working_directory,
            tools: Vec::new(),
        }
    }

    /// Create a registry with the four built-in sandboxed tools.
    pub fn with_builtins(working_directory: PathBuf, script: ScriptSettings) -> Self {
        let mut registry = Self::new(working_directory);
        registry.register(Box::new(ListDirectoryTool));
        registry.register(Box::new(ReadFileTool));
        registry.register(Box::new(WriteFileTool));
        registry.register(Box::new(RunScriptTool::new(script)));
        registry
    }

    /// Register a tool. Called during startup.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.push(Arc::from(tool));
    }

    /// Discovers the tools of an external source and registers each one
    /// under a namespaced name. Returns how many were added.
    ///
    /// No transport ships with the binary; embedders bring their own source.
    #[allow(dead_code)]
    pub async fn register_external(&mut self, source: Arc<dyn ExternalToolSource>) -> Result<usize> {
        let specs = source.list_tools().await?;
        let count = specs.len();
        for spec in specs {
            let tool = RemoteTool::new(Arc::clone(&source), spec);
            tracing::debug!(tool = tool.name(), server = source.server_name(), "registered external tool");
            self.register(Box::new(tool));
        }
        Ok(count)
    }

    pub fn working_directory(&self) -> &Path {
        &self.working_directory
    }

    /// Produce declarations for the LLM (sent in every request).
    pub fn specs(&self) -> Vec<ToolSpec> {
        self.tools.iter().map(|t| t.spec()).collect()
    }

    fn find(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    /// Runs one tool call and wraps the outcome for the model.
    ///
    /// Unknown names produce an error payload instead of failing, so the
    /// model can correct itself.
    pub async fn dispatch(&self, call: &ToolCallRequest) -> (ToolResult, ToolOutput) {
        let Some(tool) = self.find(&call.name) else {
            tracing::warn!(tool = %call.name, "model requested an unknown tool");
            let message = format!("Unknown function: {}", call.name);
            return (
                ToolResult::for_call(call, ToolPayload::Error(message.clone())),
                ToolOutput::error(message),
            );
        };

        tracing::debug!(tool = %call.name, args = %call.arguments, "dispatching tool call");
        let output = tool
            .execute(&self.working_directory, call.arguments.clone())
            .await;
        (
            ToolResult::for_call(call, ToolPayload::Result(output.content.clone())),
            output,
        )
    }

    /// How many tools are registered.
    pub fn len(&self) -> usize {
        self.tools.len()
    }
}
