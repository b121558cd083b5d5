//! Tools served by an external source (e.g. an MCP server).
//!
//! The transport is somebody else's problem: anything that can list tool
//! declarations and execute a call by name implements [`ExternalToolSource`].
//! Each discovered tool is wrapped in a [`RemoteTool`] and registered under
//! `mcp_<server>_<tool>`, after which the turn loop cannot tell it apart from
//! a built-in.

use anyhow::Result;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;

use super::{Tool, ToolOutput, ToolSpec};
use crate::constants::EXTERNAL_TOOL_PREFIX;

/// A provider of additional, remotely hosted tools.
#[async_trait::async_trait]
pub trait ExternalToolSource: Send + Sync {
    /// Short server name used in the namespaced tool names.
    fn server_name(&self) -> &str;

    /// Tool declarations as the source names them.
    async fn list_tools(&self) -> Result<Vec<ToolSpec>>;

    /// Calls `name` (the source's own name, not the namespaced one).
    async fn call(&self, name: &str, arguments: Value) -> Result<String>;
}

/// Builds the registry name for a tool from `server`.
pub fn namespaced_name(server: &str, tool: &str) -> String {
    format!(
        "{}_{}_{}",
        EXTERNAL_TOOL_PREFIX,
        server,
        tool.replace('-', "_")
    )
}

/// A single tool from an [`ExternalToolSource`].
pub struct RemoteTool {
    source: Arc<dyn ExternalToolSource>,
    remote_name: String,
    spec: ToolSpec,
}

impl RemoteTool {
    pub fn new(source: Arc<dyn ExternalToolSource>, remote: ToolSpec) -> Self {
        let description = if remote.description.trim().is_empty() {
            format!("Tool: {}", remote.name)
        } else {
            remote.description
        };
        let parameters = if remote.parameters.is_object() {
            remote.parameters
        } else {
            json!({ "type": "object", "properties": {} })
        };
        let spec = ToolSpec {
            name: namespaced_name(source.server_name(), &remote.name),
            description,
            parameters,
        };
        Self {
            source,
            remote_name: remote.name,
            spec,
        }
    }
}

#[async_trait::async_trait]
impl Tool for RemoteTool {
    fn name(&self) -> &str {
        &self.spec.name
    }

    fn description(&self) -> &str {
        &self.spec.description
    }

    fn schema(&self) -> Value {
        self.spec.parameters.clone()
    }

    async fn execute(&self, _working_directory: &Path, input: Value) -> ToolOutput {
        match self.source.call(&self.remote_name, input).await {
            Ok(text) => ToolOutput::success(text),
            Err(e) => ToolOutput::error(format!(
                "Error calling tool {}: {}",
                self.remote_name, e
            )),
        }
    }
}
