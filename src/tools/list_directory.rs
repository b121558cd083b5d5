//! List-directory tool: one line per entry with size and kind.

use serde::Deserialize;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;

use super::error::ToolError;
use super::sandbox::resolve_within;
use super::{Tool, ToolOutput};

pub struct ListDirectoryTool;

#[derive(Deserialize)]
struct ListDirectoryInput {
    #[serde(default = "current_dir")]
    directory: String,
}

fn current_dir() -> String {
    ".".to_string()
}

impl ListDirectoryTool {
    fn list(root: &Path, directory: &str) -> Result<String, ToolError> {
        let path = resolve_within(root, directory, "list")?;
        if !path.is_dir() {
            return Err(ToolError::NotADirectory(directory.to_string()));
        }

        let mut entries = fs::read_dir(&path)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<Vec<_>, _>>()?;
        entries.sort();

        let mut lines = Vec::with_capacity(entries.len());
        for entry in entries {
            // Broken symlinks have no target metadata; describe the link itself.
            let metadata = fs::metadata(&entry).or_else(|_| fs::symlink_metadata(&entry))?;
            let name = entry
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            lines.push(format!(
                " - {}: file_size={} bytes, is_dir={}",
                name,
                metadata.len(),
                metadata.is_dir()
            ));
        }
        Ok(lines.join("\n"))
    }
}

#[async_trait::async_trait]
impl Tool for ListDirectoryTool {
    fn name(&self) -> &str {
        "list_directory"
    }

    fn description(&self) -> &str {
        "Lists files in the specified directory along with their sizes, constrained to the working directory."
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "directory": {
                    "type": "string",
                    "description": "The directory to list files from, relative to the working directory. If not provided, lists files in the working directory itself."
                }
            }
        })
    }

    async fn execute(&self, working_directory: &Path, input: Value) -> ToolOutput {
        // Models sometimes send `null` for a tool with no required arguments.
        let input = if input.is_null() { json!({}) } else { input };
        let result = serde_json::from_value::<ListDirectoryInput>(input)
            .map_err(ToolError::from)
            .and_then(|input| Self::list(working_directory, &input.directory));
        ToolOutput::from(result)
    }
}
