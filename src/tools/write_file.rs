//! Write-file tool: writes content to a file, creating parent directories as needed.

use serde::Deserialize;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;

use super::error::ToolError;
use super::sandbox::resolve_within;
use super::{Tool, ToolOutput};

/// Tool that writes string content to a file within the working directory.
///
/// Parent directories are created automatically. The confinement check runs
/// before anything touches the filesystem, so a rejected path leaves no
/// directories behind.
pub struct WriteFileTool;

#[derive(Deserialize)]
struct WriteFileInput {
    file_path: String,
    content: String,
}

impl WriteFileTool {
    fn write(root: &Path, file_path: &str, content: &str) -> Result<String, ToolError> {
        let path = resolve_within(root, file_path, "write to")?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;

        Ok(format!(
            "Successfully wrote to \"{}\" ({} characters written)",
            file_path,
            content.chars().count()
        ))
    }
}

#[async_trait::async_trait]
impl Tool for WriteFileTool {
    fn name(&self) -> &str {
        "write_file"
    }

    fn description(&self) -> &str {
        "Writes or overwrites content to a file, constrained to the working directory. Creates the file if it doesn't exist."
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "file_path": {
                    "type": "string",
                    "description": "The path to the file to write, relative to the working directory."
                },
                "content": {
                    "type": "string",
                    "description": "The content to write to the file."
                }
            },
            "required": ["file_path", "content"]
        })
    }

    async fn execute(&self, working_directory: &Path, input: Value) -> ToolOutput {
        let result = serde_json::from_value::<WriteFileInput>(input)
            .map_err(ToolError::from)
            .and_then(|input| Self::write(working_directory, &input.file_path, &input.content));
        ToolOutput::from(result)
    }
}
