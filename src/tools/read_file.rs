use serde::Deserialize;
use serde_json::{json, Value};
use std::path::Path;

use super::error::ToolError;
use super::sandbox::resolve_within;
use super::{Tool, ToolOutput};

use crate::constants::MAX_FILE_CHARS;

pub struct ReadFileTool;

#[derive(Deserialize)]
struct ReadFileInput {
    file_path: String,
}

impl ReadFileTool {
    fn read(root: &Path, file_path: &str) -> Result<String, ToolError> {
        let path = resolve_within(root, file_path, "read")?;
        if !path.is_file() {
            return Err(ToolError::NotAFile(file_path.to_string()));
        }

        let content = std::fs::read_to_string(&path)?;
        Ok(truncate(content, file_path))
    }
}

/// Caps `content` at [`MAX_FILE_CHARS`] characters and appends a marker.
fn truncate(content: String, file_path: &str) -> String {
    match content.char_indices().nth(MAX_FILE_CHARS) {
        None => content,
        Some((cut, _)) => format!(
            "{}[...File \"{}\" truncated at {} characters]",
            &content[..cut],
            file_path,
            MAX_FILE_CHARS
        ),
    }
}

#[async_trait::async_trait]
impl Tool for ReadFileTool {
    fn name(&self) -> &str {
        "read_file"
    }

    fn description(&self) -> &str {
        "Reads and returns the contents of a file, constrained to the working directory. Files longer than 10000 characters will be truncated."
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "file_path": {
                    "type": "string",
                    "description": "The path to the file to read, relative to the working directory."
                }
            },
            "required": ["file_path"]
        })
    }

    async fn execute(&self, working_directory: &Path, input: Value) -> ToolOutput {
        let result = serde_json::from_value::<ReadFileInput>(input)
            .map_err(ToolError::from)
            .and_then(|input| Self::read(working_directory, &input.file_path));
        ToolOutput::from(result)
    }
}
