//! Failure cases of the built-in tools.

use thiserror::Error;

/// Everything that can go wrong inside a sandboxed tool.
///
/// Never crosses the [`Tool`](super::Tool) boundary: `execute` renders it as
/// an `"Error: ..."` string for the model to read.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Cannot {action} \"{path}\" as it is outside the permitted working directory")]
    OutsideRoot { action: &'static str, path: String },

    #[error("\"{0}\" is not a directory")]
    NotADirectory(String),

    #[error("File not found or is not a regular file: \"{0}\"")]
    NotAFile(String),

    #[error("File \"{0}\" not found.")]
    NotFound(String),

    #[error("\"{0}\" is not a Python file.")]
    WrongFileType(String),

    #[error("executing Python file: timed out after {0} seconds")]
    Timeout(u64),

    #[error("executing Python file: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("invalid arguments: {0}")]
    InvalidArguments(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
