//! Run-script tool: executes a Python file with a hard wall-clock timeout.

use serde::Deserialize;
use serde_json::{json, Value};
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use super::error::ToolError;
use super::sandbox::{absolute_root, resolve_within};
use super::{Tool, ToolOutput};

use crate::constants::{
    SCRIPT_DEFAULT_INTERPRETER, SCRIPT_DEFAULT_TIMEOUT_SECS, SCRIPT_EXTENSION,
    SCRIPT_STRIPPED_ENV_VARS,
};

/// How scripts are launched.
#[derive(Debug, Clone)]
pub struct ScriptSettings {
    /// Program the script file is passed to.
    pub interpreter: String,
    pub timeout: Duration,
}

impl Default for ScriptSettings {
    fn default() -> Self {
        Self {
            interpreter: SCRIPT_DEFAULT_INTERPRETER.to_string(),
            timeout: Duration::from_secs(SCRIPT_DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Tool that runs a script in a child process.
///
/// The child runs in the working directory with sensitive environment
/// variables stripped. On timeout the child is killed, never left running.
pub struct RunScriptTool {
    settings: ScriptSettings,
}

impl RunScriptTool {
    pub fn new(settings: ScriptSettings) -> Self {
        Self { settings }
    }

    async fn run(&self, root: &Path, input: RunScriptInput) -> Result<String, ToolError> {
        let path = resolve_within(root, &input.file_path, "execute")?;
        if !path.exists() {
            return Err(ToolError::NotFound(input.file_path));
        }
        if path.extension().and_then(|e| e.to_str()) != Some(SCRIPT_EXTENSION) {
            return Err(ToolError::WrongFileType(input.file_path));
        }

        let mut cmd = tokio::process::Command::new(&self.settings.interpreter);
        cmd.arg(&path)
            .args(input.args.as_deref().unwrap_or_default())
            .current_dir(absolute_root(root)?)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        for var in SCRIPT_STRIPPED_ENV_VARS {
            cmd.env_remove(var);
        }

        let child = cmd.spawn().map_err(ToolError::Spawn)?;

        // Dropping the wait future on timeout drops the child, which kills it.
        let timeout = self.settings.timeout;
        let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(output) => output.map_err(ToolError::Spawn)?,
            Err(_) => {
                tracing::warn!(script = %input.file_path, "script timed out, killed");
                return Err(ToolError::Timeout(timeout.as_secs()));
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        let mut sections = Vec::new();
        if !stdout.is_empty() {
            sections.push(format!("STDOUT:\n{stdout}"));
        }
        if !stderr.is_empty() {
            sections.push(format!("STDERR:\n{stderr}"));
        }
        if !output.status.success() {
            sections.push(format!(
                "Process exited with code {}",
                exit_code(&output.status)
            ));
        }

        if sections.is_empty() {
            Ok("No output produced.".to_string())
        } else {
            Ok(sections.join("\n"))
        }
    }
}

/// Exit code of a finished child. A signal death is reported as minus the
/// signal number.
fn exit_code(status: &std::process::ExitStatus) -> i32 {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }
    status.code().unwrap_or(-1)
}

#[derive(Deserialize)]
struct RunScriptInput {
    file_path: String,
    #[serde(default)]
    args: Option<Vec<String>>,
}

#[async_trait::async_trait]
impl Tool for RunScriptTool {
    fn name(&self) -> &str {
        "run_script"
    }

    fn description(&self) -> &str {
        "Executes a Python file with optional command-line arguments, constrained to the working directory. Captures stdout and stderr."
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "file_path": {
                    "type": "string",
                    "description": "The path to the Python file to execute, relative to the working directory."
                },
                "args": {
                    "type": "array",
                    "description": "Optional list of command-line arguments to pass to the Python file.",
                    "items": { "type": "string" }
                }
            },
            "required": ["file_path"]
        })
    }

    async fn execute(&self, working_directory: &Path, input: Value) -> ToolOutput {
        let result = match serde_json::from_value::<RunScriptInput>(input) {
            Ok(input) => self.run(working_directory, input).await,
            Err(e) => Err(e.into()),
        };
        ToolOutput::from(result)
    }
}
