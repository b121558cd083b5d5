//! Output rendering abstraction for codeagent.
//!
//! Defines the [`Renderer`] trait that decouples the turn loop from the
//! display layer. [`StdoutRenderer`] prints colored progress to the terminal;
//! tests plug in recording renderers instead.

use colored::Colorize;
use serde_json::Value;

use crate::agent::{RequestOutcome, RequestStats, Termination};
use crate::constants::VERBOSE_RESULT_PREVIEW_CHARS;
use crate::tools::ToolOutput;

/// Messages the loop injects on its own, reported so the user sees why.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// The model asked a question before doing anything.
    Redirect,
    /// The model returned nothing.
    Continue,
    /// The provider call failed.
    Recovery,
}

/// Whether a `write_file` call is about to create or replace a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileChange {
    Create,
    Modify,
}

/// Receives turn-loop events as they happen.
pub trait Renderer {
    fn request_started(&mut self, prompt: &str);

    /// `iteration` counts from 1.
    fn iteration_started(&mut self, iteration: usize, max_iterations: usize);

    fn tool_start(&mut self, name: &str, arguments: &Value);

    fn file_change(&mut self, path: &str, change: FileChange);

    fn tool_result(&mut self, name: &str, output: &ToolOutput);

    /// Running totals after each dispatched turn.
    fn progress(&mut self, stats: &RequestStats);

    fn notice(&mut self, notice: Notice);

    /// Called when a provider call fails.
    fn render_error(&mut self, err: &str);

    /// Final summary of a finished request.
    fn outcome(&mut self, outcome: &RequestOutcome);
}

/// Renders loop events to stdout.
///
/// Quiet by default: tool names, file writes and the final summary. With
/// `verbose` set it also shows iterations, arguments, result previews and
/// progress counters.
pub struct StdoutRenderer {
    verbose: bool,
}

impl StdoutRenderer {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// A horizontal rule sized to the terminal (capped at 80 columns).
    fn rule(&self) -> String {
        let width = terminal_size::terminal_size()
            .map(|(w, _)| w.0 as usize)
            .unwrap_or(80)
            .clamp(1, 80);
        "─".repeat(width)
    }
}

/// First `max` characters of `text`, with `...` appended when cut.
fn preview(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

impl Renderer for StdoutRenderer {
    fn request_started(&mut self, prompt: &str) {
        println!("{}\n", format!("Starting task: {prompt}").cyan().bold());
    }

    fn iteration_started(&mut self, iteration: usize, _max_iterations: usize) {
        if self.verbose {
            println!("{}", format!("--- Iteration {iteration} ---").dimmed());
        }
    }

    fn tool_start(&mut self, name: &str, arguments: &Value) {
        if self.verbose {
            println!("{}", format!("→ Calling: {name}({arguments})").cyan());
        } else {
            println!("{}", format!("→ {name}").cyan().dimmed());
        }
    }

    fn file_change(&mut self, path: &str, change: FileChange) {
        match change {
            FileChange::Modify => println!("{}", format!("📝 Modifying {path}").yellow()),
            FileChange::Create => println!("{}", format!("📄 Creating {path}").green()),
        }
    }

    fn tool_result(&mut self, name: &str, output: &ToolOutput) {
        if name == "write_file" {
            if output.is_error {
                println!("{}", format!("✗ {}", output.content).red());
            } else {
                println!("{}", format!("✓ {}", output.content).green());
            }
        } else if self.verbose {
            let shown = preview(&output.content, VERBOSE_RESULT_PREVIEW_CHARS);
            println!("{}", format!("  Result: {shown}").dimmed());
        }
    }

    fn progress(&mut self, stats: &RequestStats) {
        if self.verbose {
            println!(
                "{}",
                format!(
                    "Progress: {} calls, {} files read, {} files modified",
                    stats.function_calls,
                    stats.files_read.len(),
                    stats.files_modified.len()
                )
                .dimmed()
            );
        }
    }

    fn notice(&mut self, notice: Notice) {
        match notice {
            Notice::Redirect if self.verbose => {
                println!("{}", "Redirecting agent to take action...".yellow())
            }
            Notice::Continue if self.verbose => {
                println!("{}", "No response, continuing...".yellow())
            }
            Notice::Recovery => println!("{}", "Attempting to recover...".yellow()),
            _ => {}
        }
    }

    fn render_error(&mut self, err: &str) {
        eprintln!();
        eprintln!("{} {}", "error:".red().bold(), err);
    }

    fn outcome(&mut self, outcome: &RequestOutcome) {
        let stats = &outcome.stats;
        match &outcome.termination {
            Termination::Done { response } => {
                println!("\n{}", "✓ Task Complete".green().bold());
                let rule = self.rule();
                println!("{}", rule.green());
                println!("{response}");
                println!("{}", rule.green());

                println!("\n{}", "Summary:".bold());
                println!("  • Iterations: {}", outcome.iterations);
                println!("  • Function calls: {}", stats.function_calls);
                println!("  • Files explored: {}", stats.files_read.len());
                println!("  • Files modified: {}", stats.files_modified.len());

                if !stats.files_modified.is_empty() {
                    println!("\n{}", "Modified files:".cyan().bold());
                    for file in &stats.files_modified {
                        println!("  • {file}");
                    }
                }
            }
            Termination::Aborted => {
                println!(
                    "\n{}",
                    format!("⚠ Safety limit reached ({} iterations)", outcome.iterations).red()
                );
                println!(
                    "{}",
                    "The agent made significant progress but didn't complete. Summary:".yellow()
                );
                println!("  • Function calls: {}", stats.function_calls);
                println!("  • Files modified: {}", stats.files_modified.len());
            }
        }
        println!();
    }
}
