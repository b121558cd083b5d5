//! Command-line interface definition and dispatch for codeagent.
//!
//! Uses [`clap`] for argument parsing with derive macros. A task given on the
//! command line runs once; without one the interactive loop in [`repl`] starts.

mod repl;

use crate::agent::Agent;
use crate::config::Config;
use crate::output::{Renderer, StdoutRenderer};
use crate::provider::{self, Provider};
use crate::tools::ToolRegistry;
use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;

/// Top-level CLI structure for codeagent.
#[derive(Parser)]
#[command(
    name = "codeagent",
    about = "An autonomous AI coding agent that explores, edits and verifies code on its own"
)]
pub struct Cli {
    /// The task to perform; omit it to start an interactive session.
    /// Everything after the first word belongs to the task, dashes included.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub task: Vec<String>,
    /// Show every step: iterations, tool arguments, results and debug logs
    #[arg(long)]
    pub verbose: bool,
    /// Provider to use (gemini, anthropic, openai, openrouter, ollama)
    #[arg(short, long)]
    pub provider: Option<String>,
    /// Model to use (overrides config); accepts provider/model
    #[arg(short, long)]
    pub model: Option<String>,
    /// Working directory the agent is confined to (defaults to the current one)
    #[arg(short = 'C', long = "directory")]
    pub directory: Option<PathBuf>,
}

impl Cli {
    /// The task text with any `--verbose` words removed, and whether verbose
    /// output was asked for anywhere on the command line.
    pub fn task_and_verbosity(&self) -> (String, bool) {
        let mut verbose = self.verbose;
        let mut words = Vec::with_capacity(self.task.len());
        for word in &self.task {
            if word == "--verbose" {
                verbose = true;
            } else {
                words.push(word.as_str());
            }
        }
        (words.join(" ").trim().to_string(), verbose)
    }
}

/// Parses command-line arguments into a [`Cli`] struct.
///
/// Delegates to [`clap::Parser::parse`], which exits the process on invalid input.
pub fn parse() -> Cli {
    Cli::parse()
}

/// Builds the agent from config and runs the task, or the interactive loop.
pub async fn run(cli: Cli) -> Result<()> {
    let working_directory = match cli.directory.clone() {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to determine current directory")?,
    };
    if !working_directory.is_dir() {
        anyhow::bail!("Working directory {:?} does not exist", working_directory);
    }

    let config = Config::load(&working_directory)?;
    let selection =
        provider::resolve_model(cli.provider.as_deref(), cli.model.as_deref(), &config)?;
    let provider = Provider::from_config(&config, &selection)?;
    let tools = ToolRegistry::with_builtins(working_directory, config.script_settings());
    tracing::debug!(tools = tools.len(), "registered tools");
    let agent = Agent::new(Box::new(provider), tools, config.max_iterations());

    tracing::debug!(
        provider = %agent.provider_name(),
        directory = %agent.working_directory().display(),
        "agent ready"
    );

    let (task, verbose) = cli.task_and_verbosity();
    if task.is_empty() {
        repl::run_repl(&agent, verbose).await
    } else {
        run_task(&agent, &task, verbose).await;
        Ok(())
    }
}

/// Runs one request and renders its outcome.
///
/// Ctrl+C cancels the request; dropping it also kills a running script.
async fn run_task(agent: &Agent, task: &str, verbose: bool) {
    let mut renderer = StdoutRenderer::new(verbose);
    let outcome = tokio::select! {
        outcome = agent.run_request(task, &mut renderer) => Some(outcome),
        _ = tokio::signal::ctrl_c() => None,
    };

    match outcome {
        Some(outcome) => renderer.outcome(&outcome),
        None => {
            tracing::info!("request cancelled by user");
            println!("\n{}", "Request cancelled.".yellow());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_from(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn task_words_may_start_with_dashes() {
        let cli = parse_from(&["codeagent", "run", "pytest", "-k", "slow", "--verbose"]);
        assert_eq!(
            cli.task_and_verbosity(),
            ("run pytest -k slow".to_string(), true)
        );
    }

    #[test]
    fn verbose_is_stripped_wherever_it_appears() {
        let cli = parse_from(&["codeagent", "fix", "--verbose", "the", "bug"]);
        assert_eq!(cli.task_and_verbosity(), ("fix the bug".to_string(), true));

        let cli = parse_from(&["codeagent", "--verbose", "fix", "it"]);
        assert_eq!(cli.task_and_verbosity(), ("fix it".to_string(), true));
    }

    #[test]
    fn options_before_the_task_still_parse() {
        let cli = parse_from(&["codeagent", "-p", "ollama", "-C", "/tmp", "list", "files"]);
        assert_eq!(cli.provider.as_deref(), Some("ollama"));
        assert_eq!(cli.directory, Some(PathBuf::from("/tmp")));
        assert_eq!(cli.task_and_verbosity(), ("list files".to_string(), false));
    }

    #[test]
    fn no_task_means_interactive() {
        let cli = parse_from(&["codeagent"]);
        assert_eq!(cli.task_and_verbosity(), (String::new(), false));
    }
}
