//! Interactive session loop.
//!
//! Reads requests with [`rustyline`] (line editing, persistent history) and
//! runs each one as a fresh request on the shared [`Agent`].

use anyhow::Result;
use colored::Colorize;
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::Path;

use super::run_task;
use crate::agent::Agent;
use crate::config::Config;

const BANNER: &str = r"
   ____          _         _                    _
  / ___|___   __| | ___   / \   __ _  ___ _ __ | |_
 | |   / _ \ / _` |/ _ \ / _ \ / _` |/ _ \ '_ \| __|
 | |__| (_) | (_| |  __// ___ \ (_| |  __/ | | | |_
  \____\___/ \__,_|\___/_/   \_\__, |\___|_| |_|\__|
                               |___/";

/// Prefix that turns on verbose rendering for a single request.
const VERBOSE_PREFIX: &str = "--verbose";

/// One line of user input, classified.
#[derive(Debug, PartialEq, Eq)]
enum ReplInput<'a> {
    Empty,
    Exit,
    Clear,
    Task { prompt: &'a str, verbose: bool },
}

fn parse_input(line: &str) -> ReplInput<'_> {
    let line = line.trim();
    if line.is_empty() {
        return ReplInput::Empty;
    }
    if ["exit", "quit", "q"]
        .iter()
        .any(|cmd| line.eq_ignore_ascii_case(cmd))
    {
        return ReplInput::Exit;
    }
    if line.eq_ignore_ascii_case("clear") {
        return ReplInput::Clear;
    }

    let (prompt, verbose) = match line.strip_prefix(VERBOSE_PREFIX) {
        Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => {
            (rest.trim(), true)
        }
        _ => (line, false),
    };
    if prompt.is_empty() {
        ReplInput::Empty
    } else {
        ReplInput::Task { prompt, verbose }
    }
}

/// Runs the interactive loop until `exit` or Ctrl+D.
///
/// # Readline behavior
///
/// - **Ctrl+C** at the prompt: prints a hint, stays in the loop
/// - **Ctrl+C** during a request: cancels that request
/// - **Ctrl+D**: exits
/// - History is persisted to `~/.cache/codeagent/history.txt`
pub async fn run_repl(agent: &Agent, verbose: bool) -> Result<()> {
    print_banner(agent);

    let mut rl = DefaultEditor::new()?;
    let history_path = Config::history_path()?;
    if history_path.exists() {
        let _ = rl.load_history(&history_path);
    }

    loop {
        match rl.readline(&format!("{} ", ">".green().bold())) {
            Ok(line) => match parse_input(&line) {
                ReplInput::Empty => continue,
                ReplInput::Exit => {
                    println!("{}", "Goodbye!".bold().blue());
                    break;
                }
                ReplInput::Clear => {
                    execute!(std::io::stdout(), Clear(ClearType::All), MoveTo(0, 0))?;
                    print_banner(agent);
                }
                ReplInput::Task {
                    prompt,
                    verbose: verbose_once,
                } => {
                    let _ = rl.add_history_entry(line.trim());
                    println!();
                    run_task(agent, prompt, verbose || verbose_once).await;
                }
            },
            Err(ReadlineError::Interrupted) => {
                println!("{}", "Use 'exit' to quit".dimmed());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "Goodbye!".bold().blue());
                break;
            }
            Err(e) => {
                eprintln!("{} {}", "error:".red().bold(), e);
                break;
            }
        }
    }

    if let Some(parent) = history_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let _ = rl.save_history(&history_path);
    Ok(())
}

fn print_banner(agent: &Agent) {
    println!("{}", BANNER.bold().blue());
    println!(
        "  {} {}",
        "Working in".dimmed(),
        shorten_home(agent.working_directory()).yellow()
    );
    println!(
        "  {} {}\n",
        "Model".dimmed(),
        agent.provider_name().yellow()
    );
    println!("{}", "Type your requests in natural language.".dimmed());
    println!(
        "{}\n",
        "Commands: 'exit'/'quit' to leave, '--verbose' prefix for detailed output, 'clear' to clear screen"
            .dimmed()
    );
}

/// Displays `path` with the home directory replaced by `~`.
fn shorten_home(path: &Path) -> String {
    match dirs::home_dir().and_then(|home| path.strip_prefix(home).ok().map(Path::to_path_buf)) {
        Some(rest) if rest.as_os_str().is_empty() => "~".to_string(),
        Some(rest) => format!("~/{}", rest.display()),
        None => path.display().to_string(),
    }
}
