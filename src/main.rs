//! Entry point for codeagent, an autonomous AI coding agent for the terminal.
//!
//! This binary loads environment variables, parses CLI arguments via [`cli`],
//! sets up logging, and hands over to one-shot or interactive mode.

mod agent;
mod cli;
mod config;
mod constants;
mod message;
mod output;
mod provider;
mod tools;

use anyhow::Result;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Runs the codeagent CLI.
///
/// Loads `.env` files (silently ignored if absent), parses command-line
/// arguments into a [`cli::Cli`] struct, and dispatches via [`cli::run`].
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = cli::parse();
    let (_, verbose) = cli.task_and_verbosity();
    init_tracing(verbose);
    cli::run(cli).await
}

/// Logs go to stderr; `RUST_LOG` overrides the verbosity-based default.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "codeagent=debug"
    } else {
        "codeagent=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}
