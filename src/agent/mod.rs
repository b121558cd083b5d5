//! The agent turn loop and its session context.
//!
//! An [`Agent`] bundles everything one session needs: the provider handle,
//! the tool registry (which owns the working directory) and the generation
//! budget. Each call to [`Agent::run_request`] starts a fresh conversation,
//! drives it until the model finishes or the budget runs out, and returns a
//! [`RequestOutcome`]. Nothing is global, so several agents can coexist.

mod prompt;
mod stats;
mod turn_loop;

pub use stats::RequestStats;

use std::path::Path;

use crate::message::Message;
use crate::provider::ChatProvider;
use crate::tools::ToolRegistry;

/// Explicit session context for the turn loop.
pub struct Agent {
    provider: Box<dyn ChatProvider>,
    tools: ToolRegistry,
    max_iterations: usize,
}

impl Agent {
    pub fn new(provider: Box<dyn ChatProvider>, tools: ToolRegistry, max_iterations: usize) -> Self {
        Self {
            provider,
            tools,
            max_iterations,
        }
    }

    pub fn working_directory(&self) -> &Path {
        self.tools.working_directory()
    }

    pub fn provider_name(&self) -> String {
        self.provider.name()
    }
}

/// How a request ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Termination {
    /// The model gave a final text response.
    Done { response: String },
    /// The generation budget ran out first. Side effects are kept.
    Aborted,
}

/// Everything a finished request reports back to the shell.
#[derive(Debug, Clone)]
pub struct RequestOutcome {
    pub termination: Termination,
    /// Number of model generations made.
    pub iterations: usize,
    pub stats: RequestStats,
    /// The full conversation, starting with the user prompt.
    pub history: Vec<Message>,
}

#[cfg(test)]
mod tests;
