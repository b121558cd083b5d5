//! The turn loop state machine.
//!
//! ```text
//! AwaitModel ──tool calls──▶ Dispatching ──results appended──▶ AwaitModel
//!     │                                                            │
//!     ├── final text ──▶ Done                   budget spent ──▶ Aborted
//!     └── clarification / empty / provider error ──▶ nudge ──▶ AwaitModel
//! ```
//!
//! One generation is in flight at a time. Tool calls run sequentially in the
//! order the model gave them, and every call of a turn is answered before the
//! next generation.

use super::prompt::is_clarification;
use super::{Agent, RequestOutcome, RequestStats, Termination};
use crate::constants::{CONTINUE_MESSAGE, RECOVERY_MESSAGE, REDIRECT_MESSAGE, SYSTEM_PROMPT};
use crate::message::{Message, ToolCallRequest};
use crate::output::{FileChange, Notice, Renderer};
use crate::provider::ModelResponse;
use crate::tools::sandbox::resolve_within;

enum LoopState {
    AwaitModel,
    Dispatching(Vec<ToolCallRequest>),
    Done(String),
    Aborted,
}

impl Agent {
    /// Runs one user request to completion.
    ///
    /// Never fails: provider errors are fed back to the model as a recovery
    /// nudge and an exhausted budget ends in [`Termination::Aborted`].
    pub async fn run_request(&self, prompt: &str, renderer: &mut dyn Renderer) -> RequestOutcome {
        let mut history = vec![Message::user(prompt)];
        let mut stats = RequestStats::default();
        let mut iterations = 0;
        let specs = self.tools.specs();

        renderer.request_started(prompt);
        tracing::debug!(
            provider = %self.provider.name(),
            tools = specs.len(),
            max_iterations = self.max_iterations,
            "starting request"
        );

        let mut state = LoopState::AwaitModel;
        let termination = loop {
            state = match state {
                LoopState::Done(response) => break Termination::Done { response },
                LoopState::Aborted => break Termination::Aborted,
                LoopState::AwaitModel if iterations >= self.max_iterations => {
                    tracing::warn!(iterations, "iteration budget exhausted");
                    LoopState::Aborted
                }
                LoopState::AwaitModel => {
                    iterations += 1;
                    renderer.iteration_started(iterations, self.max_iterations);
                    tracing::debug!(iteration = iterations, messages = history.len(), "requesting generation");

                    match self.provider.generate(&history, &specs, SYSTEM_PROMPT).await {
                        Ok(response) => inspect(response, &mut history, &stats, renderer),
                        Err(e) => {
                            let error = format!("{e:#}");
                            tracing::warn!(iteration = iterations, %error, "provider call failed");
                            renderer.render_error(&error);
                            renderer.notice(Notice::Recovery);
                            history.push(Message::user(RECOVERY_MESSAGE));
                            LoopState::AwaitModel
                        }
                    }
                }
                LoopState::Dispatching(calls) => {
                    self.dispatch_all(calls, &mut history, &mut stats, renderer)
                        .await;
                    renderer.progress(&stats);
                    LoopState::AwaitModel
                }
            };
        };

        tracing::info!(
            iterations,
            function_calls = stats.function_calls,
            done = matches!(termination, Termination::Done { .. }),
            "request finished"
        );

        RequestOutcome {
            termination,
            iterations,
            stats,
            history,
        }
    }

    /// Runs every call of one turn in order and appends a single tool message
    /// holding all of their results.
    async fn dispatch_all(
        &self,
        calls: Vec<ToolCallRequest>,
        history: &mut Vec<Message>,
        stats: &mut RequestStats,
        renderer: &mut dyn Renderer,
    ) {
        let mut results = Vec::with_capacity(calls.len());
        for call in &calls {
            renderer.tool_start(&call.name, &call.arguments);
            if let Some((path, change)) = self.pending_file_change(call) {
                renderer.file_change(path, change);
            }

            stats.record(call);
            let (result, output) = self.tools.dispatch(call).await;
            renderer.tool_result(&call.name, &output);
            results.push(result);
        }
        history.push(Message::tool_results(results));
    }

    /// For `write_file` calls that stay inside the sandbox, whether the write
    /// will create the file or replace it.
    fn pending_file_change<'a>(&self, call: &'a ToolCallRequest) -> Option<(&'a str, FileChange)> {
        if call.name != "write_file" {
            return None;
        }
        let path = call.str_arg("file_path")?;
        let target = resolve_within(self.working_directory(), path, "write to").ok()?;
        let change = if target.is_file() {
            FileChange::Modify
        } else {
            FileChange::Create
        };
        Some((path, change))
    }
}

/// Appends the response and decides where the loop goes next.
fn inspect(
    response: ModelResponse,
    history: &mut Vec<Message>,
    stats: &RequestStats,
    renderer: &mut dyn Renderer,
) -> LoopState {
    let message = response.to_message();
    let calls: Vec<ToolCallRequest> = message.tool_calls().cloned().collect();
    history.push(message);

    if !calls.is_empty() {
        tracing::debug!(calls = calls.len(), "model requested tools");
        return LoopState::Dispatching(calls);
    }

    match response.trimmed_text() {
        Some(text) if stats.function_calls == 0 && is_clarification(text) => {
            tracing::debug!("model asked for clarification before acting; redirecting");
            renderer.notice(Notice::Redirect);
            history.push(Message::user(REDIRECT_MESSAGE));
            LoopState::AwaitModel
        }
        Some(text) => LoopState::Done(text.to_string()),
        None => {
            tracing::debug!("empty response; nudging");
            renderer.notice(Notice::Continue);
            history.push(Message::user(CONTINUE_MESSAGE));
            LoopState::AwaitModel
        }
    }
}
