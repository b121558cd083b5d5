use super::*;
use crate::constants::{CONTINUE_MESSAGE, RECOVERY_MESSAGE, REDIRECT_MESSAGE};
use crate::message::{Part, Role, ToolCallRequest, ToolPayload};
use crate::output::{FileChange, Notice, Renderer};
use crate::provider::{ChatProvider, ModelResponse};
use crate::tools::run_script::ScriptSettings;
use crate::tools::{ToolOutput, ToolSpec};
use anyhow::Result;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

type Step = std::result::Result<ModelResponse, String>;

/// Replays a fixed script of responses and records every history it is sent.
/// Once the script runs out it repeats `fallback`, or fails if there is none.
struct ScriptedProvider {
    script: Mutex<VecDeque<Step>>,
    fallback: Option<ModelResponse>,
    seen: Arc<Mutex<Vec<Vec<Message>>>>,
}

impl ScriptedProvider {
    fn new(steps: Vec<Step>) -> (Self, Arc<Mutex<Vec<Vec<Message>>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let provider = Self {
            script: Mutex::new(steps.into()),
            fallback: None,
            seen: Arc::clone(&seen),
        };
        (provider, seen)
    }

    fn repeating(response: ModelResponse) -> (Self, Arc<Mutex<Vec<Vec<Message>>>>) {
        let (mut provider, seen) = Self::new(Vec::new());
        provider.fallback = Some(response);
        (provider, seen)
    }
}

#[async_trait::async_trait]
impl ChatProvider for ScriptedProvider {
    fn name(&self) -> String {
        "scripted".to_string()
    }

    async fn generate(
        &self,
        history: &[Message],
        _tools: &[ToolSpec],
        _system_instruction: &str,
    ) -> Result<ModelResponse> {
        self.seen.lock().unwrap().push(history.to_vec());
        let step = self.script.lock().unwrap().pop_front();
        match step {
            Some(Ok(response)) => Ok(response),
            Some(Err(e)) => Err(anyhow::anyhow!(e)),
            None => match &self.fallback {
                Some(response) => Ok(response.clone()),
                None => Err(anyhow::anyhow!("script exhausted")),
            },
        }
    }
}

#[derive(Default)]
struct RecordingRenderer {
    notices: Vec<Notice>,
    errors: Vec<String>,
    tools: Vec<String>,
    file_changes: Vec<(String, FileChange)>,
}

impl Renderer for RecordingRenderer {
    fn request_started(&mut self, _prompt: &str) {}
    fn iteration_started(&mut self, _iteration: usize, _max_iterations: usize) {}
    fn tool_start(&mut self, name: &str, _arguments: &Value) {
        self.tools.push(name.to_string());
    }
    fn file_change(&mut self, path: &str, change: FileChange) {
        self.file_changes.push((path.to_string(), change));
    }
    fn tool_result(&mut self, _name: &str, _output: &ToolOutput) {}
    fn progress(&mut self, _stats: &RequestStats) {}
    fn notice(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
    fn render_error(&mut self, err: &str) {
        self.errors.push(err.to_string());
    }
    fn outcome(&mut self, _outcome: &RequestOutcome) {}
}

fn text(t: &str) -> Step {
    Ok(ModelResponse {
        text: Some(t.to_string()),
        tool_calls: vec![],
    })
}

fn calls(calls: Vec<ToolCallRequest>) -> Step {
    Ok(ModelResponse {
        text: None,
        tool_calls: calls,
    })
}

fn call(id: &str, name: &str, args: Value) -> ToolCallRequest {
    ToolCallRequest::new(id, name, args)
}

fn agent_with(provider: ScriptedProvider, max_iterations: usize) -> (TempDir, Agent) {
    let dir = tempfile::tempdir().unwrap();
    let tools = ToolRegistry::with_builtins(dir.path().to_path_buf(), ScriptSettings::default());
    (dir, Agent::new(Box::new(provider), tools, max_iterations))
}

fn done_text(outcome: &RequestOutcome) -> &str {
    match &outcome.termination {
        Termination::Done { response } => response,
        Termination::Aborted => panic!("request was aborted"),
    }
}

/// Every assistant message with tool calls is immediately followed by one
/// tool message answering each call, in order.
fn assert_calls_answered(history: &[Message]) {
    for (i, msg) in history.iter().enumerate() {
        let ids: Vec<_> = msg.tool_calls().map(|c| c.id.clone()).collect();
        if ids.is_empty() {
            continue;
        }
        let next = history.get(i + 1).expect("tool calls left unanswered");
        assert_eq!(next.role, Role::Tool);
        let answered: Vec<_> = next.tool_results_iter().map(|r| r.id.clone()).collect();
        assert_eq!(answered, ids);
    }
}

#[tokio::test]
async fn test_text_response_completes() {
    let (provider, seen) = ScriptedProvider::new(vec![text("  All done.  ")]);
    let (_dir, agent) = agent_with(provider, 100);
    let mut renderer = RecordingRenderer::default();

    let outcome = agent.run_request("say hi", &mut renderer).await;

    assert_eq!(done_text(&outcome), "All done.");
    assert_eq!(outcome.iterations, 1);
    assert_eq!(seen.lock().unwrap().len(), 1);
    assert_eq!(seen.lock().unwrap()[0], vec![Message::user("say hi")]);
    assert_eq!(outcome.history.len(), 2);
    assert_eq!(outcome.history[1].role, Role::Assistant);
}

#[tokio::test]
async fn test_calls_answered_by_one_tool_message_in_order() {
    let (provider, seen) = ScriptedProvider::new(vec![
        calls(vec![
            call("c1", "write_file", json!({"file_path": "a.py", "content": "x = 1\n"})),
            call("c2", "read_file", json!({"file_path": "a.py"})),
            call("c3", "list_directory", json!({})),
        ]),
        text("Wrote and checked a.py."),
    ]);
    let (dir, agent) = agent_with(provider, 100);
    let mut renderer = RecordingRenderer::default();

    let outcome = agent.run_request("create a.py", &mut renderer).await;
    assert!(matches!(outcome.termination, Termination::Done { .. }));
    assert_eq!(outcome.iterations, 2);

    // user, assistant(3 calls), tool(3 results), assistant(text)
    assert_eq!(outcome.history.len(), 4);
    let tool_msg = &outcome.history[2];
    assert_eq!(tool_msg.role, Role::Tool);
    let results: Vec<_> = tool_msg.tool_results_iter().collect();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].id, "c1");
    assert_eq!(results[1].name, "read_file");
    assert_eq!(results[1].payload, ToolPayload::Result("x = 1\n".into()));
    assert!(matches!(&results[2].payload, ToolPayload::Result(s) if s.contains("a.py")));

    // The later call saw the earlier write.
    assert!(dir.path().join("a.py").is_file());
    assert_eq!(renderer.tools, ["write_file", "read_file", "list_directory"]);
    assert_eq!(renderer.file_changes, [("a.py".to_string(), FileChange::Create)]);

    let seen = seen.lock().unwrap();
    assert_eq!(seen[1].len(), 3);
    for history in seen.iter() {
        assert_calls_answered(history);
    }
}

#[tokio::test]
async fn test_unknown_tool_is_fed_back() {
    let (provider, seen) = ScriptedProvider::new(vec![
        calls(vec![call("c1", "delete_everything", json!({}))]),
        text("Sorry, used list_directory instead."),
    ]);
    let (_dir, agent) = agent_with(provider, 100);
    let outcome = agent
        .run_request("clean up", &mut RecordingRenderer::default())
        .await;

    assert!(matches!(outcome.termination, Termination::Done { .. }));
    let second_request = &seen.lock().unwrap()[1];
    let result = second_request[2].tool_results_iter().next().unwrap();
    assert_eq!(
        result.payload,
        ToolPayload::Error("Unknown function: delete_everything".into())
    );
    assert_eq!(outcome.stats.function_calls, 1);
}

#[tokio::test]
async fn test_budget_exhaustion_aborts_after_exact_invocations() {
    let (provider, seen) = ScriptedProvider::repeating(ModelResponse {
        text: None,
        tool_calls: vec![call("loop", "list_directory", json!({}))],
    });
    let (_dir, agent) = agent_with(provider, 5);

    let outcome = agent
        .run_request("never finish", &mut RecordingRenderer::default())
        .await;

    assert_eq!(outcome.termination, Termination::Aborted);
    assert_eq!(outcome.iterations, 5);
    assert_eq!(seen.lock().unwrap().len(), 5);
    assert_eq!(outcome.stats.function_calls, 5);
    assert_calls_answered(&outcome.history);
}

#[tokio::test]
async fn test_clarification_first_triggers_one_redirect() {
    let (provider, seen) = ScriptedProvider::new(vec![
        text("What do you want me to change?"),
        calls(vec![call("c1", "list_directory", json!({"directory": "."}))]),
        text("Explored and fixed."),
    ]);
    let (_dir, agent) = agent_with(provider, 100);
    let mut renderer = RecordingRenderer::default();

    let outcome = agent.run_request("fix it", &mut renderer).await;

    assert_eq!(done_text(&outcome), "Explored and fixed.");
    assert_eq!(renderer.notices, [Notice::Redirect]);
    let redirects = outcome
        .history
        .iter()
        .filter(|m| m.role == Role::User && m.text() == REDIRECT_MESSAGE)
        .count();
    assert_eq!(redirects, 1);
    // The redirect directly follows the clarification question.
    assert_eq!(seen.lock().unwrap()[1][2], Message::user(REDIRECT_MESSAGE));
}

#[tokio::test]
async fn test_clarification_after_tool_use_is_final() {
    let (provider, _seen) = ScriptedProvider::new(vec![
        calls(vec![call("c1", "list_directory", json!({}))]),
        text("The directory is empty. Please provide the file to fix."),
    ]);
    let (_dir, agent) = agent_with(provider, 100);
    let mut renderer = RecordingRenderer::default();

    let outcome = agent.run_request("fix it", &mut renderer).await;

    assert!(done_text(&outcome).starts_with("The directory is empty."));
    assert!(renderer.notices.is_empty());
}

#[tokio::test]
async fn test_empty_response_gets_continue_nudge() {
    let (provider, seen) = ScriptedProvider::new(vec![text("   "), text("Finished.")]);
    let (_dir, agent) = agent_with(provider, 100);
    let mut renderer = RecordingRenderer::default();

    let outcome = agent.run_request("go", &mut renderer).await;

    assert_eq!(done_text(&outcome), "Finished.");
    assert_eq!(outcome.iterations, 2);
    assert_eq!(renderer.notices, [Notice::Continue]);
    // The empty assistant turn is still recorded before the nudge.
    let second = &seen.lock().unwrap()[1];
    assert_eq!(second.len(), 3);
    assert_eq!(second[1].role, Role::Assistant);
    assert_eq!(second[2], Message::user(CONTINUE_MESSAGE));
}

#[tokio::test]
async fn test_provider_error_recovers_and_consumes_iteration() {
    let (provider, seen) = ScriptedProvider::new(vec![
        Err("503 service unavailable".into()),
        text("Recovered."),
    ]);
    let (_dir, agent) = agent_with(provider, 100);
    let mut renderer = RecordingRenderer::default();

    let outcome = agent.run_request("go", &mut renderer).await;

    assert_eq!(done_text(&outcome), "Recovered.");
    assert_eq!(outcome.iterations, 2);
    assert_eq!(renderer.notices, [Notice::Recovery]);
    assert_eq!(renderer.errors, ["503 service unavailable"]);
    assert_eq!(
        seen.lock().unwrap()[1],
        vec![Message::user("go"), Message::user(RECOVERY_MESSAGE)]
    );
}

#[tokio::test]
async fn test_provider_errors_alone_end_in_abort() {
    let (provider, seen) = ScriptedProvider::new(vec![]);
    let (_dir, agent) = agent_with(provider, 3);

    let outcome = agent
        .run_request("go", &mut RecordingRenderer::default())
        .await;

    assert_eq!(outcome.termination, Termination::Aborted);
    assert_eq!(seen.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn test_stats_track_read_and_written_paths() {
    let (provider, _seen) = ScriptedProvider::new(vec![
        calls(vec![
            call("c1", "write_file", json!({"file_path": "pkg/b.py", "content": "pass\n"})),
            call("c2", "write_file", json!({"file_path": "a.py", "content": "pass\n"})),
        ]),
        calls(vec![
            call("c3", "read_file", json!({"file_path": "a.py"})),
            call("c4", "read_file", json!({"file_path": "a.py"})),
            call("c5", "write_file", json!({"file_path": "a.py", "content": "x = 2\n"})),
        ]),
        text("ok"),
    ]);
    let (_dir, agent) = agent_with(provider, 100);
    let mut renderer = RecordingRenderer::default();

    let outcome = agent.run_request("go", &mut renderer).await;

    assert_eq!(outcome.stats.function_calls, 5);
    assert_eq!(
        outcome.stats.files_modified.iter().collect::<Vec<_>>(),
        ["a.py", "pkg/b.py"]
    );
    assert_eq!(outcome.stats.files_read.len(), 1);
    assert_eq!(
        renderer.file_changes.last(),
        Some(&("a.py".to_string(), FileChange::Modify))
    );
}

#[tokio::test]
async fn test_text_alongside_calls_keeps_going() {
    let (provider, _seen) = ScriptedProvider::new(vec![
        Ok(ModelResponse {
            text: Some("Let me look first.".into()),
            tool_calls: vec![call("c1", "list_directory", json!({}))],
        }),
        text("Done."),
    ]);
    let (_dir, agent) = agent_with(provider, 100);

    let outcome = agent
        .run_request("go", &mut RecordingRenderer::default())
        .await;

    assert_eq!(done_text(&outcome), "Done.");
    let first_reply = &outcome.history[1];
    assert!(matches!(&first_reply.parts[0], Part::Text(t) if t == "Let me look first."));
    assert_eq!(first_reply.tool_calls().count(), 1);
}

#[tokio::test]
async fn test_agents_are_independent() {
    let (first, _) = ScriptedProvider::new(vec![text("one")]);
    let (second, _) = ScriptedProvider::new(vec![text("two")]);
    let (dir_a, agent_a) = agent_with(first, 10);
    let (dir_b, agent_b) = agent_with(second, 10);

    assert_ne!(agent_a.working_directory(), agent_b.working_directory());
    assert_eq!(agent_a.working_directory(), dir_a.path());
    assert_eq!(agent_b.working_directory(), dir_b.path());

    let a = agent_a.run_request("a", &mut RecordingRenderer::default()).await;
    let b = agent_b.run_request("b", &mut RecordingRenderer::default()).await;
    assert_eq!(done_text(&a), "one");
    assert_eq!(done_text(&b), "two");
}
