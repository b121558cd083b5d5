//! Conversion between codeagent's message model and rig-core's wire types.

use rig::completion::ToolDefinition;
use rig::message::{
    AssistantContent, Message as RigMessage, Text, ToolCall as RigToolCall, ToolFunction,
    ToolResultContent, UserContent,
};
use rig::OneOrMany;
use serde_json::Value;

use super::schema;
use super::ModelResponse;
use crate::message::{Message, Part, Role, ToolCallRequest, ToolResult};
use crate::tools::ToolSpec;

/// Converts the full history, in order. Messages with nothing to send are skipped.
pub fn to_rig_messages(history: &[Message]) -> Vec<RigMessage> {
    history.iter().filter_map(to_rig_message).collect()
}

/// Converts one message to rig-core's format.
///
/// - **User** → user text
/// - **Assistant** → text and tool calls, in part order; blank text is dropped
///   and a turn with nothing left is not sent at all
/// - **Tool** → a single user message carrying every tool result of the turn
fn to_rig_message(msg: &Message) -> Option<RigMessage> {
    match msg.role {
        Role::User => Some(RigMessage::user(msg.text())),
        Role::Assistant => {
            let items: Vec<AssistantContent> = msg
                .parts
                .iter()
                .filter_map(|part| match part {
                    Part::Text(text) if !text.trim().is_empty() => {
                        Some(AssistantContent::Text(Text { text: text.clone() }))
                    }
                    Part::ToolCall(call) => Some(AssistantContent::ToolCall(to_rig_tool_call(call))),
                    _ => None,
                })
                .collect();
            match OneOrMany::many(items) {
                Ok(content) => Some(RigMessage::Assistant { id: None, content }),
                Err(_) => {
                    tracing::debug!("empty assistant turn, not sent to provider");
                    None
                }
            }
        }
        Role::Tool => {
            let results: Vec<UserContent> = msg.tool_results_iter().map(to_rig_tool_result).collect();
            match OneOrMany::many(results) {
                Ok(content) => Some(RigMessage::User { content }),
                Err(_) => {
                    tracing::warn!("tool message without results, skipping");
                    None
                }
            }
        }
    }
}

fn to_rig_tool_call(call: &ToolCallRequest) -> RigToolCall {
    let mut tool_call = RigToolCall::new(
        call.id.clone(),
        ToolFunction::new(call.name.clone(), call.arguments.clone()),
    );
    tool_call.call_id = call.call_id.clone();
    tool_call.signature = call.signature.clone();
    tool_call
}

fn to_rig_tool_result(result: &ToolResult) -> UserContent {
    let content = OneOrMany::one(ToolResultContent::text(result.payload.to_model_string()));
    match &result.call_id {
        Some(call_id) => {
            UserContent::tool_result_with_call_id(result.id.clone(), call_id.clone(), content)
        }
        None => UserContent::tool_result(result.id.clone(), content),
    }
}

/// Splits converted history into the prompt (last message) and the chat
/// history before it. Returns `None` for an empty history.
pub fn split_prompt(mut messages: Vec<RigMessage>) -> Option<(RigMessage, Vec<RigMessage>)> {
    let prompt = messages.pop()?;
    Some((prompt, messages))
}

/// Normalizes the assistant content of a completion into a [`ModelResponse`].
///
/// Text items are concatenated. Tool calls keep the provider's id when it has
/// one; otherwise a `call_<uuid>` id is generated so results can be paired.
pub fn from_rig_choice(choice: OneOrMany<AssistantContent>) -> ModelResponse {
    let mut text = String::new();
    let mut tool_calls = Vec::new();

    for item in choice.into_iter() {
        match item {
            AssistantContent::Text(Text { text: chunk }) => text.push_str(&chunk),
            AssistantContent::ToolCall(call) => {
                let id = if call.id.is_empty() {
                    format!("call_{}", uuid::Uuid::new_v4())
                } else {
                    call.id
                };
                tool_calls.push(ToolCallRequest {
                    call_id: call.call_id,
                    signature: call.signature,
                    ..ToolCallRequest::new(
                        id,
                        call.function.name,
                        decode_arguments(call.function.arguments),
                    )
                });
            }
            _ => {
                // Reasoning and other content is not part of the conversation model.
            }
        }
    }

    ModelResponse {
        text: (!text.is_empty()).then_some(text),
        tool_calls,
    }
}

/// Some backends deliver arguments as a JSON-encoded string; decode those.
fn decode_arguments(arguments: Value) -> Value {
    match arguments {
        Value::String(raw) => match serde_json::from_str::<Value>(&raw) {
            Ok(decoded @ Value::Object(_)) => decoded,
            _ => Value::String(raw),
        },
        Value::Null => Value::Object(Default::default()),
        other => other,
    }
}

/// Builds rig tool definitions, sanitizing schemas when the backend needs it.
pub fn tool_definitions(specs: &[ToolSpec], sanitize_schemas: bool) -> Vec<ToolDefinition> {
    specs
        .iter()
        .map(|spec| ToolDefinition {
            name: spec.name.clone(),
            description: spec.description.clone(),
            parameters: if sanitize_schemas {
                schema::sanitize(&spec.parameters)
            } else {
                spec.parameters.clone()
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::ToolPayload;
    use serde_json::json;

    fn call(id: &str, name: &str, args: Value) -> ToolCallRequest {
        ToolCallRequest::new(id, name, args)
    }

    #[test]
    fn tool_turn_becomes_one_user_message_in_order() {
        let calls = [
            call("a", "list_directory", json!({})),
            call("b", "read_file", json!({"file_path": "main.py"})),
        ];
        let history = vec![
            Message::user("fix the bug"),
            Message::assistant(calls.iter().cloned().map(Part::ToolCall).collect()),
            Message::tool_results(vec![
                ToolResult::for_call(&calls[0], ToolPayload::Result("listing".into())),
                ToolResult::for_call(&calls[1], ToolPayload::Error("boom".into())),
            ]),
        ];

        let converted = to_rig_messages(&history);
        assert_eq!(converted.len(), 3);

        let RigMessage::User { content, .. } = &converted[2] else {
            panic!("tool results must be sent as a user message");
        };
        let ids: Vec<String> = content
            .iter()
            .map(|c| match c {
                UserContent::ToolResult(r) => r.id.clone(),
                other => panic!("unexpected content {other:?}"),
            })
            .collect();
        assert_eq!(ids, ["a", "b"]);
    }

    #[test]
    fn assistant_tool_calls_keep_ids_and_arguments() {
        let args = json!({"file_path": "run.py", "args": ["--fast", "2"]});
        let history = vec![Message::assistant(vec![
            Part::Text("Running it.".into()),
            Part::ToolCall(call("c1", "run_script", args.clone())),
        ])];

        let converted = to_rig_messages(&history);
        let RigMessage::Assistant { content, .. } = &converted[0] else {
            panic!("expected assistant message");
        };
        let items: Vec<_> = content.iter().collect();
        assert_eq!(items.len(), 2);
        match items[1] {
            AssistantContent::ToolCall(tc) => {
                assert_eq!(tc.id, "c1");
                assert_eq!(tc.function.name, "run_script");
                assert_eq!(tc.function.arguments, args);
            }
            other => panic!("unexpected content {other:?}"),
        }
    }

    #[test]
    fn choice_is_normalized() {
        let choice = OneOrMany::many(vec![
            AssistantContent::text("Let me look. "),
            AssistantContent::ToolCall(RigToolCall::new(
                String::new(),
                ToolFunction::new(
                    "read_file".into(),
                    Value::String(r#"{"file_path":"a.py"}"#.into()),
                ),
            )),
            AssistantContent::text("Then fix."),
        ])
        .unwrap();

        let response = from_rig_choice(choice);
        assert_eq!(response.text.as_deref(), Some("Let me look. Then fix."));
        assert_eq!(response.tool_calls.len(), 1);
        let tc = &response.tool_calls[0];
        assert!(tc.id.starts_with("call_"));
        assert_eq!(tc.arguments, json!({"file_path": "a.py"}));
    }

    #[test]
    fn blank_assistant_turns_are_not_sent() {
        let history = vec![
            Message::user("go"),
            ModelResponse {
                text: Some("  ".into()),
                tool_calls: vec![],
            }
            .to_message(),
            Message::user("continue"),
            ModelResponse::default().to_message(),
            Message::assistant(vec![Part::Text("\n".into())]),
            Message::user("continue"),
        ];

        let converted = to_rig_messages(&history);
        assert_eq!(
            converted,
            vec![
                RigMessage::user("go"),
                RigMessage::user("continue"),
                RigMessage::user("continue"),
            ]
        );
    }

    #[test]
    fn blank_text_beside_a_call_keeps_only_the_call() {
        let history = vec![Message::assistant(vec![
            Part::Text(" ".into()),
            Part::ToolCall(call("c1", "list_directory", json!({}))),
        ])];

        let converted = to_rig_messages(&history);
        let RigMessage::Assistant { content, .. } = &converted[0] else {
            panic!("expected assistant message");
        };
        let items: Vec<_> = content.iter().collect();
        assert_eq!(items.len(), 1);
        assert!(matches!(items[0], AssistantContent::ToolCall(_)));
    }

    #[test]
    fn call_signature_survives_the_round_trip() {
        let mut rig_call = RigToolCall::new(
            "c1".into(),
            ToolFunction::new("read_file".into(), json!({"file_path": "a.py"})),
        );
        rig_call.signature = Some("sig-abc".into());

        let response = from_rig_choice(OneOrMany::one(AssistantContent::ToolCall(rig_call)));
        assert_eq!(response.tool_calls[0].signature.as_deref(), Some("sig-abc"));

        let converted = to_rig_messages(&[response.to_message()]);
        let RigMessage::Assistant { content, .. } = &converted[0] else {
            panic!("expected assistant message");
        };
        match content.first() {
            AssistantContent::ToolCall(tc) => assert_eq!(tc.signature.as_deref(), Some("sig-abc")),
            other => panic!("unexpected content {other:?}"),
        }
    }

    #[test]
    fn text_only_choice_has_no_calls() {
        let response = from_rig_choice(OneOrMany::one(AssistantContent::text("Done.")));
        assert_eq!(response.text.as_deref(), Some("Done."));
        assert!(response.tool_calls.is_empty());
    }

    #[test]
    fn split_prompt_takes_last_message() {
        assert!(split_prompt(Vec::new()).is_none());
        let messages = to_rig_messages(&[Message::user("one"), Message::user("two")]);
        let (prompt, rest) = split_prompt(messages).unwrap();
        assert_eq!(prompt, RigMessage::user("two"));
        assert_eq!(rest.len(), 1);
    }

    #[test]
    fn definitions_are_sanitized_on_request() {
        let specs = vec![ToolSpec {
            name: "t".into(),
            description: "d".into(),
            parameters: json!({"type": "object", "additionalProperties": false}),
        }];
        assert_eq!(tool_definitions(&specs, true)[0].parameters, json!({"type": "object"}));
        assert_eq!(
            tool_definitions(&specs, false)[0].parameters["additionalProperties"],
            false
        );
    }
}
