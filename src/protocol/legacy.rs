//! Pre-AG-UI frame mapping (PascalCase tags, snake_case fields).
//!
//! Older backends also used `text` instead of `delta` for message content and
//! sent finalized tool arguments inline on the end frame.

use serde_json::Value;

use super::{args_field, str_field, AgentEvent};

pub(super) fn map_event(kind: &str, frame: &Value) -> Option<AgentEvent> {
    let event = match kind {
        "RunStarted" => AgentEvent::RunStarted {
            thread_id: str_field(frame, &["thread_id", "threadId"]),
            run_id: str_field(frame, &["run_id", "runId"]),
        },
        "RunFinished" => AgentEvent::RunFinished,
        "RunError" => AgentEvent::RunError {
            message: str_field(frame, &["message", "error"]),
            code: str_field(frame, &["code"]),
        },
        "StepStarted" => AgentEvent::StepStarted {
            name: str_field(frame, &["step_name", "stepName", "name"])?,
        },
        "StepFinished" => AgentEvent::StepFinished {
            name: str_field(frame, &["step_name", "stepName", "name"])?,
        },
        "TextMessageContent" | "TextMessageChunk" => AgentEvent::TextDelta {
            message_id: str_field(frame, &["message_id", "messageId"]),
            delta: str_field(frame, &["delta", "text"])?,
        },
        "StateSnapshot" => AgentEvent::StateSnapshot {
            snapshot: frame
                .get("snapshot")
                .or_else(|| frame.get("state"))
                .filter(|v| v.is_object())?
                .clone(),
        },
        "StateDelta" => AgentEvent::StateDelta {
            operations: frame
                .get("delta")
                .or_else(|| frame.get("patch"))
                .and_then(Value::as_array)?
                .clone(),
        },
        "ToolCallStart" => AgentEvent::ToolCallStart {
            id: str_field(frame, &["tool_call_id", "toolCallId"])?,
            name: str_field(frame, &["tool_call_name", "toolCallName", "name"])?,
            args: args_field(frame, &["args", "arguments"]),
        },
        "ToolCallArgs" => AgentEvent::ToolCallArgs {
            id: str_field(frame, &["tool_call_id", "toolCallId"])?,
            delta: str_field(frame, &["delta"])?,
        },
        "ToolCallEnd" => AgentEvent::ToolCallEnd {
            id: str_field(frame, &["tool_call_id", "toolCallId"]).unwrap_or_default(),
            name: str_field(frame, &["tool_call_name", "toolCallName", "name"]),
            args: args_field(frame, &["args", "arguments"]),
        },
        _ => return None,
    };
    Some(event)
}
