//! AG-UI v1 frame builders.

use serde_json::{json, Value};

pub fn run_started() -> Value {
    json!({"type": "RUN_STARTED", "threadId": "thread-1", "runId": "run-1"})
}

pub fn run_finished() -> Value {
    json!({"type": "RUN_FINISHED", "threadId": "thread-1", "runId": "run-1"})
}

pub fn run_error(message: &str) -> Value {
    json!({"type": "RUN_ERROR", "message": message})
}

pub fn step_started(name: &str) -> Value {
    json!({"type": "STEP_STARTED", "stepName": name})
}

pub fn step_finished(name: &str) -> Value {
    json!({"type": "STEP_FINISHED", "stepName": name})
}

pub fn text(message_id: &str, delta: &str) -> Value {
    json!({"type": "TEXT_MESSAGE_CONTENT", "messageId": message_id, "delta": delta})
}

pub fn messages_snapshot(messages: Value) -> Value {
    json!({"type": "MESSAGES_SNAPSHOT", "messages": messages})
}

pub fn snapshot(state: Value) -> Value {
    json!({"type": "STATE_SNAPSHOT", "snapshot": state})
}

pub fn delta(operations: Value) -> Value {
    json!({"type": "STATE_DELTA", "delta": operations})
}

pub fn tool_start(id: &str, name: &str) -> Value {
    json!({"type": "TOOL_CALL_START", "toolCallId": id, "toolCallName": name})
}

pub fn tool_args(id: &str, delta: &str) -> Value {
    json!({"type": "TOOL_CALL_ARGS", "toolCallId": id, "delta": delta})
}

pub fn tool_end(id: &str) -> Value {
    json!({"type": "TOOL_CALL_END", "toolCallId": id})
}

/// A retrieved-document record in the backend's snapshot shape.
pub fn document(id: &str, name: &str) -> Value {
    json!({"id": id, "metadata": {"id": id, "name": name, "risUrl": id}})
}
