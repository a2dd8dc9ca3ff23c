//! AG-UI v1 frame mapping (`SCREAMING_CASE` tags, camelCase fields).

use serde_json::Value;

use super::{args_field, str_field, AgentEvent};

pub(super) fn map_event(kind: &str, frame: &Value) -> Option<AgentEvent> {
    let event = match kind {
        "RUN_STARTED" => AgentEvent::RunStarted {
            thread_id: str_field(frame, &["threadId"]),
            run_id: str_field(frame, &["runId"]),
        },
        "RUN_FINISHED" => AgentEvent::RunFinished,
        "RUN_ERROR" => AgentEvent::RunError {
            message: str_field(frame, &["message"]),
            code: str_field(frame, &["code"]),
        },
        "STEP_STARTED" => AgentEvent::StepStarted {
            name: str_field(frame, &["stepName"])?,
        },
        "STEP_FINISHED" => AgentEvent::StepFinished {
            name: str_field(frame, &["stepName"])?,
        },
        "TEXT_MESSAGE_CONTENT" | "TEXT_MESSAGE_CHUNK" => AgentEvent::TextDelta {
            message_id: str_field(frame, &["messageId"]),
            delta: str_field(frame, &["delta"])?,
        },
        "STATE_SNAPSHOT" => AgentEvent::StateSnapshot {
            snapshot: frame.get("snapshot").filter(|v| v.is_object())?.clone(),
        },
        "STATE_DELTA" => AgentEvent::StateDelta {
            operations: frame.get("delta").and_then(Value::as_array)?.clone(),
        },
        "TOOL_CALL_START" => AgentEvent::ToolCallStart {
            id: str_field(frame, &["toolCallId"])?,
            name: str_field(frame, &["toolCallName"])?,
            args: None,
        },
        "TOOL_CALL_ARGS" => AgentEvent::ToolCallArgs {
            id: str_field(frame, &["toolCallId"])?,
            delta: str_field(frame, &["delta"])?,
        },
        "TOOL_CALL_END" => AgentEvent::ToolCallEnd {
            id: str_field(frame, &["toolCallId"])?,
            name: str_field(frame, &["toolCallName"]),
            args: args_field(frame, &["toolCallArgs", "args"]),
        },
        _ => return None,
    };
    Some(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn maps_run_lifecycle_frames() {
        let started = json!({"type": "RUN_STARTED", "threadId": "t1", "runId": "r1"});
        assert_eq!(
            map_event("RUN_STARTED", &started),
            Some(AgentEvent::RunStarted {
                thread_id: Some("t1".into()),
                run_id: Some("r1".into()),
            })
        );
        let error = json!({"type": "RUN_ERROR", "message": "boom", "code": "E1"});
        assert_eq!(
            map_event("RUN_ERROR", &error),
            Some(AgentEvent::RunError {
                message: Some("boom".into()),
                code: Some("E1".into()),
            })
        );
    }

    #[test]
    fn text_chunk_without_delta_is_dropped() {
        let chunk = json!({"type": "TEXT_MESSAGE_CHUNK", "messageId": "m1"});
        assert_eq!(map_event("TEXT_MESSAGE_CHUNK", &chunk), None);
    }

    #[test]
    fn maps_tool_call_frames() {
        let start = json!({"type": "TOOL_CALL_START", "toolCallId": "c1", "toolCallName": "retrieve_documents"});
        assert_eq!(
            map_event("TOOL_CALL_START", &start),
            Some(AgentEvent::ToolCallStart {
                id: "c1".into(),
                name: "retrieve_documents".into(),
                args: None,
            })
        );
        let args = json!({"type": "TOOL_CALL_ARGS", "toolCallId": "c1", "delta": "{\"query\""});
        assert_eq!(
            map_event("TOOL_CALL_ARGS", &args),
            Some(AgentEvent::ToolCallArgs {
                id: "c1".into(),
                delta: "{\"query\"".into(),
            })
        );
        let end = json!({"type": "TOOL_CALL_END", "toolCallId": "c1"});
        assert_eq!(
            map_event("TOOL_CALL_END", &end),
            Some(AgentEvent::ToolCallEnd {
                id: "c1".into(),
                name: None,
                args: None,
            })
        );
    }

    #[test]
    fn snapshot_must_be_an_object() {
        let bad = json!({"type": "STATE_SNAPSHOT", "snapshot": [1, 2]});
        assert_eq!(map_event("STATE_SNAPSHOT", &bad), None);
        let delta = json!({"type": "STATE_DELTA", "delta": [{"op": "replace", "path": "/user_query", "value": "q"}]});
        assert!(matches!(
            map_event("STATE_DELTA", &delta),
            Some(AgentEvent::StateDelta { operations }) if operations.len() == 1
        ));
    }
}
