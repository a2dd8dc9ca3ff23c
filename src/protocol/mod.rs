//! Protocol event normalization.
//!
//! Agent backends have emitted the same logical events in several shapes over
//! time. This module maps every known wire variant onto one closed
//! [`AgentEvent`] set so the reconciler never sees transport details:
//!
//! - `agui`: AG-UI v1 frames (`"type": "STEP_STARTED"`, camelCase fields).
//! - `legacy`: older frames (`"type": "StepStarted"`, snake_case fields).
//! - `RAW` / `CUSTOM` escape hatches whose inner payload is itself an event in
//!   one of the shapes above.
//!
//! Normalization is a pure function of one frame. Unknown kinds map to `None`.

use serde_json::Value;

mod agui;
mod history;
mod legacy;

pub use history::MessageHistory;

/// Nesting limit for `RAW`/`CUSTOM` envelopes.
const MAX_ENVELOPE_DEPTH: usize = 4;

/// Canonical event kinds consumed by the reconciler.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentEvent {
    RunStarted {
        thread_id: Option<String>,
        run_id: Option<String>,
    },
    RunFinished,
    RunError {
        message: Option<String>,
        code: Option<String>,
    },
    StepStarted {
        name: String,
    },
    StepFinished {
        name: String,
    },
    /// Incremental assistant text; the reconciler owns the cumulative buffer.
    TextDelta {
        message_id: Option<String>,
        delta: String,
    },
    /// Full authoritative agent state.
    StateSnapshot {
        snapshot: Value,
    },
    /// RFC 6902 operations against the last snapshot.
    StateDelta {
        operations: Vec<Value>,
    },
    ToolCallStart {
        id: String,
        name: String,
        args: Option<String>,
    },
    /// Streamed argument fragment for an open tool call.
    ToolCallArgs {
        id: String,
        delta: String,
    },
    ToolCallEnd {
        id: String,
        name: Option<String>,
        args: Option<String>,
    },
}

impl AgentEvent {
    /// Short kind label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RunStarted { .. } => "run_started",
            Self::RunFinished => "run_finished",
            Self::RunError { .. } => "run_error",
            Self::StepStarted { .. } => "step_started",
            Self::StepFinished { .. } => "step_finished",
            Self::TextDelta { .. } => "text_delta",
            Self::StateSnapshot { .. } => "state_snapshot",
            Self::StateDelta { .. } => "state_delta",
            Self::ToolCallStart { .. } => "tool_call_start",
            Self::ToolCallArgs { .. } => "tool_call_args",
            Self::ToolCallEnd { .. } => "tool_call_end",
        }
    }
}

/// Map one raw transport frame to its canonical event, if it has one.
pub fn normalize(raw: &Value) -> Option<AgentEvent> {
    let frame = unwrap_envelope(raw)?;
    let kind = frame.get("type").and_then(Value::as_str)?;
    if is_screaming_case(kind) {
        agui::map_event(kind, frame)
    } else {
        legacy::map_event(kind, frame)
    }
}

/// Peel `RAW`/`CUSTOM` envelopes until a concrete event frame remains.
///
/// Returns `None` for envelopes whose payload is not an event object or that
/// nest deeper than [`MAX_ENVELOPE_DEPTH`].
pub(crate) fn unwrap_envelope(raw: &Value) -> Option<&Value> {
    let mut frame = raw;
    for _ in 0..=MAX_ENVELOPE_DEPTH {
        let kind = frame.get("type").and_then(Value::as_str)?;
        let inner = match kind {
            "RAW" | "Raw" => frame.get("event"),
            "CUSTOM" | "Custom" => frame.get("value"),
            _ => return Some(frame),
        };
        frame = inner.filter(|value| value.is_object())?;
    }
    None
}

fn is_screaming_case(kind: &str) -> bool {
    !kind.is_empty()
        && kind
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

/// First string value found under any of `keys`.
pub(crate) fn str_field(frame: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| frame.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}

/// Tool arguments as text: strings pass through, structured values are
/// serialized compactly.
pub(crate) fn args_field(frame: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| frame.get(*key))
        .and_then(|value| match value {
            Value::Null => None,
            Value::String(text) => Some(text.clone()),
            other => Some(other.to_string()),
        })
}
