//! Shared test fixtures for the transport, reconciler and runtime test modules.
//!
//! The frame builders in [`events`] depend on nothing but `serde_json`, so the
//! integration tests include the same file and build identical frames.

use std::collections::VecDeque;

use async_trait::async_trait;
use serde_json::Value;

use crate::api::EventSource;
use crate::error::TransportError;
use crate::protocol::MessageHistory;

pub mod events;

/// Event source that replays a fixed list of frames.
///
/// Frames feed the message history the same way the HTTP source does.
pub struct ScriptedSource {
    frames: VecDeque<Value>,
    failure: Option<TransportError>,
    hang: bool,
    history: MessageHistory,
    aborted: bool,
}

impl ScriptedSource {
    pub fn new(frames: Vec<Value>) -> Self {
        Self {
            frames: frames.into(),
            failure: None,
            hang: false,
            history: MessageHistory::new(),
            aborted: false,
        }
    }

    /// Fail with `error` once the script is exhausted.
    pub fn then_fail(mut self, error: TransportError) -> Self {
        self.failure = Some(error);
        self
    }

    /// Stay silent once the script is exhausted instead of ending the stream.
    pub fn then_hang(mut self) -> Self {
        self.hang = true;
        self
    }

    pub fn was_aborted(&self) -> bool {
        self.aborted
    }

    /// Frames not yet delivered.
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

#[async_trait]
impl EventSource for ScriptedSource {
    async fn next_event(&mut self) -> Option<Result<Value, TransportError>> {
        if self.aborted {
            return None;
        }
        if let Some(frame) = self.frames.pop_front() {
            self.history.observe(&frame);
            return Some(Ok(frame));
        }
        if let Some(error) = self.failure.take() {
            return Some(Err(error));
        }
        if self.hang {
            std::future::pending::<()>().await;
        }
        None
    }

    fn history(&self) -> &MessageHistory {
        &self.history
    }

    fn abort(&mut self) {
        self.aborted = true;
    }
}

/// Build one SSE event block from a JSON payload.
pub fn sse_event_block(payload: &Value) -> String {
    format!("data: {payload}\n\n")
}

/// Build the terminal `[DONE]` SSE event block.
pub fn sse_done_block() -> &'static str {
    "data: [DONE]\n\n"
}
