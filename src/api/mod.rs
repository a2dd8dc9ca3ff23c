//! Agent event transport.
//!
//! - `client`: HTTP POST of the run input and the streaming response body
//! - `sse`: incremental SSE frame decoding
//! - `request`: the AG-UI `RunAgentInput` body

use async_trait::async_trait;
use serde_json::Value;

use crate::error::TransportError;
use crate::protocol::MessageHistory;

mod client;
mod request;
mod sse;

pub use client::{AgentClient, HttpEventSource};
pub use request::RunAgentInput;
pub use sse::SseDecoder;

/// Source of raw protocol frames for one run.
///
/// The runtime drives a run through this trait so tests can script event
/// sequences without a network, while production uses [`HttpEventSource`].
#[async_trait]
pub trait EventSource: Send {
    /// Next raw frame, or `None` once the stream has ended.
    async fn next_event(&mut self) -> Option<Result<Value, TransportError>>;

    /// Conversation history as observed from the frames delivered so far.
    fn history(&self) -> &MessageHistory;

    /// Stop the underlying subscription. Later calls to `next_event` return
    /// `None`.
    fn abort(&mut self);
}
