//! HTTP client for the AG-UI agent endpoint.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::request::RunAgentInput;
use super::sse::SseDecoder;
use super::EventSource;
use crate::build_info;
use crate::config::ApiConfig;
use crate::error::TransportError;
use crate::protocol::MessageHistory;

/// Client that opens agent runs over HTTP.
pub struct AgentClient {
    http: reqwest::Client,
    url: String,
    idle_timeout: Duration,
}

impl AgentClient {
    pub fn new(config: &ApiConfig) -> Self {
        let timeout = Duration::from_secs(config.timeout_secs.max(1));
        Self {
            http: build_http_client(timeout),
            url: config.agent_url(),
            idle_timeout: timeout,
        }
    }

    /// Override the longest silence tolerated on an open stream.
    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Start a run and return its event stream.
    pub async fn open(&self, input: RunAgentInput) -> Result<HttpEventSource, TransportError> {
        info!(url = %self.url, thread_id = %input.thread_id, run_id = %input.run_id, "starting agent run");
        let response = self
            .http
            .post(&self.url)
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .json(&input)
            .send()
            .await?;
        if !response.status().is_success() {
            let code = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status { code, body });
        }
        Ok(HttpEventSource {
            response: Some(response),
            decoder: SseDecoder::new(),
            pending: VecDeque::new(),
            history: MessageHistory::with_messages(input.messages),
            idle_timeout: self.idle_timeout,
        })
    }
}

/// Build an HTTP client with connect timeout applied.
///
/// There is no overall request timeout: a run streams for as long as the
/// agent works. Silence is bounded per chunk instead.
fn build_http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .connect_timeout(timeout)
        .user_agent(build_info::user_agent())
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// Event stream of one HTTP agent run.
pub struct HttpEventSource {
    /// `None` once the stream ended or was aborted.
    response: Option<reqwest::Response>,
    decoder: SseDecoder,
    pending: VecDeque<String>,
    history: MessageHistory,
    idle_timeout: Duration,
}

impl HttpEventSource {
    /// Decode the next buffered payload into a frame, skipping what is not
    /// an event object.
    fn next_buffered(&mut self) -> Option<Value> {
        while let Some(payload) = self.pending.pop_front() {
            let payload = payload.trim();
            if payload.is_empty() || payload == "[DONE]" {
                continue;
            }
            match serde_json::from_str::<Value>(payload) {
                Ok(frame) if frame.is_object() => {
                    self.history.observe(&frame);
                    return Some(frame);
                }
                Ok(_) => warn!("sse payload is not an event object; skipped"),
                Err(e) => warn!(error = %e, "sse payload is not valid json; skipped"),
            }
        }
        None
    }
}

#[async_trait]
impl EventSource for HttpEventSource {
    async fn next_event(&mut self) -> Option<Result<Value, TransportError>> {
        loop {
            if let Some(frame) = self.next_buffered() {
                return Some(Ok(frame));
            }
            let response = self.response.as_mut()?;
            match tokio::time::timeout(self.idle_timeout, response.chunk()).await {
                Ok(Ok(Some(bytes))) => {
                    let payloads = self.decoder.push(&bytes);
                    self.pending.extend(payloads);
                }
                Ok(Ok(None)) => {
                    debug!("agent event stream ended");
                    self.response = None;
                    let payloads = self.decoder.finish();
                    self.pending.extend(payloads);
                }
                Ok(Err(e)) => {
                    self.response = None;
                    return Some(Err(e.into()));
                }
                Err(_) => {
                    self.response = None;
                    return Some(Err(TransportError::Timeout {
                        secs: self.idle_timeout.as_secs(),
                    }));
                }
            }
        }
    }

    fn history(&self) -> &MessageHistory {
        &self.history
    }

    fn abort(&mut self) {
        if self.response.take().is_some() {
            debug!("agent event stream aborted");
        }
        self.pending.clear();
    }
}
