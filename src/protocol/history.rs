//! Transport-side message history.
//!
//! The backend streams assistant text as `TEXT_MESSAGE_*` frames and may
//! replace the whole conversation with `MESSAGES_SNAPSHOT`. The run consults
//! this history at `RunFinished` because a snapshot is more authoritative than
//! the locally accumulated text buffer.

use serde_json::Value;
use tracing::warn;

use super::{str_field, unwrap_envelope};
use crate::types::{Message, Role};

#[derive(Debug, Clone, Default)]
pub struct MessageHistory {
    messages: Vec<Message>,
}

impl MessageHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the history with the messages sent in the run request.
    pub fn with_messages(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Fold one raw frame into the history. Frames that do not concern
    /// messages are ignored.
    pub fn observe(&mut self, raw: &Value) {
        let Some(frame) = unwrap_envelope(raw) else {
            return;
        };
        let Some(kind) = frame.get("type").and_then(Value::as_str) else {
            return;
        };
        match kind {
            "MESSAGES_SNAPSHOT" | "MessagesSnapshot" => self.replace(frame),
            "TEXT_MESSAGE_START" | "TextMessageStart" => {
                if let Some(id) = message_id(frame) {
                    let role = frame
                        .get("role")
                        .cloned()
                        .and_then(|r| serde_json::from_value(r).ok())
                        .unwrap_or(Role::Assistant);
                    self.entry(&id, role);
                }
            }
            "TEXT_MESSAGE_CONTENT" | "TEXT_MESSAGE_CHUNK" | "TextMessageContent"
            | "TextMessageChunk" => {
                let delta = str_field(frame, &["delta", "text"]);
                if let (Some(id), Some(delta)) = (message_id(frame), delta) {
                    self.entry(&id, Role::Assistant).append(&delta);
                }
            }
            _ => {}
        }
    }

    /// Text of the most recent assistant message, if it has any.
    pub fn latest_assistant_text(&self) -> Option<String> {
        self.messages
            .iter()
            .rev()
            .find(|msg| msg.role == Role::Assistant)
            .map(Message::text)
            .filter(|text| !text.is_empty())
    }

    fn replace(&mut self, frame: &Value) {
        let Some(items) = frame.get("messages").and_then(Value::as_array) else {
            warn!("messages snapshot without a messages array");
            return;
        };
        self.messages = items
            .iter()
            .filter_map(|item| serde_json::from_value::<Message>(item.clone()).ok())
            .collect();
    }

    fn entry(&mut self, id: &str, role: Role) -> &mut Message {
        let pos = match self.messages.iter().position(|msg| msg.id == id) {
            Some(pos) => pos,
            None => {
                self.messages.push(Message {
                    id: id.to_string(),
                    role,
                    content: Value::String(String::new()),
                });
                self.messages.len() - 1
            }
        };
        &mut self.messages[pos]
    }
}

impl Message {
    fn append(&mut self, delta: &str) {
        match &mut self.content {
            Value::String(text) => text.push_str(delta),
            other => *other = Value::String(delta.to_string()),
        }
    }
}

fn message_id(frame: &Value) -> Option<String> {
    str_field(frame, &["messageId", "message_id"])
}
