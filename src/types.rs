//! Data model shared by the reconciler, the assembler and the transport.
//!
//! Output-side types serialize in camelCase because that is the contract the
//! presentation layer reads. Wire-side snapshot shapes live in
//! `reconciler::state` and are never handed to consumers.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Conversation messages
// ---------------------------------------------------------------------------

/// Random UUID v4 identifier for threads, runs, messages and synthetic tool
/// calls.
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// Conversation participant role as used by AG-UI messages.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    Developer,
    User,
    Assistant,
    Tool,
}

/// One AG-UI conversation message.
///
/// `content` stays a raw JSON value: assistants may send either a plain
/// string or a list of typed fragments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub id: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub content: Value,
}

impl Message {
    /// Create a user message with the given id.
    pub fn user(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: Role::User,
            content: Value::String(content.into()),
        }
    }

    /// Create an assistant message with plain string content.
    pub fn assistant(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: Role::Assistant,
            content: Value::String(content.into()),
        }
    }

    /// Flatten the message content to text.
    ///
    /// String content is returned as-is; fragment lists keep plain strings and
    /// `{"type": "text", "text": ...}` fragments, joined by newlines.
    pub fn text(&self) -> String {
        match &self.content {
            Value::String(text) => text.clone(),
            Value::Array(fragments) => fragments
                .iter()
                .filter_map(|fragment| match fragment {
                    Value::String(text) => Some(text.as_str()),
                    Value::Object(map) if map.get("type").and_then(Value::as_str) == Some("text") => {
                        map.get("text").and_then(Value::as_str)
                    }
                    _ => None,
                })
                .filter(|text| !text.is_empty())
                .collect::<Vec<_>>()
                .join("\n"),
            _ => String::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Documents and proposals
// ---------------------------------------------------------------------------

/// A retrieved source document surfaced to the user.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub name: String,
    pub ris_url: String,
    pub size: f64,
    pub identifier: String,
}

/// A decision-record reference surfaced to the user.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    pub name: String,
    pub identifier: String,
    pub ris_url: String,
}

// ---------------------------------------------------------------------------
// Progress model
// ---------------------------------------------------------------------------

/// Lifecycle status of a step.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Running,
    Completed,
    Failed,
}

/// Lifecycle status of a tool call.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ToolCallStatus {
    Running,
    Completed,
}

/// Documents and proposals a tool call produced.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ToolCallResult {
    pub documents: Vec<Document>,
    pub proposals: Vec<Proposal>,
}

/// One tool invocation inside a step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<String>,
    pub status: ToolCallStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<ToolCallResult>,
}

impl ToolCall {
    pub fn running(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            args: None,
            status: ToolCallStatus::Running,
            result: None,
        }
    }
}

/// Relevance verdict for one document, keyed by display name within a step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentCheck {
    pub name: String,
    pub relevant: bool,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A named phase of agent execution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub status: StepStatus,
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
    #[serde(default)]
    pub document_checks: Vec<DocumentCheck>,
}

impl Step {
    pub fn running(name: impl Into<String>, display_name: Option<String>) -> Self {
        Self {
            name: name.into(),
            display_name,
            status: StepStatus::Running,
            tool_calls: Vec::new(),
            document_checks: Vec::new(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.status == StepStatus::Running
    }
}

// ---------------------------------------------------------------------------
// Errors reported as data
// ---------------------------------------------------------------------------

/// Error classification reported by the agent backend.
///
/// Unknown classifications are preserved verbatim in [`ErrorType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ErrorType {
    NoToolCall,
    NoDocumentsFound,
    NoRelevantDocuments,
    ServerError,
    Other(String),
}

impl ErrorType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::NoToolCall => "no_tool_call",
            Self::NoDocumentsFound => "no_documents_found",
            Self::NoRelevantDocuments => "no_relevant_documents",
            Self::ServerError => "server_error",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for ErrorType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "no_tool_call" => Self::NoToolCall,
            "no_documents_found" => Self::NoDocumentsFound,
            "no_relevant_documents" => Self::NoRelevantDocuments,
            "server_error" => Self::ServerError,
            _ => Self::Other(raw),
        }
    }
}

impl From<ErrorType> for String {
    fn from(kind: ErrorType) -> Self {
        kind.as_str().to_string()
    }
}

/// Structured error surfaced to the user instead of an exception.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorInfo {
    pub error_type: ErrorType,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorInfo {
    /// Generic server error with the given message.
    pub fn server_error(message: impl Into<String>) -> Self {
        Self {
            error_type: ErrorType::ServerError,
            message: message.into(),
            suggestions: None,
            details: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn generate_id_has_uuid_v4_shape() {
        let id = generate_id();
        let groups: Vec<_> = id.split('-').map(str::len).collect();
        assert_eq!(groups, vec![8, 4, 4, 4, 12]);
        assert_eq!(id.as_bytes()[14], b'4');
        assert_eq!(Uuid::parse_str(&id).ok().map(|u| u.get_version_num()), Some(4));
        assert_ne!(generate_id(), id);
    }

    #[test]
    fn message_text_joins_text_fragments() {
        let msg = Message {
            id: "m1".into(),
            role: Role::Assistant,
            content: json!([
                {"type": "text", "text": "first"},
                {"type": "image", "url": "x"},
                "second",
                {"type": "text", "text": ""}
            ]),
        };
        assert_eq!(msg.text(), "first\nsecond");
    }

    #[test]
    fn message_text_is_empty_for_null_content() {
        let msg = Message {
            id: "m1".into(),
            role: Role::Assistant,
            content: Value::Null,
        };
        assert_eq!(msg.text(), "");
    }

    #[test]
    fn error_type_keeps_unknown_values() {
        let kind = ErrorType::from("quota_exceeded".to_string());
        assert_eq!(kind, ErrorType::Other("quota_exceeded".into()));
        assert_eq!(kind.as_str(), "quota_exceeded");
        assert_eq!(
            ErrorType::from("no_relevant_documents".to_string()),
            ErrorType::NoRelevantDocuments
        );
    }

    #[test]
    fn error_info_serializes_camel_case() {
        let info = ErrorInfo::server_error("boom");
        let value = serde_json::to_value(&info).expect("serialize");
        assert_eq!(value, json!({"errorType": "server_error", "message": "boom"}));
    }

    #[test]
    fn step_serializes_display_name_and_collections() {
        let step = Step::running("model", Some("Denke nach".into()));
        let value = serde_json::to_value(&step).expect("serialize");
        assert_eq!(value["displayName"], "Denke nach");
        assert_eq!(value["status"], "running");
        assert_eq!(value["toolCalls"], json!([]));
        assert_eq!(value["documentChecks"], json!([]));
    }
}
