//! Run state and the backend's agent-state snapshot shape.

use serde_json::{Map, Value};

use crate::payload::{map_document, map_proposal, pick_string, DOCUMENT_PLACEHOLDER};
use crate::types::{Document, ErrorInfo, ErrorType, Proposal, Step};

/// Everything the reconciler knows about one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunState {
    pub steps: Vec<Step>,
    pub status: String,
    pub error_info: Option<ErrorInfo>,
    pub tracked_documents: Vec<TrackedDocument>,
    pub tracked_proposals: Vec<Proposal>,
    pub user_query: String,
}

impl RunState {
    /// The step that is currently running, if any.
    pub fn current_step(&self) -> Option<&Step> {
        self.steps.iter().rev().find(|step| step.is_running())
    }

    pub fn running_steps(&self) -> usize {
        self.steps.iter().filter(|step| step.is_running()).count()
    }

    /// Every tracked document as an answer document, in tracking order.
    pub fn tracked_answer_documents(&self) -> Vec<Document> {
        self.tracked_documents
            .iter()
            .map(TrackedDocument::to_document)
            .collect()
    }
}

/// Slim document record as kept in the agent state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackedDocument {
    pub id: String,
    pub metadata: Map<String, Value>,
    pub is_checked: bool,
    pub is_relevant: bool,
    pub relevance_reason: String,
}

impl TrackedDocument {
    fn from_record(record: &Map<String, Value>) -> Self {
        Self {
            id: pick_string([record.get("id")]),
            metadata: record
                .get("metadata")
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default(),
            is_checked: flag(record, "is_checked"),
            is_relevant: flag(record, "is_relevant"),
            relevance_reason: record
                .get("relevance_reason")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        }
    }

    /// Name shown for this document in relevance checks.
    pub fn check_name(&self) -> String {
        let name = pick_string([
            self.metadata.get("name"),
            self.metadata.get("title"),
            Some(&Value::String(self.id.clone())),
        ]);
        if name.is_empty() {
            DOCUMENT_PLACEHOLDER.to_string()
        } else {
            name
        }
    }

    /// Link shown for this document in relevance checks.
    pub fn check_url(&self) -> Option<String> {
        let url = pick_string([
            self.metadata.get("id"),
            self.metadata.get("risUrl"),
            self.metadata.get("source"),
        ]);
        (!url.is_empty()).then_some(url)
    }

    pub fn to_document(&self) -> Document {
        let mut record = Map::new();
        record.insert("id".into(), Value::String(self.id.clone()));
        record.insert("metadata".into(), Value::Object(self.metadata.clone()));
        map_document(&record)
    }
}

fn flag(record: &Map<String, Value>, key: &str) -> bool {
    record.get(key).and_then(Value::as_bool).unwrap_or(false)
}

/// The parts of an agent-state snapshot the reconciler diffs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapshotView {
    pub user_query: String,
    pub documents: Vec<TrackedDocument>,
    pub proposals: Vec<Proposal>,
    pub error_info: Option<ErrorInfo>,
}

impl SnapshotView {
    /// Read a snapshot document. Missing or mistyped fields count as empty.
    pub fn from_value(snapshot: &Value) -> Self {
        let records = |key: &str| {
            snapshot
                .get(key)
                .and_then(Value::as_array)
                .into_iter()
                .flatten()
                .filter_map(Value::as_object)
        };
        Self {
            user_query: snapshot
                .get("user_query")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            documents: records("tracked_documents")
                .map(TrackedDocument::from_record)
                .collect(),
            proposals: records("tracked_proposals").map(map_proposal).collect(),
            error_info: snapshot
                .get("error_info")
                .and_then(Value::as_object)
                .map(error_info_from_wire),
        }
    }
}

/// Convert the backend's snake_case `error_info` into the outbound shape.
fn error_info_from_wire(raw: &Map<String, Value>) -> ErrorInfo {
    let error_type = raw
        .get("error_type")
        .and_then(Value::as_str)
        .map(|kind| ErrorType::from(kind.to_string()))
        .unwrap_or(ErrorType::ServerError);
    ErrorInfo {
        error_type,
        message: raw
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        suggestions: raw.get("suggestions").and_then(Value::as_array).map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        }),
        details: raw.get("details").filter(|details| !details.is_null()).cloned(),
    }
}
