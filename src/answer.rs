//! Answer assembly: the only shape the presentation layer reads.

use serde::Serialize;

use crate::payload::parse_payload;
use crate::reconciler::RunState;
use crate::types::{Document, ErrorInfo, Proposal, Step};

/// Shown when a run produced neither an answer nor a status.
pub const NO_ANSWER_MESSAGE: &str = "Unsere KI konnte keine Antwort generieren.";

/// Immutable snapshot of a run as emitted to consumers.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub response: String,
    pub documents: Vec<Document>,
    pub proposals: Vec<Proposal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<Step>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_info: Option<ErrorInfo>,
}

impl Answer {
    /// Whether the run ended with a structured error.
    pub fn is_error(&self) -> bool {
        self.error_info.is_some()
    }
}

/// Build an answer from the current text buffer and run state.
///
/// Documents and proposals come from the payload when it has any, otherwise
/// from the tracked agent state.
pub fn assemble(text: &str, state: &RunState) -> Answer {
    let payload = parse_payload(text);
    let (documents, proposals) = if payload.documents.is_empty() && payload.proposals.is_empty() {
        (state.tracked_answer_documents(), state.tracked_proposals.clone())
    } else {
        (payload.documents, payload.proposals)
    };

    let response = if payload.response.is_empty() && state.status.is_empty() {
        NO_ANSWER_MESSAGE.to_string()
    } else {
        payload.response
    };

    Answer {
        response,
        documents,
        proposals,
        status: Some(state.status.clone()),
        steps: Some(state.steps.clone()),
        error_info: state.error_info.clone(),
    }
}
