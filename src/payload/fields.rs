//! Tolerant field extraction for documents and proposals.
//!
//! Backends disagree on where they put names, URLs and identifiers: sometimes
//! top-level, sometimes under `metadata`, sometimes only as an `id`. Every
//! field is therefore read from an ordered list of candidate locations.

use serde_json::{Map, Value};

use crate::types::{Document, Proposal};

/// Name used when a document carries no usable title.
pub const DOCUMENT_PLACEHOLDER: &str = "Dokument";

/// First usable string among `candidates`.
///
/// Non-empty strings are taken as-is; numbers are rendered in decimal.
/// Returns an empty string when nothing matches.
pub fn pick_string<'a>(candidates: impl IntoIterator<Item = Option<&'a Value>>) -> String {
    for candidate in candidates.into_iter().flatten() {
        match candidate {
            Value::String(text) if !text.is_empty() => return text.clone(),
            Value::Number(number) => return number.to_string(),
            _ => {}
        }
    }
    String::new()
}

pub fn map_document(raw: &Map<String, Value>) -> Document {
    let meta = raw.get("metadata").and_then(Value::as_object);
    let m = |key: &str| meta.and_then(|meta| meta.get(key));
    let r = |key: &str| raw.get(key);

    let name = pick_string([m("title"), m("name"), r("title"), r("name"), r("id")]);
    Document {
        name: if name.is_empty() {
            DOCUMENT_PLACEHOLDER.to_string()
        } else {
            name
        },
        ris_url: pick_string([
            m("risUrl"),
            m("source"),
            m("id"),
            r("risUrl"),
            r("source"),
            r("id"),
        ]),
        size: m("size")
            .and_then(Value::as_f64)
            .or_else(|| r("size").and_then(Value::as_f64))
            .unwrap_or(0.0),
        identifier: pick_string([m("identifier"), r("identifier"), r("id")]),
    }
}

pub fn map_proposal(raw: &Map<String, Value>) -> Proposal {
    let meta = raw.get("metadata").and_then(Value::as_object);
    let m = |key: &str| meta.and_then(|meta| meta.get(key));
    let r = |key: &str| raw.get(key);

    Proposal {
        name: pick_string([m("title"), m("name"), r("title"), r("name")]),
        identifier: pick_string([m("identifier"), m("id"), r("identifier"), r("id")]),
        ris_url: pick_string([m("risUrl"), m("source"), r("risUrl"), r("source")]),
    }
}
