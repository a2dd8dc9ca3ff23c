//! Answer payload parsing.
//!
//! The agent streams its final answer as text that is *supposed* to be a JSON
//! object `{"response": "...", "documents": [...], "proposals": [...]}`. While
//! streaming, the buffer is usually a JSON prefix; older backends sent a
//! Python dict repr instead. [`parse_payload`] never fails: each strategy in
//! the chain below is tried in order and the raw text is the last resort.
//!
//! 1. strict JSON object
//! 2. foreign object literal (see [`legacy`])
//! 3. `response` field recovered from a truncated JSON prefix
//! 4. the whole buffer as the response

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::types::{Document, Proposal};

mod fields;
pub mod legacy;

pub use fields::{map_document, map_proposal, pick_string, DOCUMENT_PLACEHOLDER};

/// Structured content of an answer payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload {
    pub response: String,
    pub documents: Vec<Document>,
    pub proposals: Vec<Proposal>,
}

impl Payload {
    fn text(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            ..Self::default()
        }
    }
}

/// Parse a (possibly partial) payload buffer.
pub fn parse_payload(text: &str) -> Payload {
    if let Ok(value) = serde_json::from_str::<Value>(text) {
        if let Some(payload) = from_value(&value) {
            return payload;
        }
        return Payload::text(text);
    }

    if !text.trim_start().starts_with('{') {
        return Payload::text(text);
    }

    if let Some(payload) = legacy::parse_literal(text).as_ref().and_then(from_value) {
        debug!("payload parsed as foreign object literal");
        return payload;
    }

    match partial_response(text) {
        Some(response) => Payload::text(response),
        None => Payload::text(text),
    }
}

/// Extract payload fields from a decoded object. Non-object values yield
/// `None` so the caller can fall back to literal text.
fn from_value(value: &Value) -> Option<Payload> {
    let object = value.as_object()?;
    let response = object
        .get("response")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let documents = objects(object.get("documents")).map(map_document).collect();
    let proposals = objects(object.get("proposals")).map(map_proposal).collect();
    Some(Payload {
        response,
        documents,
        proposals,
    })
}

fn objects(value: Option<&Value>) -> impl Iterator<Item = &serde_json::Map<String, Value>> {
    value
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
}

fn response_field_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // The closing quote may be missing while the string is still streaming.
        Regex::new(r#""response"\s*:\s*"((?:[^"\\]|\\.)*)(?:"|\\?$)"#)
            .expect("response field pattern compiles")
    })
}

/// Recover the `response` string from a truncated JSON prefix.
fn partial_response(text: &str) -> Option<String> {
    let captured = response_field_pattern().captures(text)?.get(1)?.as_str();
    if captured.is_empty() {
        return None;
    }
    Some(unescape(captured))
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('/') => out.push('/'),
            Some('\\') => out.push('\\'),
            Some('u') => {
                let rest = chars.as_str();
                match unicode_escape(rest) {
                    UnicodeEscape::Char(decoded, used) => {
                        out.push(decoded);
                        chars = rest[used..].chars();
                    }
                    // Still streaming: the rest of the escape has not arrived.
                    UnicodeEscape::Truncated => break,
                    UnicodeEscape::Invalid => out.push_str("\\u"),
                }
            }
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => {}
        }
    }
    out
}

enum UnicodeEscape {
    /// Decoded character and the number of bytes consumed after `\u`.
    Char(char, usize),
    Truncated,
    Invalid,
}

/// Decode the hex digits following `\u`, joining UTF-16 surrogate pairs.
/// Unpaired surrogates become U+FFFD.
fn unicode_escape(rest: &str) -> UnicodeEscape {
    let Some(unit) = hex4(rest) else {
        return if rest.len() < 4 && rest.bytes().all(|b| b.is_ascii_hexdigit()) {
            UnicodeEscape::Truncated
        } else {
            UnicodeEscape::Invalid
        };
    };
    match unit {
        0xD800..=0xDBFF => {
            let tail = &rest[4..];
            let low = tail
                .strip_prefix("\\u")
                .and_then(hex4)
                .filter(|low| (0xDC00..=0xDFFF).contains(low));
            match low {
                Some(low) => {
                    let code =
                        0x10000 + ((u32::from(unit) - 0xD800) << 10) + (u32::from(low) - 0xDC00);
                    UnicodeEscape::Char(
                        char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER),
                        10,
                    )
                }
                None if is_escape_prefix(tail) => UnicodeEscape::Truncated,
                None => UnicodeEscape::Char(char::REPLACEMENT_CHARACTER, 4),
            }
        }
        unit => UnicodeEscape::Char(
            char::from_u32(u32::from(unit)).unwrap_or(char::REPLACEMENT_CHARACTER),
            4,
        ),
    }
}

/// Whether `tail` could still grow into a `\uXXXX` escape.
fn is_escape_prefix(tail: &str) -> bool {
    match tail.strip_prefix("\\u") {
        Some(hex) => hex.len() < 4 && hex.bytes().all(|b| b.is_ascii_hexdigit()),
        None => "\\u".starts_with(tail),
    }
}

fn hex4(s: &str) -> Option<u16> {
    let hex = s.get(..4)?;
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u16::from_str_radix(hex, 16).ok()
}
