//! JSON-Patch (RFC 6902) application for `STATE_DELTA` frames.
//!
//! Only the operations the agent backend emits are supported: `add`,
//! `replace` and `remove`, plus `test` as a guard. Application is pure: the
//! previous document is left untouched and a new one is returned, so a failing
//! operation never leaves a half-patched state behind.

use std::fmt;

use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchError {
    /// Operation object without a usable `op` or `path`.
    Malformed(String),
    Unsupported(String),
    PathNotFound(String),
    TestFailed(String),
}

impl fmt::Display for PatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed(msg) => write!(f, "malformed operation: {msg}"),
            Self::Unsupported(op) => write!(f, "unsupported operation: {op}"),
            Self::PathNotFound(path) => write!(f, "path not found: {path}"),
            Self::TestFailed(path) => write!(f, "test failed at {path}"),
        }
    }
}

impl std::error::Error for PatchError {}

/// Apply `operations` in order to a copy of `doc`.
pub fn apply_patch(doc: &Value, operations: &[Value]) -> Result<Value, PatchError> {
    let mut result = doc.clone();
    for operation in operations {
        apply_operation(&mut result, operation)?;
    }
    Ok(result)
}

fn apply_operation(doc: &mut Value, operation: &Value) -> Result<(), PatchError> {
    let op = operation
        .get("op")
        .and_then(Value::as_str)
        .ok_or_else(|| PatchError::Malformed(operation.to_string()))?;
    let path = operation
        .get("path")
        .and_then(Value::as_str)
        .ok_or_else(|| PatchError::Malformed(operation.to_string()))?;
    let value = || {
        operation
            .get("value")
            .cloned()
            .ok_or_else(|| PatchError::Malformed(format!("{op} without value at {path}")))
    };

    match op {
        "add" => add(doc, path, value()?),
        "replace" => {
            let target = doc
                .pointer_mut(path)
                .ok_or_else(|| PatchError::PathNotFound(path.to_string()))?;
            *target = value()?;
            Ok(())
        }
        "remove" => remove(doc, path),
        "test" => {
            let expected = value()?;
            match doc.pointer(path) {
                Some(actual) if *actual == expected => Ok(()),
                _ => Err(PatchError::TestFailed(path.to_string())),
            }
        }
        other => Err(PatchError::Unsupported(other.to_string())),
    }
}

/// Split a JSON pointer into its parent pointer and unescaped last token.
fn split_pointer(path: &str) -> Result<(&str, String), PatchError> {
    let idx = path
        .rfind('/')
        .ok_or_else(|| PatchError::Malformed(format!("invalid pointer {path:?}")))?;
    let token = path[idx + 1..].replace("~1", "/").replace("~0", "~");
    Ok((&path[..idx], token))
}

fn add(doc: &mut Value, path: &str, value: Value) -> Result<(), PatchError> {
    if path.is_empty() {
        *doc = value;
        return Ok(());
    }
    let (parent_path, token) = split_pointer(path)?;
    let parent = doc
        .pointer_mut(parent_path)
        .ok_or_else(|| PatchError::PathNotFound(path.to_string()))?;
    match parent {
        Value::Object(map) => {
            map.insert(token, value);
            Ok(())
        }
        Value::Array(items) => {
            if token == "-" {
                items.push(value);
                return Ok(());
            }
            match token.parse::<usize>() {
                Ok(index) if index <= items.len() => {
                    items.insert(index, value);
                    Ok(())
                }
                _ => Err(PatchError::PathNotFound(path.to_string())),
            }
        }
        _ => Err(PatchError::PathNotFound(path.to_string())),
    }
}

fn remove(doc: &mut Value, path: &str) -> Result<(), PatchError> {
    let (parent_path, token) = split_pointer(path)?;
    let parent = doc
        .pointer_mut(parent_path)
        .ok_or_else(|| PatchError::PathNotFound(path.to_string()))?;
    let removed = match parent {
        Value::Object(map) => map.remove(&token).is_some(),
        Value::Array(items) => match token.parse::<usize>() {
            Ok(index) if index < items.len() => {
                items.remove(index);
                true
            }
            _ => false,
        },
        _ => false,
    };
    if removed {
        Ok(())
    } else {
        Err(PatchError::PathNotFound(path.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn applies_add_replace_remove_in_order() {
        let doc = json!({"user_query": "alt", "tracked_documents": [{"id": "d1"}], "extra": 1});
        let ops = vec![
            json!({"op": "replace", "path": "/user_query", "value": "neu"}),
            json!({"op": "add", "path": "/tracked_documents/-", "value": {"id": "d2"}}),
            json!({"op": "add", "path": "/tracked_documents/0", "value": {"id": "d0"}}),
            json!({"op": "remove", "path": "/extra"}),
        ];
        let patched = apply_patch(&doc, &ops).expect("patch applies");
        assert_eq!(
            patched,
            json!({
                "user_query": "neu",
                "tracked_documents": [{"id": "d0"}, {"id": "d1"}, {"id": "d2"}]
            })
        );
        assert_eq!(doc["user_query"], "alt");
    }

    #[test]
    fn escaped_pointer_tokens_are_decoded() {
        let doc = json!({});
        let ops = vec![json!({"op": "add", "path": "/a~1b~0c", "value": true})];
        assert_eq!(apply_patch(&doc, &ops).expect("patch applies"), json!({"a/b~c": true}));
    }

    #[test]
    fn failing_operation_leaves_document_untouched() {
        let doc = json!({"a": 1});
        let ops = vec![
            json!({"op": "replace", "path": "/a", "value": 2}),
            json!({"op": "remove", "path": "/missing"}),
        ];
        assert_eq!(
            apply_patch(&doc, &ops),
            Err(PatchError::PathNotFound("/missing".into()))
        );
        assert_eq!(doc, json!({"a": 1}));
    }

    #[test]
    fn rejects_unsupported_and_malformed_operations() {
        let doc = json!({"a": 1});
        assert_eq!(
            apply_patch(&doc, &[json!({"op": "move", "from": "/a", "path": "/b"})]),
            Err(PatchError::Unsupported("move".into()))
        );
        assert!(matches!(
            apply_patch(&doc, &[json!({"path": "/a"})]),
            Err(PatchError::Malformed(_))
        ));
        assert!(matches!(
            apply_patch(&doc, &[json!({"op": "test", "path": "/a", "value": 2})]),
            Err(PatchError::TestFailed(_))
        ));
    }

    #[test]
    fn empty_path_add_replaces_whole_document() {
        let doc = json!({"a": 1});
        let ops = vec![json!({"op": "add", "path": "", "value": {"b": 2}})];
        assert_eq!(apply_patch(&doc, &ops).expect("patch applies"), json!({"b": 2}));
    }
}
