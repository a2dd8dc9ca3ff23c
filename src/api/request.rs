//! AG-UI `RunAgentInput` request body.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::types::{generate_id, Message};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunAgentInput {
    pub thread_id: String,
    pub run_id: String,
    pub messages: Vec<Message>,
    pub state: Value,
    pub tools: Vec<Value>,
    pub context: Vec<Value>,
    pub forwarded_props: Value,
}

impl RunAgentInput {
    /// A fresh single-question run on a new thread.
    pub fn question(text: impl Into<String>) -> Self {
        Self {
            thread_id: generate_id(),
            run_id: generate_id(),
            messages: vec![Message::user(generate_id(), text)],
            state: Value::Object(Map::new()),
            tools: Vec::new(),
            context: Vec::new(),
            forwarded_props: Value::Object(Map::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_agui_run_input() {
        let input = RunAgentInput::question("Welche Anträge gibt es zum Radverkehr?");
        let value = serde_json::to_value(&input).expect("serialize");
        assert_eq!(value["tools"], json!([]));
        assert_eq!(value["context"], json!([]));
        assert_eq!(value["state"], json!({}));
        assert_eq!(value["forwardedProps"], json!({}));
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(
            value["messages"][0]["content"],
            "Welche Anträge gibt es zum Radverkehr?"
        );
        assert_ne!(value["threadId"], value["runId"]);
    }
}
