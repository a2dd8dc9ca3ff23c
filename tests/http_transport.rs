//! HTTP/SSE transport against a local single-shot server.

use std::time::Duration;

use riski::api::AgentClient;
use riski::config::ApiConfig;
use riski::reconciler::{labels, RelevanceDetection};
use riski::runtime::ask_question;
use riski::types::{ErrorType, StepStatus};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::watch;

#[allow(dead_code)]
#[path = "../src/testsupport/events.rs"]
mod events;

fn sse_body(frames: &[Value]) -> String {
    let mut body = String::from(": stream open\n\n");
    for frame in frames {
        body.push_str(&format!("event: message\ndata: {frame}\n\n"));
    }
    body.push_str("data: [DONE]\n\n");
    body
}

/// Drain one request: headers plus a `Content-Length` body.
async fn read_request(stream: &mut tokio::net::TcpStream) {
    let mut request = Vec::new();
    let mut request_buf = [0u8; 4096];
    loop {
        let n = stream.read(&mut request_buf).await.unwrap_or(0);
        if n == 0 {
            return;
        }
        request.extend_from_slice(&request_buf[..n]);
        let text = String::from_utf8_lossy(&request);
        let Some(head_end) = text.find("\r\n\r\n") else {
            continue;
        };
        let content_length = text[..head_end]
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        if request.len() >= head_end + 4 + content_length {
            return;
        }
    }
}

/// Serve one SSE response with `body` and close the connection.
async fn serve_once(body: String) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept");
        read_request(&mut stream).await;
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: text/event-stream\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        );
        let _ = stream.write_all(response.as_bytes()).await;
        let _ = stream.shutdown().await;
    });
    format!("http://{addr}")
}

fn client_for(base_url: String) -> AgentClient {
    AgentClient::new(&ApiConfig {
        base_url,
        timeout_secs: 5,
        ..ApiConfig::default()
    })
}

#[tokio::test]
async fn mixed_wire_shapes_reconcile_into_one_answer() {
    let base_url = serve_once(sse_body(&[
        events::run_started(),
        json!({"type": "RAW", "event": {"type": "StepStarted", "step_name": "retrieve_documents"}}),
        json!({"type": "CUSTOM", "value": {"type": "STATE_SNAPSHOT", "snapshot": {
            "tracked_documents": [events::document("d1", "Antrag Radweg")]
        }}}),
        json!({"type": "StepFinished", "step_name": "retrieve_documents"}),
        events::step_started("model"),
        json!({"type": "TEXT_MESSAGE_START", "messageId": "m1", "role": "assistant"}),
        events::text("m1", "{'response': 'Ein Antrag.', 'documents': []}"),
        json!({"type": "TEXT_MESSAGE_END", "messageId": "m1"}),
        events::run_finished(),
    ]))
    .await;

    let (_tx, rx) = watch::channel(false);
    let mut emitted = 0;
    let answer = tokio::time::timeout(
        Duration::from_secs(5),
        ask_question(
            &client_for(base_url),
            "Radweg?",
            rx,
            RelevanceDetection::default(),
            |_| emitted += 1,
        ),
    )
    .await
    .expect("run completes");

    assert!(emitted >= 5);
    assert_eq!(answer.response, "Ein Antrag.");
    assert_eq!(answer.status.as_deref(), Some(""));
    assert_eq!(answer.error_info, None);
    assert_eq!(answer.documents.len(), 1);
    assert_eq!(answer.documents[0].name, "Antrag Radweg");
    let steps = answer.steps.expect("steps");
    let names: Vec<&str> = steps.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["retrieve_documents", "model"]);
    assert!(steps.iter().all(|s| s.status == StepStatus::Completed));
}

#[tokio::test]
async fn stream_closing_early_is_a_transport_failure() {
    let base_url = serve_once(sse_body(&[
        events::run_started(),
        events::step_started("model"),
        events::text("m1", "halb"),
    ]))
    .await;

    let (_tx, rx) = watch::channel(false);
    let answer = ask_question(
        &client_for(base_url),
        "x",
        rx,
        RelevanceDetection::default(),
        |_| {},
    )
    .await;

    assert_eq!(answer.response, "");
    assert_eq!(answer.status.as_deref(), Some(labels::STATUS_TRANSPORT_ERROR));
    let error = answer.error_info.expect("error");
    assert_eq!(error.error_type, ErrorType::ServerError);
    assert_eq!(answer.steps.expect("steps")[0].status, StepStatus::Failed);
}

#[tokio::test]
async fn unreachable_agent_yields_error_answer() {
    // Bind then drop to get a port nothing listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let (_tx, rx) = watch::channel(false);
    let mut progress = Vec::new();
    let answer = ask_question(
        &client_for(format!("http://{addr}")),
        "x",
        rx,
        RelevanceDetection::default(),
        |a| progress.push(a),
    )
    .await;

    assert!(answer.is_error());
    assert_eq!(answer.status.as_deref(), Some(labels::STATUS_TRANSPORT_ERROR));
    assert_eq!(progress.len(), 1);
}
