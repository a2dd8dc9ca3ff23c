//! Run lifecycle: drives one agent run from its event source to a final
//! [`Answer`], emitting progress snapshots along the way.
//!
//! Events are processed one at a time on the calling task. The only
//! suspension points are the next transport event and the cancellation
//! signal. Once the caller cancels, the transport is aborted and no further
//! progress is emitted.

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::answer::{assemble, Answer};
use crate::api::{AgentClient, EventSource, RunAgentInput};
use crate::error::TransportError;
use crate::protocol::normalize;
use crate::reconciler::{Phase, Reconciler, RelevanceDetection};

mod cancel;

pub use cancel::{CancelScope, ProgressSink};

enum Next {
    Cancelled,
    Frame(Option<Result<serde_json::Value, TransportError>>),
}

/// Drive `source` to completion.
///
/// `on_progress` receives a fresh [`Answer`] after every event that changed
/// the visible state, and never after `cancel` turned true. The returned
/// answer reflects the last processed event. Transport failures are folded
/// into it; this never fails.
pub async fn ask<S, F>(
    source: &mut S,
    cancel: watch::Receiver<bool>,
    relevance: RelevanceDetection,
    on_progress: F,
) -> Answer
where
    S: EventSource + ?Sized,
    F: FnMut(Answer),
{
    let mut scope = CancelScope::new(cancel);
    let mut sink = scope.sink(on_progress);
    let mut reconciler = Reconciler::new(relevance);
    let mut transport_failed = false;

    while !reconciler.phase().is_terminal() {
        let next = tokio::select! {
            biased;
            _ = scope.cancelled() => Next::Cancelled,
            frame = source.next_event() => Next::Frame(frame),
        };

        match next {
            Next::Cancelled => {
                info!("cancellation requested; aborting event stream");
                source.abort();
                reconciler.cancel();
            }
            Next::Frame(Some(Ok(raw))) => {
                // The signal may have flipped while the frame was in flight.
                if scope.is_cancelled() {
                    source.abort();
                    reconciler.cancel();
                    break;
                }
                let Some(event) = normalize(&raw) else {
                    debug!("frame carries no reconcilable event");
                    continue;
                };
                if reconciler.apply(event, source.history()) {
                    let answer = assemble(&reconciler.answer_text(source.history()), reconciler.state());
                    sink.emit(answer);
                }
            }
            Next::Frame(Some(Err(e))) => {
                warn!(error = %e, "agent transport failed");
                transport_failed = true;
                reconciler.fail_transport();
                sink.emit(assemble("", reconciler.state()));
            }
            Next::Frame(None) => {
                warn!(error = %TransportError::Closed, "agent transport failed");
                transport_failed = true;
                reconciler.fail_transport();
                sink.emit(assemble("", reconciler.state()));
            }
        }
    }
    scope.close();

    let phase = reconciler.phase();
    info!(phase = ?phase, steps = reconciler.state().steps.len(), "run ended");
    if transport_failed || phase == Phase::NotStarted {
        assemble("", reconciler.state())
    } else {
        assemble(&reconciler.answer_text(source.history()), reconciler.state())
    }
}

/// Ask `question` over HTTP and drive the run to a final answer.
///
/// A request that cannot be opened ends like any other transport failure.
pub async fn ask_question<F>(
    client: &AgentClient,
    question: &str,
    cancel: watch::Receiver<bool>,
    relevance: RelevanceDetection,
    mut on_progress: F,
) -> Answer
where
    F: FnMut(Answer),
{
    match client.open(RunAgentInput::question(question)).await {
        Ok(mut source) => ask(&mut source, cancel, relevance, on_progress).await,
        Err(e) => {
            warn!(error = %e, url = client.url(), "could not open agent run");
            let mut reconciler = Reconciler::new(relevance);
            reconciler.fail_transport();
            let answer = assemble("", reconciler.state());
            if !*cancel.borrow() {
                on_progress(answer.clone());
            }
            answer
        }
    }
}
