//! Cancellation scope and the progress gate built on it.

use tokio::sync::watch;

use crate::answer::Answer;

/// Cancellation state of one run.
///
/// Combines the caller's signal with a scope-owned one the run triggers
/// itself once it reaches a terminal phase. Either closes the progress gate.
pub struct CancelScope {
    external: watch::Receiver<bool>,
    internal: watch::Sender<bool>,
}

impl CancelScope {
    pub fn new(external: watch::Receiver<bool>) -> Self {
        let (internal, _) = watch::channel(false);
        Self { external, internal }
    }

    /// Whether the caller asked to cancel.
    pub fn is_cancelled(&self) -> bool {
        *self.external.borrow()
    }

    /// Whether emission is over, by cancellation or because the run ended.
    pub fn is_closed(&self) -> bool {
        self.is_cancelled() || *self.internal.borrow()
    }

    /// Mark the run as ended. Idempotent.
    pub fn close(&self) {
        self.internal.send_replace(true);
    }

    /// Resolve once the caller cancels.
    pub async fn cancelled(&mut self) {
        wait_for_cancellation(&mut self.external).await;
    }

    /// Gate `on_progress` behind this scope.
    pub fn sink<F>(&self, on_progress: F) -> ProgressSink<F>
    where
        F: FnMut(Answer),
    {
        ProgressSink {
            external: self.external.clone(),
            internal: self.internal.subscribe(),
            on_progress,
        }
    }
}

/// Wait for cancellation signal state change (or return immediately if set).
///
/// A dropped sender can never cancel, so the wait then never resolves.
async fn wait_for_cancellation(cancel_rx: &mut watch::Receiver<bool>) {
    loop {
        if *cancel_rx.borrow_and_update() {
            return;
        }
        if cancel_rx.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Progress callback that goes silent once its scope closes.
pub struct ProgressSink<F> {
    external: watch::Receiver<bool>,
    internal: watch::Receiver<bool>,
    on_progress: F,
}

impl<F> ProgressSink<F>
where
    F: FnMut(Answer),
{
    /// Deliver `answer` unless the scope closed. Returns whether it was delivered.
    pub fn emit(&mut self, answer: Answer) -> bool {
        if *self.external.borrow() || *self.internal.borrow() {
            return false;
        }
        (self.on_progress)(answer);
        true
    }
}
