//! Producer side of a subscription

use super::handle::{StreamHandle, StreamState};
use super::subscription::Event;
use crate::error::StreamError;
use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Hands events to one subscriber, one at a time
pub(crate) struct Emitter<T> {
    tx: mpsc::Sender<Event<T>>,
    handle: StreamHandle,
}

impl<T> Emitter<T> {
    pub(crate) fn new(tx: mpsc::Sender<Event<T>>, handle: StreamHandle) -> Self {
        Self { tx, handle }
    }

    pub(crate) fn handle(&self) -> &StreamHandle {
        &self.handle
    }

    /// Deliver one item. Returns false once the subscriber is gone.
    pub(crate) async fn emit(&self, item: T) -> bool {
        let sent = tokio::select! {
            biased;
            () = self.handle.cancelled() => false,
            res = self.tx.send(Ok(item)) => res.is_ok(),
        };

        if sent {
            self.handle.record_emit();
        } else {
            self.detached();
        }
        sent
    }

    /// Wait until the subscriber has taken every item sent so far.
    /// Returns false once the subscriber is gone.
    pub(crate) async fn drained(&self) -> bool {
        let ready = tokio::select! {
            biased;
            () = self.handle.cancelled() => false,
            permit = self.tx.reserve() => permit.is_ok(),
        };

        if !ready {
            self.detached();
        }
        ready
    }

    /// Deliver the terminal error
    pub(crate) async fn fail(self, err: StreamError) {
        if !self.handle.transition(StreamState::Failed(err.kind)) {
            return;
        }
        debug!(kind = %err.kind, emitted = self.handle.items_emitted(), "Stream failed");

        tokio::select! {
            biased;
            () = self.handle.cancelled() => {}
            _ = self.tx.send(Err(err)) => {}
        }
    }

    /// Mark the stream completed; the channel closes when `self` drops
    pub(crate) fn complete(self) {
        if self.handle.transition(StreamState::Completed) {
            debug!(
                pages = self.handle.pages_fetched(),
                emitted = self.handle.items_emitted(),
                "Stream completed"
            );
        }
    }

    /// The receiver was dropped or the handle cancelled
    pub(crate) fn detached(&self) {
        if !self.handle.is_cancelled() {
            self.handle.unsubscribe();
        }
        debug!(
            page = self.handle.current_page(),
            emitted = self.handle.items_emitted(),
            "Stream cancelled"
        );
    }
}

/// Await one fetch; a panic inside it becomes a terminal `MalformedResponse`
pub(crate) async fn guarded<T, F>(fetch: F) -> Result<T, StreamError>
where
    F: Future<Output = Result<T, StreamError>>,
{
    match AssertUnwindSafe(fetch).catch_unwind().await {
        Ok(result) => result,
        Err(payload) => {
            let reason = panic_reason(payload.as_ref());
            warn!(%reason, "Fetch panicked");
            Err(StreamError::malformed_response(format!("fetch panicked: {reason}")))
        }
    }
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
