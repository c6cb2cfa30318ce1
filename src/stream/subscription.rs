//! Delivery side of a stream: the polled `Subscription` and callback `Subscriber`s

use super::handle::{StreamHandle, StreamState};
use crate::error::StreamError;
use futures::{Stream, StreamExt};
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tracing::trace;

/// Item delivered over a subscription channel
pub(crate) type Event<T> = Result<T, StreamError>;

/// One active subscription.
///
/// Yields `Ok(item)` values in order, then ends; a failing stream yields a
/// single `Err` as its last item. Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription<T> {
    rx: mpsc::Receiver<Event<T>>,
    handle: StreamHandle,
}

impl<T> Subscription<T> {
    pub(crate) fn new(rx: mpsc::Receiver<Event<T>>, handle: StreamHandle) -> Self {
        Self { rx, handle }
    }

    /// The handle of this subscription
    pub fn handle(&self) -> &StreamHandle {
        &self.handle
    }

    /// Stop the stream; see [`StreamHandle::unsubscribe`]
    pub fn unsubscribe(&self) {
        self.handle.unsubscribe();
    }

    /// Drain the subscription into a vector, stopping at the first error.
    ///
    /// Items received before the error are dropped; use the stream directly
    /// when partial results matter.
    pub async fn try_collect(mut self) -> Result<Vec<T>, StreamError> {
        let mut items = Vec::new();
        while let Some(event) = self.next().await {
            items.push(event?);
        }
        Ok(items)
    }
}

impl<T> Stream for Subscription<T> {
    type Item = Result<T, StreamError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        // Anything still buffered after unsubscribe is never delivered.
        if self.handle.is_cancelled() {
            return Poll::Ready(None);
        }
        self.rx.poll_recv(cx)
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        if !self.handle.state().is_terminal() {
            trace!("Subscription dropped before completion");
        }
        self.handle.unsubscribe();
    }
}

/// Callback receiver for [`super::Paged::subscribe_with`] and
/// [`super::Single::subscribe_with`]
pub trait Subscriber<T>: Send + 'static {
    /// Called once per item, in order. `handle.unsubscribe()` may be called from here.
    fn on_next(&mut self, item: T, handle: &StreamHandle);

    /// Called at most once, as the last callback, when the stream fails
    fn on_error(&mut self, error: StreamError) {
        let _ = error;
    }

    /// Called at most once, as the last callback, when the stream completes
    fn on_complete(&mut self) {}
}

/// Pump a subscription into a subscriber on its own task
pub(crate) fn deliver<T, S>(mut subscription: Subscription<T>, mut subscriber: S) -> StreamHandle
where
    T: Send + 'static,
    S: Subscriber<T>,
{
    let handle = subscription.handle().clone();
    let task_handle = handle.clone();

    tokio::spawn(async move {
        while let Some(event) = subscription.next().await {
            match event {
                Ok(item) => {
                    subscriber.on_next(item, &task_handle);
                    if task_handle.is_cancelled() {
                        return;
                    }
                }
                Err(err) => {
                    subscriber.on_error(err);
                    return;
                }
            }
        }
        if task_handle.state() == StreamState::Completed {
            subscriber.on_complete();
        }
    });

    handle
}
