//! Per-subscription state

use crate::error::ErrorKind;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio_util::sync::CancellationToken;

/// Lifecycle of one subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    /// Nothing issued yet
    Idle,
    /// A fetch for this page number is in flight
    FetchingPage(u32),
    /// Items of the last fetched page are being handed to the subscriber
    Emitting,
    /// All pages delivered
    Completed,
    /// Terminated by an error
    Failed(ErrorKind),
    /// The subscriber unsubscribed
    Cancelled,
}

impl StreamState {
    /// Completed, failed or cancelled
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed(_) | Self::Cancelled)
    }
}

/// Live state of one subscription.
///
/// Clones share the same state, so a handle can be passed into a delivery
/// callback and used to unsubscribe from there.
#[derive(Debug, Clone)]
pub struct StreamHandle {
    inner: Arc<HandleInner>,
}

#[derive(Debug)]
struct HandleInner {
    token: CancellationToken,
    state: Mutex<StreamState>,
    page: AtomicU32,
    pages_fetched: AtomicU32,
    emitted: AtomicU64,
}

impl StreamHandle {
    pub(crate) fn new() -> Self {
        Self {
            inner: Arc::new(HandleInner {
                token: CancellationToken::new(),
                state: Mutex::new(StreamState::Idle),
                page: AtomicU32::new(0),
                pages_fetched: AtomicU32::new(0),
                emitted: AtomicU64::new(0),
            }),
        }
    }

    /// Current state
    pub fn state(&self) -> StreamState {
        *self
            .inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Stop the stream.
    ///
    /// No further fetch is issued and nothing more is delivered, including
    /// the result of a fetch already in flight. Safe to call from inside a
    /// delivery callback and more than once.
    pub fn unsubscribe(&self) {
        self.inner.token.cancel();
        self.transition(StreamState::Cancelled);
    }

    /// `unsubscribe` has been called
    pub fn is_cancelled(&self) -> bool {
        self.inner.token.is_cancelled()
    }

    /// Page number of the most recent fetch (0 before the first)
    pub fn current_page(&self) -> u32 {
        self.inner.page.load(Ordering::Acquire)
    }

    /// Fetches issued so far
    pub fn pages_fetched(&self) -> u32 {
        self.inner.pages_fetched.load(Ordering::Acquire)
    }

    /// Items handed to the subscriber so far
    pub fn items_emitted(&self) -> u64 {
        self.inner.emitted.load(Ordering::Acquire)
    }

    pub(crate) async fn cancelled(&self) {
        self.inner.token.cancelled().await;
    }

    pub(crate) fn begin_fetch(&self, page: u32) {
        self.inner.page.store(page, Ordering::Release);
        self.inner.pages_fetched.fetch_add(1, Ordering::AcqRel);
        self.transition(StreamState::FetchingPage(page));
    }

    pub(crate) fn record_emit(&self) {
        self.inner.emitted.fetch_add(1, Ordering::AcqRel);
    }

    /// Move to `next` unless a terminal state was already reached
    pub(crate) fn transition(&self, next: StreamState) -> bool {
        let mut state = self
            .inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if state.is_terminal() {
            return false;
        }
        *state = next;
        true
    }
}
