//! Paginated sequencer
//!
//! Turns a series of page fetches into one ordered stream of items:
//!
//! ```text
//! Idle ─subscribe─▶ FetchingPage(n) ─ok─▶ Emitting ─next page─▶ FetchingPage(n+1)
//!                        │                   │
//!                        ├─err─▶ Failed      └─last page / limit─▶ Completed
//!                        └─unsubscribe─▶ Cancelled
//! ```
//!
//! Fetches within one subscription are strictly sequential; page n+1 is not
//! requested until every item of page n has been handed over.

use super::emitter::{guarded, Emitter};
use super::handle::{StreamHandle, StreamState};
use super::subscription::{deliver, Subscriber, Subscription};
use crate::error::StreamError;
use crate::fetch::PageFetcher;
use crate::pagination::PaginationOptions;
use crate::request::RequestDescriptor;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

/// Entry point for paginated streams
#[derive(Debug, Clone, Copy, Default)]
pub struct PaginatedSequencer;

impl PaginatedSequencer {
    /// Describe a paginated stream. Nothing is fetched until a subscription starts.
    pub fn open<T>(
        fetcher: Arc<dyn PageFetcher<T>>,
        initial: RequestDescriptor,
        options: PaginationOptions,
    ) -> Paged<T> {
        Paged {
            fetcher,
            initial: Arc::new(initial),
            options: Arc::new(options),
        }
    }
}

/// A lazily started, paginated stream.
///
/// Every subscription runs its own fetch sequence from the first page.
pub struct Paged<T> {
    fetcher: Arc<dyn PageFetcher<T>>,
    initial: Arc<RequestDescriptor>,
    options: Arc<PaginationOptions>,
}

impl<T> Clone for Paged<T> {
    fn clone(&self) -> Self {
        Self {
            fetcher: Arc::clone(&self.fetcher),
            initial: Arc::clone(&self.initial),
            options: Arc::clone(&self.options),
        }
    }
}

impl<T> std::fmt::Debug for Paged<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Paged")
            .field("initial", &self.initial)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<T: Send + 'static> Paged<T> {
    /// The request the first page is built from
    pub fn descriptor(&self) -> &RequestDescriptor {
        &self.initial
    }

    /// The pagination options
    pub fn options(&self) -> &PaginationOptions {
        &self.options
    }

    /// Start a new, independent fetch sequence.
    ///
    /// Must be called within a Tokio runtime.
    pub fn subscribe(&self) -> Subscription<T> {
        let handle = StreamHandle::new();
        let (tx, rx) = mpsc::channel(1);

        tokio::spawn(run_pages(
            Arc::clone(&self.fetcher),
            Arc::clone(&self.initial),
            Arc::clone(&self.options),
            Emitter::new(tx, handle.clone()),
        ));

        Subscription::new(rx, handle)
    }

    /// Start a new fetch sequence delivering to callbacks
    pub fn subscribe_with<S: Subscriber<T>>(&self, subscriber: S) -> StreamHandle {
        deliver(self.subscribe(), subscriber)
    }

    /// Fetch every page and return all items, or the first error
    pub async fn collect_all(&self) -> Result<Vec<T>, StreamError> {
        self.subscribe().try_collect().await
    }
}

async fn run_pages<T>(
    fetcher: Arc<dyn PageFetcher<T>>,
    initial: Arc<RequestDescriptor>,
    options: Arc<PaginationOptions>,
    emitter: Emitter<T>,
) {
    let handle = emitter.handle().clone();

    if let Err(e) = options.validate() {
        emitter
            .fail(StreamError::from(e).with_descriptor((*initial).clone()))
            .await;
        return;
    }

    let mut next = Some(options.apply_to(&initial));
    let mut page = options.start_page;
    let mut fetched = 0u32;

    while let Some(descriptor) = next.take() {
        if options.limit_reached(fetched) {
            break;
        }
        if handle.is_cancelled() {
            emitter.detached();
            return;
        }

        handle.begin_fetch(page);
        let result = tokio::select! {
            biased;
            () = handle.cancelled() => {
                emitter.detached();
                return;
            }
            result = guarded(fetcher.fetch(&descriptor)) => {
                result.map_err(|e| {
                    if e.descriptor.is_some() {
                        e
                    } else {
                        e.with_descriptor(descriptor.clone())
                    }
                })
            }
        };
        fetched += 1;

        let page_result = match result {
            Ok(page_result) => page_result,
            Err(err) => {
                emitter.fail(err).await;
                return;
            }
        };

        debug!(
            page,
            items = page_result.items.len(),
            has_next = page_result.next.is_some(),
            "Emitting page"
        );
        handle.transition(StreamState::Emitting);

        for item in page_result.items {
            if !emitter.emit(item).await {
                return;
            }
        }

        next = page_result.next;
        if next.is_some() && !options.limit_reached(fetched) && !emitter.drained().await {
            return;
        }
        page = page.saturating_add(1);
    }

    emitter.complete();
}
