//! Single-result adapter
//!
//! Wraps a one-shot request as a stream of at most one item so that
//! non-paginated endpoints share the paginated delivery contract.

use super::emitter::{guarded, Emitter};
use super::handle::{StreamHandle, StreamState};
use super::subscription::{deliver, Subscriber, Subscription};
use crate::error::{ErrorKind, StreamError};
use crate::fetch::PageFetcher;
use crate::request::RequestDescriptor;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc;

type Operation<T> = dyn Fn() -> BoxFuture<'static, Result<T, StreamError>> + Send + Sync;

/// Entry point for single-result streams
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleResultAdapter;

impl SingleResultAdapter {
    /// Describe a single-result stream over `operation`.
    ///
    /// The operation runs once per subscription and never at open time.
    pub fn open<T, F, Fut>(operation: F) -> Single<T>
    where
        T: Send + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, StreamError>> + Send + 'static,
    {
        Single {
            operation: Arc::new(move || operation().boxed()),
        }
    }

    /// Stream the first item of one fetched page.
    ///
    /// A page without items fails with [`ErrorKind::MalformedResponse`].
    pub fn fetch_one<T>(fetcher: Arc<dyn PageFetcher<T>>, descriptor: RequestDescriptor) -> Single<T>
    where
        T: Send + 'static,
    {
        let descriptor = Arc::new(descriptor);
        Self::open(move || {
            let fetcher = Arc::clone(&fetcher);
            let descriptor = Arc::clone(&descriptor);
            async move {
                let page = fetcher.fetch(&descriptor).await?;
                page.items.into_iter().next().ok_or_else(|| {
                    StreamError::new(ErrorKind::MalformedResponse, "response contained no item")
                        .with_descriptor((*descriptor).clone())
                })
            }
        })
    }
}

/// A lazily started stream of zero or one item
pub struct Single<T> {
    operation: Arc<Operation<T>>,
}

impl<T> Clone for Single<T> {
    fn clone(&self) -> Self {
        Self {
            operation: Arc::clone(&self.operation),
        }
    }
}

impl<T> std::fmt::Debug for Single<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Single").finish_non_exhaustive()
    }
}

impl<T: Send + 'static> Single<T> {
    /// Run the operation on a new subscription.
    ///
    /// Must be called within a Tokio runtime.
    pub fn subscribe(&self) -> Subscription<T> {
        let handle = StreamHandle::new();
        let (tx, rx) = mpsc::channel(1);

        tokio::spawn(run_once(
            (self.operation)(),
            Emitter::new(tx, handle.clone()),
        ));

        Subscription::new(rx, handle)
    }

    /// Run the operation delivering to callbacks
    pub fn subscribe_with<S: Subscriber<T>>(&self, subscriber: S) -> StreamHandle {
        deliver(self.subscribe(), subscriber)
    }

    /// Run the operation and wait for its value
    pub async fn value(&self) -> Result<T, StreamError> {
        let mut items = self.subscribe().try_collect().await?;
        items.pop().ok_or_else(|| {
            StreamError::new(ErrorKind::MalformedResponse, "stream ended without a value")
        })
    }
}

async fn run_once<T>(operation: BoxFuture<'static, Result<T, StreamError>>, emitter: Emitter<T>) {
    let handle = emitter.handle().clone();
    handle.begin_fetch(1);

    let result = tokio::select! {
        biased;
        () = handle.cancelled() => {
            emitter.detached();
            return;
        }
        result = guarded(operation) => result,
    };

    match result {
        Ok(item) => {
            handle.transition(StreamState::Emitting);
            if emitter.emit(item).await {
                emitter.complete();
            }
        }
        Err(err) => emitter.fail(err).await,
    }
}
