//! Page fetcher trait and HTTP implementation

use crate::decode::{decode_items, DecoderConfig, RecordDecoder};
use crate::error::StreamError;
use crate::http::{HttpClient, RawResponse, ResponseMeta};
use crate::pagination::{Continuation, ContinuationConfig, PageResult};
use crate::request::RequestDescriptor;
use crate::types::JsonValue;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, warn};

/// Longest error body carried into a [`StreamError`] message
const MAX_ERROR_BODY: usize = 512;

/// Fetches a single page
#[async_trait]
pub trait PageFetcher<T>: Send + Sync {
    /// Perform one round trip for `descriptor`
    async fn fetch(&self, descriptor: &RequestDescriptor) -> Result<PageResult<T>, StreamError>;
}

/// [`PageFetcher`] over HTTP
pub struct HttpPageFetcher<T> {
    client: HttpClient,
    decoder: Arc<dyn RecordDecoder>,
    continuation: Arc<dyn Continuation>,
    _item: PhantomData<fn() -> T>,
}

impl<T> HttpPageFetcher<T> {
    /// JSON body, Link header continuation
    pub fn new(client: HttpClient) -> Self {
        Self::with_parts(
            client,
            DecoderConfig::json().build(),
            ContinuationConfig::default().build(),
        )
    }

    /// Custom decoder and continuation strategy
    pub fn with_parts(
        client: HttpClient,
        decoder: Box<dyn RecordDecoder>,
        continuation: Box<dyn Continuation>,
    ) -> Self {
        Self {
            client,
            decoder: Arc::from(decoder),
            continuation: Arc::from(continuation),
            _item: PhantomData,
        }
    }

    /// Replace the decoder
    #[must_use]
    pub fn decoder(mut self, config: &DecoderConfig) -> Self {
        self.decoder = Arc::from(config.build());
        self
    }

    /// Replace the continuation strategy
    #[must_use]
    pub fn continuation(mut self, config: &ContinuationConfig) -> Self {
        self.continuation = Arc::from(config.build());
        self
    }

    fn failure(&self, response: &RawResponse, meta: &ResponseMeta) -> StreamError {
        StreamError::from_status(
            response.status,
            meta.rate_limit_exhausted(),
            error_message(response),
        )
        .with_retry_after(meta.retry_after)
    }
}

impl<T> Clone for HttpPageFetcher<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            decoder: Arc::clone(&self.decoder),
            continuation: Arc::clone(&self.continuation),
            _item: PhantomData,
        }
    }
}

#[async_trait]
impl<T> PageFetcher<T> for HttpPageFetcher<T>
where
    T: DeserializeOwned + Send + 'static,
{
    async fn fetch(&self, descriptor: &RequestDescriptor) -> Result<PageResult<T>, StreamError> {
        let response = self.client.perform_request(descriptor).await?;
        let meta = response.meta();

        if !response.is_success() {
            let err = self.failure(&response, &meta).with_descriptor(descriptor.clone());
            warn!(status = response.status, kind = %err.kind, url = %response.url, "Page request failed");
            return Err(err);
        }

        let items: Vec<T> = decode_items(self.decoder.as_ref(), &response.body)
            .map_err(|e| StreamError::from(e).with_descriptor(descriptor.clone()))?;

        let body = if self.continuation.needs_body() {
            self.decoder
                .decode_raw(&response.body)
                .unwrap_or(JsonValue::Null)
        } else {
            JsonValue::Null
        };
        let next = self
            .continuation
            .next_url(&body, &meta, &response.url)
            .map(|url| descriptor.with_url(url));

        debug!(
            url = %response.url,
            items = items.len(),
            has_next = next.is_some(),
            "Page fetched"
        );

        Ok(PageResult::new(items, next).with_meta(meta))
    }
}

impl<T> std::fmt::Debug for HttpPageFetcher<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpPageFetcher")
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}

/// Prefer the `message` field of a JSON error body, else the raw text
fn error_message(response: &RawResponse) -> String {
    let from_json = serde_json::from_slice::<JsonValue>(&response.body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string));

    let mut message = from_json.unwrap_or_else(|| response.body_text());
    if message.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !message.is_char_boundary(cut) {
            cut -= 1;
        }
        message.truncate(cut);
    }
    if message.is_empty() {
        message = format!("HTTP {}", response.status);
    }
    message
}
