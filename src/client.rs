//! API client facade
//!
//! Binds a transport, a decoder and a continuation strategy to one service
//! so endpoint wrappers only describe requests:
//!
//! ```rust,ignore
//! let client = ApiClient::from_config(ClientConfig::from_file("github.yaml")?)?;
//!
//! let repos: Paged<Repo> = client.paginate(
//!     client.request("/orgs/{org}/repos").path_param("org", "rust-lang"),
//!     PaginationOptions::builder().page_size(100).build()?,
//! );
//! let user: Single<User> = client.get(client.request("/users/{name}").path_param("name", "octocat"));
//! ```

use crate::config::ClientConfig;
use crate::decode::{DecoderConfig, RecordDecoder};
use crate::error::Result;
use crate::fetch::{HttpPageFetcher, PageFetcher};
use crate::http::HttpClient;
use crate::pagination::{Continuation, ContinuationConfig, PaginationOptions, SinglePage};
use crate::request::RequestDescriptor;
use crate::stream::{PaginatedSequencer, Paged, Single, SingleResultAdapter};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;

/// Entry point for streaming a REST service
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: HttpClient,
    config: Arc<ClientConfig>,
}

impl ApiClient {
    /// Create a client from a validated config
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let http = HttpClient::with_auth(config.http_config()?, config.auth.clone())?;

        debug!(base_url = %config.base_url, "API client created");

        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    /// Create a client with default settings for `base_url`
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::from_config(ClientConfig::new(base_url))
    }

    /// The client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The underlying transport
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// A GET descriptor carrying the configured accept token
    pub fn request(&self, template: impl Into<String>) -> RequestDescriptor {
        RequestDescriptor::get(template).accept(&self.config.accept)
    }

    /// Stream every item of a paginated endpoint
    pub fn paginate<T>(&self, descriptor: RequestDescriptor, options: PaginationOptions) -> Paged<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        PaginatedSequencer::open(self.fetcher(), descriptor, options)
    }

    /// Stream a paginated endpoint with the configured default options
    pub fn paginate_default<T>(&self, descriptor: RequestDescriptor) -> Paged<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.paginate(descriptor, self.config.pagination.clone())
    }

    /// Stream a paginated endpoint whose responses need their own decoder
    /// or continuation strategy
    pub fn paginate_with<T>(
        &self,
        descriptor: RequestDescriptor,
        options: PaginationOptions,
        decoder: &DecoderConfig,
        continuation: &ContinuationConfig,
    ) -> Paged<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let fetcher: Arc<dyn PageFetcher<T>> = Arc::new(HttpPageFetcher::<T>::with_parts(
            self.http.clone(),
            decoder.build(),
            continuation.build(),
        ));
        PaginatedSequencer::open(fetcher, descriptor, options)
    }

    /// Stream the single resource at `descriptor`.
    ///
    /// The response body is the resource itself; no record path applies and
    /// no next page is followed.
    pub fn get<T>(&self, descriptor: RequestDescriptor) -> Single<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let fetcher: Arc<dyn PageFetcher<T>> = Arc::new(HttpPageFetcher::<T>::with_parts(
            self.http.clone(),
            DecoderConfig::json().build(),
            Box::new(SinglePage) as Box<dyn Continuation>,
        ));
        SingleResultAdapter::fetch_one(fetcher, descriptor)
    }

    fn fetcher<T>(&self) -> Arc<dyn PageFetcher<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let decoder: Box<dyn RecordDecoder> = self.config.decoder.build();
        Arc::new(HttpPageFetcher::<T>::with_parts(
            self.http.clone(),
            decoder,
            self.config.continuation.build(),
        ))
    }
}
