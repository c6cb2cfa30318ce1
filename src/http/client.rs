//! HTTP client
//!
//! Performs one round trip per call:
//! - Resolves the request descriptor against the base URL
//! - Applies default headers, the accept token, and authentication for
//!   the base URL's origin
//! - Reads the full body and returns it with status and headers
//!
//! Retries are deliberately absent; every failure goes back to the caller.

use super::response::RawResponse;
use crate::auth::{AuthConfig, Authenticator};
use crate::error::{Result, StreamError};
use crate::request::RequestDescriptor;
use crate::types::StringMap;
use reqwest::header::ACCEPT;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL for relative request paths
    pub base_url: Option<Url>,
    /// Request timeout
    pub timeout: Duration,
    /// Default headers for all requests
    pub default_headers: StringMap,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(30),
            default_headers: StringMap::new(),
            user_agent: format!("pagestream/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
    base_url: Option<String>,
}

impl HttpClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> Result<HttpClientConfig> {
        let mut config = self.config;
        if let Some(raw) = self.base_url {
            config.base_url = Some(Url::parse(&raw)?);
        }
        Ok(config)
    }
}

/// HTTP client for single round trips
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    authenticator: Authenticator,
}

impl HttpClient {
    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        Self::with_auth(config, AuthConfig::None)
    }

    /// Create a client with authentication
    pub fn with_auth(config: HttpClientConfig, auth_config: AuthConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            client,
            config,
            authenticator: Authenticator::new(auth_config),
        })
    }

    /// Get the client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Resolve a descriptor against this client's base URL
    pub fn resolve(&self, descriptor: &RequestDescriptor) -> std::result::Result<Url, StreamError> {
        descriptor.resolve(self.config.base_url.as_ref())
    }

    /// Credentials only go to the base URL's origin. Without a base URL every
    /// request is absolute and gets them.
    fn shares_origin(&self, url: &Url) -> bool {
        match &self.config.base_url {
            Some(base) => base.origin() == url.origin(),
            None => true,
        }
    }

    /// Perform one request and read the whole response.
    ///
    /// Fails only for descriptors that do not resolve (malformed request)
    /// and for transport failures (transient). Non-2xx statuses are returned
    /// as responses.
    pub async fn perform_request(
        &self,
        descriptor: &RequestDescriptor,
    ) -> std::result::Result<RawResponse, StreamError> {
        let url = self.resolve(descriptor)?;

        let mut req = self
            .client
            .request(descriptor.method().into(), url.clone())
            .timeout(self.config.timeout);

        for (key, value) in &self.config.default_headers {
            req = req.header(key.as_str(), value.as_str());
        }
        req = req.header(ACCEPT, descriptor.accept_token());
        if self.shares_origin(&url) {
            req = self.authenticator.apply(req);
        } else {
            debug!(url = %url, "Skipping credentials for foreign origin");
        }

        debug!(method = %descriptor.method(), url = %url, "Sending request");

        let response = req.send().await.map_err(|e| {
            warn!(url = %url, error = %e, "Request failed before a response arrived");
            StreamError::from(e).with_descriptor(descriptor.clone())
        })?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let final_url = response.url().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| StreamError::from(e).with_descriptor(descriptor.clone()))?;

        debug!(status, url = %final_url, bytes = body.len(), "Response received");

        Ok(RawResponse {
            status,
            headers,
            body,
            url: final_url,
        })
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("auth", self.authenticator.config())
            .finish_non_exhaustive()
    }
}
