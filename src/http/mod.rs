//! HTTP transport module
//!
//! Performs single HTTP round trips for the streaming core.
//!
//! # Features
//!
//! - **Request building**: base URL joining, default headers, accept token
//! - **Authentication**: integration with the auth module
//! - **Response metadata**: Link relations, rate-limit and retry-after headers
//!
//! Status codes are not interpreted here; the page fetcher classifies them.

mod client;
mod rate_limit;
mod response;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder};
pub use rate_limit::{parse_retry_after, RateLimit};
pub use response::{RawResponse, ResponseMeta};
