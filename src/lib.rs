// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::needless_pass_by_value)]

//! # pagestream
//!
//! Lazy, cancellable streams over paginated REST endpoints.
//!
//! ## Features
//!
//! - **Paginated streams**: one ordered stream of items across every page,
//!   fetched strictly one page at a time and only on demand
//! - **Single-result streams**: one-shot requests under the same contract
//! - **Cancellation**: unsubscribe at any point, including mid-fetch and from
//!   inside a delivery callback
//! - **Typed failures**: authorization, not found, rate limited, transient,
//!   malformed request and malformed response
//! - **YAML configuration**: base URL, auth, headers, timeouts and pagination
//!   defaults with `${ENV}` expansion
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use futures::StreamExt;
//! use pagestream::{ApiClient, ClientConfig, PaginationOptions};
//!
//! #[tokio::main]
//! async fn main() -> pagestream::Result<()> {
//!     let client = ApiClient::from_config(ClientConfig::from_file("github.yaml")?)?;
//!
//!     let options = PaginationOptions::builder().page_size(100).max_pages(3).build()?;
//!     let mut repos = client
//!         .paginate::<Repo>(client.request("/orgs/{org}/repos").path_param("org", "tokio-rs"), options)
//!         .subscribe();
//!
//!     while let Some(repo) = repos.next().await {
//!         match repo {
//!             Ok(repo) => println!("{}", repo.name),
//!             Err(e) => eprintln!("stopped: {e}"),
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          ApiClient                              │
//! │   paginate(descriptor, options) → Paged<T>   get() → Single<T>  │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────────────┬───────────┴──────────┬───────────────────────┐
//! │     Stream       │        Fetch         │      Transport        │
//! ├──────────────────┼──────────────────────┼───────────────────────┤
//! │ Sequencer        │ PageFetcher          │ HttpClient            │
//! │ Single adapter   │ Decoder              │ Auth                  │
//! │ StreamHandle     │ Continuation         │ Link / rate limits    │
//! └──────────────────┴──────────────────────┴───────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Request descriptors and path templates
pub mod request;

/// Authentication
pub mod auth;

/// HTTP transport
pub mod http;

/// Pagination options and continuation strategies
pub mod pagination;

/// Response decoders (JSON, JSONL)
pub mod decode;

/// Single-page fetching
pub mod fetch;

/// Paginated and single-result streams
pub mod stream;

/// Client configuration
pub mod config;

/// API client facade
pub mod client;

// ============================================================================
// Re-exports
// ============================================================================

pub use client::ApiClient;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{Error, ErrorKind, Result, StreamError};
pub use fetch::{HttpPageFetcher, PageFetcher};
pub use pagination::{PageResult, PaginationOptions};
pub use request::RequestDescriptor;
pub use stream::{
    Paged, PaginatedSequencer, Single, SingleResultAdapter, StreamHandle, StreamState,
    Subscriber, Subscription,
};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
