//! Streaming module
//!
//! Lazily started, cancellable streams over REST endpoints.
//!
//! # Overview
//!
//! - [`PaginatedSequencer`] drives a [`crate::fetch::PageFetcher`] page by
//!   page and flattens the pages into one ordered stream of items.
//! - [`SingleResultAdapter`] exposes a one-shot request as a stream of at
//!   most one item.
//!
//! Opening a stream does no I/O. Each call to `subscribe` starts a new,
//! independent sequence on the Tokio runtime and returns a [`Subscription`]
//! (a [`futures::Stream`]) or, for `subscribe_with`, a [`StreamHandle`].
//!
//! # Example
//!
//! ```rust,ignore
//! use futures::StreamExt;
//!
//! let repos = PaginatedSequencer::open(fetcher, RequestDescriptor::get("/user/repos"), options);
//! let mut sub = repos.subscribe();
//! while let Some(repo) = sub.next().await {
//!     println!("{}", repo?.name);
//! }
//! ```

mod emitter;
mod handle;
mod paginated;
mod single;
mod subscription;

pub use handle::{StreamHandle, StreamState};
pub use paginated::{PaginatedSequencer, Paged};
pub use single::{Single, SingleResultAdapter};
pub use subscription::{Subscriber, Subscription};
