//! Pagination module
//!
//! Supports: Link Header, Next URL (response body), single page
//!
//! # Overview
//!
//! [`PaginationOptions`] says where a sequence starts, how big a page is, and
//! how many pages to fetch at most. A [`Continuation`] strategy reads a
//! response and finds the URL of the next page, if any. Together they drive
//! the paginated stream in [`crate::stream`].

mod strategies;
mod types;

pub use strategies::{
    parse_links, Continuation, ContinuationConfig, LinkHeaderContinuation, NextUrlContinuation,
    SinglePage,
};
pub use types::{PageResult, PaginationOptions, PaginationOptionsBuilder};
