//! Request descriptors
//!
//! A [`RequestDescriptor`] is the immutable description of one GET request:
//! a path template, its parameters, the query string, and the accept token.
//! Endpoint wrappers build one and hand it to the streaming core, which
//! resolves it to a URL right before each fetch.

mod descriptor;

pub use descriptor::{extract_placeholders, RequestDescriptor};
