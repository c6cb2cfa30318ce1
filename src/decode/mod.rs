//! Response decoder module
//!
//! Supports: JSON, JSONL
//!
//! # Overview
//!
//! Decoders turn a response body into an ordered list of records. A JSON
//! decoder can pull the records out of a wrapper object with a record path
//! (`items`, `data.results`). [`decode_items`] then converts the records into
//! the caller's item type.

mod decoders;
mod types;

pub use decoders::{decode_items, encode_items, JsonDecoder, JsonlDecoder};
pub use types::{DecoderConfig, DecoderFormat, RecordDecoder};

#[cfg(test)]
mod tests;
