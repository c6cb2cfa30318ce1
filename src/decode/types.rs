//! Decoder types and traits

use super::decoders::{JsonDecoder, JsonlDecoder};
use crate::error::Result;
use crate::types::JsonValue;
use serde::{Deserialize, Serialize};

/// Format of the response body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecoderFormat {
    /// JSON format (default)
    #[default]
    Json,
    /// JSON Lines format (one JSON object per line)
    Jsonl,
}

/// Configuration for decoding responses
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoderConfig {
    /// Response format
    #[serde(default)]
    pub format: DecoderFormat,
    /// Dot path to the records inside the response (JSON only)
    #[serde(default)]
    pub record_path: Option<String>,
}

impl DecoderConfig {
    /// Create a JSON decoder config
    pub fn json() -> Self {
        Self::default()
    }

    /// Create a JSON decoder config with a record path
    pub fn json_with_path(path: impl Into<String>) -> Self {
        Self {
            format: DecoderFormat::Json,
            record_path: Some(path.into()),
        }
    }

    /// Create a JSONL decoder config
    pub fn jsonl() -> Self {
        Self {
            format: DecoderFormat::Jsonl,
            record_path: None,
        }
    }

    /// Build the decoder
    pub fn build(&self) -> Box<dyn RecordDecoder> {
        match self.format {
            DecoderFormat::Json => Box::new(JsonDecoder {
                record_path: self.record_path.clone(),
            }),
            DecoderFormat::Jsonl => Box::new(JsonlDecoder),
        }
    }
}

/// Trait for decoding response bodies into records
pub trait RecordDecoder: Send + Sync {
    /// Decode the response body into a list of records
    fn decode(&self, body: &[u8]) -> Result<Vec<JsonValue>>;

    /// Decode the response body into a single JSON value (full response)
    fn decode_raw(&self, body: &[u8]) -> Result<JsonValue>;
}
