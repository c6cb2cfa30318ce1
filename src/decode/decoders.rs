//! Decoder implementations
//!
//! Each decoder handles a specific response format.

use super::types::RecordDecoder;
use crate::error::{Error, Result};
use crate::types::JsonValue;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

// ============================================================================
// JSON Decoder
// ============================================================================

/// JSON decoder with optional record path extraction
#[derive(Debug, Clone, Default)]
pub struct JsonDecoder {
    /// Dot path to the records
    pub(super) record_path: Option<String>,
}

impl JsonDecoder {
    /// Create a new JSON decoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a JSON decoder with a record path
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            record_path: Some(path.into()),
        }
    }

    /// Extract records from a JSON value using the record path
    fn extract_records(&self, value: Value) -> Vec<Value> {
        match &self.record_path {
            Some(path) => match extract_simple_path(&value, path) {
                Some(Value::Array(arr)) => arr,
                Some(Value::Null) | None => vec![],
                Some(v) => vec![v],
            },
            // No path - treat entire response as records
            None => match value {
                Value::Array(arr) => arr,
                other => vec![other],
            },
        }
    }
}

impl RecordDecoder for JsonDecoder {
    fn decode(&self, body: &[u8]) -> Result<Vec<Value>> {
        let value = self.decode_raw(body)?;
        Ok(self.extract_records(value))
    }

    fn decode_raw(&self, body: &[u8]) -> Result<Value> {
        serde_json::from_slice(body).map_err(|e| Error::Decode {
            message: format!("Failed to parse JSON: {e}"),
        })
    }
}

// ============================================================================
// JSONL Decoder
// ============================================================================

/// JSON Lines decoder (one JSON object per line)
#[derive(Debug, Clone, Default)]
pub struct JsonlDecoder;

impl JsonlDecoder {
    /// Create a new JSONL decoder
    pub fn new() -> Self {
        Self
    }
}

impl RecordDecoder for JsonlDecoder {
    fn decode(&self, body: &[u8]) -> Result<Vec<Value>> {
        let text = std::str::from_utf8(body).map_err(|e| Error::Decode {
            message: format!("JSONL body is not UTF-8: {e}"),
        })?;

        let mut records = Vec::new();
        for (line_num, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let value: Value = serde_json::from_str(line).map_err(|e| Error::Decode {
                message: format!("Failed to parse JSONL at line {}: {e}", line_num + 1),
            })?;

            records.push(value);
        }

        Ok(records)
    }

    fn decode_raw(&self, body: &[u8]) -> Result<Value> {
        let records = self.decode(body)?;
        Ok(Value::Array(records))
    }
}

// ============================================================================
// Typed conversion
// ============================================================================

/// Decode a body and convert every record into `T`, keeping server order
pub fn decode_items<T: DeserializeOwned>(
    decoder: &dyn RecordDecoder,
    body: &[u8],
) -> Result<Vec<T>> {
    decoder
        .decode(body)?
        .into_iter()
        .enumerate()
        .map(|(i, record)| {
            serde_json::from_value(record).map_err(|e| Error::Decode {
                message: format!("record {i} does not match the expected shape: {e}"),
            })
        })
        .collect()
}

/// Encode items back into a JSON array body (test fixtures, caches in callers)
pub fn encode_items<T: Serialize>(items: &[T]) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(items)?)
}

/// Extract a value using a simple dot path, with `name[i]` / `name[-i]` indexing
fn extract_simple_path(value: &JsonValue, path: &str) -> Option<JsonValue> {
    let path = path.strip_prefix("$.").unwrap_or(path);

    let mut current = value;
    for part in path.split('.') {
        if let Some(bracket_pos) = part.find('[') {
            let name = &part[..bracket_pos];
            let index_str = part[bracket_pos + 1..].strip_suffix(']')?;

            if !name.is_empty() {
                current = current.get(name)?;
            }

            let index = index_str.parse::<i64>().ok()?;
            let arr = current.as_array()?;
            let idx = if index < 0 {
                arr.len().checked_sub(index.unsigned_abs() as usize)?
            } else {
                index as usize
            };
            current = arr.get(idx)?;
        } else {
            current = current.get(part)?;
        }
    }

    Some(current.clone())
}
