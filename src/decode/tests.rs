//! Tests for decoder module

use super::*;
use crate::error::Error;
use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Issue {
    id: u64,
    title: String,
    #[serde(default)]
    labels: Vec<String>,
}

// ============================================================================
// DecoderConfig Tests
// ============================================================================

#[test]
fn test_decoder_format_default() {
    assert_eq!(DecoderFormat::default(), DecoderFormat::Json);
}

#[test]
fn test_decoder_config_constructors() {
    let config = DecoderConfig::json();
    assert_eq!(config.format, DecoderFormat::Json);
    assert!(config.record_path.is_none());

    let config = DecoderConfig::json_with_path("data.items");
    assert_eq!(config.record_path, Some("data.items".to_string()));

    let config = DecoderConfig::jsonl();
    assert_eq!(config.format, DecoderFormat::Jsonl);
}

#[test]
fn test_decoder_config_build() {
    let decoder = DecoderConfig::json_with_path("items").build();
    let records = decoder.decode(br#"{"items": [1, 2]}"#).unwrap();
    assert_eq!(records.len(), 2);

    let decoder = DecoderConfig::jsonl().build();
    let records = decoder.decode(b"{\"a\":1}\n{\"a\":2}\n").unwrap();
    assert_eq!(records.len(), 2);
}

// ============================================================================
// JSON Decoder Tests
// ============================================================================

#[test]
fn test_json_decoder_array() {
    let decoder = JsonDecoder::new();
    let records = decoder.decode(br#"[{"id": 1}, {"id": 2}, {"id": 3}]"#).unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0]["id"], 1);
    assert_eq!(records[2]["id"], 3);
}

#[test]
fn test_json_decoder_single_object() {
    let decoder = JsonDecoder::new();
    let records = decoder.decode(br#"{"id": 7}"#).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["id"], 7);
}

#[test]
fn test_json_decoder_with_path() {
    let decoder = JsonDecoder::with_path("$.data.results");
    let body = br#"{"total": 2, "data": {"results": [{"id": 1}, {"id": 2}]}}"#;
    let records = decoder.decode(body).unwrap();
    assert_eq!(records.len(), 2);
}

#[test]
fn test_json_decoder_path_missing_or_null() {
    let decoder = JsonDecoder::with_path("items");
    assert!(decoder.decode(br#"{"other": []}"#).unwrap().is_empty());
    assert!(decoder.decode(br#"{"items": null}"#).unwrap().is_empty());
}

#[test]
fn test_json_decoder_indexed_path() {
    let decoder = JsonDecoder::with_path("pages[-1].items");
    let body = br#"{"pages": [{"items": [1]}, {"items": [2, 3]}]}"#;
    let records = decoder.decode(body).unwrap();
    assert_eq!(records, vec![serde_json::json!(2), serde_json::json!(3)]);

    let decoder = JsonDecoder::with_path("pages[5].items");
    assert!(decoder.decode(body).unwrap().is_empty());
}

#[test]
fn test_json_decoder_invalid() {
    let decoder = JsonDecoder::new();
    let result = decoder.decode(b"{not json");
    assert!(matches!(result, Err(Error::Decode { .. })));
}

// ============================================================================
// JSONL Decoder Tests
// ============================================================================

#[test]
fn test_jsonl_decoder_skips_blank_lines() {
    let decoder = JsonlDecoder::new();
    let body = b"{\"id\": 1}\n\n   \n{\"id\": 2}\n";
    let records = decoder.decode(body).unwrap();
    assert_eq!(records.len(), 2);

    let raw = decoder.decode_raw(body).unwrap();
    assert_eq!(raw.as_array().map(Vec::len), Some(2));
}

#[test]
fn test_jsonl_decoder_reports_line() {
    let decoder = JsonlDecoder::new();
    let err = decoder.decode(b"{\"id\": 1}\n{broken\n").unwrap_err();
    assert!(err.to_string().contains("line 2"));
}

// ============================================================================
// Typed Decoding Tests
// ============================================================================

#[test]
fn test_decode_items_typed() {
    let decoder = JsonDecoder::new();
    let body = br#"[{"id": 1, "title": "first"}, {"id": 2, "title": "second", "labels": ["bug"]}]"#;

    let items: Vec<Issue> = decode_items(&decoder, body).unwrap();
    assert_eq!(
        items,
        vec![
            Issue {
                id: 1,
                title: "first".to_string(),
                labels: vec![],
            },
            Issue {
                id: 2,
                title: "second".to_string(),
                labels: vec!["bug".to_string()],
            },
        ]
    );
}

#[test]
fn test_decode_items_shape_mismatch() {
    let decoder = JsonDecoder::new();
    let body = br#"[{"id": 1, "title": "ok"}, {"id": "two"}]"#;

    let err = decode_items::<Issue>(&decoder, body).unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
    assert!(err.to_string().contains("record 1"));
}

#[test]
fn test_decode_then_encode_round_trip() {
    let decoder = JsonDecoder::new();
    let body = br#"[{"id": 10, "title": "a", "labels": ["x"]}, {"id": 11, "title": "b", "labels": []}]"#;

    let items: Vec<Issue> = decode_items(&decoder, body).unwrap();
    let encoded = encode_items(&items).unwrap();
    let again: Vec<Issue> = decode_items(&decoder, &encoded).unwrap();

    assert_eq!(items, again);
}
