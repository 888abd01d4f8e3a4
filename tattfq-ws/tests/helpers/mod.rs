//! Shared fixtures for tattfq-ws integration tests

use chrono::{TimeZone, Utc};
use serde_json::{Map, Value};
use tattfq_common::catalogue;
use tattfq_common::db::{ResponseMeta, StoredResponse};

/// Build a rating map from explicit (code, value) pairs
pub fn rating_map(pairs: &[(&str, i64)]) -> Map<String, Value> {
    pairs
        .iter()
        .map(|&(code, value)| (code.to_string(), Value::from(value)))
        .collect()
}

/// A stored response with only the given ratings present
pub fn stored_response(
    id: i64,
    performance: &[(&str, i64)],
    importance: &[(&str, i64)],
) -> StoredResponse {
    StoredResponse {
        id,
        created_at: Utc.with_ymd_and_hms(2025, 2, 1, 9, 0, 0).unwrap(),
        respondent_code: format!("TATTFQ-{:010X}", id),
        meta: ResponseMeta::default(),
        performance: rating_map(performance),
        importance: rating_map(importance),
    }
}

/// A stored response rating every catalogue item; values are derived
/// deterministically from the item position and the given offsets
pub fn full_response(id: i64, perf_offset: i64, imp_offset: i64) -> StoredResponse {
    let perf: Vec<(&str, i64)> = catalogue::items()
        .iter()
        .enumerate()
        .map(|(idx, item)| (item.code, 1 + (idx as i64 + perf_offset) % 6))
        .collect();
    let imp: Vec<(&str, i64)> = catalogue::items()
        .iter()
        .enumerate()
        .map(|(idx, item)| (item.code, 1 + (idx as i64 + imp_offset) % 6))
        .collect();
    stored_response(id, &perf, &imp)
}
