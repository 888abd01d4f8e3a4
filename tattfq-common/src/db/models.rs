//! Stored response models
//!
//! Decoding is deliberately tolerant: rows written by earlier versions (or
//! hand-edited) may miss meta keys or carry non-numeric rating values.
//! Missing/malformed values decode to empty/absent, never to errors or
//! zeroes, so one bad row cannot take down an admin view.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Which of the two rating maps a value belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatingKind {
    Performance,
    Importance,
}

/// Profile echo and submission timing stored alongside each response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseMeta {
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub specialty: String,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub telemedicine_duration: String,
    #[serde(default)]
    pub telemedicine_frequency: String,
    #[serde(default)]
    pub telemedicine_last_use: String,
    /// RFC 3339 UTC timestamp, empty when unknown
    #[serde(default)]
    pub started_at_utc: String,
    /// RFC 3339 UTC timestamp, empty when unknown
    #[serde(default)]
    pub submitted_at_utc: String,
    #[serde(default)]
    pub duration_sec: Option<f64>,
}

impl ResponseMeta {
    /// Parsed session start time, if the stored string is a valid timestamp
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        parse_utc(&self.started_at_utc)
    }

    /// Parsed submission time, if the stored string is a valid timestamp
    pub fn submitted_at(&self) -> Option<DateTime<Utc>> {
        parse_utc(&self.submitted_at_utc)
    }
}

fn parse_utc(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// One submitted response as read back from the store
#[derive(Debug, Clone, PartialEq)]
pub struct StoredResponse {
    pub id: i64,
    /// Server-assigned insertion timestamp
    pub created_at: DateTime<Utc>,
    pub respondent_code: String,
    pub meta: ResponseMeta,
    /// Raw performance rating map (item code → JSON value)
    pub performance: Map<String, Value>,
    /// Raw importance rating map (item code → JSON value)
    pub importance: Map<String, Value>,
}

impl StoredResponse {
    /// Timestamp used for date filtering: submission time when recorded,
    /// otherwise the server insertion time
    pub fn effective_timestamp(&self) -> DateTime<Utc> {
        self.meta.submitted_at().unwrap_or(self.created_at)
    }

    /// Numeric rating for an item code, or `None` when the value is missing
    /// or not coercible to a number
    pub fn rating(&self, kind: RatingKind, code: &str) -> Option<f64> {
        let map = match kind {
            RatingKind::Performance => &self.performance,
            RatingKind::Importance => &self.importance,
        };
        map.get(code).and_then(coerce_numeric)
    }
}

/// JSON value → f64, accepting numbers and numeric strings
fn coerce_numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}
