//! CSV export of raw responses
//!
//! Flat table, one row per stored response, newest first, with the profile
//! echo followed by per-item Performance/Importance columns in catalogue
//! order. Numeric display values are rounded to 2 decimals here, at the
//! presentation boundary.

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Extension,
};
use tattfq_common::catalogue;
use tattfq_common::db::{RatingKind, StoredResponse};

use crate::api::admin::{load_filtered, DateRangeQuery};
use crate::api::auth::AdminContext;
use crate::api::ApiError;
use crate::stats::round2;

/// GET /api/admin/export.csv
pub async fn export_csv(
    State(state): State<crate::AppState>,
    Extension(ctx): Extension<AdminContext>,
    Query(range): Query<DateRangeQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let responses = load_filtered(&state, &ctx, range).await?;
    let body = render_csv(&responses);

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"tattfq_responses.csv\"",
            ),
        ],
        body,
    ))
}

/// Header row + one row per response
pub fn render_csv(responses: &[StoredResponse]) -> String {
    let mut out = String::new();

    let mut header: Vec<String> = [
        "respondent_code",
        "created_at",
        "started",
        "submitted",
        "duration",
        "gender",
        "age",
        "specialty",
        "platform",
        "telemedicine_duration",
        "telemedicine_frequency",
        "telemedicine_last_use",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    for item in catalogue::items() {
        header.push(format!("{}_Performance", item.code));
        header.push(format!("{}_Importance", item.code));
    }
    push_row(&mut out, &header);

    for response in responses {
        let mut row: Vec<String> = vec![
            response.respondent_code.clone(),
            response.created_at.to_rfc3339(),
            response.meta.started_at_utc.clone(),
            response.meta.submitted_at_utc.clone(),
            response
                .meta
                .duration_sec
                .map(|d| format_number(round2(d)))
                .unwrap_or_default(),
            response.meta.gender.clone(),
            response.meta.age.clone(),
            response.meta.specialty.clone(),
            response.meta.platform.clone(),
            response.meta.telemedicine_duration.clone(),
            response.meta.telemedicine_frequency.clone(),
            response.meta.telemedicine_last_use.clone(),
        ];
        for item in catalogue::items() {
            row.push(format_rating(response, RatingKind::Performance, item.code));
            row.push(format_rating(response, RatingKind::Importance, item.code));
        }
        push_row(&mut out, &row);
    }

    out
}

fn format_rating(response: &StoredResponse, kind: RatingKind, code: &str) -> String {
    response
        .rating(kind, code)
        .map(format_number)
        .unwrap_or_default()
}

/// Whole values print without a decimal point; everything else with 2
fn format_number(value: f64) -> String {
    if !value.is_finite() {
        String::new()
    } else if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}

fn push_row(out: &mut String, fields: &[String]) {
    let mut first = true;
    for field in fields {
        if !first {
            out.push(',');
        }
        first = false;
        out.push_str(&escape_field(field));
    }
    out.push_str("\r\n");
}

/// Quote fields containing separators, quotes, or line breaks
fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use tattfq_common::db::ResponseMeta;

    fn sample_response() -> StoredResponse {
        StoredResponse {
            id: 1,
            created_at: Utc.with_ymd_and_hms(2025, 2, 1, 9, 30, 0).unwrap(),
            respondent_code: "TATTFQ-ABC123DEF0".to_string(),
            meta: ResponseMeta {
                gender: "Perempuan".to_string(),
                specialty: "Dokter umum, spesialis".to_string(),
                platform: "Halodoc".to_string(),
                duration_sec: Some(245.678),
                ..ResponseMeta::default()
            },
            performance: json!({"DSI1": 5}).as_object().cloned().unwrap(),
            importance: json!({"DSI1": 6}).as_object().cloned().unwrap(),
        }
    }

    #[test]
    fn test_header_covers_catalogue_pairs() {
        let csv = render_csv(&[]);
        let header = csv.lines().next().expect("has header");
        assert!(header.starts_with("respondent_code,created_at"));
        assert!(header.contains("DSI1_Performance,DSI1_Importance"));
        assert!(header.contains("DQA6_Performance,DQA6_Importance"));
        let columns = header.split(',').count();
        assert_eq!(columns, 12 + 2 * catalogue::item_count());
    }

    #[test]
    fn test_row_values_and_quoting() {
        let csv = render_csv(&[sample_response()]);
        let row = csv.lines().nth(1).expect("has data row");
        assert!(row.contains("TATTFQ-ABC123DEF0"));
        // Comma-bearing specialty must be quoted
        assert!(row.contains("\"Dokter umum, spesialis\""));
        // Duration rounded to 2 decimals
        assert!(row.contains("245.68"));
        // Whole ratings print without decimals
        assert!(row.contains(",5,6"));
    }

    #[test]
    fn test_missing_ratings_are_empty_fields() {
        let csv = render_csv(&[sample_response()]);
        let row = csv.lines().nth(1).expect("has data row");
        // DSI2 onward were never rated: consecutive empty fields
        assert!(row.contains(",,"));
    }

    #[test]
    fn test_quote_escaping() {
        assert_eq!(escape_field("plain"), "plain");
        assert_eq!(escape_field("a,b"), "\"a,b\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
