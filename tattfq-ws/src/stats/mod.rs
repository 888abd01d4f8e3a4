//! Statistics over stored responses: the IPA engine, plot geometry, and
//! profile/duration summaries.
//!
//! Everything in this module is pure: functions of a response collection,
//! no hidden state, no caching, safe to call concurrently. Filtering by
//! data scope and date range happens here, before the engine, so the
//! engine itself stays unaware of roles and periods.

pub mod geometry;
pub mod ipa;
pub mod summary;

use chrono::NaiveDate;
use tattfq_common::db::StoredResponse;

/// Restrict a response collection to one assessed platform (trimmed
/// equality on the stored platform field) and/or an inclusive calendar
/// date range over each response's effective timestamp.
pub fn apply_filters(
    responses: Vec<StoredResponse>,
    platform_scope: Option<&str>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Vec<StoredResponse> {
    responses
        .into_iter()
        .filter(|r| match platform_scope {
            Some(scope) => r.meta.platform.trim() == scope.trim(),
            None => true,
        })
        .filter(|r| {
            let date = r.effective_timestamp().date_naive();
            from.map_or(true, |f| date >= f) && to.map_or(true, |t| date <= t)
        })
        .collect()
}

/// Round for display at the presentation boundary (statistics themselves
/// are never rounded)
pub fn round2(value: f64) -> f64 {
    if value.is_finite() {
        (value * 100.0).round() / 100.0
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::Map;
    use tattfq_common::db::{ResponseMeta, StoredResponse};

    fn response(platform: &str, submitted: &str) -> StoredResponse {
        StoredResponse {
            id: 0,
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            respondent_code: "TATTFQ-TEST000000".to_string(),
            meta: ResponseMeta {
                platform: platform.to_string(),
                submitted_at_utc: submitted.to_string(),
                ..ResponseMeta::default()
            },
            performance: Map::new(),
            importance: Map::new(),
        }
    }

    #[test]
    fn test_platform_scope_filter_trims() {
        let rows = vec![
            response(" Halodoc ", "2025-02-01T08:00:00+00:00"),
            response("Alodokter", "2025-02-01T08:00:00+00:00"),
            response("", "2025-02-01T08:00:00+00:00"),
        ];
        let filtered = apply_filters(rows, Some("Halodoc"), None, None);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].meta.platform.trim(), "Halodoc");
    }

    #[test]
    fn test_date_range_uses_effective_timestamp() {
        let rows = vec![
            // submitted_at in range even though created_at is not
            response("Halodoc", "2025-02-10T08:00:00+00:00"),
            // no submitted_at: falls back to created_at (2025-01-01)
            response("Halodoc", ""),
        ];
        let from = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2025, 2, 28).unwrap();
        let filtered = apply_filters(rows, None, Some(from), Some(to));
        assert_eq!(filtered.len(), 1);
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let rows = vec![response("Halodoc", "2025-02-10T23:59:00+00:00")];
        let day = NaiveDate::from_ymd_opt(2025, 2, 10).unwrap();
        let filtered = apply_filters(rows, None, Some(day), Some(day));
        assert_eq!(filtered.len(), 1);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(4.666_666), 4.67);
        assert_eq!(round2(4.0), 4.0);
        assert!(round2(f64::NAN).is_nan());
    }
}
