//! Respondent-profile and completion-duration summaries for the admin views

use serde::Serialize;
use tattfq_common::db::StoredResponse;

/// Completion duration aggregate in seconds; NaN fields when no response
/// carries a duration
#[derive(Debug, Clone, Serialize)]
pub struct DurationSummary {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

/// min/max/mean over the recorded `duration_sec` values
pub fn duration_summary(responses: &[StoredResponse]) -> DurationSummary {
    let durations: Vec<f64> = responses
        .iter()
        .filter_map(|r| r.meta.duration_sec)
        .filter(|d| d.is_finite())
        .collect();

    if durations.is_empty() {
        return DurationSummary {
            count: 0,
            min: f64::NAN,
            max: f64::NAN,
            mean: f64::NAN,
        };
    }

    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut sum = 0.0;
    for &d in &durations {
        min = min.min(d);
        max = max.max(d);
        sum += d;
    }
    DurationSummary {
        count: durations.len(),
        min,
        max,
        mean: sum / durations.len() as f64,
    }
}

/// One observed profile value and how often it occurred
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

/// Value counts for each profile field, blank values excluded, ordered by
/// descending count (ties keep first-seen order)
#[derive(Debug, Clone, Serialize)]
pub struct ProfileSummary {
    pub gender: Vec<ValueCount>,
    pub age: Vec<ValueCount>,
    pub specialty: Vec<ValueCount>,
    pub platform: Vec<ValueCount>,
    pub telemedicine_duration: Vec<ValueCount>,
    pub telemedicine_frequency: Vec<ValueCount>,
    pub telemedicine_last_use: Vec<ValueCount>,
}

pub fn profile_summary(responses: &[StoredResponse]) -> ProfileSummary {
    ProfileSummary {
        gender: value_counts(responses, |r| &r.meta.gender),
        age: value_counts(responses, |r| &r.meta.age),
        specialty: value_counts(responses, |r| &r.meta.specialty),
        platform: value_counts(responses, |r| &r.meta.platform),
        telemedicine_duration: value_counts(responses, |r| &r.meta.telemedicine_duration),
        telemedicine_frequency: value_counts(responses, |r| &r.meta.telemedicine_frequency),
        telemedicine_last_use: value_counts(responses, |r| &r.meta.telemedicine_last_use),
    }
}

fn value_counts<'a>(
    responses: &'a [StoredResponse],
    field: impl Fn(&'a StoredResponse) -> &'a String,
) -> Vec<ValueCount> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: std::collections::HashMap<String, usize> = std::collections::HashMap::new();

    for response in responses {
        let value = field(response).trim();
        if value.is_empty() {
            continue;
        }
        let entry = counts.entry(value.to_string()).or_insert(0);
        if *entry == 0 {
            order.push(value.to_string());
        }
        *entry += 1;
    }

    let mut result: Vec<ValueCount> = order
        .into_iter()
        .map(|value| {
            let count = counts[&value];
            ValueCount { value, count }
        })
        .collect();
    // Stable sort keeps first-seen order among equal counts
    result.sort_by(|a, b| b.count.cmp(&a.count));
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::Map;
    use tattfq_common::db::ResponseMeta;

    fn response(gender: &str, duration_sec: Option<f64>) -> StoredResponse {
        StoredResponse {
            id: 0,
            created_at: Utc::now(),
            respondent_code: "TATTFQ-TEST000000".to_string(),
            meta: ResponseMeta {
                gender: gender.to_string(),
                duration_sec,
                ..ResponseMeta::default()
            },
            performance: Map::new(),
            importance: Map::new(),
        }
    }

    #[test]
    fn test_duration_summary() {
        let rows = vec![
            response("Perempuan", Some(120.0)),
            response("Laki-laki", Some(60.0)),
            response("Perempuan", None),
        ];
        let summary = duration_summary(&rows);
        assert_eq!(summary.count, 2);
        assert_eq!(summary.min, 60.0);
        assert_eq!(summary.max, 120.0);
        assert_eq!(summary.mean, 90.0);
    }

    #[test]
    fn test_duration_summary_empty() {
        let summary = duration_summary(&[]);
        assert_eq!(summary.count, 0);
        assert!(summary.min.is_nan());
        assert!(summary.mean.is_nan());
    }

    #[test]
    fn test_value_counts_skip_blanks_and_sort_by_count() {
        let rows = vec![
            response("Perempuan", None),
            response("Laki-laki", None),
            response("Perempuan", None),
            response("  ", None),
            response("", None),
        ];
        let summary = profile_summary(&rows);
        assert_eq!(
            summary.gender,
            vec![
                ValueCount {
                    value: "Perempuan".to_string(),
                    count: 2
                },
                ValueCount {
                    value: "Laki-laki".to_string(),
                    count: 1
                },
            ]
        );
    }
}
