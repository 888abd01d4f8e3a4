//! Importance-Performance Analysis engine
//!
//! Pure functions from a response collection to per-item / per-dimension
//! aggregates, data-centered cutoffs, gaps, and quadrant assignments.
//! Missing or non-numeric ratings are skipped (never zero-filled); a code
//! or dimension with no observations yields NaN means and stays
//! unclassified. Output ordering follows catalogue insertion order, so
//! repeated runs over the same collection are identical.

use serde::Serialize;
use tattfq_common::catalogue;
use tattfq_common::db::{RatingKind, StoredResponse};

/// Priority quadrant of the IPA matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Quadrant {
    #[serde(rename = "I - Concentrate Here")]
    ConcentrateHere,
    #[serde(rename = "II - Keep Up the Good Work")]
    KeepUpTheGoodWork,
    #[serde(rename = "III - Low Priority")]
    LowPriority,
    #[serde(rename = "IV - Possible Overkill")]
    PossibleOverkill,
    /// No defined mean on at least one axis
    #[serde(rename = "NA")]
    Unclassified,
}

impl Quadrant {
    pub fn label(self) -> &'static str {
        match self {
            Quadrant::ConcentrateHere => "I - Concentrate Here",
            Quadrant::KeepUpTheGoodWork => "II - Keep Up the Good Work",
            Quadrant::LowPriority => "III - Low Priority",
            Quadrant::PossibleOverkill => "IV - Possible Overkill",
            Quadrant::Unclassified => "NA",
        }
    }
}

/// The four real quadrants in reporting order
pub const QUADRANT_ORDER: [Quadrant; 4] = [
    Quadrant::ConcentrateHere,
    Quadrant::KeepUpTheGoodWork,
    Quadrant::LowPriority,
    Quadrant::PossibleOverkill,
];

/// min/max/mean over the present observations of one axis; all NaN when
/// there are none
#[derive(Debug, Clone, Copy, Serialize)]
pub struct AxisSummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl AxisSummary {
    const EMPTY: AxisSummary = AxisSummary {
        min: f64::NAN,
        max: f64::NAN,
        mean: f64::NAN,
    };

    fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::EMPTY;
        }
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for &v in values {
            min = min.min(v);
            max = max.max(v);
            sum += v;
        }
        Self {
            min,
            max,
            mean: sum / values.len() as f64,
        }
    }
}

/// Aggregates for one catalogue item
#[derive(Debug, Clone, Serialize)]
pub struct ItemStat {
    pub code: &'static str,
    pub dimension: &'static str,
    pub performance: AxisSummary,
    pub importance: AxisSummary,
    /// performance mean minus importance mean
    pub gap: f64,
    pub quadrant: Quadrant,
}

/// Aggregates for one dimension, over per-respondent dimension scores
#[derive(Debug, Clone, Serialize)]
pub struct DimensionStat {
    pub abbr: &'static str,
    pub name: &'static str,
    pub n_items: usize,
    pub performance: AxisSummary,
    pub importance: AxisSummary,
    pub gap: f64,
    pub quadrant: Quadrant,
}

/// Identifiers per quadrant, in input (catalogue) order
#[derive(Debug, Clone, Default, Serialize)]
pub struct QuadrantBuckets {
    #[serde(rename = "I - Concentrate Here")]
    pub concentrate_here: Vec<&'static str>,
    #[serde(rename = "II - Keep Up the Good Work")]
    pub keep_up_the_good_work: Vec<&'static str>,
    #[serde(rename = "III - Low Priority")]
    pub low_priority: Vec<&'static str>,
    #[serde(rename = "IV - Possible Overkill")]
    pub possible_overkill: Vec<&'static str>,
}

impl QuadrantBuckets {
    fn push(&mut self, quadrant: Quadrant, id: &'static str) {
        match quadrant {
            Quadrant::ConcentrateHere => self.concentrate_here.push(id),
            Quadrant::KeepUpTheGoodWork => self.keep_up_the_good_work.push(id),
            Quadrant::LowPriority => self.low_priority.push(id),
            Quadrant::PossibleOverkill => self.possible_overkill.push(id),
            Quadrant::Unclassified => {}
        }
    }

    pub fn get(&self, quadrant: Quadrant) -> &[&'static str] {
        match quadrant {
            Quadrant::ConcentrateHere => &self.concentrate_here,
            Quadrant::KeepUpTheGoodWork => &self.keep_up_the_good_work,
            Quadrant::LowPriority => &self.low_priority,
            Quadrant::PossibleOverkill => &self.possible_overkill,
            Quadrant::Unclassified => &[],
        }
    }
}

/// Item-level analysis result
#[derive(Debug, Clone, Serialize)]
pub struct ItemIpa {
    pub rows: Vec<ItemStat>,
    pub performance_cutoff: f64,
    pub importance_cutoff: f64,
    pub quadrants: QuadrantBuckets,
}

/// Dimension-level analysis result
#[derive(Debug, Clone, Serialize)]
pub struct DimensionIpa {
    pub rows: Vec<DimensionStat>,
    pub performance_cutoff: f64,
    pub importance_cutoff: f64,
    pub quadrants: QuadrantBuckets,
}

/// Classify one mean point against the cutoffs. Ties go to the "≥" side on
/// both axes; an undefined coordinate leaves the point unclassified.
pub fn classify(x: f64, y: f64, x_cut: f64, y_cut: f64) -> Quadrant {
    if x.is_nan() || y.is_nan() || x_cut.is_nan() || y_cut.is_nan() {
        return Quadrant::Unclassified;
    }
    if y >= y_cut && x < x_cut {
        Quadrant::ConcentrateHere
    } else if y >= y_cut && x >= x_cut {
        Quadrant::KeepUpTheGoodWork
    } else if y < y_cut && x < x_cut {
        Quadrant::LowPriority
    } else {
        Quadrant::PossibleOverkill
    }
}

/// Mean of the non-NaN entries; NaN when there are none
fn nan_mean(values: impl Iterator<Item = f64>) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for v in values {
        if !v.is_nan() {
            sum += v;
            count += 1;
        }
    }
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

/// Per-item statistics, cutoffs, and quadrant assignment.
///
/// Never raises: an empty collection produces one all-NaN row per catalogue
/// item, NaN cutoffs, and empty buckets.
pub fn compute_item_stats(responses: &[StoredResponse]) -> ItemIpa {
    struct Partial {
        code: &'static str,
        dimension: &'static str,
        performance: AxisSummary,
        importance: AxisSummary,
    }

    let partials: Vec<Partial> = catalogue::items()
        .iter()
        .map(|item| {
            let perf: Vec<f64> = responses
                .iter()
                .filter_map(|r| r.rating(RatingKind::Performance, item.code))
                .collect();
            let imp: Vec<f64> = responses
                .iter()
                .filter_map(|r| r.rating(RatingKind::Importance, item.code))
                .collect();
            Partial {
                code: item.code,
                dimension: item.dimension,
                performance: AxisSummary::from_values(&perf),
                importance: AxisSummary::from_values(&imp),
            }
        })
        .collect();

    let performance_cutoff = nan_mean(partials.iter().map(|p| p.performance.mean));
    let importance_cutoff = nan_mean(partials.iter().map(|p| p.importance.mean));

    let mut quadrants = QuadrantBuckets::default();
    let rows = partials
        .into_iter()
        .map(|p| {
            let quadrant = classify(
                p.performance.mean,
                p.importance.mean,
                performance_cutoff,
                importance_cutoff,
            );
            quadrants.push(quadrant, p.code);
            ItemStat {
                code: p.code,
                dimension: p.dimension,
                gap: p.performance.mean - p.importance.mean,
                performance: p.performance,
                importance: p.importance,
                quadrant,
            }
        })
        .collect();

    ItemIpa {
        rows,
        performance_cutoff,
        importance_cutoff,
        quadrants,
    }
}

/// Per-respondent score for one dimension: the mean of that respondent's
/// present item ratings within the dimension. None when no item is present.
fn respondent_dimension_score(
    response: &StoredResponse,
    kind: RatingKind,
    codes: &[&'static str],
) -> Option<f64> {
    let present: Vec<f64> = codes
        .iter()
        .filter_map(|code| response.rating(kind, code))
        .collect();
    if present.is_empty() {
        None
    } else {
        Some(present.iter().sum::<f64>() / present.len() as f64)
    }
}

/// Per-dimension statistics, cutoffs, and quadrant assignment.
///
/// A respondent contributes to a dimension as soon as at least one of its
/// items is present. Never raises: an empty collection produces an empty
/// row list, NaN cutoffs, and empty buckets.
pub fn compute_dimension_stats(responses: &[StoredResponse]) -> DimensionIpa {
    if responses.is_empty() {
        return DimensionIpa {
            rows: Vec::new(),
            performance_cutoff: f64::NAN,
            importance_cutoff: f64::NAN,
            quadrants: QuadrantBuckets::default(),
        };
    }

    struct Partial {
        abbr: &'static str,
        name: &'static str,
        n_items: usize,
        performance: AxisSummary,
        importance: AxisSummary,
    }

    let partials: Vec<Partial> = catalogue::dimensions()
        .iter()
        .map(|dim| {
            let perf: Vec<f64> = responses
                .iter()
                .filter_map(|r| {
                    respondent_dimension_score(r, RatingKind::Performance, &dim.codes)
                })
                .collect();
            let imp: Vec<f64> = responses
                .iter()
                .filter_map(|r| {
                    respondent_dimension_score(r, RatingKind::Importance, &dim.codes)
                })
                .collect();
            Partial {
                abbr: dim.abbr,
                name: dim.name,
                n_items: dim.codes.len(),
                performance: AxisSummary::from_values(&perf),
                importance: AxisSummary::from_values(&imp),
            }
        })
        .collect();

    let performance_cutoff = nan_mean(partials.iter().map(|p| p.performance.mean));
    let importance_cutoff = nan_mean(partials.iter().map(|p| p.importance.mean));

    let mut quadrants = QuadrantBuckets::default();
    let rows = partials
        .into_iter()
        .map(|p| {
            let quadrant = classify(
                p.performance.mean,
                p.importance.mean,
                performance_cutoff,
                importance_cutoff,
            );
            quadrants.push(quadrant, p.abbr);
            DimensionStat {
                abbr: p.abbr,
                name: p.name,
                n_items: p.n_items,
                gap: p.performance.mean - p.importance.mean,
                performance: p.performance,
                importance: p.importance,
                quadrant,
            }
        })
        .collect();

    DimensionIpa {
        rows,
        performance_cutoff,
        importance_cutoff,
        quadrants,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_tie_goes_to_geq_side() {
        // On the importance cutoff: counts as the upper half
        assert_eq!(classify(3.0, 4.0, 4.0, 4.0), Quadrant::ConcentrateHere);
        // On both cutoffs: Keep Up the Good Work
        assert_eq!(classify(4.0, 4.0, 4.0, 4.0), Quadrant::KeepUpTheGoodWork);
        // On the performance cutoff, below importance: Possible Overkill
        assert_eq!(classify(4.0, 3.9, 4.0, 4.0), Quadrant::PossibleOverkill);
    }

    #[test]
    fn test_classify_nan_is_unclassified() {
        assert_eq!(classify(f64::NAN, 4.0, 4.0, 4.0), Quadrant::Unclassified);
        assert_eq!(classify(4.0, f64::NAN, 4.0, 4.0), Quadrant::Unclassified);
        assert_eq!(classify(4.0, 4.0, f64::NAN, f64::NAN), Quadrant::Unclassified);
    }

    #[test]
    fn test_nan_mean_skips_nan() {
        let values = [2.0, f64::NAN, 6.0];
        assert_eq!(nan_mean(values.iter().copied()), 4.0);
        assert!(nan_mean(std::iter::empty()).is_nan());
        assert!(nan_mean([f64::NAN].iter().copied()).is_nan());
    }

    #[test]
    fn test_axis_summary_empty_is_all_nan() {
        let s = AxisSummary::from_values(&[]);
        assert!(s.min.is_nan() && s.max.is_nan() && s.mean.is_nan());
    }

    #[test]
    fn test_axis_summary_values() {
        let s = AxisSummary::from_values(&[2.0, 6.0, 4.0]);
        assert_eq!(s.min, 2.0);
        assert_eq!(s.max, 6.0);
        assert_eq!(s.mean, 4.0);
    }
}
