//! Quadrant-boundary geometry for the IPA matrix plots
//!
//! Two variants are produced for the rendering collaborator:
//! orthogonal (full vertical + horizontal cutoff lines, fixed label
//! positions) and diagonal-trimmed (a slope-1 isoline through the cutoff
//! point clipped to the plot box, plus partial cutoff segments drawn only
//! where they are not redundant with the diagonal). This module computes
//! coordinates only; drawing is a presentation concern.

use crate::stats::ipa::Quadrant;
use serde::Serialize;

/// Padding added around the outermost plotted points
pub const BOUNDS_PAD: f64 = 0.2;

/// Margin between a label region and the boundaries around it, as a
/// fraction of the plot span. Tunable.
pub const LABEL_MARGIN_FRAC: f64 = 0.05;

/// Fallback anchor (axes fractions) for the "Keep Up the Good Work" label
/// when its diagonal-bounded region degenerates. Tunable.
pub const KEEP_UP_FALLBACK_ANCHOR: (f64, f64) = (0.75, 0.78);

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
}

/// Axis-aligned rectangle, normalized so `x0 <= x1` and `y0 <= y1`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Rect {
    pub fn center(&self) -> Point {
        Point::new((self.x0 + self.x1) / 2.0, (self.y0 + self.y1) / 2.0)
    }
}

/// Plot bounding box in data coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlotBounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl PlotBounds {
    /// Bounds around the finite plotted points with `pad` on every side;
    /// `None` when no point has finite coordinates
    pub fn around(points: &[Point], pad: f64) -> Option<PlotBounds> {
        let finite: Vec<&Point> = points
            .iter()
            .filter(|p| p.x.is_finite() && p.y.is_finite())
            .collect();
        if finite.is_empty() {
            return None;
        }
        let mut x_min = f64::INFINITY;
        let mut x_max = f64::NEG_INFINITY;
        let mut y_min = f64::INFINITY;
        let mut y_max = f64::NEG_INFINITY;
        for p in finite {
            x_min = x_min.min(p.x);
            x_max = x_max.max(p.x);
            y_min = y_min.min(p.y);
            y_max = y_max.max(p.y);
        }
        Some(PlotBounds {
            x_min: x_min - pad,
            x_max: x_max + pad,
            y_min: y_min - pad,
            y_max: y_max + pad,
        })
    }

    fn x_span(&self) -> f64 {
        self.x_max - self.x_min
    }

    fn y_span(&self) -> f64 {
        self.y_max - self.y_min
    }
}

/// Coordinate space a label anchor is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelSpace {
    /// Data coordinates, fitted inside `region`
    Data,
    /// Fractions of the plot axes, independent of the data
    AxesFraction,
}

/// Placement of one quadrant label
#[derive(Debug, Clone, Serialize)]
pub struct QuadrantLabel {
    pub quadrant: Quadrant,
    pub anchor: Point,
    pub space: LabelSpace,
    /// Region the label must fit into; absent for fixed-position labels
    pub region: Option<Rect>,
}

/// Variant 1: full cutoff lines spanning the plot, labels centered in the
/// four fixed plot-area quarters
#[derive(Debug, Clone, Serialize)]
pub struct OrthogonalGeometry {
    pub vertical: Segment,
    pub horizontal: Segment,
    pub labels: Vec<QuadrantLabel>,
}

/// Variant 2: slope-1 isoline plus trimmed partial cutoff segments
#[derive(Debug, Clone, Serialize)]
pub struct DiagonalGeometry {
    pub diagonal: Segment,
    /// Vertical segment from the bottom edge up to the importance cutoff
    pub vertical: Segment,
    /// Horizontal segment from the performance cutoff to the right edge
    pub horizontal: Segment,
    pub labels: Vec<QuadrantLabel>,
}

/// Variant 1 geometry
pub fn orthogonal(x_cut: f64, y_cut: f64, bounds: PlotBounds) -> OrthogonalGeometry {
    let vertical = Segment {
        from: Point::new(x_cut, bounds.y_min),
        to: Point::new(x_cut, bounds.y_max),
    };
    let horizontal = Segment {
        from: Point::new(bounds.x_min, y_cut),
        to: Point::new(bounds.x_max, y_cut),
    };

    // Labels sit at the centers of the four fixed quarters of the plot
    // area, independent of where the cutoffs fall
    let labels = vec![
        fixed_label(Quadrant::ConcentrateHere, 0.25, 0.75),
        fixed_label(Quadrant::KeepUpTheGoodWork, 0.75, 0.75),
        fixed_label(Quadrant::LowPriority, 0.25, 0.25),
        fixed_label(Quadrant::PossibleOverkill, 0.75, 0.25),
    ];

    OrthogonalGeometry {
        vertical,
        horizontal,
        labels,
    }
}

fn fixed_label(quadrant: Quadrant, fx: f64, fy: f64) -> QuadrantLabel {
    QuadrantLabel {
        quadrant,
        anchor: Point::new(fx, fy),
        space: LabelSpace::AxesFraction,
        region: None,
    }
}

/// Variant 2 geometry
pub fn diagonal_trimmed(x_cut: f64, y_cut: f64, bounds: PlotBounds) -> DiagonalGeometry {
    let diagonal = clip_diagonal(x_cut, y_cut, bounds);

    // Cutoff dividers only where they are not redundant with the diagonal:
    // below-left of the cutoff point and to its right
    let vertical = Segment {
        from: Point::new(x_cut, bounds.y_min),
        to: Point::new(x_cut, y_cut),
    };
    let horizontal = Segment {
        from: Point::new(x_cut, y_cut),
        to: Point::new(bounds.x_max, y_cut),
    };

    let labels = diagonal_labels(x_cut, y_cut, bounds);

    DiagonalGeometry {
        diagonal,
        vertical,
        horizontal,
        labels,
    }
}

/// Clip the slope-1 isoline through `(x_cut, y_cut)` to the bounding box:
/// intersect with all four edges, drop duplicates, keep the two extreme
/// points. Falls back to the unclipped x-span when the line barely grazes
/// the box.
fn clip_diagonal(x_cut: f64, y_cut: f64, bounds: PlotBounds) -> Segment {
    let b = y_cut - x_cut; // y = x + b

    let mut points: Vec<Point> = Vec::with_capacity(4);
    let mut push_unique = |p: Point| {
        if !points.iter().any(|q| q == &p) {
            points.push(p);
        }
    };

    // Left and right edges
    let y_at_left = bounds.x_min + b;
    if (bounds.y_min..=bounds.y_max).contains(&y_at_left) {
        push_unique(Point::new(bounds.x_min, y_at_left));
    }
    let y_at_right = bounds.x_max + b;
    if (bounds.y_min..=bounds.y_max).contains(&y_at_right) {
        push_unique(Point::new(bounds.x_max, y_at_right));
    }
    // Bottom and top edges
    let x_at_bottom = bounds.y_min - b;
    if (bounds.x_min..=bounds.x_max).contains(&x_at_bottom) {
        push_unique(Point::new(x_at_bottom, bounds.y_min));
    }
    let x_at_top = bounds.y_max - b;
    if (bounds.x_min..=bounds.x_max).contains(&x_at_top) {
        push_unique(Point::new(x_at_top, bounds.y_max));
    }

    if points.len() >= 2 {
        points.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));
        Segment {
            from: points[0],
            to: points[points.len() - 1],
        }
    } else {
        Segment {
            from: Point::new(bounds.x_min, bounds.x_min + b),
            to: Point::new(bounds.x_max, bounds.x_max + b),
        }
    }
}

/// Label regions for the diagonal variant. Each quadrant gets a rectangle
/// inset by the margin and bounded by the nearest of: the cutoff lines, the
/// diagonal, and the plot edges. A degenerate rectangle drops the label —
/// except "Keep Up the Good Work", which falls back to a fixed anchor.
fn diagonal_labels(x_cut: f64, y_cut: f64, bounds: PlotBounds) -> Vec<QuadrantLabel> {
    let b = y_cut - x_cut;
    let y_diag = |x: f64| x + b;
    let mx = LABEL_MARGIN_FRAC * bounds.x_span();
    let my = LABEL_MARGIN_FRAC * bounds.y_span();

    let mut labels = Vec::with_capacity(4);

    let clamp_rect = |x0: f64, y0: f64, x1: f64, y1: f64| -> Rect {
        let (x0, x1) = (x0.min(x1), x0.max(x1));
        let (y0, y1) = (y0.min(y1), y0.max(y1));
        Rect {
            x0: x0.max(bounds.x_min),
            y0: y0.max(bounds.y_min),
            x1: x1.min(bounds.x_max),
            y1: y1.min(bounds.y_max),
        }
    };

    // Concentrate Here: above the diagonal, left of the vertical divider
    {
        let x_left = bounds.x_min + mx;
        let x_right = x_cut - mx;
        let y_bottom = (y_cut + my).max(y_diag(x_right) + my);
        let y_top = bounds.y_max - my;
        if x_right > x_left && y_top > y_bottom {
            let rect = clamp_rect(x_left, y_bottom, x_right, y_top);
            labels.push(QuadrantLabel {
                quadrant: Quadrant::ConcentrateHere,
                anchor: rect.center(),
                space: LabelSpace::Data,
                region: Some(rect),
            });
        }
    }

    // Keep Up the Good Work: below the diagonal, above the horizontal
    // divider; the only label with a fallback position
    {
        let x_left = x_cut + mx;
        let x_right = bounds.x_max - mx;
        let y_bottom = y_cut + my;
        let y_top = y_diag(x_left) - my;
        if y_top > y_bottom {
            let rect = clamp_rect(x_left, y_bottom, x_right, y_top);
            labels.push(QuadrantLabel {
                quadrant: Quadrant::KeepUpTheGoodWork,
                anchor: rect.center(),
                space: LabelSpace::Data,
                region: Some(rect),
            });
        } else {
            labels.push(QuadrantLabel {
                quadrant: Quadrant::KeepUpTheGoodWork,
                anchor: Point::new(KEEP_UP_FALLBACK_ANCHOR.0, KEEP_UP_FALLBACK_ANCHOR.1),
                space: LabelSpace::AxesFraction,
                region: None,
            });
        }
    }

    // Low Priority: below the diagonal, left of the vertical divider
    {
        let x_left = bounds.x_min + mx;
        let x_right = x_cut - mx;
        let y_bottom = bounds.y_min + my;
        let y_top = (y_cut - my).min(y_diag(x_left) - my);
        if x_right > x_left && y_top > y_bottom {
            let rect = clamp_rect(x_left, y_bottom, x_right, y_top);
            labels.push(QuadrantLabel {
                quadrant: Quadrant::LowPriority,
                anchor: rect.center(),
                space: LabelSpace::Data,
                region: Some(rect),
            });
        }
    }

    // Possible Overkill: below the horizontal divider, right of the vertical
    {
        let x_left = x_cut + mx;
        let x_right = bounds.x_max - mx;
        let y_bottom = bounds.y_min + my;
        let y_top = y_cut - my;
        if x_right > x_left && y_top > y_bottom {
            let rect = clamp_rect(x_left, y_bottom, x_right, y_top);
            labels.push(QuadrantLabel {
                quadrant: Quadrant::PossibleOverkill,
                anchor: rect.center(),
                space: LabelSpace::Data,
                region: Some(rect),
            });
        }
    }

    labels
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: PlotBounds = PlotBounds {
        x_min: 0.0,
        x_max: 10.0,
        y_min: 0.0,
        y_max: 10.0,
    };

    #[test]
    fn test_bounds_around_points_with_pad() {
        let points = [Point::new(2.0, 3.0), Point::new(5.0, 4.0)];
        let bounds = PlotBounds::around(&points, 0.2).expect("has finite points");
        assert_eq!(bounds.x_min, 1.8);
        assert_eq!(bounds.x_max, 5.2);
        assert_eq!(bounds.y_min, 2.8);
        assert_eq!(bounds.y_max, 4.2);
    }

    #[test]
    fn test_bounds_skip_nan_points() {
        let points = [Point::new(f64::NAN, 3.0), Point::new(5.0, 4.0)];
        let bounds = PlotBounds::around(&points, 0.0).expect("one finite point");
        assert_eq!(bounds.x_min, 5.0);
        assert_eq!(bounds.x_max, 5.0);
    }

    #[test]
    fn test_bounds_none_when_all_nan() {
        let points = [Point::new(f64::NAN, f64::NAN)];
        assert!(PlotBounds::around(&points, 0.2).is_none());
    }

    #[test]
    fn test_orthogonal_lines_span_full_plot() {
        let geom = orthogonal(4.0, 6.0, BOUNDS);
        assert_eq!(geom.vertical.from, Point::new(4.0, 0.0));
        assert_eq!(geom.vertical.to, Point::new(4.0, 10.0));
        assert_eq!(geom.horizontal.from, Point::new(0.0, 6.0));
        assert_eq!(geom.horizontal.to, Point::new(10.0, 6.0));
        assert_eq!(geom.labels.len(), 4);
        assert!(geom
            .labels
            .iter()
            .all(|l| l.space == LabelSpace::AxesFraction));
    }

    #[test]
    fn test_diagonal_through_center_hits_corners() {
        let geom = diagonal_trimmed(5.0, 5.0, BOUNDS);
        assert_eq!(geom.diagonal.from, Point::new(0.0, 0.0));
        assert_eq!(geom.diagonal.to, Point::new(10.0, 10.0));
    }

    #[test]
    fn test_diagonal_offset_clips_to_edges() {
        // b = 3: y = x + 3 enters at (0,3) and leaves at (7,10)
        let geom = diagonal_trimmed(2.0, 5.0, BOUNDS);
        assert_eq!(geom.diagonal.from, Point::new(0.0, 3.0));
        assert_eq!(geom.diagonal.to, Point::new(7.0, 10.0));
    }

    #[test]
    fn test_trimmed_segments_stop_at_cutoffs() {
        let geom = diagonal_trimmed(4.0, 6.0, BOUNDS);
        assert_eq!(geom.vertical.from, Point::new(4.0, 0.0));
        assert_eq!(geom.vertical.to, Point::new(4.0, 6.0));
        assert_eq!(geom.horizontal.from, Point::new(4.0, 6.0));
        assert_eq!(geom.horizontal.to, Point::new(10.0, 6.0));
    }

    #[test]
    fn test_diagonal_labels_fit_inside_bounds() {
        let geom = diagonal_trimmed(5.0, 5.0, BOUNDS);
        for label in &geom.labels {
            if let Some(rect) = label.region {
                assert!(rect.x0 >= BOUNDS.x_min && rect.x1 <= BOUNDS.x_max);
                assert!(rect.y0 >= BOUNDS.y_min && rect.y1 <= BOUNDS.y_max);
                assert!(rect.x1 > rect.x0 && rect.y1 > rect.y0);
            }
        }
    }

    #[test]
    fn test_keep_up_label_falls_back_when_region_degenerates() {
        // Cutoff point close to the top-right corner: the wedge between the
        // diagonal and the horizontal divider collapses
        let geom = diagonal_trimmed(9.8, 9.8, BOUNDS);
        let keep_up = geom
            .labels
            .iter()
            .find(|l| l.quadrant == Quadrant::KeepUpTheGoodWork)
            .expect("keep-up label always present");
        assert_eq!(keep_up.space, LabelSpace::AxesFraction);
        assert!(keep_up.region.is_none());
    }

    #[test]
    fn test_degenerate_side_regions_are_dropped() {
        // Cutoffs at the far left: no room for the left-side labels
        let geom = diagonal_trimmed(0.1, 5.0, BOUNDS);
        assert!(!geom
            .labels
            .iter()
            .any(|l| l.quadrant == Quadrant::LowPriority));
        assert!(!geom
            .labels
            .iter()
            .any(|l| l.quadrant == Quadrant::ConcentrateHere));
    }
}
