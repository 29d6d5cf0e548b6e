//! Edge-split constant colors.
//!
//! A triangle crossed by a detected image edge is cut in two by a curve fitted
//! through its edge pixels; each side gets its own (saliency-weighted) mean
//! color. The renderer receives the curve as three floats:
//!
//! | boundary   | params           |
//! |------------|------------------|
//! | unsplit    | `(0, 0, 0)`      |
//! | line       | `(c0, c1, 0)`    |
//! | vertical   | `(x, 0, 1)`      |
//! | parabola   | `(c0, c1, c2)`   |
//!
//! Side A holds the samples on or below the curve (`curve(x) >= y`), side B
//! the samples on or above it.
use super::average::{weighted_mean, Color};
use super::lstsq::{fit_line, fit_polynomial};
use crate::grid::{CellBox, TriangleSlot};
use crate::sampling::SourceMaps;
use log::debug;

/// Edge points a triangle needs before the quadratic split is attempted.
///
/// Fixed on purpose and independent of the caller's `min_edge_points`, which
/// only gates the linear split.
pub const QUADRATIC_MIN_EDGE_POINTS: usize = 10;

/// Curve separating the two colors of a split triangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SplitBoundary {
    /// Too few edge points: one color for the whole triangle.
    Unsplit,
    /// `y = c0 + c1·x`.
    Line { c0: f64, c1: f64 },
    /// `x = x`, used when the line fit degenerates.
    Vertical { x: f64 },
    /// `y = c0 + c1·x + c2·x²`.
    Parabola { c0: f64, c1: f64, c2: f64 },
}

impl SplitBoundary {
    /// Parameters in the renderer's three-float encoding.
    pub fn params(&self) -> [f32; 3] {
        match *self {
            SplitBoundary::Unsplit => [0.0, 0.0, 0.0],
            SplitBoundary::Line { c0, c1 } => [c0 as f32, c1 as f32, 0.0],
            SplitBoundary::Vertical { x } => [x as f32, 0.0, 1.0],
            SplitBoundary::Parabola { c0, c1, c2 } => [c0 as f32, c1 as f32, c2 as f32],
        }
    }

    /// Decode renderer parameters. The encoding is only unambiguous per mode,
    /// so the caller says whether they came from the quadratic split.
    ///
    /// `(0, 0, 0)` always decodes as [`SplitBoundary::Unsplit`], so a fitted
    /// line or parabola that is exactly `y = 0` renders as one color. The
    /// renderer reads the same triple the same way.
    pub fn from_params(params: [f32; 3], quadratic: bool) -> Self {
        let [p0, p1, p2] = params.map(|v| v as f64);
        if params == [0.0; 3] {
            SplitBoundary::Unsplit
        } else if quadratic {
            SplitBoundary::Parabola {
                c0: p0,
                c1: p1,
                c2: p2,
            }
        } else if p2 == 1.0 {
            SplitBoundary::Vertical { x: p0 }
        } else {
            SplitBoundary::Line { c0: p0, c1: p1 }
        }
    }

    /// Whether `(x, y)` lies on side A (inclusive).
    pub fn on_side_a(&self, x: f32, y: f32) -> bool {
        let (x, y) = (x as f64, y as f64);
        match *self {
            SplitBoundary::Unsplit => true,
            SplitBoundary::Line { c0, c1 } => c0 + c1 * x >= y,
            SplitBoundary::Vertical { x: line } => x <= line,
            SplitBoundary::Parabola { c0, c1, c2 } => c0 + c1 * x + c2 * x * x >= y,
        }
    }

    /// Whether `(x, y)` lies on side B (inclusive).
    pub fn on_side_b(&self, x: f32, y: f32) -> bool {
        let (x, y) = (x as f64, y as f64);
        match *self {
            SplitBoundary::Unsplit => true,
            SplitBoundary::Line { c0, c1 } => c0 + c1 * x <= y,
            SplitBoundary::Vertical { x: line } => x >= line,
            SplitBoundary::Parabola { c0, c1, c2 } => c0 + c1 * x + c2 * x * x <= y,
        }
    }
}

/// Two colors and the curve between them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SplitFit {
    pub color_a: Color,
    pub color_b: Color,
    pub boundary: SplitBoundary,
}

impl SplitFit {
    /// Same color on both sides, boundary params zeroed.
    pub fn constant(color: Color) -> Self {
        Self {
            color_a: color,
            color_b: color,
            boundary: SplitBoundary::Unsplit,
        }
    }
}

/// Split the `slot` triangle of `cell` along a least-squares line through its
/// edge points.
///
/// Returns `None` only when the triangle has no samples at all.
pub fn fit_linear_split(
    maps: &SourceMaps<'_>,
    cell: &CellBox,
    slot: TriangleSlot,
    edge_points: &[[f32; 2]],
    min_points: usize,
    use_saliency: bool,
) -> Option<SplitFit> {
    if edge_points.is_empty() || edge_points.len() < min_points {
        return triangle_mean(maps, cell, slot, use_saliency).map(SplitFit::constant);
    }
    let (c0, c1) = fit_line(edge_points);
    let boundary = if c0.is_nan() || c1.is_nan() {
        SplitBoundary::Vertical {
            x: edge_points[0][0] as f64,
        }
    } else {
        SplitBoundary::Line { c0, c1 }
    };
    split_colors(maps, cell, slot, boundary, use_saliency)
}

/// Split the `slot` triangle of `cell` along a least-squares parabola through
/// its edge points, once it has at least [`QUADRATIC_MIN_EDGE_POINTS`].
pub fn fit_quadratic_split(
    maps: &SourceMaps<'_>,
    cell: &CellBox,
    slot: TriangleSlot,
    edge_points: &[[f32; 2]],
    use_saliency: bool,
) -> Option<SplitFit> {
    if edge_points.len() < QUADRATIC_MIN_EDGE_POINTS {
        return triangle_mean(maps, cell, slot, use_saliency).map(SplitFit::constant);
    }
    let Some(c) = fit_polynomial(edge_points, 2) else {
        debug!(
            "quadratic split: fit failed on {} edge points, keeping one color",
            edge_points.len()
        );
        return triangle_mean(maps, cell, slot, use_saliency).map(SplitFit::constant);
    };
    let boundary = SplitBoundary::Parabola {
        c0: c[0],
        c1: c[1],
        c2: c[2],
    };
    split_colors(maps, cell, slot, boundary, use_saliency)
}

fn triangle_mean(
    maps: &SourceMaps<'_>,
    cell: &CellBox,
    slot: TriangleSlot,
    use_saliency: bool,
) -> Option<Color> {
    let samples = maps.sample_where(cell, |x, y| slot.contains(x, y));
    weighted_mean(&samples, use_saliency)
}

fn split_colors(
    maps: &SourceMaps<'_>,
    cell: &CellBox,
    slot: TriangleSlot,
    boundary: SplitBoundary,
    use_saliency: bool,
) -> Option<SplitFit> {
    let side_a = maps.sample_where(cell, |x, y| slot.contains(x, y) && boundary.on_side_a(x, y));
    let side_b = maps.sample_where(cell, |x, y| slot.contains(x, y) && boundary.on_side_b(x, y));
    let mean_a = weighted_mean(&side_a, use_saliency);
    let mean_b = weighted_mean(&side_b, use_saliency);
    // An empty side takes the other side's color, collapsing to one color.
    let (color_a, color_b) = match (mean_a, mean_b) {
        (Some(a), Some(b)) => (a, b),
        (Some(a), None) => (a, a),
        (None, Some(b)) => (b, b),
        (None, None) => return None,
    };
    Some(SplitFit {
        color_a,
        color_b,
        boundary,
    })
}
