//! Per-triangle color models.
//!
//! - [`average`]: (saliency-)weighted mean, centre pixel and vertex colors.
//! - [`split`]: two constant colors separated by a line or parabola fitted
//!   through the triangle's edge pixels.
//! - [`bezier`]: triangular Bezier patches of degree 1–4 fitted by least
//!   squares in barycentric coordinates.
//! - [`lstsq`]: the shared `f64` least-squares solvers.
//!
//! None of these fail: degenerate inputs yield `None` and the caller picks a
//! fallback color.

pub mod average;
pub mod bezier;
pub mod lstsq;
pub mod split;

pub use average::{center_color, vertex_color_len, vertex_colors, weighted_mean, Color};
pub use bezier::{
    control_point_count, control_point_indices, evaluate, fit_bezier_rgb, fit_bezier_triangle,
    UnderdeterminedPolicy, MAX_DEGREE,
};
pub use split::{
    fit_linear_split, fit_quadratic_split, SplitBoundary, SplitFit, QUADRATIC_MIN_EDGE_POINTS,
};
