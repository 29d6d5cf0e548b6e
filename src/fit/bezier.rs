//! Triangular Bezier patches fitted to barycentric samples.
//!
//! A degree-`n` patch has `C(n) = (n+1)(n+2)/2` control points `P_ijk`
//! (`i + j + k = n`), enumerated with `i` outermost and `j` inner:
//! `(0,0,n), (0,1,n-1), …, (0,n,0), (1,0,n-1), …, (n,0,0)`. The basis function
//! of `P_ijk` is `n!/(i! j! k!) · s^i t^j u^k`.
//!
//! Degree 2 uses the closed basis `{u², 2tu, t², 2su, 2st, s²}` (same order)
//! and clamps its coefficients to `[0, 1]`; other degrees are left unclamped.
use super::lstsq::solve_least_squares;
use crate::sampling::{BarycentricCoord, Sample};
use log::warn;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

/// Highest patch degree the renderer binds buffers for.
pub const MAX_DEGREE: usize = 4;

/// What to do when a triangle has fewer samples than control points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnderdeterminedPolicy {
    /// Solve anyway and keep the minimum-norm solution.
    #[default]
    LeastNorm,
    /// Fit the highest degree the samples determine, then elevate it back to
    /// the requested degree.
    ReduceDegree,
}

/// Number of control points of a degree-`n` patch.
#[inline]
pub const fn control_point_count(n: usize) -> usize {
    (n + 1) * (n + 2) / 2
}

/// `(i, j, k)` of every control point in buffer order.
pub fn control_point_indices(n: usize) -> Vec<(usize, usize, usize)> {
    let mut out = Vec::with_capacity(control_point_count(n));
    for i in 0..=n {
        for j in 0..=n - i {
            out.push((i, j, n - i - j));
        }
    }
    out
}

/// Buffer position of control point `(i, j, n - i - j)`.
#[inline]
pub fn control_point_position(n: usize, i: usize, j: usize) -> usize {
    i * (n + 1) - i * i.saturating_sub(1) / 2 + j
}

fn factorial(n: usize) -> f64 {
    (1..=n).fold(1.0, |acc, v| acc * v as f64)
}

/// `n! / (i! j! k!)`.
pub fn multinomial(n: usize, i: usize, j: usize, k: usize) -> f64 {
    factorial(n) / (factorial(i) * factorial(j) * factorial(k))
}

/// Bernstein basis of degree `n` at `coord`, in buffer order.
pub fn basis(n: usize, coord: BarycentricCoord) -> Vec<f64> {
    let (s, t, u) = (coord.s as f64, coord.t as f64, coord.u as f64);
    if n == 2 {
        return quadratic_basis(s, t, u).to_vec();
    }
    control_point_indices(n)
        .into_iter()
        .map(|(i, j, k)| {
            multinomial(n, i, j, k) * s.powi(i as i32) * t.powi(j as i32) * u.powi(k as i32)
        })
        .collect()
}

#[inline]
fn quadratic_basis(s: f64, t: f64, u: f64) -> [f64; 6] {
    [u * u, 2.0 * t * u, t * t, 2.0 * s * u, 2.0 * s * t, s * s]
}

/// Value of a degree-`n` patch at `coord`.
pub fn evaluate(n: usize, coeffs: &[f32], coord: BarycentricCoord) -> f32 {
    basis(n, coord)
        .iter()
        .zip(coeffs)
        .map(|(b, &c)| b * c as f64)
        .sum::<f64>() as f32
}

fn design_matrix(n: usize, bary: &[BarycentricCoord]) -> DMatrix<f64> {
    let cols = control_point_count(n);
    let mut design = DMatrix::zeros(bary.len(), cols);
    for (r, coord) in bary.iter().enumerate() {
        for (c, v) in basis(n, *coord).into_iter().enumerate() {
            design[(r, c)] = v;
        }
    }
    design
}

/// Raise a patch (one column per channel) from degree `d` to `d + 1`.
fn elevate_degree(d: usize, coeffs: &DMatrix<f64>) -> DMatrix<f64> {
    let up = d + 1;
    let indices = control_point_indices(up);
    DMatrix::from_fn(indices.len(), coeffs.ncols(), |r, col| {
        let (i, j, k) = indices[r];
        let mut acc = 0.0;
        if i > 0 {
            acc += i as f64 * coeffs[(control_point_position(d, i - 1, j), col)];
        }
        if j > 0 {
            acc += j as f64 * coeffs[(control_point_position(d, i, j - 1), col)];
        }
        if k > 0 {
            acc += k as f64 * coeffs[(control_point_position(d, i, j), col)];
        }
        acc / up as f64
    })
}

/// Fit every column of `targets` at once. Rows of the result are control
/// points, columns follow `targets`.
fn fit_columns(
    n: usize,
    bary: &[BarycentricCoord],
    targets: &DMatrix<f64>,
    policy: UnderdeterminedPolicy,
) -> Option<DMatrix<f64>> {
    let count = bary.len();
    if count == 0 {
        return None;
    }
    let needed = control_point_count(n);
    let mut coeffs = if count >= needed {
        solve_least_squares(design_matrix(n, bary), targets)?
    } else {
        match policy {
            UnderdeterminedPolicy::LeastNorm => {
                warn!("degree {n} patch underdetermined ({count} samples < {needed}), using least-norm fit");
                solve_least_squares(design_matrix(n, bary), targets)?
            }
            UnderdeterminedPolicy::ReduceDegree => {
                let m = (0..n)
                    .rev()
                    .find(|&m| control_point_count(m) <= count)
                    .unwrap_or(0);
                warn!("degree {n} patch underdetermined ({count} samples < {needed}), fitting degree {m}");
                let mut reduced = solve_least_squares(design_matrix(m, bary), targets)?;
                for d in m..n {
                    reduced = elevate_degree(d, &reduced);
                }
                reduced
            }
        }
    };
    if n == 2 {
        coeffs.apply(|v| *v = v.clamp(0.0, 1.0));
    }
    Some(coeffs)
}

fn column(coeffs: &DMatrix<f64>, c: usize) -> Vec<f32> {
    coeffs.column(c).iter().map(|&v| v as f32).collect()
}

/// Fit one color channel (`0..3`) of a degree-`n` patch.
///
/// Targets are `color[channel] / 255`, unweighted. Returns `None` when there
/// are no samples, the channel is out of range, or the solve fails.
pub fn fit_bezier_triangle(
    n: usize,
    channel: usize,
    samples: &[Sample],
    bary: &[BarycentricCoord],
    policy: UnderdeterminedPolicy,
) -> Option<Vec<f32>> {
    if channel >= 3 || samples.len() != bary.len() {
        return None;
    }
    let targets = DMatrix::from_fn(samples.len(), 1, |r, _| {
        samples[r].color[channel] as f64 / 255.0
    });
    let coeffs = fit_columns(n, bary, &targets, policy)?;
    Some(column(&coeffs, 0))
}

/// Fit all three channels with a single factorization of the design matrix.
pub fn fit_bezier_rgb(
    n: usize,
    samples: &[Sample],
    bary: &[BarycentricCoord],
    policy: UnderdeterminedPolicy,
) -> Option<[Vec<f32>; 3]> {
    if samples.len() != bary.len() {
        return None;
    }
    let targets = DMatrix::from_fn(samples.len(), 3, |r, c| samples[r].color[c] as f64 / 255.0);
    let coeffs = fit_columns(n, bary, &targets, policy)?;
    Some([column(&coeffs, 0), column(&coeffs, 1), column(&coeffs, 2)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{CellBox, TriangleSlot};
    use crate::image::{ImageF32, RgbImage};
    use crate::sampling::{sample_triangle, to_barycentric, SourceMaps};

    fn square(n: usize) -> CellBox {
        CellBox {
            x: 0.0,
            y: 0.0,
            w: n as f32,
            h: n as f32,
        }
    }

    #[test]
    fn enumeration_order_and_positions_agree() {
        for n in 0..=MAX_DEGREE {
            let idx = control_point_indices(n);
            assert_eq!(idx.len(), control_point_count(n));
            for (pos, &(i, j, k)) in idx.iter().enumerate() {
                assert_eq!(i + j + k, n);
                assert_eq!(control_point_position(n, i, j), pos);
            }
        }
        assert_eq!(
            control_point_indices(2),
            vec![(0, 0, 2), (0, 1, 1), (0, 2, 0), (1, 0, 1), (1, 1, 0), (2, 0, 0)]
        );
    }

    #[test]
    fn basis_is_partition_of_unity() {
        let coord = BarycentricCoord {
            s: 0.2,
            t: 0.3,
            u: 0.5,
        };
        for n in 0..=MAX_DEGREE {
            let sum: f64 = basis(n, coord).iter().sum();
            assert!((sum - 1.0).abs() < 1e-6, "degree {n}: {sum}");
        }
    }

    #[test]
    fn quadratic_closed_basis_matches_multinomial() {
        let coord = BarycentricCoord {
            s: 0.1,
            t: 0.6,
            u: 0.3,
        };
        let closed = basis(2, coord);
        let (s, t, u) = (coord.s as f64, coord.t as f64, coord.u as f64);
        for (pos, (i, j, k)) in control_point_indices(2).into_iter().enumerate() {
            let general =
                multinomial(2, i, j, k) * s.powi(i as i32) * t.powi(j as i32) * u.powi(k as i32);
            assert!((closed[pos] - general).abs() < 1e-12);
        }
    }

    #[test]
    fn uniform_color_is_reproduced_at_every_degree() {
        let img = RgbImage::uniform(12, 12, [51, 102, 204]);
        let sal = ImageF32::new(12, 12);
        let maps = SourceMaps::new(&img, &sal);
        for slot in TriangleSlot::BOTH {
            let samples = sample_triangle(&maps, &square(12), slot);
            let bary = to_barycentric(&samples, slot);
            for n in 1..=MAX_DEGREE {
                let rgb = fit_bezier_rgb(n, &samples, &bary, UnderdeterminedPolicy::LeastNorm).unwrap();
                for (c, expected) in [0.2f32, 0.4, 0.8].into_iter().enumerate() {
                    for v in &rgb[c] {
                        assert!((v - expected).abs() < 1e-4, "degree {n} channel {c}: {v}");
                    }
                }
            }
        }
    }

    #[test]
    fn linear_ramp_recovers_corner_colors() {
        // Red grows with x: 0 at the left edge, ~200 at the right edge.
        let img = RgbImage::from_fn(32, 32, |x, _| {
            let r = (200.0 * (x as f32 + 0.5) / 32.0).round() as u8;
            [r, 0, 100]
        });
        let sal = ImageF32::new(32, 32);
        let maps = SourceMaps::new(&img, &sal);
        let samples = sample_triangle(&maps, &square(32), TriangleSlot::Lower);
        let bary = to_barycentric(&samples, TriangleSlot::Lower);
        let red = fit_bezier_triangle(1, 0, &samples, &bary, UnderdeterminedPolicy::LeastNorm).unwrap();
        // Buffer order for degree 1: P001 (u corner), P010 (t corner), P100 (s corner).
        let expected = [0.0, 200.0 / 255.0, 0.0];
        for (v, e) in red.iter().zip(expected) {
            assert!((v - e).abs() < 0.01, "{v} vs {e}");
        }
        let blue = fit_bezier_triangle(1, 2, &samples, &bary, UnderdeterminedPolicy::LeastNorm).unwrap();
        for v in blue {
            assert!((v - 100.0 / 255.0).abs() < 1e-4);
        }
    }

    #[test]
    fn quadratic_coefficients_are_clamped() {
        let img = RgbImage::from_fn(16, 16, |x, _| if x < 8 { [0, 0, 0] } else { [255, 255, 255] });
        let sal = ImageF32::new(16, 16);
        let maps = SourceMaps::new(&img, &sal);
        let samples = sample_triangle(&maps, &square(16), TriangleSlot::Lower);
        let bary = to_barycentric(&samples, TriangleSlot::Lower);
        let rgb = fit_bezier_rgb(2, &samples, &bary, UnderdeterminedPolicy::LeastNorm).unwrap();
        for channel in &rgb {
            assert_eq!(channel.len(), 6);
            assert!(channel.iter().all(|v| (0.0..=1.0).contains(v)));
        }
    }

    #[test]
    fn elevation_preserves_the_surface() {
        let coeffs = DMatrix::from_column_slice(3, 1, &[0.1, 0.7, 0.4]);
        let elevated = elevate_degree(1, &coeffs);
        assert_eq!(elevated.nrows(), 6);
        let low: Vec<f32> = coeffs.iter().map(|&v| v as f32).collect();
        let high: Vec<f32> = elevated.iter().map(|&v| v as f32).collect();
        for coord in [
            BarycentricCoord { s: 1.0, t: 0.0, u: 0.0 },
            BarycentricCoord { s: 0.2, t: 0.5, u: 0.3 },
            BarycentricCoord { s: 0.0, t: 0.25, u: 0.75 },
        ] {
            assert!((evaluate(1, &low, coord) - evaluate(2, &high, coord)).abs() < 1e-6);
        }
    }

    #[test]
    fn reduce_degree_policy_falls_back_to_lower_order() {
        let samples: Vec<Sample> = [[0.2f32, 0.2], [0.6, 0.1], [0.1, 0.5], [0.3, 0.3]]
            .iter()
            .map(|&[x, y]| Sample {
                color: [255.0 * x, 0.0, 0.0],
                saliency: 1.0,
                x,
                y,
            })
            .collect();
        let bary = to_barycentric(&samples, TriangleSlot::Lower);
        let coeffs =
            fit_bezier_triangle(4, 0, &samples, &bary, UnderdeterminedPolicy::ReduceDegree).unwrap();
        assert_eq!(coeffs.len(), control_point_count(4));
        // Four samples determine a linear patch, which matches red = x exactly.
        for s in &samples {
            let coord = BarycentricCoord::from_local(TriangleSlot::Lower, s.x, s.y);
            assert!((evaluate(4, &coeffs, coord) - s.x).abs() < 1e-4);
        }
        let least_norm =
            fit_bezier_triangle(4, 0, &samples, &bary, UnderdeterminedPolicy::LeastNorm).unwrap();
        assert!(least_norm.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn no_samples_gives_none() {
        assert!(fit_bezier_rgb(3, &[], &[], UnderdeterminedPolicy::LeastNorm).is_none());
        assert!(fit_bezier_triangle(1, 3, &[], &[], UnderdeterminedPolicy::LeastNorm).is_none());
    }
}
