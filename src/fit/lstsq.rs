//! Least-squares primitives shared by the split and Bezier fits.
//!
//! Everything is solved in `f64`. Rank-deficient systems go through a
//! truncated SVD, which yields the minimum-norm solution instead of failing.
use log::warn;
use nalgebra::DMatrix;

/// Relative cut-off below which singular values are treated as zero.
const RANK_RTOL: f64 = 1e-10;

/// Ordinary least-squares line `y = c0 + c1·x`.
///
/// When every `x` is identical the slope is `0/0` and both coefficients come
/// back as NaN; callers use that to detect a vertical edge.
pub fn fit_line(points: &[[f32; 2]]) -> (f64, f64) {
    let n = points.len() as f64;
    let (mut mean_x, mut mean_y) = (0.0f64, 0.0f64);
    for p in points {
        mean_x += p[0] as f64;
        mean_y += p[1] as f64;
    }
    mean_x /= n;
    mean_y /= n;

    let (mut ss_xx, mut ss_xy) = (0.0f64, 0.0f64);
    for p in points {
        let dx = p[0] as f64 - mean_x;
        let dy = p[1] as f64 - mean_y;
        ss_xx += dx * dx;
        ss_xy += dx * dy;
    }
    let c1 = ss_xy / ss_xx;
    let c0 = mean_y - c1 * mean_x;
    (c0, c1)
}

/// Ordinary least-squares polynomial `y = Σ c_k x^k` for `k = 0..=degree`.
pub fn fit_polynomial(points: &[[f32; 2]], degree: usize) -> Option<Vec<f64>> {
    let cols = degree + 1;
    let design =
        DMatrix::from_fn(points.len(), cols, |r, c| (points[r][0] as f64).powi(c as i32));
    let target = DMatrix::from_iterator(points.len(), 1, points.iter().map(|p| p[1] as f64));
    let coeffs = solve_least_squares(design, &target)?;
    Some(coeffs.column(0).iter().copied().collect())
}

/// Solve `design · X ≈ targets` column by column in the least-squares sense.
///
/// Works for tall and wide systems alike; underdetermined or rank-deficient
/// inputs get the minimum-norm solution. Returns `None` when the SVD cannot
/// be computed or the result is not finite.
pub fn solve_least_squares(design: DMatrix<f64>, targets: &DMatrix<f64>) -> Option<DMatrix<f64>> {
    if design.nrows() == 0 || design.ncols() == 0 {
        return None;
    }
    let svd = design.svd(true, true);
    let max_sv = svd.singular_values.iter().copied().fold(0.0f64, f64::max);
    if !max_sv.is_finite() || max_sv <= 0.0 {
        return None;
    }
    match svd.solve(targets, max_sv * RANK_RTOL) {
        Ok(solution) if solution.iter().all(|v| v.is_finite()) => Some(solution),
        Ok(_) => {
            warn!("least-squares solve produced non-finite coefficients");
            None
        }
        Err(err) => {
            warn!("least-squares solve failed: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_through_exact_points() {
        let pts = [[0.0, 1.0], [1.0, 3.0], [2.0, 5.0]];
        let (c0, c1) = fit_line(&pts);
        assert!((c0 - 1.0).abs() < 1e-9);
        assert!((c1 - 2.0).abs() < 1e-9);
    }

    #[test]
    fn vertical_points_give_nan() {
        let pts = [[0.5, 0.1], [0.5, 0.4], [0.5, 0.9]];
        let (c0, c1) = fit_line(&pts);
        assert!(c0.is_nan() && c1.is_nan());
    }

    #[test]
    fn quadratic_recovered_from_samples() {
        let pts: Vec<[f32; 2]> = (0..12)
            .map(|i| {
                let x = i as f32 / 11.0;
                [x, 0.2 - 0.5 * x + 1.5 * x * x]
            })
            .collect();
        let c = fit_polynomial(&pts, 2).unwrap();
        assert!((c[0] - 0.2).abs() < 1e-5);
        assert!((c[1] + 0.5).abs() < 1e-5);
        assert!((c[2] - 1.5).abs() < 1e-5);
    }

    #[test]
    fn underdetermined_system_takes_min_norm() {
        // One equation, two unknowns: x0 + x1 = 2 -> min-norm (1, 1).
        let design = DMatrix::from_row_slice(1, 2, &[1.0, 1.0]);
        let target = DMatrix::from_row_slice(1, 1, &[2.0]);
        let sol = solve_least_squares(design, &target).unwrap();
        assert!((sol[(0, 0)] - 1.0).abs() < 1e-9);
        assert!((sol[(1, 0)] - 1.0).abs() < 1e-9);
    }
}
