//! Least squares solver.
//!
//! The trend estimator solves tiny regression problems of the form:
//!
//! ```text
//! minimize Σ (y_i - x_i^T β)^2
//! ```
//!
//! Implementation choices:
//! - We solve through SVD so tall design matrices (many samples, two columns)
//!   are handled without forming the normal equations.
//!   (Nalgebra's `QR::solve` is intended for square systems and will panic for
//!   non-square matrices.)
//! - A rank-deficient design (e.g. every sample at the same instant) has no
//!   unique solution; callers should reject it before solving.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    if x.nrows() != y.len() || x.nrows() < x.ncols() {
        return None;
    }

    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails.
    for &tol in &[1e-12, 1e-10, 1e-8] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Fit `y = intercept + slope * x` and return `(intercept, slope)`.
///
/// Requires at least two points and a non-zero spread in `x`.
pub fn fit_line(points: &[(f64, f64)]) -> Option<(f64, f64)> {
    if points.len() < 2 {
        return None;
    }
    if points.iter().any(|(x, y)| !(x.is_finite() && y.is_finite())) {
        return None;
    }

    let (x_min, x_max) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (x, _)| (lo.min(*x), hi.max(*x)));
    if !(x_max - x_min > 0.0) {
        return None;
    }

    let mut design = DMatrix::<f64>::zeros(points.len(), 2);
    let mut y = DVector::<f64>::zeros(points.len());
    for (row, (xi, yi)) in points.iter().enumerate() {
        design[(row, 0)] = 1.0;
        design[(row, 1)] = *xi;
        y[row] = *yi;
    }

    let beta = solve_least_squares(&design, &y)?;
    Some((beta[0], beta[1]))
}
