//! B-spline basis construction and evaluation (Cox–de Boor).
//!
//! The spline fit uses a clamped knot vector with uniformly spaced interior
//! knots over `[0, span]`: `degree + 1` coincident knots at each end so the
//! spline interpolates the boundary region cleanly, and enough interior
//! knots for the requested number of basis functions.
//!
//! Numerical notes:
//! - Zero-length knot intervals (the clamped ends) are skipped in the
//!   recursion by treating `0/0` terms as `0`.
//! - `t = span` falls in the closed last nonempty interval so the right
//!   boundary is representable.

use nalgebra::DMatrix;

use crate::domain::SplineRep;

/// Clamped knot vector for `nbasis` basis functions of the given degree
/// over `[0, span]`.
///
/// Requires `nbasis >= degree + 1`; the vector has `nbasis + degree + 1`
/// entries with `nbasis - degree - 1` uniform interior knots.
pub fn clamped_knots(span: f64, degree: usize, nbasis: usize) -> Vec<f64> {
    let n_interior = nbasis - degree - 1;
    let mut knots = Vec::with_capacity(nbasis + degree + 1);

    for _ in 0..=degree {
        knots.push(0.0);
    }
    for i in 1..=n_interior {
        knots.push(span * i as f64 / (n_interior + 1) as f64);
    }
    for _ in 0..=degree {
        knots.push(span);
    }

    knots
}

/// Evaluate all `nbasis` basis functions of `degree` at `t`.
///
/// `t` outside `[knots[0], knots[last]]` is clamped to the domain.
pub fn basis_row(knots: &[f64], degree: usize, nbasis: usize, t: f64) -> Vec<f64> {
    let m = knots.len() - 1;
    let span = knots[m];
    let t = t.clamp(knots[0], span);

    // Degree-0 indicators over half-open intervals; the last nonempty
    // interval is closed so `t = span` lands somewhere.
    let mut b = vec![0.0; m];
    if t >= span {
        for j in (0..m).rev() {
            if knots[j] < knots[j + 1] {
                b[j] = 1.0;
                break;
            }
        }
    } else {
        for j in 0..m {
            if knots[j] <= t && t < knots[j + 1] {
                b[j] = 1.0;
                break;
            }
        }
    }

    // Cox–de Boor recursion, in place. At step `j` only `b[j]` and
    // `b[j + 1]` of the previous degree are read, so ascending order is safe.
    for d in 1..=degree {
        for j in 0..(m - d) {
            let d1 = knots[j + d] - knots[j];
            let d2 = knots[j + d + 1] - knots[j + 1];
            let left = if d1 > 0.0 {
                (t - knots[j]) / d1 * b[j]
            } else {
                0.0
            };
            let right = if d2 > 0.0 {
                (knots[j + d + 1] - t) / d2 * b[j + 1]
            } else {
                0.0
            };
            b[j] = left + right;
        }
    }

    b.truncate(nbasis);
    b
}

/// Design matrix of the spline basis at the given sample points.
pub fn bspline_design(knots: &[f64], degree: usize, nbasis: usize, ts: &[f64]) -> DMatrix<f64> {
    let mut x = DMatrix::<f64>::zeros(ts.len(), nbasis);
    for (i, &t) in ts.iter().enumerate() {
        let row = basis_row(knots, degree, nbasis, t);
        for (j, &v) in row.iter().enumerate() {
            x[(i, j)] = v;
        }
    }
    x
}

/// Evaluate a fitted spline representation at `t`.
pub fn bspline_eval(rep: &SplineRep, t: f64) -> f64 {
    let row = basis_row(&rep.knots, rep.degree, rep.coefficients.len(), t);
    row.iter()
        .zip(rep.coefficients.iter())
        .map(|(b, c)| b * c)
        .sum()
}
