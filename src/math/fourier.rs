//! Sampled Fourier (harmonic) basis for one daily cycle.
//!
//! For a cycle of length `T` the basis holds `2*max_order + 1` vectors
//! sampled at `T` equally spaced points: a constant (DC) term, then a
//! cosine and a sine at angular frequency `n·2π/T` for each harmonic
//! `n = 1..=max_order`. Ordinary least squares against these columns is a
//! truncated discrete Fourier series fit of the periodic daily rhythm.

use std::f64::consts::PI;

use nalgebra::DMatrix;

/// Build the Fourier design matrix: `n_samples` rows, `2*max_order + 1`
/// columns, column order `[dc, cos_1, sin_1, ..., cos_k, sin_k]`.
///
/// Pure in `(n_samples, max_order)`; callers cache it per model.
pub fn fourier_design(n_samples: usize, max_order: usize) -> DMatrix<f64> {
    let omega = 2.0 * PI / n_samples as f64;
    let mut x = DMatrix::<f64>::zeros(n_samples, 2 * max_order + 1);

    for i in 0..n_samples {
        let t = i as f64;
        x[(i, 0)] = 1.0;
        for n in 1..=max_order {
            let phase = n as f64 * omega * t;
            x[(i, 2 * n - 1)] = phase.cos();
            x[(i, 2 * n)] = phase.sin();
        }
    }

    x
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn design_has_expected_shape() {
        let x = fourier_design(48, 2);
        assert_eq!(x.nrows(), 48);
        assert_eq!(x.ncols(), 5);
    }

    #[test]
    fn dc_column_is_all_ones() {
        let x = fourier_design(24, 3);
        for i in 0..24 {
            assert_eq!(x[(i, 0)], 1.0);
        }
    }

    #[test]
    fn harmonic_columns_are_orthogonal_on_the_sample_grid() {
        // On T equally spaced points over one full cycle the sampled
        // harmonics are exactly orthogonal, up to rounding.
        let x = fourier_design(48, 2);
        for a in 0..x.ncols() {
            for b in (a + 1)..x.ncols() {
                let dot: f64 = (0..x.nrows()).map(|i| x[(i, a)] * x[(i, b)]).sum();
                assert!(dot.abs() < 1e-9, "columns {a},{b} not orthogonal: {dot}");
            }
        }
    }

    #[test]
    fn zero_order_design_is_just_the_dc_term() {
        let x = fourier_design(10, 0);
        assert_eq!(x.ncols(), 1);
    }
}
