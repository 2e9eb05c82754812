//! Kernel bandwidth rules and 1-D Gaussian smoothing of a daily cycle.
//!
//! Scott's and Silverman's rules are defined in terms of the sample
//! standard deviation; the smoother is parameterized by FWHM. For a
//! Gaussian, `FWHM = σ·√(8 ln 2)`, so the rule-based bandwidths are
//! multiplied by that factor before smoothing.

use std::f64::consts::LN_2;

/// Conversion factor between a Gaussian standard deviation and its FWHM.
pub fn sd_to_fwhm() -> f64 {
    (8.0 * LN_2).sqrt()
}

/// Scott's rule factor for a 1-D sample of size `n`: `n^(-1/5)`.
pub fn scotts_factor(n: usize) -> f64 {
    (n as f64).powf(-0.2)
}

/// Silverman's rule factor for a 1-D sample of size `n`: `(3n/4)^(-1/5)`.
pub fn silverman_factor(n: usize) -> f64 {
    (n as f64 * 0.75).powf(-0.2)
}

/// Sample standard deviation with `ddof = 1` (divides by `n - 1`).
///
/// Returns `0.0` for fewer than two samples.
pub fn sample_std(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let ss: f64 = values
        .iter()
        .map(|v| {
            let d = v - mean;
            d * d
        })
        .sum();
    (ss / (n - 1) as f64).sqrt()
}

/// 1-D Gaussian kernel smoothing with periodic (wrap) boundary handling.
///
/// The daily cycle is periodic, so the kernel wraps around the ends
/// instead of reflecting or padding. The kernel radius is `⌊4σ + 0.5⌋`,
/// the common `gaussian_filter1d` truncation, and the output has the same
/// length as the input.
pub fn gaussian_smooth(values: &[f64], fwhm: f64) -> Vec<f64> {
    let n = values.len() as isize;
    let sigma = fwhm / sd_to_fwhm();
    if n == 0 || !(sigma > 0.0) {
        return values.to_vec();
    }

    let radius = (4.0 * sigma + 0.5) as isize;
    let radius = radius.max(1);

    let mut weights = Vec::with_capacity(2 * radius as usize + 1);
    for j in -radius..=radius {
        let u = j as f64 / sigma;
        weights.push((-0.5 * u * u).exp());
    }
    let norm: f64 = weights.iter().sum();

    (0..n)
        .map(|i| {
            let mut acc = 0.0;
            for (k, w) in weights.iter().enumerate() {
                let idx = (i + k as isize - radius).rem_euclid(n) as usize;
                acc += w * values[idx];
            }
            acc / norm
        })
        .collect()
}
