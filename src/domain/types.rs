//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting
//! - exported to JSON alongside per-subject results
//! - reloaded later for plotting or comparisons

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FlmError;

/// Basis family used for the functional expansion.
///
/// All four values are accepted at construction; `ssa` and `wavelet` are
/// reserved and fail with [`FlmError::UnsupportedBasis`] when a fit is
/// attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BasisKind {
    /// Truncated discrete Fourier series (DC + cosine/sine harmonic pairs).
    Fourier,
    /// Univariate B-spline representation.
    Spline,
    /// Singular spectrum analysis (reserved, not implemented).
    Ssa,
    /// Wavelet expansion (reserved, not implemented).
    Wavelet,
}

impl BasisKind {
    /// Human-readable label for summaries and error messages.
    pub fn display_name(self) -> &'static str {
        match self {
            BasisKind::Fourier => "fourier",
            BasisKind::Spline => "spline",
            BasisKind::Ssa => "ssa",
            BasisKind::Wavelet => "wavelet",
        }
    }
}

impl std::fmt::Display for BasisKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// How the Gaussian kernel bandwidth (FWHM) is chosen for `smooth`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmoothMethod {
    /// Scott's rule: `n^(-1/5)` times the sample standard deviation.
    Scotts,
    /// Silverman's rule: `(3n/4)^(-1/5)` times the sample standard deviation.
    Silverman,
    /// Explicit FWHM, bypassing the standard-deviation computation.
    Fwhm(f64),
}

impl FromStr for SmoothMethod {
    type Err = FlmError;

    /// Parse `"scotts"`, `"silverman"`, or a numeric FWHM literal.
    fn from_str(s: &str) -> Result<Self, FlmError> {
        match s {
            "scotts" => Ok(SmoothMethod::Scotts),
            "silverman" => Ok(SmoothMethod::Silverman),
            other => other.parse::<f64>().map(SmoothMethod::Fwhm).map_err(|_| {
                FlmError::Configuration(format!(
                    "unrecognized smoothing method `{other}` \
                     (expected `scotts`, `silverman`, or a numeric FWHM)"
                ))
            }),
        }
    }
}

/// A fitted B-spline representation: knot vector, coefficients, degree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplineRep {
    pub knots: Vec<f64>,
    pub coefficients: Vec<f64>,
    pub degree: usize,
}

/// Fitted expansion parameters, by basis family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Coefficients {
    /// `[dc, cos_1, sin_1, ..., cos_k, sin_k]`.
    Fourier(Vec<f64>),
    Spline(SplineRep),
}

impl Coefficients {
    /// Number of scalar parameters in the expansion.
    pub fn len(&self) -> usize {
        match self {
            Coefficients::Fourier(beta) => beta.len(),
            Coefficients::Spline(rep) => rep.coefficients.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Diagnostics for a completed fit.
///
/// Returned by `fit` in place of a printed OLS summary, so callers decide
/// whether and how to surface it (log line, report row, nothing).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitSummary {
    pub basis: BasisKind,
    /// Cycle length the model was fitted on.
    pub n_samples: usize,
    /// Number of solved expansion parameters.
    pub n_coefficients: usize,
    /// Sum of squared residuals on the training grid.
    pub sse: f64,
    pub rmse: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smooth_method_parses_known_names() {
        assert_eq!("scotts".parse::<SmoothMethod>().unwrap(), SmoothMethod::Scotts);
        assert_eq!(
            "silverman".parse::<SmoothMethod>().unwrap(),
            SmoothMethod::Silverman
        );
    }

    #[test]
    fn smooth_method_parses_numeric_fwhm() {
        assert_eq!("5.0".parse::<SmoothMethod>().unwrap(), SmoothMethod::Fwhm(5.0));
    }

    #[test]
    fn smooth_method_rejects_bogus_input() {
        let err = "bogus".parse::<SmoothMethod>().unwrap_err();
        assert!(matches!(err, FlmError::Configuration(_)));
    }

    #[test]
    fn basis_kind_display_names() {
        assert_eq!(BasisKind::Fourier.to_string(), "fourier");
        assert_eq!(BasisKind::Wavelet.to_string(), "wavelet");
    }
}
