//! Functional linear model over one averaged daily activity cycle.
//!
//! A model is configured once (basis kind, sampling frequency, optional
//! order), then fitted against any number of daily profiles. Each fit
//! overwrites the previous coefficients; the model carries no cross-series
//! history. `smooth` is an independent path that never touches the fitted
//! coefficients.

use chrono::Duration;
use nalgebra::{DMatrix, DVector};
use tracing::debug;

use crate::domain::{BasisKind, Coefficients, FitSummary, SmoothMethod, SplineRep};
use crate::error::FlmError;
use crate::math::{
    bspline_design, bspline_eval, clamped_knots, fourier_design, gaussian_smooth, sample_std,
    scotts_factor, sd_to_fwhm, silverman_factor, solve_least_squares,
};
use crate::series::ActivitySource;

/// Spline degree used when `max_order` is unset.
const DEFAULT_SPLINE_DEGREE: usize = 3;

/// Cached Fourier design matrix, keyed by the `(n_samples, max_order)` it
/// was built for. A fit whose key differs rebuilds it, so refitting a
/// series with a different cycle length can never serve a stale basis.
#[derive(Debug, Clone)]
struct FourierCache {
    key: (usize, usize),
    design: DMatrix<f64>,
}

/// A functional linear model of a daily activity rhythm.
#[derive(Debug, Clone)]
pub struct FunctionalModel {
    basis: BasisKind,
    sampling_freq: Duration,
    /// Harmonic pair count for Fourier; polynomial degree for spline.
    max_order: Option<usize>,
    /// Cycle length of the last successful fit.
    n_samples: Option<usize>,
    cache: Option<FourierCache>,
    coefficients: Option<Coefficients>,
}

impl FunctionalModel {
    /// Configure a model. No basis functions are built here; construction
    /// only stores configuration.
    pub fn new(basis: BasisKind, sampling_freq: Duration, max_order: Option<usize>) -> Self {
        Self {
            basis,
            sampling_freq,
            max_order,
            n_samples: None,
            cache: None,
            coefficients: None,
        }
    }

    pub fn basis(&self) -> BasisKind {
        self.basis
    }

    pub fn sampling_freq(&self) -> Duration {
        self.sampling_freq
    }

    pub fn max_order(&self) -> Option<usize> {
        self.max_order
    }

    /// Cycle length of the last fit, or `None` before any fit.
    pub fn n_samples(&self) -> Option<usize> {
        self.n_samples
    }

    /// Fitted expansion parameters, or `None` before any successful fit.
    pub fn coefficients(&self) -> Option<&Coefficients> {
        self.coefficients.as_ref()
    }

    /// Fit the basis expansion to the source's averaged daily cycle.
    ///
    /// Overwrites any previous fit. Returns diagnostics instead of
    /// printing them; callers decide how to surface the summary.
    pub fn fit<S: ActivitySource + ?Sized>(
        &mut self,
        source: &S,
        binarize: bool,
    ) -> Result<FitSummary, FlmError> {
        let daily_avg = source.average_daily_activity(binarize, self.sampling_freq)?;
        if daily_avg.is_empty() {
            return Err(FlmError::Data(format!(
                "daily activity series for `{}` is empty",
                source.display_name()
            )));
        }

        match self.basis {
            BasisKind::Fourier => self.fit_fourier(&daily_avg),
            BasisKind::Spline => self.fit_spline(&daily_avg),
            other => Err(FlmError::UnsupportedBasis(other)),
        }
    }

    fn fit_fourier(&mut self, daily_avg: &[f64]) -> Result<FitSummary, FlmError> {
        let order = self.max_order.ok_or_else(|| {
            FlmError::Configuration(
                "`max_order` (harmonic count) must be set before fitting a fourier model".into(),
            )
        })?;

        let n = daily_avg.len();
        let n_coefficients = 2 * order + 1;
        if n < n_coefficients {
            return Err(FlmError::Data(format!(
                "series of length {n} cannot support {order} harmonics \
                 ({n_coefficients} coefficients)"
            )));
        }

        let (beta, sse) = {
            let x = self.fourier_design_for(n, order);
            let y = DVector::from_column_slice(daily_avg);
            let solved = solve_least_squares(x, &y).ok_or_else(|| {
                FlmError::Data("fourier design matrix is too ill-conditioned to solve".into())
            })?;
            let residuals = &y - x * &solved;
            (
                solved.iter().copied().collect::<Vec<f64>>(),
                residuals.norm_squared(),
            )
        };

        self.n_samples = Some(n);
        self.coefficients = Some(Coefficients::Fourier(beta));

        let rmse = (sse / n as f64).sqrt();
        debug!(n_samples = n, order, sse, rmse, "fourier fit complete");
        Ok(FitSummary {
            basis: self.basis,
            n_samples: n,
            n_coefficients,
            sse,
            rmse,
        })
    }

    fn fit_spline(&mut self, daily_avg: &[f64]) -> Result<FitSummary, FlmError> {
        let degree = self.max_order.unwrap_or(DEFAULT_SPLINE_DEGREE);
        let n = daily_avg.len();
        if n < degree + 1 {
            return Err(FlmError::Data(format!(
                "series of length {n} is too short for a degree-{degree} spline"
            )));
        }

        // Collocation: one basis function per sample, over [0, n). With a
        // square design the fitted spline interpolates the daily profile
        // up to solver tolerance.
        let span = n as f64;
        let nbasis = n;
        let knots = clamped_knots(span, degree, nbasis);
        let ts: Vec<f64> = (0..n).map(|i| i as f64).collect();

        let x = bspline_design(&knots, degree, nbasis, &ts);
        let y = DVector::from_column_slice(daily_avg);
        let beta = solve_least_squares(&x, &y).ok_or_else(|| {
            FlmError::Data("spline design matrix is too ill-conditioned to solve".into())
        })?;
        let sse = (&y - &x * &beta).norm_squared();

        self.n_samples = Some(n);
        self.coefficients = Some(Coefficients::Spline(SplineRep {
            knots,
            coefficients: beta.iter().copied().collect(),
            degree,
        }));

        let rmse = (sse / n as f64).sqrt();
        debug!(n_samples = n, degree, sse, rmse, "spline fit complete");
        Ok(FitSummary {
            basis: self.basis,
            n_samples: n,
            n_coefficients: nbasis,
            sse,
            rmse,
        })
    }

    fn fourier_design_for(&mut self, n_samples: usize, order: usize) -> &DMatrix<f64> {
        let key = (n_samples, order);
        if !matches!(&self.cache, Some(cached) if cached.key == key) {
            debug!(n_samples, order, "building fourier basis functions");
            self.cache = Some(FourierCache {
                key,
                design: fourier_design(n_samples, order),
            });
        }
        &self.cache.as_ref().unwrap().design
    }

    /// Evaluate the fitted expansion.
    ///
    /// `r` is the resample ratio: the spline branch evaluates on
    /// `r × n_samples` equally spaced points over `[0, n_samples)`. The
    /// fourier branch reconstructs on the original grid only and ignores
    /// `r` (documented limitation).
    pub fn evaluate(&self, r: usize) -> Result<Vec<f64>, FlmError> {
        if r == 0 {
            return Err(FlmError::Configuration(
                "resample ratio `r` must be >= 1".into(),
            ));
        }

        let coefficients = self.coefficients.as_ref().ok_or_else(|| {
            FlmError::State(
                "must fit before evaluate: the expansion parameters are empty".into(),
            )
        })?;
        let n = self.n_samples.ok_or_else(|| {
            FlmError::State("must fit before evaluate: the cycle length is unset".into())
        })?;

        match coefficients {
            Coefficients::Fourier(beta) => {
                let order = (beta.len() - 1) / 2;
                let rebuilt;
                let design = match &self.cache {
                    Some(cached) if cached.key == (n, order) => &cached.design,
                    _ => {
                        rebuilt = fourier_design(n, order);
                        &rebuilt
                    }
                };
                let y_est = design * DVector::from_column_slice(beta);
                Ok(y_est.iter().copied().collect())
            }
            Coefficients::Spline(rep) => {
                let total = r * n;
                let span = n as f64;
                Ok((0..total)
                    .map(|i| bspline_eval(rep, span * i as f64 / total as f64))
                    .collect())
            }
        }
    }

    /// Smooth the source's averaged daily cycle with a Gaussian kernel.
    ///
    /// Independent of `fit`/`evaluate`: the profile is recomputed from the
    /// source and the fitted coefficients are not consulted.
    pub fn smooth<S: ActivitySource + ?Sized>(
        &self,
        source: &S,
        binarize: bool,
        method: SmoothMethod,
    ) -> Result<Vec<f64>, FlmError> {
        let daily_avg = source.average_daily_activity(binarize, self.sampling_freq)?;
        if daily_avg.is_empty() {
            return Err(FlmError::Data(format!(
                "daily activity series for `{}` is empty",
                source.display_name()
            )));
        }

        let fwhm = resolve_fwhm(&daily_avg, method)?;
        debug!(fwhm, n_samples = daily_avg.len(), "smoothing daily profile");
        Ok(gaussian_smooth(&daily_avg, fwhm))
    }
}

/// Resolve a smoothing method to a concrete FWHM for the given cycle.
///
/// The rule-based methods scale the sample standard deviation (`ddof = 1`)
/// by the 1-D rule factor and the `σ → FWHM` conversion; a scalar method
/// is used directly and never looks at the data.
pub(crate) fn resolve_fwhm(values: &[f64], method: SmoothMethod) -> Result<f64, FlmError> {
    match method {
        SmoothMethod::Scotts => {
            Ok(scotts_factor(values.len()) * sd_to_fwhm() * sample_std(values))
        }
        SmoothMethod::Silverman => {
            Ok(silverman_factor(values.len()) * sd_to_fwhm() * sample_std(values))
        }
        SmoothMethod::Fwhm(value) => {
            if value.is_finite() && value > 0.0 {
                Ok(value)
            } else {
                Err(FlmError::Configuration(format!(
                    "FWHM must be a positive finite value, got {value}"
                )))
            }
        }
    }
}
