//! The `ActivitySource` trait and a precomputed-profile implementation.

use chrono::Duration;

use crate::error::FlmError;

/// A provider of one averaged daily activity cycle.
///
/// Implementors own the semantics of `binarize` (reduce each raw sample to
/// {0, 1} before averaging) and of the sampling frequency `freq` (the
/// duration between consecutive samples of the returned cycle).
pub trait ActivitySource {
    /// Identity label used to key batch results.
    fn display_name(&self) -> &str;

    /// One averaged daily cycle, ordered by time of day, `freq` apart.
    ///
    /// The returned length defines the model's `n_samples` for this fit.
    fn average_daily_activity(
        &self,
        binarize: bool,
        freq: Duration,
    ) -> Result<Vec<f64>, FlmError>;
}

/// An already-averaged daily profile.
///
/// Useful when the averaging happened upstream (or in tests): the samples
/// are returned as-is, and `binarize` thresholds them at zero.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyProfile {
    name: String,
    samples: Vec<f64>,
}

impl DailyProfile {
    pub fn new(name: impl Into<String>, samples: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            samples,
        }
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }
}

impl ActivitySource for DailyProfile {
    fn display_name(&self) -> &str {
        &self.name
    }

    fn average_daily_activity(
        &self,
        binarize: bool,
        _freq: Duration,
    ) -> Result<Vec<f64>, FlmError> {
        // The profile is already resampled; `freq` is the caller's concern.
        if binarize {
            Ok(self
                .samples
                .iter()
                .map(|&v| if v > 0.0 { 1.0 } else { 0.0 })
                .collect())
        } else {
            Ok(self.samples.clone())
        }
    }
}
