//! The batch runner: per-record fit/evaluate fan-out.

use std::collections::BTreeMap;

use rayon::prelude::*;
use tracing::debug;

use crate::domain::FitSummary;
use crate::error::FlmError;
use crate::model::FunctionalModel;
use crate::series::ActivitySource;

/// Batch results keyed by record display name, one entry per record.
///
/// Display names must be unique within a batch; duplicate names collapse
/// onto one key.
pub type BatchResults<T> = BTreeMap<String, Result<T, FlmError>>;

/// Progress hook for batch runs.
///
/// Replaces print-based progress meters: the runner reports each finished
/// record and the caller decides what to do with it (progress bar, log
/// line, nothing). Completion order is unspecified when `parallelism > 1`.
pub trait BatchObserver: Sync {
    fn on_record_done(&self, name: &str, ok: bool);
}

/// No-op observer.
impl BatchObserver for () {
    fn on_record_done(&self, _name: &str, _ok: bool) {}
}

/// A fitted per-record model together with its fit diagnostics.
#[derive(Debug, Clone)]
pub struct FittedRecord {
    pub model: FunctionalModel,
    pub summary: FitSummary,
}

/// Applies single-record model operations across a collection of records.
#[derive(Debug, Clone, Copy)]
pub struct BatchRunner {
    parallelism: usize,
}

impl BatchRunner {
    /// `parallelism` is the worker-thread count; `1` means sequential.
    pub fn new(parallelism: usize) -> Result<Self, FlmError> {
        if parallelism == 0 {
            return Err(FlmError::Configuration("parallelism must be >= 1".into()));
        }
        Ok(Self { parallelism })
    }

    pub fn parallelism(&self) -> usize {
        self.parallelism
    }

    /// Fit the configured model against every record.
    ///
    /// Each record is fitted on its own clone of `model`, so concurrent
    /// fits never share mutable state and `model` itself is left
    /// untouched. Failed records keep their slot in the result map.
    pub fn fit_many<S: ActivitySource + Sync>(
        &self,
        model: &FunctionalModel,
        records: &[S],
        binarize: bool,
        observer: Option<&dyn BatchObserver>,
    ) -> Result<BatchResults<FittedRecord>, FlmError> {
        debug!(
            n_records = records.len(),
            parallelism = self.parallelism,
            "batch fit"
        );
        let fit_one = |record: &S| -> (String, Result<FittedRecord, FlmError>) {
            let name = record.display_name().to_owned();
            let mut owned = model.clone();
            let result = owned
                .fit(record, binarize)
                .map(|summary| FittedRecord { model: owned, summary });
            if let Some(observer) = observer {
                observer.on_record_done(&name, result.is_ok());
            }
            (name, result)
        };

        if self.parallelism == 1 {
            Ok(records.iter().map(fit_one).collect())
        } else {
            let pool = self.build_pool()?;
            Ok(pool.install(|| records.par_iter().map(fit_one).collect()))
        }
    }

    /// Evaluate every fitted per-record model with resample ratio `r`.
    ///
    /// Results are keyed by record identity and order-independent: the
    /// same map comes back regardless of parallelism.
    pub fn evaluate_many(
        &self,
        models: &BTreeMap<String, FunctionalModel>,
        r: usize,
        observer: Option<&dyn BatchObserver>,
    ) -> Result<BatchResults<Vec<f64>>, FlmError> {
        debug!(
            n_records = models.len(),
            parallelism = self.parallelism,
            r,
            "batch evaluate"
        );
        let evaluate_one = |(name, model): (&String, &FunctionalModel)| {
            let result = model.evaluate(r);
            if let Some(observer) = observer {
                observer.on_record_done(name, result.is_ok());
            }
            (name.clone(), result)
        };

        if self.parallelism == 1 {
            Ok(models.iter().map(evaluate_one).collect())
        } else {
            let pool = self.build_pool()?;
            Ok(pool.install(|| models.par_iter().map(evaluate_one).collect()))
        }
    }

    fn build_pool(&self) -> Result<rayon::ThreadPool, FlmError> {
        rayon::ThreadPoolBuilder::new()
            .num_threads(self.parallelism)
            .build()
            .map_err(|e| FlmError::Configuration(format!("failed to build worker pool: {e}")))
    }
}

/// Keep only the successfully fitted models, keyed by record name.
///
/// Convenience for chaining `fit_many` into `evaluate_many` when the
/// caller has already reported or inspected the failures.
pub fn fitted_models(results: BatchResults<FittedRecord>) -> BTreeMap<String, FunctionalModel> {
    results
        .into_iter()
        .filter_map(|(name, result)| result.ok().map(|fitted| (name, fitted.model)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BasisKind;
    use crate::series::DailyProfile;
    use chrono::Duration;
    use std::f64::consts::PI;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn profiles(n_records: usize, t_len: usize) -> Vec<DailyProfile> {
        (0..n_records)
            .map(|k| {
                let samples: Vec<f64> = (0..t_len)
                    .map(|t| {
                        let phase = 2.0 * PI * t as f64 / t_len as f64;
                        5.0 + k as f64 + 2.0 * phase.cos()
                    })
                    .collect();
                DailyProfile::new(format!("subject-{k}"), samples)
            })
            .collect()
    }

    fn fourier_model() -> FunctionalModel {
        FunctionalModel::new(BasisKind::Fourier, Duration::minutes(30), Some(2))
    }

    #[test]
    fn zero_parallelism_is_rejected() {
        assert!(matches!(
            BatchRunner::new(0),
            Err(FlmError::Configuration(_))
        ));
    }

    #[test]
    fn fit_many_leaves_the_template_model_unfitted() {
        let model = fourier_model();
        let records = profiles(3, 48);
        let runner = BatchRunner::new(1).unwrap();
        let results = runner.fit_many(&model, &records, false, None).unwrap();

        assert_eq!(results.len(), 3);
        assert!(results.values().all(|r| r.is_ok()));
        // Per-record clones were fitted, never the shared template.
        assert!(model.coefficients().is_none());
    }

    #[test]
    fn fit_many_collects_per_record_failures() {
        let model = fourier_model();
        let records = vec![
            DailyProfile::new("good", profiles(1, 48)[0].samples().to_vec()),
            DailyProfile::new("empty", vec![]),
        ];
        let runner = BatchRunner::new(1).unwrap();
        let results = runner.fit_many(&model, &records, false, None).unwrap();

        assert_eq!(results.len(), 2);
        assert!(results["good"].is_ok());
        assert!(matches!(results["empty"], Err(FlmError::Data(_))));
    }

    #[test]
    fn batch_results_are_identical_across_parallelism_levels() {
        let model = fourier_model();
        let records = profiles(6, 48);

        let sequential = BatchRunner::new(1).unwrap();
        let parallel = BatchRunner::new(4).unwrap();

        let fits_seq = fitted_models(sequential.fit_many(&model, &records, false, None).unwrap());
        let fits_par = fitted_models(parallel.fit_many(&model, &records, false, None).unwrap());
        assert_eq!(
            fits_seq.keys().collect::<Vec<_>>(),
            fits_par.keys().collect::<Vec<_>>()
        );

        let curves_seq = sequential.evaluate_many(&fits_seq, 1, None).unwrap();
        let curves_par = parallel.evaluate_many(&fits_par, 1, None).unwrap();

        assert_eq!(curves_seq.len(), 6);
        for (name, curve) in &curves_seq {
            let a = curve.as_ref().unwrap();
            let b = curves_par[name].as_ref().unwrap();
            assert_eq!(a, b, "curve for {name} differs across parallelism");
        }
    }

    #[test]
    fn evaluate_many_reports_unfitted_models_per_record() {
        let mut models = BTreeMap::new();
        models.insert("unfit".to_owned(), fourier_model());
        let runner = BatchRunner::new(1).unwrap();
        let results = runner.evaluate_many(&models, 10, None).unwrap();
        assert!(matches!(results["unfit"], Err(FlmError::State(_))));
    }

    #[test]
    fn observer_sees_every_record_once() {
        struct Counter(AtomicUsize);
        impl BatchObserver for Counter {
            fn on_record_done(&self, _name: &str, ok: bool) {
                assert!(ok);
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }

        let model = fourier_model();
        let records = profiles(5, 48);
        let counter = Counter(AtomicUsize::new(0));
        let runner = BatchRunner::new(4).unwrap();
        runner
            .fit_many(&model, &records, false, Some(&counter))
            .unwrap();
        assert_eq!(counter.0.load(Ordering::SeqCst), 5);
    }
}
