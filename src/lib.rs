//! `actirhythm` library crate.
//!
//! Functional Linear Modelling (FLM) of daily activity rhythms: a periodic
//! time series (one averaged 24h activity cycle) is represented as a finite
//! basis expansion (Fourier harmonics or B-splines), the expansion
//! coefficients are solved by least squares, and the fitted functional form
//! is evaluated on the original or a finer grid. An independent path
//! kernel-smooths the raw daily profile with a bandwidth-selected Gaussian.
//!
//! The crate is a pure library surface:
//!
//! - raw data ingestion and cycle averaging live behind the
//!   [`series::ActivitySource`] trait
//! - batch orchestration across many subjects is the job of
//!   [`batch::BatchRunner`], the only concurrency boundary

pub mod batch;
pub mod domain;
pub mod error;
pub mod math;
pub mod model;
pub mod series;
