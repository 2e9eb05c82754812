//! Batch fitting and evaluation across many subjects' records.
//!
//! This is the only concurrency boundary in the crate. Records are
//! embarrassingly parallel, so the runner fans independent per-record
//! tasks out to a sized rayon pool; with `parallelism = 1` it processes
//! records sequentially in input order with no pool overhead.
//!
//! A fit mutates model state, so the runner never fits a shared instance:
//! each record gets its own clone of the configured model and the fitted
//! clones are returned to the caller. Per-record failures are collected in
//! the result map rather than aborting the batch or being swallowed.

pub mod runner;

pub use runner::*;
