//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - model configuration enums (`BasisKind`, `SmoothMethod`)
//! - fitted parameter representations (`Coefficients`, `SplineRep`)
//! - fit diagnostics (`FitSummary`)

pub mod types;

pub use types::*;
