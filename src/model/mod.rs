//! The functional model: single-series fit / evaluate / smooth.
//!
//! Kept as small, deterministic methods on one owned struct so batch code
//! can clone models per task instead of sharing mutable state.

pub mod flm;

pub use flm::*;
