//! Input collaborator contract: providers of averaged daily activity cycles.
//!
//! The core never touches raw timestamped measurements. It consumes one
//! already-averaged cycle per subject through [`ActivitySource`], so file
//! formats, resampling, and cycle averaging stay with the caller.

pub mod source;

pub use source::*;
