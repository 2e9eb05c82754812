//! Error types for the FLM core.
//!
//! Every fallible operation returns one of these kinds synchronously; there
//! are no retries (the computations are deterministic, not I/O).

use thiserror::Error;

use crate::domain::BasisKind;

/// Top-level error type for the FLM core.
#[derive(Debug, Clone, Error)]
pub enum FlmError {
    /// Invalid configuration: missing required order parameter, an
    /// unrecognized smoothing method, a zero resample ratio, etc.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// An operation was called in the wrong model state (e.g. `evaluate`
    /// before any successful `fit`).
    #[error("invalid state: {0}")]
    State(String),

    /// The input series is empty or too short for the chosen basis.
    #[error("data error: {0}")]
    Data(String),

    /// The basis kind is accepted at construction but has no fit
    /// implementation yet.
    #[error("basis `{0}` is not supported yet")]
    UnsupportedBasis(BasisKind),

    /// A failure reported by the external series provider.
    #[error("source error: {0}")]
    Source(String),
}
