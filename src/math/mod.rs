//! Numerical primitives: basis construction, least squares, kernel smoothing.

pub mod bspline;
pub mod fourier;
pub mod ols;
pub mod smooth;

pub use bspline::*;
pub use fourier::*;
pub use ols::*;
pub use smooth::*;
