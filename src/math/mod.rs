//! Numerical primitives: least squares and robust summary statistics.

pub mod ols;
pub mod stats;

pub use ols::*;
pub use stats::*;
