//! Human-readable reports.

pub mod format;

pub use format::*;
