//! Time-series preparation shared by every analytics component.

pub mod normalize;

pub use normalize::*;
