//! Input/output helpers.
//!
//! - CSV table store: reading, row validation, appends (`ingest`)
//! - CSV append primitives and JSON export (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
