//! `netzero-tracker` library crate.
//!
//! The binary (`nzt`) is a thin wrapper around this library so that:
//!
//! - the analytics are testable without spawning processes or touching a store
//! - the simulator, the CSV store and the REST store stay swappable behind traits
//! - code stays easy to navigate as the project grows

pub mod analytics;
pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod report;
pub mod series;
