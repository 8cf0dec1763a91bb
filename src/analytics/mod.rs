//! Analytics over normalized series: trend, emissions integration, the goal
//! tracker, and per-dataset summaries.

pub mod emissions;
pub mod goal_tracker;
pub mod summary;
pub mod trend;

pub use goal_tracker::{compute_goal_tracker, compute_goal_tracker_at};
pub use summary::{summarize_co2, summarize_generation, summarize_netzero};
