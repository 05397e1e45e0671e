//! Result ranking and aggregate statistics.
//!
//! Both operations are pure functions over collected answer records.

mod rank;
mod stats;

// Re-export public API
pub use rank::rank;
pub use stats::{compute_stats, AnswerFrequency, Stats};
