//! Main application modules.
//!
//! This module provides statistics printing and result rendering used by the
//! CLI commands.

pub mod output;
pub mod statistics;

// Re-export public API
pub use output::{render_json, render_plain, Report};
pub use statistics::{print_error_statistics, print_run_summary};
