//! Statistics printing.

use log::info;
use strum::IntoEnumIterator;

use crate::error_handling::{ErrorType, InfoType, ProcessingStats};
use crate::report::Stats;

/// Non-zero counters as printable lines, errors first.
pub fn error_statistics_lines(error_stats: &ProcessingStats) -> Vec<String> {
    let mut lines = Vec::new();

    let total_errors = error_stats.total_errors();
    if total_errors > 0 {
        lines.push(format!("Error Counts ({} total):", total_errors));
        for error_type in ErrorType::iter() {
            let count = error_stats.get_error_count(error_type);
            if count > 0 {
                lines.push(format!("   {}: {}", error_type.as_str(), count));
            }
        }
    }

    let total_info = error_stats.total_info();
    if total_info > 0 {
        lines.push(format!("Info Counts ({} total):", total_info));
        for info_type in InfoType::iter() {
            let count = error_stats.get_info_count(info_type);
            if count > 0 {
                lines.push(format!("   {}: {}", info_type.as_str(), count));
            }
        }
    }

    lines
}

/// Prints error and info statistics to the log.
pub fn print_error_statistics(error_stats: &ProcessingStats) {
    for line in error_statistics_lines(error_stats) {
        info!("{}", line);
    }
}

/// Logs a one-line summary of a finished check.
pub fn print_run_summary(total: usize, stats: &Stats, elapsed_seconds: f64) {
    info!(
        "✅ Checked {} host{} ({:.0}% matched, {:.0}% errored) in {:.1}s",
        total,
        if total == 1 { "" } else { "s" },
        stats.matched_pct,
        stats.errored_pct,
        elapsed_seconds
    );
}
