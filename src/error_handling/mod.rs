//! Error handling and processing statistics.
//!
//! This module provides:
//! - The error taxonomy of a check run (input, configuration, per-host lookup,
//!   per-IP enrichment) plus glue-level initialization and database errors
//! - Processing statistics tracking (error and info counters)
//!
//! Input and configuration errors abort a run before any network I/O. Lookup
//! errors become data on the affected answer record. GeoIP errors are absorbed.

mod stats;
mod types;

// Re-export public API
pub use stats::ProcessingStats;
pub use types::{
    ConfigError, DatabaseError, ErrorType, GeoIpError, InfoType, InitializationError,
    InputError, LookupErrorKind,
};
