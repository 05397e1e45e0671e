//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, limits, etc.)
//! - Named resolver groups
//! - CLI option types and parsing

mod constants;
mod resolvers;
mod types;

// Re-export all constants
pub use constants::*;
pub use resolvers::{parse_resolv_conf, ResolverGroups};
pub use types::{
    CheckArgs, Command, Config, ConfigValidationError, LogFormat, LogLevel, OutputFormat,
    ResolverArgs, ShowArgs,
};
