//! Command orchestration.
//!
//! [`Checker`] runs the check pipeline over injected collaborators; the
//! `run_*` functions wire up the production ones for each CLI command.

mod checker;
mod init;

// Re-export public API
pub use checker::{CheckPlan, Checker, RunOutcome};
pub use init::{init_enricher, read_input, resolver_groups, run_check, run_resolvers, run_show};
