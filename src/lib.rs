//! dnscheck library: batch DNS resolution and answer checking
//!
//! This library resolves a batch of hostnames against a pool of DNS resolvers,
//! compares each answer with the value the operator expects, ranks and
//! summarizes the results, optionally enriches IP answers with GeoIP data and
//! stores runs in SQLite under short pronounceable keys.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use dnscheck::dns::{HickoryExchange, PoolConfig, ResolutionPool};
//! use dnscheck::parse::parse_hosts;
//! use dnscheck::report::compute_stats;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let requests = parse_hosts("93.184.216.34 example.com\nexample.org")?;
//! let pool = ResolutionPool::new(Arc::new(HickoryExchange::default()), PoolConfig::default());
//!
//! let result = pool
//!     .resolve_all(&requests, &["8.8.8.8".to_string()], "A")
//!     .await?;
//! let stats = compute_stats(&result.answers);
//! println!("{:.0}% matched", stats.matched_pct);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

pub mod app;
pub mod config;
pub mod dns;
pub mod error_handling;
pub mod geoip;
pub mod initialization;
pub mod models;
pub mod parse;
pub mod report;
pub mod run;
pub mod storage;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel, OutputFormat};
pub use models::{AnswerRecord, HostRequest, RecordType, RequestSet, ResultSet};
pub use run::{run_check, run_resolvers, run_show, Checker, RunOutcome};
