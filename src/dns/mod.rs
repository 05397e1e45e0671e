//! DNS resolution and answer evaluation.
//!
//! This module provides the resolution engine:
//! - The [`DnsExchange`] collaborator (one query against one resolver) and its
//!   `hickory-resolver` implementation
//! - Record rendering and the match rule
//! - The concurrent, retrying resolution pool
//!
//! The engine has no knowledge of storage or output. It takes a request set, a
//! resolver list and a [`PoolConfig`], and returns a ranked [`ResultSet`].
//!
//! [`ResultSet`]: crate::models::ResultSet

mod evaluate;
mod exchange;
mod hickory;
mod pool;
mod records;

// Re-export public API
pub use evaluate::{evaluate, is_match};
pub use exchange::{DnsExchange, Exchange, ExchangeError, RawRecord};
pub use hickory::{parse_server, HickoryExchange, SystemReverseLookup};
pub use pool::{resolve_all, PoolConfig, ResolutionPool};
pub use records::{render_record, trim_root, UNKNOWN_RESPONSE};
