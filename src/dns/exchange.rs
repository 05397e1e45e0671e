//! DNS exchange collaborator.
//!
//! The resolution pool never talks to the network itself. It asks a
//! [`DnsExchange`] for one query/response round trip against one resolver and
//! gets back typed records plus the round-trip time.

use std::net::{Ipv4Addr, Ipv6Addr};
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::error_handling::LookupErrorKind;
use crate::models::RecordType;

/// A single answer record, decoded from the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::upper_case_acronyms)]
pub enum RawRecord {
    A(Ipv4Addr),
    AAAA(Ipv6Addr),
    CNAME(String),
    MX { preference: u16, exchange: String },
    NS(String),
    /// Character-strings of one TXT record, in wire order.
    TXT(Vec<String>),
    /// Any record kind the engine does not render (the name of its type).
    Other(String),
}

/// Successful response to one query.
#[derive(Debug, Clone)]
pub struct Exchange {
    pub records: Vec<RawRecord>,
    pub rtt: Duration,
}

/// Failure of one query attempt.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExchangeError {
    #[error("query timed out")]
    Timeout,

    #[error("no records found: {0}")]
    NoRecords(String),

    #[error("{0}")]
    Protocol(String),

    #[error("invalid resolver address: {0}")]
    InvalidServer(String),
}

impl ExchangeError {
    /// Only timeouts are worth another attempt.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ExchangeError::Timeout)
    }

    pub fn kind(&self) -> LookupErrorKind {
        match self {
            ExchangeError::Timeout => LookupErrorKind::Timeout,
            ExchangeError::NoRecords(_) => LookupErrorKind::NoRecords,
            ExchangeError::Protocol(_) => LookupErrorKind::Protocol,
            ExchangeError::InvalidServer(_) => LookupErrorKind::InvalidServer,
        }
    }
}

/// One query/response round trip against a single resolver.
#[async_trait]
pub trait DnsExchange: Send + Sync {
    /// Queries `server` (an `ip` or `ip:port` string) for `name`.
    async fn exchange(
        &self,
        server: &str,
        name: &str,
        record_type: RecordType,
    ) -> Result<Exchange, ExchangeError>;
}
