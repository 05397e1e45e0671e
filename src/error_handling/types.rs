//! Error type definitions.
//!
//! This module defines the error taxonomy of a check run plus the counter types
//! tracked by [`super::ProcessingStats`].

use log::SetLoggerError;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter as EnumIterMacro};
use thiserror::Error;

/// Malformed host input. Fatal for the whole batch, fixed by the operator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// A line does not follow `[ipv4] domain [domain ...]`, or a domain token is invalid.
    #[error("malformed input on line {line}")]
    Malformed { line: usize },
}

/// Invalid run configuration. Fatal, detected before any network I/O.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("too many queries to process ({count} hosts, limit is {limit})")]
    BatchTooLarge { count: usize, limit: usize },

    #[error("no resolvers configured")]
    NoResolvers,

    #[error("invalid lookup type: {0}")]
    UnknownRecordType(String),

    #[error("concurrency must be greater than 0")]
    InvalidConcurrency,

    #[error("max retries must be greater than 0")]
    InvalidRetries,

    #[error("resolvers specified do not exist: {0}")]
    UnknownResolverGroup(String),
}

/// Kind of a per-host lookup failure, stored on the answer record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum LookupErrorKind {
    /// Every attempt timed out.
    Timeout,
    /// The name exists nowhere or has no records of the requested type.
    NoRecords,
    /// Malformed or refused response, or any other resolver failure.
    Protocol,
    /// The resolver address could not be used.
    InvalidServer,
    /// The lookup task itself died.
    TaskFailed,
}

/// Failure of a single GeoIP or reverse DNS lookup. Always absorbed by enrichment.
#[derive(Error, Debug)]
pub enum GeoIpError {
    #[error("no GeoIP data for {0}")]
    NotFound(String),

    #[error("GeoIP database error: {0}")]
    Database(String),

    #[error("reverse lookup failed for {ip}: {message}")]
    Reverse { ip: String, message: String },
}

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the DNS resolver.
    #[error("DNS resolver initialization error: {0}")]
    DnsResolverError(String),
}

/// Error types for database operations.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error creating the database file.
    #[error("Database file creation error: {0}")]
    FileCreationError(String),

    /// SQL execution error.
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),

    /// Schema migration error.
    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    /// Stored payload could not be encoded or decoded.
    #[error("Result payload error: {0}")]
    PayloadError(#[from] serde_json::Error),

    /// No result stored under the key.
    #[error("No stored result with key '{0}'")]
    NotFound(String),

    /// Every generated key was already taken.
    #[error("No unused result key found after {0} attempts")]
    KeyExhausted(usize),
}

/// Errors counted during a check run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    DnsTimeout,
    DnsNoRecords,
    DnsProtocolError,
    DnsInvalidServer,
    LookupTaskFailed,
    GeoIpLookupError,
    ReverseDnsError,
}

/// Informational events counted during a check run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum InfoType {
    /// An attempt timed out and was retried.
    DnsRetry,
    /// An IP answer received GeoIP data.
    GeoIpEnriched,
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::DnsTimeout => "DNS timeout",
            ErrorType::DnsNoRecords => "DNS no records",
            ErrorType::DnsProtocolError => "DNS protocol error",
            ErrorType::DnsInvalidServer => "DNS invalid resolver",
            ErrorType::LookupTaskFailed => "Lookup task failed",
            ErrorType::GeoIpLookupError => "GeoIP lookup error",
            ErrorType::ReverseDnsError => "Reverse DNS error",
        }
    }
}

impl From<LookupErrorKind> for ErrorType {
    fn from(kind: LookupErrorKind) -> Self {
        match kind {
            LookupErrorKind::Timeout => ErrorType::DnsTimeout,
            LookupErrorKind::NoRecords => ErrorType::DnsNoRecords,
            LookupErrorKind::Protocol => ErrorType::DnsProtocolError,
            LookupErrorKind::InvalidServer => ErrorType::DnsInvalidServer,
            LookupErrorKind::TaskFailed => ErrorType::LookupTaskFailed,
        }
    }
}

impl InfoType {
    /// Returns a human-readable string representation of the info type.
    pub fn as_str(&self) -> &'static str {
        match self {
            InfoType::DnsRetry => "DNS retry after timeout",
            InfoType::GeoIpEnriched => "GeoIP enriched address",
        }
    }
}
