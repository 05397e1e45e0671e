//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use thiserror::Error;

use crate::config::constants::{
    DB_PATH, DEFAULT_BATCH_LIMIT, DEFAULT_CONCURRENCY, DEFAULT_MAX_RETRIES, DNS_ATTEMPT_TIMEOUT,
};
use crate::dns::PoolConfig;
use crate::models::RecordType;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// How results are printed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Coloured, human-readable report
    Plain,
    /// One JSON document with the result, its statistics and GeoIP data
    Json,
}

/// A configuration value that cannot be used.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {field}: {message}")]
pub struct ConfigValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ConfigValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Command-line options and configuration.
///
/// # Examples
///
/// ```bash
/// # Check a hosts file against the local resolvers
/// dnscheck check hosts.txt
///
/// # AAAA lookups against Google DNS, JSON output
/// dnscheck check hosts.txt --record-type AAAA --resolvers "Google DNS" --format json
///
/// # Show a stored result
/// dnscheck show kobatesuvri
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "dnscheck",
    version,
    about = "Resolves batches of hostnames and checks the answers against expected values."
)]
pub struct Config {
    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info, global = true)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain, global = true)]
    pub log_format: LogFormat,

    /// Database path (SQLite file)
    #[arg(long, value_parser, default_value = DB_PATH, global = true)]
    pub db_path: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve every host in a hosts file and check the answers
    Check(CheckArgs),
    /// Print a stored result
    Show(ShowArgs),
    /// List the available resolver groups
    Resolvers(ResolverArgs),
}

#[derive(Debug, Clone, Args)]
pub struct CheckArgs {
    /// Hosts file (`[ip] domain [domain ...]` per line), or `-` for stdin
    #[arg(value_parser)]
    pub file: PathBuf,

    /// Record type: A|AAAA|CNAME|MX|NS|TXT
    #[arg(long, short = 't', default_value = "A")]
    pub record_type: String,

    /// Resolver group to query (defaults to the first available group)
    #[arg(long)]
    pub resolvers: Option<String>,

    /// Custom resolver address (ip or ip:port); repeatable, replaces the built-in groups
    #[arg(long = "resolver", short = 'r')]
    pub resolver: Vec<String>,

    /// Maximum lookups in flight
    #[arg(long, short = 'c', default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Attempts per host when lookups time out
    #[arg(long, default_value_t = DEFAULT_MAX_RETRIES)]
    pub max_retries: usize,

    /// Maximum hosts per batch
    #[arg(long, short = 'l', default_value_t = DEFAULT_BATCH_LIMIT)]
    pub limit: usize,

    /// Timeout of a single DNS attempt in milliseconds
    #[arg(long, default_value_t = DNS_ATTEMPT_TIMEOUT.as_millis() as u64)]
    pub attempt_timeout_ms: u64,

    /// GeoIP database path (MaxMind GeoLite2-City .mmdb file) or download URL.
    /// If not provided, GeoIP will auto-download if MAXMIND_LICENSE_KEY env var is set.
    #[arg(long, conflicts_with = "no_geoip")]
    pub geoip: Option<String>,

    /// Skip GeoIP enrichment
    #[arg(long)]
    pub no_geoip: bool,

    /// Do not store the result
    #[arg(long)]
    pub no_save: bool,

    /// Output format: plain|json
    #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Args)]
pub struct ShowArgs {
    /// Key printed by `check`
    pub key: String,

    /// GeoIP database path or download URL
    #[arg(long, conflicts_with = "no_geoip")]
    pub geoip: Option<String>,

    /// Skip GeoIP enrichment
    #[arg(long)]
    pub no_geoip: bool,

    /// Output format: plain|json
    #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Args)]
pub struct ResolverArgs {
    /// Custom resolver address; shows the single custom group
    #[arg(long = "resolver", short = 'r')]
    pub resolver: Vec<String>,
}

impl Config {
    /// Checks values clap cannot check on its own.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.db_path.as_os_str().is_empty() {
            return Err(ConfigValidationError::new("db_path", "must not be empty"));
        }
        match &self.command {
            Command::Check(args) => args.validate(),
            Command::Show(args) if args.key.trim().is_empty() => {
                Err(ConfigValidationError::new("key", "must not be empty"))
            }
            Command::Show(_) | Command::Resolvers(_) => Ok(()),
        }
    }
}

impl CheckArgs {
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.concurrency == 0 {
            return Err(ConfigValidationError::new("concurrency", "must be greater than 0"));
        }
        if self.max_retries == 0 {
            return Err(ConfigValidationError::new("max_retries", "must be greater than 0"));
        }
        if self.limit == 0 {
            return Err(ConfigValidationError::new("limit", "must be greater than 0"));
        }
        if self.attempt_timeout_ms == 0 {
            return Err(ConfigValidationError::new(
                "attempt_timeout_ms",
                "must be greater than 0",
            ));
        }
        RecordType::from_query_str(&self.record_type)
            .map_err(|e| ConfigValidationError::new("record_type", e.to_string()))?;
        Ok(())
    }

    /// Pool settings carried by these options.
    pub fn to_pool_config(&self) -> PoolConfig {
        PoolConfig {
            batch_limit: self.limit,
            concurrency: self.concurrency,
            max_retries: self.max_retries,
            attempt_timeout: Duration::from_millis(self.attempt_timeout_ms),
        }
    }

    /// GeoIP source to load, `None` when enrichment is switched off.
    pub fn geoip_source(&self) -> Option<Option<&str>> {
        (!self.no_geoip).then_some(self.geoip.as_deref())
    }
}

impl ShowArgs {
    /// GeoIP source to load, `None` when enrichment is switched off.
    pub fn geoip_source(&self) -> Option<Option<&str>> {
        (!self.no_geoip).then_some(self.geoip.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        Config::try_parse_from(std::iter::once("dnscheck").chain(args.iter().copied()))
            .expect("arguments should parse")
    }

    fn check_args(config: &Config) -> &CheckArgs {
        match &config.command {
            Command::Check(args) => args,
            other => panic!("expected check, got {:?}", other),
        }
    }

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(log::LevelFilter::from(LogLevel::Warn), log::LevelFilter::Warn);
        assert_eq!(log::LevelFilter::from(LogLevel::Info), log::LevelFilter::Info);
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_check_defaults() {
        let config = parse(&["check", "hosts.txt"]);
        let args = check_args(&config);

        assert_eq!(args.file, PathBuf::from("hosts.txt"));
        assert_eq!(args.record_type, "A");
        assert_eq!(args.concurrency, DEFAULT_CONCURRENCY);
        assert_eq!(args.max_retries, DEFAULT_MAX_RETRIES);
        assert_eq!(args.limit, DEFAULT_BATCH_LIMIT);
        assert!(args.resolvers.is_none());
        assert!(args.resolver.is_empty());
        assert_eq!(args.format, OutputFormat::Plain);
        assert_eq!(config.db_path, PathBuf::from(DB_PATH));
        assert!(config.validate().is_ok());

        let pool = args.to_pool_config();
        assert_eq!(pool.attempt_timeout, DNS_ATTEMPT_TIMEOUT);
        assert_eq!(pool.batch_limit, DEFAULT_BATCH_LIMIT);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let config = parse(&["check", "hosts.txt", "--db-path", "/tmp/x.db", "--log-level", "debug"]);
        assert_eq!(config.db_path, PathBuf::from("/tmp/x.db"));
        assert!(matches!(config.log_level, LogLevel::Debug));
    }

    #[test]
    fn test_repeated_custom_resolvers() {
        let config = parse(&["check", "-", "-r", "1.1.1.1", "--resolver", "9.9.9.9:5353"]);
        assert_eq!(check_args(&config).resolver, vec!["1.1.1.1", "9.9.9.9:5353"]);
    }

    #[test]
    fn test_geoip_flags_conflict() {
        let result = Config::try_parse_from([
            "dnscheck",
            "check",
            "hosts.txt",
            "--geoip",
            "db.mmdb",
            "--no-geoip",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_geoip_source() {
        let config = parse(&["check", "hosts.txt", "--no-geoip"]);
        assert_eq!(check_args(&config).geoip_source(), None);

        let config = parse(&["check", "hosts.txt", "--geoip", "db.mmdb"]);
        assert_eq!(check_args(&config).geoip_source(), Some(Some("db.mmdb")));

        let config = parse(&["check", "hosts.txt"]);
        assert_eq!(check_args(&config).geoip_source(), Some(None));
    }

    #[test]
    fn test_validate_rejects_zero_concurrency() {
        let config = parse(&["check", "hosts.txt", "--concurrency", "0"]);
        let err = config.validate().unwrap_err();
        assert_eq!(err.field, "concurrency");
        assert_eq!(err.to_string(), "invalid concurrency: must be greater than 0");
    }

    #[test]
    fn test_validate_rejects_unknown_record_type() {
        let config = parse(&["check", "hosts.txt", "-t", "SOA"]);
        let err = config.validate().unwrap_err();
        assert_eq!(err.field, "record_type");
        assert!(err.message.contains("SOA"));
    }

    #[test]
    fn test_validate_rejects_zero_retries_and_limit() {
        let config = parse(&["check", "hosts.txt", "--max-retries", "0"]);
        assert_eq!(config.validate().unwrap_err().field, "max_retries");

        let config = parse(&["check", "hosts.txt", "--limit", "0"]);
        assert_eq!(config.validate().unwrap_err().field, "limit");
    }

    #[test]
    fn test_show_and_resolvers_subcommands() {
        let config = parse(&["show", "kobatesuvri", "--format", "json"]);
        match config.command {
            Command::Show(args) => {
                assert_eq!(args.key, "kobatesuvri");
                assert_eq!(args.format, OutputFormat::Json);
            }
            other => panic!("expected show, got {:?}", other),
        }

        let config = parse(&["resolvers"]);
        assert!(matches!(config.command, Command::Resolvers(_)));
    }

    #[test]
    fn test_show_rejects_blank_key() {
        let config = parse(&["show", " "]);
        assert_eq!(config.validate().unwrap_err().field, "key");
    }
}
