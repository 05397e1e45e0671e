//! Configuration constants.
//!
//! Defaults for the resolution pool, enrichment, storage and the GeoIP
//! database lifecycle.

use std::time::Duration;

// Resolution pool defaults
/// Maximum lookups in flight at once (semaphore limit)
pub const DEFAULT_CONCURRENCY: usize = 10;
/// Largest batch accepted by a single check run
pub const DEFAULT_BATCH_LIMIT: usize = 500;
/// Total attempts per host (initial attempt included)
pub const DEFAULT_MAX_RETRIES: usize = 3;
/// Time budget of a single DNS exchange
pub const DNS_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(1);
/// Pause between timed-out attempts, in milliseconds
pub const RETRY_DELAY_MS: u64 = 50;
/// Port used when a resolver address has none
pub const DNS_PORT: u16 = 53;

// System resolver (reverse lookups for GeoIP enrichment)
/// DNS query timeout in seconds
pub const DNS_TIMEOUT_SECS: u64 = 3;

// Enrichment
/// Concurrent GeoIP/reverse lookups per enrichment call
pub const GEOIP_CONCURRENCY: usize = 4;
/// Time budget of a single GeoIP or reverse lookup
pub const GEOIP_LOOKUP_TIMEOUT: Duration = Duration::from_secs(2);

// Resolver groups
pub const RESOLV_CONF_PATH: &str = "/etc/resolv.conf";
pub const LOCAL_RESOLVERS_GROUP: &str = "Local Resolvers";
pub const GOOGLE_DNS_GROUP: &str = "Google DNS";
pub const OPENDNS_GROUP: &str = "OpenDNS";
pub const CUSTOM_GROUP: &str = "Custom";
pub const GOOGLE_DNS_SERVERS: [&str; 2] = ["8.8.8.8", "8.8.4.4"];
pub const OPENDNS_SERVERS: [&str; 2] = ["208.67.222.222", "208.67.220.220"];

// Storage
pub const DB_PATH: &str = "./dnscheck.db";
/// Attempts at finding an unused result key before giving up
pub const MAX_KEY_ATTEMPTS: usize = 10;

// GeoIP download limits
/// Maximum GeoIP database download size in bytes (200MB)
/// GeoLite2-City is roughly 70MB uncompressed
pub const MAX_GEOIP_DOWNLOAD_SIZE: usize = 200 * 1024 * 1024;
/// Download attempts for the GeoIP database
pub const MAX_NETWORK_DOWNLOAD_RETRIES: usize = 3;
/// Whole-request timeout for the GeoIP download
pub const GEOIP_DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(300);
