//! GeoIP enrichment using a MaxMind GeoLite2-City database.
//!
//! This module provides:
//! - Loading, caching and refreshing of the database (local file, URL or
//!   automatic MaxMind download)
//! - The [`GeoLookup`] and [`ReverseLookup`] collaborators
//! - Bounded, best-effort enrichment of answer values

mod enrich;
mod extract;
mod init;
mod lookup;
mod metadata;
mod types;

// Re-export public API
pub use enrich::{collect_ips, enrich, GeoEnricher};
pub use init::{init_geoip, CITY_DB_NAME};
pub use lookup::{GeoLookup, MaxMindLookup, ReverseLookup};
pub use types::{GeoInfo, GeoIpMetadata};

/// Default cache directory for GeoIP databases
pub const DEFAULT_CACHE_DIR: &str = ".geoip_cache";

/// Environment variable name for MaxMind license key
pub const MAXMIND_LICENSE_KEY_ENV: &str = "MAXMIND_LICENSE_KEY";

/// Cache TTL in seconds (7 days)
pub const CACHE_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// MaxMind download base URL
pub const MAXMIND_DOWNLOAD_BASE: &str = "https://download.maxmind.com/app/geoip_download";
