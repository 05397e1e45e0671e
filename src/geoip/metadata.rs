//! Cache metadata for downloaded GeoIP databases.
//!
//! A small JSON file next to the cached `.mmdb` records where it came from,
//! its build version and when it was fetched.

use anyhow::{Context, Result};
use maxminddb::Reader;
use std::path::Path;
use std::time::{Duration, SystemTime};

use super::types::GeoIpMetadata;

/// Builds metadata for a freshly opened database.
pub(crate) fn extract_metadata<T: AsRef<[u8]>>(reader: &Reader<T>, source: &str) -> GeoIpMetadata {
    GeoIpMetadata {
        source: source.to_string(),
        version: format!("build_{}", reader.metadata.build_epoch),
        last_updated: SystemTime::now(),
    }
}

/// True while a cached copy is younger than `ttl`.
///
/// Timestamps in the future (clock skew) count as stale.
pub(crate) fn is_fresh(metadata: &GeoIpMetadata, ttl: Duration) -> bool {
    metadata
        .last_updated
        .elapsed()
        .map(|age| age < ttl)
        .unwrap_or(false)
}

pub(crate) async fn load_metadata(metadata_file: &Path) -> Result<GeoIpMetadata> {
    let content = tokio::fs::read_to_string(metadata_file)
        .await
        .with_context(|| format!("Failed to read GeoIP metadata {:?}", metadata_file))?;
    let metadata: GeoIpMetadata = serde_json::from_str(&content)
        .with_context(|| format!("Invalid GeoIP metadata in {:?}", metadata_file))?;
    Ok(metadata)
}

pub(crate) async fn save_metadata(metadata: &GeoIpMetadata, metadata_file: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(metadata)?;
    tokio::fs::write(metadata_file, content)
        .await
        .with_context(|| format!("Failed to write GeoIP metadata {:?}", metadata_file))?;
    Ok(())
}
