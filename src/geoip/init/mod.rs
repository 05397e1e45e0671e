//! GeoIP database initialization and loading.
//!
//! This module provides functions to initialize and load GeoIP databases from
//! local files, URLs or automatic downloads from MaxMind.

mod loader;

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::geoip::lookup::MaxMindLookup;
use crate::geoip::{self};

use loader::{load_from_file, load_from_url};

/// Database edition used for enrichment.
pub const CITY_DB_NAME: &str = "GeoLite2-City";

/// MaxMind download URL for an edition, license key included.
pub(crate) fn maxmind_download_url(license_key: &str, edition: &str) -> Result<String> {
    let url = reqwest::Url::parse_with_params(
        geoip::MAXMIND_DOWNLOAD_BASE,
        &[
            ("edition_id", edition),
            ("license_key", license_key),
            ("suffix", "tar.gz"),
        ],
    )?;
    Ok(url.to_string())
}

fn is_url(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://")
}

/// Initializes the GeoIP database from a local file path, a URL or automatic download.
///
/// # Arguments
///
/// * `geoip_path` - Optional path to a GeoLite2-City database (.mmdb) or a download URL.
///   If None, will attempt automatic download using the `MAXMIND_LICENSE_KEY` env var.
/// * `cache_dir` - Optional cache directory for downloaded databases
///
/// # Returns
///
/// The loaded lookup, or `None` when GeoIP is not configured.
///
/// # Errors
///
/// Returns an error when a configured database cannot be read, downloaded or
/// verified. Callers treat this as "GeoIP disabled".
pub async fn init_geoip(
    geoip_path: Option<&str>,
    cache_dir: Option<&Path>,
) -> Result<Option<MaxMindLookup>> {
    let cache_path = cache_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(geoip::DEFAULT_CACHE_DIR));

    let (reader, metadata) = match geoip_path {
        Some(path) if is_url(path) => load_from_url(path, &cache_path, CITY_DB_NAME).await?,
        Some(path) => load_from_file(path).await?,
        None => match std::env::var(geoip::MAXMIND_LICENSE_KEY_ENV) {
            Ok(license_key) if !license_key.trim().is_empty() => {
                let url = maxmind_download_url(license_key.trim(), CITY_DB_NAME)?;
                load_from_url(&url, &cache_path, CITY_DB_NAME).await?
            }
            _ => {
                log::info!(
                    "GeoIP lookup disabled (no database path provided and {} not set)",
                    geoip::MAXMIND_LICENSE_KEY_ENV
                );
                return Ok(None);
            }
        },
    };

    log::info!(
        "GeoIP database loaded ({} from {})",
        metadata.version,
        metadata.source
    );
    Ok(Some(MaxMindLookup::new(reader, metadata)))
}
