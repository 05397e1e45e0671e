//! GeoIP database loading from local files and URLs.

use anyhow::{Context, Result};
use maxminddb::Reader;
use std::path::Path;
use std::time::Duration;

use crate::config::{
    GEOIP_DOWNLOAD_TIMEOUT, MAX_GEOIP_DOWNLOAD_SIZE, MAX_NETWORK_DOWNLOAD_RETRIES,
};
use crate::geoip::extract::unpack_database;
use crate::geoip::metadata::{extract_metadata, is_fresh, load_metadata, save_metadata};
use crate::geoip::types::GeoIpMetadata;
use crate::geoip::{self};

/// Source string safe to log and persist (query string, and any license key in it, removed).
pub(crate) fn redact_source(url: &str) -> String {
    match url.split_once('?') {
        Some((base, _)) => base.to_string(),
        None => url.to_string(),
    }
}

/// Opens database bytes, failing when they are not a valid MaxMind database.
fn open_database(db_bytes: Vec<u8>, source: &str) -> Result<(Reader<Vec<u8>>, GeoIpMetadata)> {
    let reader = Reader::from_source(db_bytes)
        .with_context(|| format!("Failed to parse GeoIP database from {}", source))?;
    let metadata = extract_metadata(&reader, source);
    Ok((reader, metadata))
}

/// Loads a GeoIP database from a local `.mmdb` file.
pub(crate) async fn load_from_file(path: &str) -> Result<(Reader<Vec<u8>>, GeoIpMetadata)> {
    log::info!("Loading GeoIP database from: {}", path);

    let db_bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read GeoIP database from {}", path))?;

    open_database(db_bytes, path)
}

/// Loads a GeoIP database from a URL, reusing the cached copy while it is fresh.
///
/// The cache lives in `cache_dir` as `<db_name>.mmdb` plus a metadata file.
/// A download is decompressed/unpacked as needed and verified before it
/// replaces the cached copy.
pub(crate) async fn load_from_url(
    url: &str,
    cache_dir: &Path,
    db_name: &str,
) -> Result<(Reader<Vec<u8>>, GeoIpMetadata)> {
    tokio::fs::create_dir_all(cache_dir)
        .await
        .with_context(|| format!("Failed to create cache directory: {:?}", cache_dir))?;

    let cache_file = cache_dir.join(format!("{}.mmdb", db_name));
    let metadata_file = cache_dir.join(format!("{}_metadata.json", db_name.to_lowercase()));
    let source = redact_source(url);

    if let Ok(metadata) = load_metadata(&metadata_file).await {
        let ttl = Duration::from_secs(geoip::CACHE_TTL_SECS);
        if metadata.source == source && is_fresh(&metadata, ttl) && cache_file.exists() {
            match tokio::fs::read(&cache_file).await {
                Ok(bytes) => match open_database(bytes, &source) {
                    Ok((reader, _)) => {
                        log::info!("Loaded GeoIP database from cache: {:?}", cache_file);
                        return Ok((reader, metadata));
                    }
                    Err(e) => log::warn!("Cached GeoIP database is unusable: {:#}", e),
                },
                Err(e) => log::warn!("Failed to read cached GeoIP database: {}", e),
            }
        }
    }

    log::info!("Downloading GeoIP database from: {}", source);

    let mut last_error = None;
    for attempt in 1..=MAX_NETWORK_DOWNLOAD_RETRIES {
        match download_geoip_with_size_limit(url).await {
            Ok(bytes) => {
                return process_downloaded_geoip(bytes, &source, db_name, &cache_file, &metadata_file)
                    .await;
            }
            Err(e) => {
                last_error = Some(e);
                if attempt < MAX_NETWORK_DOWNLOAD_RETRIES {
                    log::warn!(
                        "Failed to download GeoIP database from {} (attempt {}/{}), retrying...",
                        source,
                        attempt,
                        MAX_NETWORK_DOWNLOAD_RETRIES
                    );
                    tokio::time::sleep(Duration::from_secs(2u64 << (attempt - 1))).await;
                }
            }
        }
    }

    Err(last_error.unwrap_or_else(|| {
        anyhow::anyhow!(
            "Failed to download GeoIP database from {} after {} attempts",
            source,
            MAX_NETWORK_DOWNLOAD_RETRIES
        )
    }))
}

async fn download_geoip_with_size_limit(url: &str) -> Result<Vec<u8>> {
    let client = reqwest::Client::builder()
        .timeout(GEOIP_DOWNLOAD_TIMEOUT)
        .build()?;

    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        let status = response.status();
        let error_body = response
            .text()
            .await
            .unwrap_or_else(|_| "No error details".to_string());
        return Err(anyhow::anyhow!(
            "Failed to download GeoIP database: {} - {}",
            status,
            error_body.trim()
        ));
    }

    if let Some(content_length) = response.content_length() {
        if content_length > MAX_GEOIP_DOWNLOAD_SIZE as u64 {
            return Err(anyhow::anyhow!(
                "GeoIP database too large: {} bytes (max: {} bytes)",
                content_length,
                MAX_GEOIP_DOWNLOAD_SIZE
            ));
        }
    }

    let downloaded_bytes = response.bytes().await?.to_vec();

    if downloaded_bytes.len() > MAX_GEOIP_DOWNLOAD_SIZE {
        return Err(anyhow::anyhow!(
            "GeoIP database too large: {} bytes (max: {} bytes)",
            downloaded_bytes.len(),
            MAX_GEOIP_DOWNLOAD_SIZE
        ));
    }

    Ok(downloaded_bytes)
}

/// Unpacks and verifies a download, then replaces the cached copy.
async fn process_downloaded_geoip(
    downloaded_bytes: Vec<u8>,
    source: &str,
    db_name: &str,
    cache_file: &Path,
    metadata_file: &Path,
) -> Result<(Reader<Vec<u8>>, GeoIpMetadata)> {
    let db_bytes = unpack_database(downloaded_bytes, db_name)?;

    // verify before touching the cache
    let (reader, metadata) = open_database(db_bytes.clone(), source)
        .context("Downloaded GeoIP database failed verification")?;

    let tmp_file = cache_file.with_extension("mmdb.tmp");
    tokio::fs::write(&tmp_file, &db_bytes)
        .await
        .with_context(|| format!("Failed to write cache file: {:?}", tmp_file))?;
    tokio::fs::rename(&tmp_file, cache_file)
        .await
        .with_context(|| format!("Failed to replace cache file: {:?}", cache_file))?;

    save_metadata(&metadata, metadata_file).await?;
    log::info!("GeoIP database {} cached at {:?}", metadata.version, cache_file);

    Ok((reader, metadata))
}
