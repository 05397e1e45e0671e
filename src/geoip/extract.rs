//! Archive extraction utilities.
//!
//! Downloaded databases come in three shapes: a bare `.mmdb`, a gzipped
//! `.mmdb.gz`, or a MaxMind `.tar.gz` bundle. [`unpack_database`] accepts any
//! of them and returns the raw database bytes.

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use std::io::Read;
use tar::Archive;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
const TAR_MAGIC_OFFSET: usize = 257;
const TAR_MAGIC: &[u8] = b"ustar";

pub(crate) fn is_gzip(bytes: &[u8]) -> bool {
    bytes.starts_with(&GZIP_MAGIC)
}

fn is_tar(bytes: &[u8]) -> bool {
    bytes
        .get(TAR_MAGIC_OFFSET..TAR_MAGIC_OFFSET + TAR_MAGIC.len())
        .is_some_and(|magic| magic == TAR_MAGIC)
}

/// Decompresses a gzip stream.
pub(crate) fn gunzip(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut decoded = Vec::new();
    GzDecoder::new(bytes)
        .read_to_end(&mut decoded)
        .context("Failed to decompress gzip data")?;
    Ok(decoded)
}

/// Extracts `<db_name>.mmdb` from an uncompressed tar archive.
pub(crate) fn extract_mmdb_from_tar(tar_bytes: &[u8], db_name: &str) -> Result<Vec<u8>> {
    let expected_name = format!("{}.mmdb", db_name);
    let mut archive = Archive::new(tar_bytes);

    let entries = archive
        .entries()
        .context("Failed to read tar archive entries")?;

    for entry_result in entries {
        let mut entry = entry_result.context("Failed to read tar entry")?;
        let path = entry.path().context("Failed to get entry path")?;

        // file_name() drops any directory prefix
        if path.file_name().and_then(|name| name.to_str()) == Some(expected_name.as_str()) {
            let mut mmdb_bytes = Vec::new();
            entry
                .read_to_end(&mut mmdb_bytes)
                .with_context(|| format!("Failed to read {} from archive", expected_name))?;
            log::info!(
                "Extracted {} from archive ({} bytes)",
                expected_name,
                mmdb_bytes.len()
            );
            return Ok(mmdb_bytes);
        }
    }

    Err(anyhow::anyhow!("{} not found in tar archive", expected_name))
}

/// Returns the database bytes inside a download.
pub(crate) fn unpack_database(downloaded: Vec<u8>, db_name: &str) -> Result<Vec<u8>> {
    let bytes = if is_gzip(&downloaded) {
        log::debug!("Decompressing gzip GeoIP download");
        gunzip(&downloaded)?
    } else {
        downloaded
    };

    if is_tar(&bytes) {
        extract_mmdb_from_tar(&bytes, db_name)
    } else {
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use tar::Builder;

    fn create_test_tar(files: &[(&str, &[u8])]) -> Vec<u8> {
        let mut tar_builder = Builder::new(Vec::new());
        for (name, content) in files {
            let mut header = tar::Header::new_gnu();
            header.set_path(name).unwrap();
            header.set_size(content.len() as u64);
            header.set_cksum();
            tar_builder.append(&header, *content).unwrap();
        }
        tar_builder.into_inner().unwrap()
    }

    fn gzip(bytes: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(bytes).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_unpack_plain_database() {
        let result = unpack_database(b"plain mmdb bytes".to_vec(), "GeoLite2-City").unwrap();
        assert_eq!(result, b"plain mmdb bytes");
    }

    #[test]
    fn test_unpack_gzipped_database() {
        let result = unpack_database(gzip(b"gzipped mmdb"), "GeoLite2-City").unwrap();
        assert_eq!(result, b"gzipped mmdb");
    }

    #[test]
    fn test_unpack_tar_gz_bundle() {
        let tar = create_test_tar(&[
            ("GeoLite2-City_20240101/README.txt", b"readme"),
            ("GeoLite2-City_20240101/GeoLite2-City.mmdb", b"bundled mmdb"),
        ]);
        let result = unpack_database(gzip(&tar), "GeoLite2-City").unwrap();
        assert_eq!(result, b"bundled mmdb");
    }

    #[test]
    fn test_tar_without_database() {
        let tar = create_test_tar(&[("README.txt", b"readme content")]);
        let err = unpack_database(gzip(&tar), "GeoLite2-City").unwrap_err();
        assert!(err.to_string().contains("GeoLite2-City.mmdb not found"));
    }

    #[test]
    fn test_tar_name_is_case_sensitive() {
        let tar = create_test_tar(&[("geolite2-city.mmdb", b"lowercase")]);
        assert!(extract_mmdb_from_tar(&tar, "GeoLite2-City").is_err());
    }

    #[test]
    fn test_truncated_gzip_is_an_error() {
        let mut data = gzip(b"some database bytes that will be cut short");
        data.truncate(12);
        assert!(unpack_database(data, "GeoLite2-City").is_err());
    }

    #[test]
    fn test_magic_detection() {
        assert!(is_gzip(&gzip(b"x")));
        assert!(!is_gzip(b"x"));
        assert!(is_tar(&create_test_tar(&[("a.txt", b"a")])));
        assert!(!is_tar(b"short"));
    }
}
