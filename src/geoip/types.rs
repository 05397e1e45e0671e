//! GeoIP data structures.
//!
//! This module defines the data structures used for GeoIP lookups and metadata.

use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// Metadata about the GeoIP database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoIpMetadata {
    /// Source path or URL
    pub source: String,
    /// Database build date/version (extracted from database)
    pub version: String,
    /// Last update timestamp
    pub last_updated: SystemTime,
}

/// Geolocation of one IP address, plus the names it reverse-resolves to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoInfo {
    pub city: Option<String>,
    /// Subdivision names, most general first, joined with ", ".
    pub subdivisions: Option<String>,
    pub country: Option<String>,
    pub country_code: Option<String>,
    pub continent: Option<String>,
    pub continent_code: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timezone: Option<String>,
    pub postal_code: Option<String>,
    pub is_proxy: bool,
    /// PTR names without the trailing root dot.
    pub reverse_hosts: Vec<String>,
}

impl GeoInfo {
    /// Short location line, e.g. `"Mountain View, California, United States (NA)"`.
    pub fn location_summary(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        for part in [&self.city, &self.subdivisions, &self.country]
            .into_iter()
            .flatten()
        {
            if !part.is_empty() {
                parts.push(part);
            }
        }

        let mut summary = if parts.is_empty() {
            "unknown location".to_string()
        } else {
            parts.join(", ")
        };
        if let Some(code) = self.continent_code.as_deref().filter(|c| !c.is_empty()) {
            summary.push_str(&format!(" ({})", code));
        }
        summary
    }
}
