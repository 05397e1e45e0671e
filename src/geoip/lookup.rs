//! Geolocation and reverse DNS collaborators.
//!
//! - [`GeoLookup`]: IP → [`GeoInfo`], implemented by [`MaxMindLookup`] over an
//!   in-memory GeoLite2-City database
//! - [`ReverseLookup`]: IP → PTR names, implemented in [`crate::dns`]

use std::net::IpAddr;
use std::sync::Arc;

use async_trait::async_trait;
use maxminddb::{geoip2, Reader};

use super::types::{GeoIpMetadata, GeoInfo};
use crate::error_handling::GeoIpError;

/// Looks up the location of an IP address.
#[async_trait]
pub trait GeoLookup: Send + Sync {
    async fn lookup(&self, ip: IpAddr) -> Result<GeoInfo, GeoIpError>;
}

/// Resolves an IP address back to host names.
#[async_trait]
pub trait ReverseLookup: Send + Sync {
    async fn reverse_lookup(&self, ip: IpAddr) -> Result<Vec<String>, GeoIpError>;
}

/// Maps a decoded GeoIP2 City record onto [`GeoInfo`], using English names.
fn geo_info(city: &geoip2::City<'_>) -> GeoInfo {
    let subdivisions: Vec<&str> = city
        .subdivisions
        .iter()
        .filter_map(|sub| sub.names.english)
        .collect();

    GeoInfo {
        city: city.city.names.english.map(str::to_string),
        subdivisions: (!subdivisions.is_empty()).then(|| subdivisions.join(", ")),
        country: city.country.names.english.map(str::to_string),
        country_code: city.country.iso_code.map(str::to_string),
        continent: city.continent.names.english.map(str::to_string),
        continent_code: city.continent.code.map(str::to_string),
        latitude: city.location.latitude,
        longitude: city.location.longitude,
        timezone: city.location.time_zone.map(str::to_string),
        postal_code: city.postal.code.map(str::to_string),
        is_proxy: city.traits.is_anonymous_proxy.unwrap_or(false),
        reverse_hosts: Vec::new(),
    }
}

/// [`GeoLookup`] over a loaded MaxMind database.
#[derive(Clone)]
pub struct MaxMindLookup {
    reader: Arc<Reader<Vec<u8>>>,
    metadata: GeoIpMetadata,
}

impl MaxMindLookup {
    pub fn new(reader: Reader<Vec<u8>>, metadata: GeoIpMetadata) -> Self {
        Self {
            reader: Arc::new(reader),
            metadata,
        }
    }

    pub fn metadata(&self) -> &GeoIpMetadata {
        &self.metadata
    }

    /// Synchronous lookup; the reader is in memory.
    pub fn lookup_ip(&self, ip: IpAddr) -> Result<GeoInfo, GeoIpError> {
        // maxminddb 0.27 API: lookup() returns Result<LookupResult, MaxMindDbError>
        let result = self
            .reader
            .lookup(ip)
            .map_err(|e| GeoIpError::Database(e.to_string()))?;

        if !result.has_data() {
            return Err(GeoIpError::NotFound(ip.to_string()));
        }

        match result.decode::<geoip2::City>() {
            Ok(Some(city)) => Ok(geo_info(&city)),
            Ok(None) => Err(GeoIpError::NotFound(ip.to_string())),
            Err(e) => Err(GeoIpError::Database(e.to_string())),
        }
    }
}

#[async_trait]
impl GeoLookup for MaxMindLookup {
    async fn lookup(&self, ip: IpAddr) -> Result<GeoInfo, GeoIpError> {
        self.lookup_ip(ip)
    }
}
