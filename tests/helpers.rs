// Shared test helpers: stub collaborators and result fixtures.
//
// The stubs implement the library's collaborator traits so the whole check
// pipeline runs without touching the network.

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use dnscheck::dns::{DnsExchange, Exchange, ExchangeError, RawRecord};
use dnscheck::error_handling::GeoIpError;
use dnscheck::geoip::{GeoInfo, GeoLookup, ReverseLookup};
use dnscheck::models::RecordType;

/// Answers A queries from a fixed table; unknown names time out.
pub struct TableExchange {
    answers: HashMap<String, Vec<Ipv4Addr>>,
    pub calls: AtomicUsize,
}

impl TableExchange {
    pub fn new(entries: &[(&str, &[&str])]) -> Self {
        let answers = entries
            .iter()
            .map(|(name, ips)| {
                (
                    name.to_string(),
                    ips.iter().map(|ip| ip.parse().unwrap()).collect(),
                )
            })
            .collect();
        Self {
            answers,
            calls: AtomicUsize::new(0),
        }
    }

    #[allow(dead_code)] // Used by other test files
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DnsExchange for TableExchange {
    async fn exchange(
        &self,
        _server: &str,
        name: &str,
        _record_type: RecordType,
    ) -> Result<Exchange, ExchangeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.answers.get(name) {
            Some(ips) => Ok(Exchange {
                records: ips.iter().map(|ip| RawRecord::A(*ip)).collect(),
                rtt: Duration::from_millis(2),
            }),
            None => Err(ExchangeError::Timeout),
        }
    }
}

/// GeoIP table keyed by IP; unknown IPs are not found.
pub struct TableGeo(pub HashMap<IpAddr, GeoInfo>);

impl TableGeo {
    #[allow(dead_code)] // Used by other test files
    pub fn with_country(entries: &[(&str, &str)]) -> Self {
        Self(
            entries
                .iter()
                .map(|(ip, country)| {
                    (
                        ip.parse().unwrap(),
                        GeoInfo {
                            country: Some(country.to_string()),
                            ..GeoInfo::default()
                        },
                    )
                })
                .collect(),
        )
    }
}

#[async_trait]
impl GeoLookup for TableGeo {
    async fn lookup(&self, ip: IpAddr) -> Result<GeoInfo, GeoIpError> {
        self.0
            .get(&ip)
            .cloned()
            .ok_or_else(|| GeoIpError::NotFound(ip.to_string()))
    }
}

/// Every IP reverse-resolves to `host-<last octet>.example.`.
pub struct OctetReverse;

#[async_trait]
impl ReverseLookup for OctetReverse {
    async fn reverse_lookup(&self, ip: IpAddr) -> Result<Vec<String>, GeoIpError> {
        match ip {
            IpAddr::V4(v4) => Ok(vec![format!("host-{}.example.", v4.octets()[3])]),
            IpAddr::V6(_) => Err(GeoIpError::Reverse {
                ip: ip.to_string(),
                message: "no PTR".to_string(),
            }),
        }
    }
}
