//! `hickory-resolver` backed collaborators.
//!
//! - [`HickoryExchange`]: one single-attempt, cache-less UDP resolver per
//!   configured server, used by the resolution pool
//! - [`SystemReverseLookup`]: PTR lookups through the system resolver, used by
//!   GeoIP enrichment

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use hickory_resolver::config::{NameServerConfig, Protocol, ResolverConfig, ResolverOpts};
use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use hickory_resolver::proto::error::ProtoErrorKind;
use hickory_resolver::proto::rr::{RData, RecordType as WireType};
use hickory_resolver::TokioAsyncResolver;

use super::exchange::{DnsExchange, Exchange, ExchangeError, RawRecord};
use super::records::trim_root;
use crate::config::{DNS_ATTEMPT_TIMEOUT, DNS_PORT};
use crate::error_handling::GeoIpError;
use crate::geoip::ReverseLookup;
use crate::models::RecordType;

/// Parses `ip` or `ip:port` (IPv6 as `[ip]:port`), defaulting to port 53.
pub fn parse_server(server: &str) -> Result<SocketAddr, ExchangeError> {
    let server = server.trim();
    if let Ok(addr) = server.parse::<SocketAddr>() {
        return Ok(addr);
    }
    server
        .parse::<IpAddr>()
        .map(|ip| SocketAddr::new(ip, DNS_PORT))
        .map_err(|_| ExchangeError::InvalidServer(server.to_string()))
}

fn wire_type(record_type: RecordType) -> WireType {
    match record_type {
        RecordType::A => WireType::A,
        RecordType::AAAA => WireType::AAAA,
        RecordType::CNAME => WireType::CNAME,
        RecordType::MX => WireType::MX,
        RecordType::NS => WireType::NS,
        RecordType::TXT => WireType::TXT,
    }
}

fn raw_record(rdata: &RData) -> RawRecord {
    match rdata {
        RData::A(a) => RawRecord::A(a.0),
        RData::AAAA(aaaa) => RawRecord::AAAA(aaaa.0),
        RData::CNAME(cname) => RawRecord::CNAME(cname.0.to_utf8()),
        RData::MX(mx) => RawRecord::MX {
            preference: mx.preference(),
            exchange: mx.exchange().to_utf8(),
        },
        RData::NS(ns) => RawRecord::NS(ns.0.to_utf8()),
        RData::TXT(txt) => RawRecord::TXT(
            txt.iter()
                .map(|bytes| String::from_utf8_lossy(bytes).to_string())
                .collect(),
        ),
        other => RawRecord::Other(other.record_type().to_string()),
    }
}

/// Maps a resolver failure onto the exchange taxonomy.
fn classify(error: ResolveError) -> ExchangeError {
    match error.kind() {
        ResolveErrorKind::Timeout => ExchangeError::Timeout,
        ResolveErrorKind::Proto(proto) if matches!(proto.kind(), ProtoErrorKind::Timeout) => {
            ExchangeError::Timeout
        }
        ResolveErrorKind::NoRecordsFound { .. } => ExchangeError::NoRecords(error.to_string()),
        _ => ExchangeError::Protocol(error.to_string()),
    }
}

/// Production [`DnsExchange`] over `hickory-resolver`.
///
/// Each server gets its own resolver configured for exactly one UDP attempt
/// with caching, hosts file and search domains disabled, so every call is one
/// real round trip. Resolvers are built on first use and reused afterwards.
pub struct HickoryExchange {
    resolvers: RwLock<HashMap<SocketAddr, Arc<TokioAsyncResolver>>>,
    timeout: Duration,
}

impl Default for HickoryExchange {
    fn default() -> Self {
        Self::new(DNS_ATTEMPT_TIMEOUT)
    }
}

impl HickoryExchange {
    pub fn new(timeout: Duration) -> Self {
        Self {
            resolvers: RwLock::new(HashMap::new()),
            timeout,
        }
    }

    fn resolver_for(&self, addr: SocketAddr) -> Arc<TokioAsyncResolver> {
        {
            let resolvers = self
                .resolvers
                .read()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if let Some(resolver) = resolvers.get(&addr) {
                return Arc::clone(resolver);
            }
        }

        let mut config = ResolverConfig::new();
        config.add_name_server(NameServerConfig::new(addr, Protocol::Udp));

        let mut opts = ResolverOpts::default();
        opts.timeout = self.timeout;
        opts.attempts = 0;
        opts.cache_size = 0;
        opts.ndots = 0;
        opts.use_hosts_file = false;

        let resolver = Arc::new(TokioAsyncResolver::tokio(config, opts));
        let mut resolvers = self
            .resolvers
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(resolvers.entry(addr).or_insert(resolver))
    }
}

#[async_trait]
impl DnsExchange for HickoryExchange {
    async fn exchange(
        &self,
        server: &str,
        name: &str,
        record_type: RecordType,
    ) -> Result<Exchange, ExchangeError> {
        let addr = parse_server(server)?;
        let resolver = self.resolver_for(addr);

        let start = Instant::now();
        let lookup = resolver
            .lookup(name, wire_type(record_type))
            .await
            .map_err(classify)?;
        let rtt = start.elapsed();

        let records: Vec<RawRecord> = lookup.iter().map(raw_record).collect();
        if records.is_empty() {
            return Err(ExchangeError::NoRecords(format!(
                "no {} records for {}",
                record_type, name
            )));
        }

        Ok(Exchange { records, rtt })
    }
}

/// Reverse (PTR) lookups through the system resolver.
pub struct SystemReverseLookup {
    resolver: Arc<TokioAsyncResolver>,
}

impl SystemReverseLookup {
    pub fn new(resolver: Arc<TokioAsyncResolver>) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl ReverseLookup for SystemReverseLookup {
    async fn reverse_lookup(&self, ip: IpAddr) -> Result<Vec<String>, GeoIpError> {
        let response = self
            .resolver
            .reverse_lookup(ip)
            .await
            .map_err(|e| GeoIpError::Reverse {
                ip: ip.to_string(),
                message: e.to_string(),
            })?;

        Ok(response
            .iter()
            .map(|name| trim_root(&name.to_utf8()).to_string())
            .collect())
    }
}
