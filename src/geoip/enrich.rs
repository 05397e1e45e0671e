//! Best-effort GeoIP enrichment of answer values.
//!
//! Every distinct IP among the non-errored answers is looked up once, under a
//! semaphore of its own and a per-lookup time limit, with no retry. Lookups
//! that fail or time out are dropped; enrichment never fails a run and never
//! touches the answers themselves.

use std::collections::{HashMap, HashSet};
use std::net::IpAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::stream::{FuturesUnordered, StreamExt};

use super::lookup::{GeoLookup, ReverseLookup};
use super::types::GeoInfo;
use crate::config::{GEOIP_CONCURRENCY, GEOIP_LOOKUP_TIMEOUT};
use crate::dns::trim_root;
use crate::error_handling::{ErrorType, InfoType, ProcessingStats};
use crate::initialization::init_semaphore;
use crate::models::AnswerRecord;

/// Distinct IP values of non-errored answers, in first-seen order.
pub fn collect_ips(answers: &[AnswerRecord]) -> Vec<IpAddr> {
    let mut seen = HashSet::new();
    answers
        .iter()
        .filter(|answer| !answer.is_error())
        .flat_map(|answer| answer.raw_values.iter())
        .filter_map(|value| value.parse::<IpAddr>().ok())
        .filter(|ip| seen.insert(*ip))
        .collect()
}

/// Runs GeoIP and reverse lookups for answer values.
pub struct GeoEnricher {
    geo: Arc<dyn GeoLookup>,
    reverse: Arc<dyn ReverseLookup>,
    concurrency: usize,
    timeout: Duration,
    stats: Arc<ProcessingStats>,
}

impl GeoEnricher {
    pub fn new(geo: Arc<dyn GeoLookup>, reverse: Arc<dyn ReverseLookup>) -> Self {
        Self {
            geo,
            reverse,
            concurrency: GEOIP_CONCURRENCY,
            timeout: GEOIP_LOOKUP_TIMEOUT,
            stats: Arc::new(ProcessingStats::new()),
        }
    }

    /// Caps concurrent lookups (at least one).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Time budget of each GeoIP and reverse lookup.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_stats(mut self, stats: Arc<ProcessingStats>) -> Self {
        self.stats = stats;
        self
    }

    /// Maps each resolvable IP string to its location.
    pub async fn enrich(&self, answers: &[AnswerRecord]) -> HashMap<String, GeoInfo> {
        let ips = collect_ips(answers);
        if ips.is_empty() {
            return HashMap::new();
        }
        log::debug!("Enriching {} distinct IP(s)", ips.len());

        let semaphore = init_semaphore(self.concurrency);
        let results = Arc::new(Mutex::new(HashMap::with_capacity(ips.len())));
        let mut tasks = FuturesUnordered::new();

        for ip in ips {
            let permit = match Arc::clone(&semaphore).acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    log::warn!("Semaphore closed, skipping GeoIP lookup of {}", ip);
                    continue;
                }
            };

            let geo = Arc::clone(&self.geo);
            let reverse = Arc::clone(&self.reverse);
            let stats = Arc::clone(&self.stats);
            let results = Arc::clone(&results);
            let timeout = self.timeout;
            tasks.push(tokio::spawn(async move {
                let _permit = permit;
                if let Some(info) = lookup_one(ip, geo.as_ref(), reverse.as_ref(), timeout, &stats).await {
                    results
                        .lock()
                        .unwrap_or_else(|poisoned| poisoned.into_inner())
                        .insert(ip.to_string(), info);
                }
            }));
        }

        while let Some(joined) = tasks.next().await {
            if let Err(e) = joined {
                log::debug!("GeoIP task failed: {}", e);
                self.stats.increment_error(ErrorType::GeoIpLookupError);
            }
        }

        let taken = std::mem::take(&mut *results.lock().unwrap_or_else(|poisoned| poisoned.into_inner()));
        taken
    }
}

async fn lookup_one(
    ip: IpAddr,
    geo: &dyn GeoLookup,
    reverse: &dyn ReverseLookup,
    timeout: Duration,
    stats: &ProcessingStats,
) -> Option<GeoInfo> {
    let mut info = match tokio::time::timeout(timeout, geo.lookup(ip)).await {
        Ok(Ok(info)) => info,
        Ok(Err(e)) => {
            log::debug!("GeoIP lookup of {} failed: {}", ip, e);
            stats.increment_error(ErrorType::GeoIpLookupError);
            return None;
        }
        Err(_) => {
            log::debug!("GeoIP lookup of {} timed out", ip);
            stats.increment_error(ErrorType::GeoIpLookupError);
            return None;
        }
    };

    match tokio::time::timeout(timeout, reverse.reverse_lookup(ip)).await {
        Ok(Ok(names)) => {
            info.reverse_hosts = names
                .iter()
                .map(|name| trim_root(name).to_string())
                .collect();
        }
        Ok(Err(e)) => {
            log::debug!("Reverse lookup of {} failed: {}", ip, e);
            stats.increment_error(ErrorType::ReverseDnsError);
        }
        Err(_) => {
            log::debug!("Reverse lookup of {} timed out", ip);
            stats.increment_error(ErrorType::ReverseDnsError);
        }
    }

    stats.increment_info(InfoType::GeoIpEnriched);
    Some(info)
}

/// Enriches answers with a one-off [`GeoEnricher`].
pub async fn enrich(
    answers: &[AnswerRecord],
    geo: Arc<dyn GeoLookup>,
    reverse: Arc<dyn ReverseLookup>,
    concurrency: usize,
) -> HashMap<String, GeoInfo> {
    GeoEnricher::new(geo, reverse)
        .with_concurrency(concurrency)
        .enrich(answers)
        .await
}
