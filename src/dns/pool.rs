//! Concurrent resolution of a request set.
//!
//! One task per host, admitted through a semaphore. Each task retries only on
//! timeout, picks a random resolver per attempt, and appends exactly one
//! [`AnswerRecord`] to a shared collection. The caller gets the full set back,
//! ranked, once every task has finished.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use futures::stream::{FuturesUnordered, StreamExt};
use rand::seq::IndexedRandom;
use tokio_retry::strategy::FixedInterval;
use tokio_retry::RetryIf;

use super::evaluate::evaluate;
use super::exchange::{DnsExchange, Exchange, ExchangeError};
use crate::config::{
    DEFAULT_BATCH_LIMIT, DEFAULT_CONCURRENCY, DEFAULT_MAX_RETRIES, DNS_ATTEMPT_TIMEOUT,
    RETRY_DELAY_MS,
};
use crate::error_handling::{ConfigError, InfoType, LookupErrorKind, ProcessingStats};
use crate::initialization::init_semaphore;
use crate::models::{AnswerError, AnswerRecord, HostRequest, RecordType, RequestSet, ResultSet};
use crate::report::rank;

/// Limits applied to one resolution run.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Largest accepted batch.
    pub batch_limit: usize,
    /// Lookups in flight at once.
    pub concurrency: usize,
    /// Total attempts per host, initial attempt included.
    pub max_retries: usize,
    /// Time budget of a single attempt.
    pub attempt_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            batch_limit: DEFAULT_BATCH_LIMIT,
            concurrency: DEFAULT_CONCURRENCY,
            max_retries: DEFAULT_MAX_RETRIES,
            attempt_timeout: DNS_ATTEMPT_TIMEOUT,
        }
    }
}

impl PoolConfig {
    /// Checks a run against these limits before any lookup is issued.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found, in this order: batch size,
    /// resolver list, record type, concurrency, retries.
    pub fn validate(
        &self,
        requests: &RequestSet,
        resolvers: &[String],
        record_type: &str,
    ) -> Result<RecordType, ConfigError> {
        if requests.len() > self.batch_limit {
            return Err(ConfigError::BatchTooLarge {
                count: requests.len(),
                limit: self.batch_limit,
            });
        }
        if resolvers.is_empty() {
            return Err(ConfigError::NoResolvers);
        }
        let record_type = RecordType::from_query_str(record_type)?;
        if self.concurrency == 0 {
            return Err(ConfigError::InvalidConcurrency);
        }
        if self.max_retries == 0 {
            return Err(ConfigError::InvalidRetries);
        }
        Ok(record_type)
    }
}

/// Shared state of one host lookup, cloned into each task.
#[derive(Clone)]
struct HostLookup {
    exchange: Arc<dyn DnsExchange>,
    resolvers: Arc<[String]>,
    record_type: RecordType,
    max_retries: usize,
    attempt_timeout: Duration,
    stats: Arc<ProcessingStats>,
}

impl HostLookup {
    fn pick_resolver(&self) -> Result<String, ExchangeError> {
        self.resolvers
            .choose(&mut rand::rng())
            .cloned()
            .ok_or_else(|| ExchangeError::InvalidServer("no resolver available".to_string()))
    }

    async fn attempt(&self, name: &str, attempts: &AtomicU32) -> Result<Exchange, ExchangeError> {
        if attempts.fetch_add(1, Ordering::SeqCst) > 0 {
            self.stats.increment_info(InfoType::DnsRetry);
        }

        let server = self.pick_resolver()?;
        log::trace!("Querying {} for {} {}", server, self.record_type, name);

        match tokio::time::timeout(
            self.attempt_timeout,
            self.exchange.exchange(&server, name, self.record_type),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(ExchangeError::Timeout),
        }
    }

    /// Resolves one host, retrying timeouts up to the attempt budget.
    async fn run(&self, request: &HostRequest) -> AnswerRecord {
        let attempts = AtomicU32::new(0);
        let strategy =
            FixedInterval::from_millis(RETRY_DELAY_MS).take(self.max_retries.saturating_sub(1));

        let result = RetryIf::spawn(
            strategy,
            || self.attempt(&request.name, &attempts),
            |error: &ExchangeError| error.is_timeout(),
        )
        .await;

        match result {
            Ok(exchange) => evaluate(request, self.record_type, &exchange),
            Err(error) => {
                log::debug!(
                    "Lookup of {} failed after {} attempt(s): {}",
                    request.name,
                    attempts.load(Ordering::SeqCst),
                    error
                );
                AnswerRecord::failed(
                    request,
                    self.record_type,
                    AnswerError {
                        kind: error.kind(),
                        message: error.to_string(),
                    },
                )
            }
        }
    }
}

fn push_answer(answers: &Mutex<Vec<AnswerRecord>>, record: AnswerRecord) {
    answers
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .push(record);
}

fn task_failed(request: &HostRequest, record_type: RecordType, message: String) -> AnswerRecord {
    AnswerRecord::failed(
        request,
        record_type,
        AnswerError {
            kind: LookupErrorKind::TaskFailed,
            message,
        },
    )
}

/// Fans lookups for a request set out over a resolver list.
pub struct ResolutionPool {
    exchange: Arc<dyn DnsExchange>,
    config: PoolConfig,
    stats: Arc<ProcessingStats>,
}

impl ResolutionPool {
    pub fn new(exchange: Arc<dyn DnsExchange>, config: PoolConfig) -> Self {
        Self {
            exchange,
            config,
            stats: Arc::new(ProcessingStats::new()),
        }
    }

    /// Shares an existing stats tracker instead of a private one.
    pub fn with_stats(mut self, stats: Arc<ProcessingStats>) -> Self {
        self.stats = stats;
        self
    }

    pub fn stats(&self) -> &Arc<ProcessingStats> {
        &self.stats
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Resolves every request and returns the ranked result set.
    ///
    /// Exactly one answer is produced per request. Per-host failures are stored
    /// on the answer and never abort the batch.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] before any lookup when the run is invalid.
    pub async fn resolve_all(
        &self,
        requests: &RequestSet,
        resolvers: &[String],
        record_type: &str,
    ) -> Result<ResultSet, ConfigError> {
        let record_type = self.config.validate(requests, resolvers, record_type)?;
        let scan_timestamp = Utc::now().to_rfc3339();

        log::info!(
            "Resolving {} hosts ({} records) over {} resolver(s), concurrency {}",
            requests.len(),
            record_type,
            resolvers.len(),
            self.config.concurrency
        );

        let semaphore = init_semaphore(self.config.concurrency);
        let answers = Arc::new(Mutex::new(Vec::with_capacity(requests.len())));
        let lookup = HostLookup {
            exchange: Arc::clone(&self.exchange),
            resolvers: resolvers.into(),
            record_type,
            max_retries: self.config.max_retries,
            attempt_timeout: self.config.attempt_timeout,
            stats: Arc::clone(&self.stats),
        };

        let mut tasks = FuturesUnordered::new();

        for request in requests {
            let permit = match Arc::clone(&semaphore).acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    log::warn!("Semaphore closed, failing lookup of {}", request.name);
                    push_answer(
                        &answers,
                        task_failed(request, record_type, "semaphore closed".to_string()),
                    );
                    continue;
                }
            };

            let lookup = lookup.clone();
            let answers_for_task = Arc::clone(&answers);
            let task_request = request.clone();
            let handle = tokio::spawn(async move {
                let _permit = permit;
                let record = lookup.run(&task_request).await;
                push_answer(&answers_for_task, record);
            });

            let request = request.clone();
            tasks.push(async move { (request, handle.await) });
        }

        while let Some((request, joined)) = tasks.next().await {
            if let Err(e) = joined {
                log::warn!("Lookup task for {} failed: {}", request.name, e);
                push_answer(&answers, task_failed(&request, record_type, e.to_string()));
            }
        }

        let answers = std::mem::take(
            &mut *answers
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner()),
        );
        self.stats.record_answers(&answers);

        let errored = answers.iter().filter(|a| a.is_error()).count();
        log::info!(
            "Resolved {} hosts ({} with errors)",
            answers.len(),
            errored
        );

        Ok(ResultSet {
            request: requests.clone(),
            answers: rank(answers),
            record_type: record_type.to_string(),
            scan_timestamp,
        })
    }
}

/// Resolves a request set with a one-off pool.
///
/// # Errors
///
/// See [`ResolutionPool::resolve_all`].
pub async fn resolve_all(
    requests: &RequestSet,
    resolvers: &[String],
    record_type: &str,
    config: &PoolConfig,
    exchange: Arc<dyn DnsExchange>,
) -> Result<ResultSet, ConfigError> {
    ResolutionPool::new(exchange, config.clone())
        .resolve_all(requests, resolvers, record_type)
        .await
}
