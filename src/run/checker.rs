//! The check pipeline: parse, resolve, summarize, enrich, persist.

use std::collections::HashMap;
use std::future::Future;
use std::time::Instant;

use anyhow::{Context, Result};
use log::{info, warn};

use crate::app::output::{render_json, render_plain, Report};
use crate::app::statistics::{print_error_statistics, print_run_summary};
use crate::config::OutputFormat;
use crate::dns::ResolutionPool;
use crate::geoip::{GeoEnricher, GeoInfo};
use crate::models::{RecordType, RequestSet, ResultSet};
use crate::parse::parse_hosts;
use crate::report::{compute_stats, Stats};
use crate::storage::ResultStore;

/// A finished (or reloaded) check, ready to print.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Storage key; `None` when the result was not saved.
    pub key: Option<String>,
    pub result: ResultSet,
    pub stats: Stats,
    pub geoip: HashMap<String, GeoInfo>,
}

impl RunOutcome {
    /// Builds the outcome for an existing result, enriching it when possible.
    pub async fn summarize(
        key: Option<String>,
        result: ResultSet,
        enricher: Option<&GeoEnricher>,
    ) -> Self {
        let stats = compute_stats(&result.answers);
        let geoip = match enricher {
            Some(enricher) => enricher.enrich(&result.answers).await,
            None => HashMap::new(),
        };
        Self {
            key,
            result,
            stats,
            geoip,
        }
    }

    pub fn render(&self, format: OutputFormat) -> Result<String> {
        let report = Report {
            key: self.key.as_deref(),
            result: &self.result,
            stats: &self.stats,
            geoip: &self.geoip,
        };
        match format {
            OutputFormat::Plain => Ok(render_plain(&report)),
            OutputFormat::Json => render_json(&report).context("Failed to serialize result"),
        }
    }
}

/// A parsed and validated check, not yet resolved.
#[derive(Debug, Clone)]
pub struct CheckPlan {
    pub requests: RequestSet,
    pub resolvers: Vec<String>,
    pub record_type: RecordType,
}

/// Runs checks with a resolution pool and optional enrichment and storage.
pub struct Checker {
    pool: ResolutionPool,
    enricher: Option<GeoEnricher>,
    store: Option<ResultStore>,
}

impl Checker {
    pub fn new(pool: ResolutionPool) -> Self {
        Self {
            pool,
            enricher: None,
            store: None,
        }
    }

    pub fn with_enricher(mut self, enricher: Option<GeoEnricher>) -> Self {
        self.enricher = enricher;
        self
    }

    pub fn with_store(mut self, store: Option<ResultStore>) -> Self {
        self.store = store;
        self
    }

    /// Parses the hosts and validates the run without any I/O.
    ///
    /// # Errors
    ///
    /// Fails when the input is malformed or the run is misconfigured.
    pub fn plan(&self, raw: &str, resolvers: &[String], record_type: &str) -> Result<CheckPlan> {
        let requests = parse_hosts(raw).context("Failed to parse hosts")?;
        let record_type = self
            .pool
            .config()
            .validate(&requests, resolvers, record_type)
            .context("Invalid check configuration")?;
        info!("Parsed {} host(s)", requests.len());

        Ok(CheckPlan {
            requests,
            resolvers: resolvers.to_vec(),
            record_type,
        })
    }

    /// Checks every host in `raw` against `resolvers`.
    ///
    /// # Errors
    ///
    /// Fails without any lookup when the input is malformed or the run is
    /// misconfigured, and after the lookups when the result cannot be saved.
    /// Per-host lookup failures are part of the returned result.
    pub async fn check(
        &self,
        raw: &str,
        resolvers: &[String],
        record_type: &str,
    ) -> Result<RunOutcome> {
        let plan = self.plan(raw, resolvers, record_type)?;
        self.run(&plan).await
    }

    /// Validates the run first, then lets `setup` open storage and enrichment.
    ///
    /// `setup` is not called when validation fails, so no database is created
    /// and no GeoIP download starts for a run that cannot proceed.
    ///
    /// # Errors
    ///
    /// See [`Checker::check`]; errors from `setup` are returned as is.
    pub async fn check_with<F, Fut>(
        self,
        raw: &str,
        resolvers: &[String],
        record_type: &str,
        setup: F,
    ) -> Result<RunOutcome>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(Option<ResultStore>, Option<GeoEnricher>)>>,
    {
        let plan = self.plan(raw, resolvers, record_type)?;
        let (store, enricher) = setup().await?;
        self.with_store(store)
            .with_enricher(enricher)
            .run(&plan)
            .await
    }

    /// Resolves, persists, summarizes and enriches a validated check.
    ///
    /// # Errors
    ///
    /// Fails when the result cannot be saved.
    pub async fn run(&self, plan: &CheckPlan) -> Result<RunOutcome> {
        let start = Instant::now();

        let result = self
            .pool
            .resolve_all(
                &plan.requests,
                &plan.resolvers,
                plan.record_type.as_ref(),
            )
            .await
            .context("Invalid check configuration")?;

        let key = match &self.store {
            Some(store) => {
                let key = store.save(&result).await.context("Failed to save result")?;
                info!("Result saved under key {}", key);
                Some(key)
            }
            None => None,
        };

        if self.enricher.is_none() {
            info!("GeoIP enrichment disabled");
        }
        let outcome = RunOutcome::summarize(key, result, self.enricher.as_ref()).await;

        print_error_statistics(self.pool.stats());
        print_run_summary(
            outcome.result.answers.len(),
            &outcome.stats,
            start.elapsed().as_secs_f64(),
        );
        if outcome.stats.errored_pct > 0.0 {
            warn!(
                "{:.0}% of lookups failed, see the error column for details",
                outcome.stats.errored_pct
            );
        }

        Ok(outcome)
    }
}
