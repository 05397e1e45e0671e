//! Wiring of production collaborators for the CLI commands.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use log::{info, warn};
use tokio::io::AsyncReadExt;

use crate::config::{CheckArgs, Config, ResolverArgs, ResolverGroups, ShowArgs};
use crate::dns::{HickoryExchange, ResolutionPool, SystemReverseLookup};
use crate::error_handling::ProcessingStats;
use crate::geoip::{init_geoip, GeoEnricher};
use crate::initialization::init_resolver;
use crate::storage::ResultStore;

use super::checker::{Checker, RunOutcome};

/// Reads the hosts file, or stdin for `-`.
pub async fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        info!("Reading hosts from stdin");
        let mut raw = String::new();
        tokio::io::stdin()
            .read_to_string(&mut raw)
            .await
            .context("Failed to read hosts from stdin")?;
        return Ok(raw);
    }

    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read hosts file {}", path.display()))
}

/// Loads GeoIP and the reverse resolver. Any failure disables enrichment.
pub async fn init_enricher(
    source: Option<Option<&str>>,
    stats: Arc<ProcessingStats>,
) -> Option<GeoEnricher> {
    let path = source?;

    let geo = match init_geoip(path, None).await {
        Ok(Some(geo)) => geo,
        Ok(None) => return None,
        Err(e) => {
            warn!("GeoIP disabled: {:#}", e);
            return None;
        }
    };

    let reverse = match init_resolver() {
        Ok(resolver) => SystemReverseLookup::new(resolver),
        Err(e) => {
            warn!("GeoIP disabled, no resolver for reverse lookups: {}", e);
            return None;
        }
    };

    Some(GeoEnricher::new(Arc::new(geo), Arc::new(reverse)).with_stats(stats))
}

/// Resolver groups for the given custom resolver flags.
pub fn resolver_groups(custom: &[String]) -> ResolverGroups {
    ResolverGroups::resolve(custom)
}

/// `dnscheck check`
pub async fn run_check(config: &Config, args: &CheckArgs) -> Result<RunOutcome> {
    let groups = resolver_groups(&args.resolver);
    let group = match (&args.resolvers, groups.default_group()) {
        (Some(name), _) => name.clone(),
        (None, Some(name)) => name.to_string(),
        (None, None) => anyhow::bail!("No resolver groups available"),
    };
    let resolvers = groups.get(&group)?.to_vec();
    info!("Using resolver group {} ({})", group, resolvers.join(", "));

    let raw = read_input(&args.file).await?;

    let stats = Arc::new(ProcessingStats::new());
    let pool_config = args.to_pool_config();
    let exchange = Arc::new(HickoryExchange::new(pool_config.attempt_timeout));
    let pool = ResolutionPool::new(exchange, pool_config).with_stats(Arc::clone(&stats));

    // storage and GeoIP are only set up once the hosts and options are valid
    Checker::new(pool)
        .check_with(&raw, &resolvers, &args.record_type, || async {
            let store = if args.no_save {
                None
            } else {
                Some(ResultStore::open(&config.db_path).await.with_context(|| {
                    format!("Failed to open database {}", config.db_path.display())
                })?)
            };
            let enricher = init_enricher(args.geoip_source(), Arc::clone(&stats)).await;
            Ok::<_, anyhow::Error>((store, enricher))
        })
        .await
}

/// `dnscheck show`
pub async fn run_show(config: &Config, args: &ShowArgs) -> Result<RunOutcome> {
    let store = ResultStore::open(&config.db_path)
        .await
        .with_context(|| format!("Failed to open database {}", config.db_path.display()))?;
    let result = store
        .load(&args.key)
        .await
        .with_context(|| format!("Failed to load result {}", args.key))?;

    let enricher = init_enricher(args.geoip_source(), Arc::new(ProcessingStats::new())).await;
    Ok(RunOutcome::summarize(Some(args.key.clone()), result, enricher.as_ref()).await)
}

/// `dnscheck resolvers`
pub fn run_resolvers(args: &ResolverArgs) -> String {
    let mut out = String::new();
    for (name, servers) in resolver_groups(&args.resolver).iter() {
        out.push_str(name);
        out.push_str(": ");
        out.push_str(&servers.join(", "));
        out.push('\n');
    }
    out
}
