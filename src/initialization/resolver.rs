//! System DNS resolver initialization.
//!
//! The resolution pool talks to explicit resolver addresses through
//! [`crate::dns::HickoryExchange`]. This resolver serves the reverse (PTR)
//! lookups of GeoIP enrichment.

use std::sync::Arc;
use std::time::Duration;

use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::system_conf::read_system_conf;
use hickory_resolver::TokioAsyncResolver;

use crate::error_handling::InitializationError;

/// Initializes the resolver used for reverse lookups.
///
/// Uses the system configuration when it can be read, otherwise hickory's
/// default upstreams, with a short timeout and one attempt in both cases.
///
/// # Errors
///
/// Returns `InitializationError::DnsResolverError` if the resolver cannot be built.
pub fn init_resolver() -> Result<Arc<TokioAsyncResolver>, InitializationError> {
    let (config, mut opts) = match read_system_conf() {
        Ok(system) => system,
        Err(e) => {
            log::warn!("Unable to read system DNS configuration, using defaults: {}", e);
            (ResolverConfig::default(), ResolverOpts::default())
        }
    };

    if config.name_servers().is_empty() {
        return Err(InitializationError::DnsResolverError(
            "no name servers configured".to_string(),
        ));
    }

    Ok(Arc::new(TokioAsyncResolver::tokio(config, reverse_opts(opts))))
}

/// Options for reverse lookups: short timeout, one attempt, no search domains.
fn reverse_opts(mut opts: ResolverOpts) -> ResolverOpts {
    opts.timeout = Duration::from_secs(crate::config::DNS_TIMEOUT_SECS);
    // single attempt, enrichment never retries
    opts.attempts = 0;
    opts.ndots = 0;
    opts
}
