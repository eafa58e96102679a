//! Registry gate for candidate websites.

use std::time::Duration;

use futures::future;
use futures::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::common::utils::registry_domain;
use crate::common::{SourcingError, SourcingResult};
use crate::kernel::{BaseRegistryLookup, DomainRegistration};

/// One registry lookup, bounded by `timeout` and `cancel`
async fn lookup_registration(
    domain: &str,
    registry: &dyn BaseRegistryLookup,
    timeout: Duration,
    cancel: &CancellationToken,
) -> SourcingResult<Option<DomainRegistration>> {
    let lookup = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(SourcingError::Cancelled),
        lookup = tokio::time::timeout(timeout, registry.lookup(domain)) => lookup,
    };

    match lookup {
        Ok(result) => result.map_err(|e| SourcingError::Validation(e.to_string())),
        Err(_) => Err(SourcingError::Validation(format!(
            "no answer for {} within {}s",
            domain,
            timeout.as_secs_f32()
        ))),
    }
}

async fn is_registered(
    url: &str,
    registry: &dyn BaseRegistryLookup,
    timeout: Duration,
    cancel: &CancellationToken,
) -> bool {
    let Some(domain) = registry_domain(url) else {
        debug!(url, "No domain to look up");
        return false;
    };

    match lookup_registration(&domain, registry, timeout, cancel).await {
        Ok(Some(registration)) => {
            debug!(
                domain = %registration.domain,
                registered_at = ?registration.registered_at,
                expires_at = ?registration.expires_at,
                "Domain registered"
            );
            true
        }
        Ok(None) => {
            debug!(domain = %domain, "Domain not registered");
            false
        }
        Err(SourcingError::Cancelled) => false,
        Err(e) => {
            warn!(domain = %domain, error = %e, "Registry lookup failed");
            false
        }
    }
}

/// The subset of `urls` whose domain has a registry record.
///
/// Lookups run `concurrency` at a time and the output follows completion
/// order, not input order. Failed, timed out and cancelled lookups exclude
/// their URL.
pub async fn validate_domains(
    urls: &[String],
    registry: &dyn BaseRegistryLookup,
    concurrency: usize,
    timeout: Duration,
    cancel: &CancellationToken,
) -> Vec<String> {
    let lookups: Vec<_> = urls
        .iter()
        .map(|url| {
            let url = url.clone();
            async move { is_registered(&url, registry, timeout, cancel).await.then_some(url) }
        })
        .collect();

    let valid: Vec<String> = stream::iter(lookups)
        .buffer_unordered(concurrency.max(1))
        .filter_map(future::ready)
        .collect()
        .await;

    info!(checked = urls.len(), valid = valid.len(), "Validated domains");
    valid
}
