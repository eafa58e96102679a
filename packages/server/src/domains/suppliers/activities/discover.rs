//! Region fan-out discovery
//!
//! One provider query per region, run with bounded concurrency. Results are
//! concatenated in region order, then aggregators and repeated hosts are
//! dropped across the whole run. A failing or slow region only loses its
//! own results.

use std::collections::HashSet;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::common::utils::website_host;
use crate::common::{SourcingError, SourcingResult};
use crate::domains::suppliers::models::SupplierCandidate;
use crate::domains::suppliers::parsing::{is_aggregator, parse_candidates};
use crate::kernel::BaseKnowledgeProvider;

/// Regions queried when the caller does not pick any
pub const DEFAULT_REGIONS: &[&str] = &[
    "Europe",
    "North America",
    "South America",
    "Russia/CIS",
    "Asia",
];

const DISCOVERY_SYSTEM_PROMPT: &str = "You help procurement teams find real suppliers of \
industrial and electronic parts. Answer with a single JSON array of objects with the keys \
name, website, email and country, and nothing else.";

/// Bounds for one fan-out run
#[derive(Debug, Clone, Copy)]
pub struct FanoutOptions {
    /// Provider queries in flight at once
    pub concurrency: usize,
    /// Upper bound on each provider query
    pub timeout: Duration,
}

impl Default for FanoutOptions {
    fn default() -> Self {
        Self {
            concurrency: 4,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Prompt asking for suppliers of `part_code` in one region.
pub fn discovery_prompt(part_code: &str, region: &str) -> String {
    format!(
        "Find at least 10 companies (dealers, distributors, manufacturers, suppliers) that \
         actually trade part number {part_code} in the region {region}. For each company give \
         its name, the website where the information was found, a contact email if there is \
         one, and its country. Return only a JSON array with the keys name, website, email, \
         country."
    )
}

async fn query_region(
    part_code: &str,
    region: &str,
    provider: &dyn BaseKnowledgeProvider,
    timeout: Duration,
    cancel: &CancellationToken,
) -> SourcingResult<Vec<SupplierCandidate>> {
    let prompt = discovery_prompt(part_code, region);

    let answer = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(SourcingError::Cancelled),
        answer = tokio::time::timeout(timeout, provider.ask(DISCOVERY_SYSTEM_PROMPT, &prompt)) => answer,
    };

    let answer = match answer {
        Ok(Ok(answer)) => answer,
        Ok(Err(e)) => return Err(SourcingError::Provider(e.to_string())),
        Err(_) => {
            return Err(SourcingError::Provider(format!(
                "no answer within {}s",
                timeout.as_secs_f32()
            )))
        }
    };

    let candidates = parse_candidates(&answer, region);
    debug!(part_code, region, count = candidates.len(), "Parsed region answer");
    Ok(candidates)
}

/// Discover supplier candidates for a part code across `regions`.
///
/// Never fails: provider errors, timeouts and unparseable answers are
/// logged and cost only the affected region. When `cancel` fires the
/// remaining queries are abandoned and whatever finished is returned; the
/// caller decides whether a cancelled run is worth keeping.
pub async fn discover_suppliers<S>(
    part_code: &str,
    regions: &[S],
    provider: &dyn BaseKnowledgeProvider,
    options: FanoutOptions,
    cancel: &CancellationToken,
) -> Vec<SupplierCandidate>
where
    S: AsRef<str> + Sync,
{
    info!(part_code, regions = regions.len(), "Starting supplier discovery");

    let queries: Vec<_> = regions
        .iter()
        .map(|region| {
            let region = region.as_ref().to_string();
            async move {
                let result =
                    query_region(part_code, &region, provider, options.timeout, cancel).await;
                (region, result)
            }
        })
        .collect();

    let per_region: Vec<(String, SourcingResult<Vec<SupplierCandidate>>)> = stream::iter(queries)
        .buffered(options.concurrency.max(1))
        .collect()
        .await;

    let mut seen_hosts = HashSet::new();
    let mut candidates = Vec::new();
    let mut failed_regions = 0usize;

    for (region, result) in per_region {
        let found = match result {
            Ok(found) => found,
            Err(SourcingError::Cancelled) => {
                debug!(part_code, region = %region, "Region query cancelled");
                failed_regions += 1;
                continue;
            }
            Err(e) => {
                warn!(part_code, region = %region, error = %e, "Region query failed, skipping");
                failed_regions += 1;
                continue;
            }
        };

        for candidate in found {
            let Some(host) = website_host(&candidate.website) else {
                continue;
            };
            if is_aggregator(&host) {
                debug!(host = %host, "Skipping marketplace aggregator");
                continue;
            }
            if !seen_hosts.insert(host) {
                continue;
            }
            candidates.push(candidate);
        }
    }

    info!(
        part_code,
        found = candidates.len(),
        failed_regions,
        "Supplier discovery finished"
    );

    candidates
}
