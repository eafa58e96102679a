//! Discovery pipeline for one article
//!
//! Pipeline:
//! 1. Load the article
//! 2. Fan out one provider query per default region
//! 3. Optionally ask for contact addresses the answers left out
//! 4. Optionally drop candidates whose domain is not registered
//! 5. Replace the article's supplier set

use std::collections::HashSet;

use futures::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::common::{ArticleId, SourcingError, SourcingResult, UserId};
use crate::domains::requests::Article;
use crate::domains::suppliers::activities::catalog::replace_suppliers;
use crate::domains::suppliers::activities::discover::{
    discover_suppliers, FanoutOptions, DEFAULT_REGIONS,
};
use crate::domains::suppliers::activities::resolve_contact::resolve_contact_address;
use crate::domains::suppliers::activities::validate_domains::validate_domains;
use crate::domains::suppliers::models::{Supplier, SupplierCandidate};
use crate::kernel::ServerDeps;

/// Run discovery for an article and persist the result.
///
/// An empty run still replaces, leaving the article with no candidates. A
/// cancelled run writes nothing.
pub async fn discover_for_article(
    article_id: ArticleId,
    user_id: Option<UserId>,
    deps: &ServerDeps,
    cancel: &CancellationToken,
) -> SourcingResult<Vec<Supplier>> {
    let pool = &deps.db_pool;
    let settings = &deps.settings;

    let article = Article::find_by_id(article_id, pool)
        .await?
        .ok_or_else(|| SourcingError::not_found("Article", article_id))?;

    info!(article_id = %article.id, code = %article.code, "Starting discovery run");

    let options = FanoutOptions {
        concurrency: settings.discovery_concurrency,
        timeout: deps.provider_timeout,
    };
    let mut candidates = discover_suppliers(
        &article.code,
        DEFAULT_REGIONS,
        deps.knowledge.as_ref(),
        options,
        cancel,
    )
    .await;

    if settings.resolve_missing_contacts && !cancel.is_cancelled() {
        candidates = fill_missing_contacts(candidates, deps, cancel).await;
    }

    if settings.validate_discovered_domains && !candidates.is_empty() && !cancel.is_cancelled() {
        let websites: Vec<String> = candidates.iter().map(|c| c.website.clone()).collect();
        let registered: HashSet<String> = validate_domains(
            &websites,
            deps.registry.as_ref(),
            settings.validation_concurrency,
            deps.registry_timeout,
            cancel,
        )
        .await
        .into_iter()
        .collect();

        let before = candidates.len();
        candidates.retain(|c| registered.contains(&c.website));
        info!(
            article_id = %article.id,
            dropped = before - candidates.len(),
            "Dropped unregistered domains"
        );
    }

    if cancel.is_cancelled() {
        info!(article_id = %article.id, "Discovery run cancelled, keeping previous suppliers");
        return Err(SourcingError::Cancelled);
    }

    replace_suppliers(article.id, &candidates, user_id, pool).await
}

async fn fill_missing_contacts(
    candidates: Vec<SupplierCandidate>,
    deps: &ServerDeps,
    cancel: &CancellationToken,
) -> Vec<SupplierCandidate> {
    let provider = deps.knowledge.as_ref();
    let timeout = deps.provider_timeout;

    let lookups: Vec<_> = candidates
        .into_iter()
        .map(|mut candidate| async move {
            if candidate.email.is_empty() {
                candidate.email = resolve_contact_address(
                    &candidate.name,
                    &candidate.website,
                    &candidate.country,
                    provider,
                    timeout,
                    cancel,
                )
                .await;
            }
            candidate
        })
        .collect();

    stream::iter(lookups)
        .buffered(deps.settings.discovery_concurrency.max(1))
        .collect()
        .await
}
