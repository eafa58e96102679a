//! Grouping of supplier candidates by contact address
//!
//! One group per normalised address across every article of the selected
//! requests. The first candidate seen supplies the group's name, website
//! and country; every (group, code) occurrence adds one to that code's
//! quantity.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;

use crate::common::utils::normalize_address;
use crate::common::{ArticleId, RequestId, SourcingError, SourcingResult};
use crate::domains::requests::Article;
use crate::domains::suppliers::models::{Supplier, SupplierWithArticle};

/// One part code within a supplier group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartAggregate {
    pub code: String,
    pub quantity: i32,
    /// Requests that contributed this code, first seen first
    pub request_ids: Vec<RequestId>,
    /// Articles that contributed this code, first seen first
    pub article_ids: Vec<ArticleId>,
}

/// Everything one contact address is being asked about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierGroup {
    pub supplier_email: String,
    pub supplier_name: String,
    pub supplier_website: String,
    pub supplier_country: String,
    pub articles: Vec<PartAggregate>,
    pub request_ids: Vec<RequestId>,
    pub total_articles: usize,
}

fn push_unique<T: PartialEq>(items: &mut Vec<T>, item: T) {
    if !items.contains(&item) {
        items.push(item);
    }
}

/// Group rows by normalised address, in first-seen order.
///
/// Rows with a blank address are skipped.
pub fn aggregate_by_address(rows: &[SupplierWithArticle]) -> Vec<SupplierGroup> {
    let mut groups: Vec<SupplierGroup> = Vec::new();

    for row in rows {
        let key = normalize_address(&row.email);
        if key.is_empty() {
            continue;
        }

        let index = match groups.iter().position(|g| g.supplier_email == key) {
            Some(index) => index,
            None => {
                groups.push(SupplierGroup {
                    supplier_email: key,
                    supplier_name: row.name.clone(),
                    supplier_website: row.website.clone(),
                    supplier_country: row.country.clone(),
                    articles: Vec::new(),
                    request_ids: Vec::new(),
                    total_articles: 0,
                });
                groups.len() - 1
            }
        };
        let group = &mut groups[index];

        match group.articles.iter_mut().find(|a| a.code == row.article_code) {
            Some(part) => {
                part.quantity += 1;
                if let Some(request_id) = row.request_id {
                    push_unique(&mut part.request_ids, request_id);
                }
                push_unique(&mut part.article_ids, row.article_id);
            }
            None => group.articles.push(PartAggregate {
                code: row.article_code.clone(),
                quantity: 1,
                request_ids: row.request_id.into_iter().collect(),
                article_ids: vec![row.article_id],
            }),
        }

        if let Some(request_id) = row.request_id {
            push_unique(&mut group.request_ids, request_id);
        }
        group.total_articles = group.articles.len();
    }

    groups
}

/// Outreach groups for the given part requests.
///
/// Fails with `NotFound` when the requests own no articles, or when none of
/// their candidates has a contact address.
pub async fn group_by_address(
    request_ids: &[RequestId],
    pool: &PgPool,
) -> SourcingResult<Vec<SupplierGroup>> {
    let articles = Article::find_by_request_ids(request_ids, pool).await?;
    if articles.is_empty() {
        return Err(SourcingError::not_found("Articles for requests", join_ids(request_ids)));
    }

    let article_ids: Vec<ArticleId> = articles.iter().map(|a| a.id).collect();
    let rows = Supplier::find_addressed_for_articles(&article_ids, pool).await?;

    let groups = aggregate_by_address(&rows);
    if groups.is_empty() {
        return Err(SourcingError::not_found(
            "Suppliers with email for requests",
            join_ids(request_ids),
        ));
    }

    info!(
        requests = request_ids.len(),
        articles = articles.len(),
        groups = groups.len(),
        "Grouped suppliers by address"
    );
    Ok(groups)
}

fn join_ids(ids: &[RequestId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
