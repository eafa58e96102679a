//! Test fixtures for creating test data.
//!
//! These fixtures use the model methods directly to create test data.

use anyhow::Result;
use sourcing_core::common::{ArticleId, RequestId, UserId};
use sourcing_core::domains::requests::{Article, PartRequest};
use sourcing_core::domains::suppliers::{Supplier, SupplierCandidate};
use sqlx::PgPool;

/// Create a part request with a unique number
pub async fn create_test_request(pool: &PgPool) -> Result<RequestId> {
    let number = format!("REQ-{}", uuid::Uuid::new_v4().simple());
    let request = PartRequest::create(&number, None, pool).await?;
    Ok(request.id)
}

/// Register an article code, optionally under a request
pub async fn create_test_article(
    pool: &PgPool,
    code: &str,
    request_id: Option<RequestId>,
) -> Result<ArticleId> {
    let article = Article::create(code, request_id, None, pool).await?;
    Ok(article.id)
}

pub fn candidate(name: &str, website: &str, email: &str) -> SupplierCandidate {
    SupplierCandidate {
        name: name.to_string(),
        website: website.to_string(),
        email: email.to_string(),
        country: "Germany".to_string(),
    }
}

/// Give an article a supplier set
pub async fn seed_suppliers(
    pool: &PgPool,
    article_id: ArticleId,
    candidates: &[SupplierCandidate],
) -> Result<Vec<Supplier>> {
    Supplier::replace_for_article(article_id, candidates, None, pool)
        .await?
        .ok_or_else(|| anyhow::anyhow!("article {} missing", article_id))
}

/// A user id nobody else in the test run uses
pub fn test_user() -> UserId {
    UserId::new()
}

/// Provider answer with the given (name, website, email) entries
pub fn provider_answer(entries: &[(&str, &str, &str)]) -> String {
    let items: Vec<serde_json::Value> = entries
        .iter()
        .map(|(name, website, email)| {
            serde_json::json!({"name": name, "website": website, "email": email, "country": "Germany"})
        })
        .collect();
    format!("```json\n{}\n```", serde_json::Value::Array(items))
}
