use sqlx::PgPool;
use tracing::info;

use crate::common::{ArticleId, RequestId, SourcingError, SourcingResult, UserId};
use crate::domains::requests::models::{Article, PartRequest};

pub async fn create_request(
    number: &str,
    user_id: Option<UserId>,
    pool: &PgPool,
) -> SourcingResult<PartRequest> {
    let number = number.trim();
    if number.is_empty() {
        return Err(SourcingError::InvalidInput("request number is empty".into()));
    }
    if PartRequest::find_by_number(number, pool).await?.is_some() {
        return Err(SourcingError::Conflict(format!(
            "request number {} already exists",
            number
        )));
    }

    let request = PartRequest::create(number, user_id, pool).await?;
    info!(request_id = %request.id, number = %request.number, "Created part request");
    Ok(request)
}

/// Register a part code, optionally under an existing request.
pub async fn register_article(
    code: &str,
    request_id: Option<RequestId>,
    user_id: Option<UserId>,
    pool: &PgPool,
) -> SourcingResult<Article> {
    if code.trim().is_empty() {
        return Err(SourcingError::InvalidInput("article code is empty".into()));
    }
    if let Some(request_id) = request_id {
        if PartRequest::find_by_id(request_id, pool).await?.is_none() {
            return Err(SourcingError::not_found("PartRequest", request_id));
        }
    }

    let article = Article::create(code, request_id, user_id, pool).await?;
    info!(article_id = %article.id, code = %article.code, "Registered article");
    Ok(article)
}

pub async fn delete_request(id: RequestId, pool: &PgPool) -> SourcingResult<()> {
    if !PartRequest::delete(id, pool).await? {
        return Err(SourcingError::not_found("PartRequest", id));
    }
    info!(request_id = %id, "Deleted part request");
    Ok(())
}

pub async fn delete_article(id: ArticleId, pool: &PgPool) -> SourcingResult<()> {
    if !Article::delete(id, pool).await? {
        return Err(SourcingError::not_found("Article", id));
    }
    info!(article_id = %id, "Deleted article");
    Ok(())
}
