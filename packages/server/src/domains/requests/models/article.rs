use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::common::{ArticleId, RequestId, UserId};

/// A part code being sourced. Several rows may share a code; they differ by
/// the request (if any) that owns them.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Article {
    pub id: ArticleId,
    pub code: String,
    pub request_id: Option<RequestId>,
    pub user_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
}

impl Article {
    pub async fn create(
        code: &str,
        request_id: Option<RequestId>,
        user_id: Option<UserId>,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO articles (id, code, request_id, user_id) VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(ArticleId::new())
        .bind(code.trim())
        .bind(request_id)
        .bind(user_id)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_by_id(id: ArticleId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM articles WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// All articles owned by any of the given requests, oldest first
    pub async fn find_by_request_ids(ids: &[RequestId], pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM articles WHERE request_id = ANY($1) ORDER BY created_at, id",
        )
        .bind(ids)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Delete an article together with its supplier candidates.
    ///
    /// Returns false if the article did not exist.
    pub async fn delete(id: ArticleId, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query("DELETE FROM articles WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
