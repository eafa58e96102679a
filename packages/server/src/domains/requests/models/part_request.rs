use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::common::{RequestId, UserId};

/// A user-visible sourcing batch, identified by a unique human-readable number
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PartRequest {
    pub id: RequestId,
    pub number: String,
    pub user_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
}

impl PartRequest {
    pub async fn create(number: &str, user_id: Option<UserId>, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO part_requests (id, number, user_id) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(RequestId::new())
        .bind(number.trim())
        .bind(user_id)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_by_id(id: RequestId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM part_requests WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_by_number(number: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM part_requests WHERE number = $1")
            .bind(number.trim())
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Delete a request. Its articles are detached (request_id cleared), not deleted.
    ///
    /// Returns false if the request did not exist.
    pub async fn delete(id: RequestId, pool: &PgPool) -> Result<bool> {
        let mut tx = pool.begin().await?;

        sqlx::query("UPDATE articles SET request_id = NULL WHERE request_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let deleted = sqlx::query("DELETE FROM part_requests WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;
        Ok(deleted > 0)
    }
}
