use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use tracing::debug;

use crate::common::{ArticleId, SupplierId, UserId};

/// A supplier found by discovery, not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierCandidate {
    pub name: String,
    pub website: String,
    /// Contact address; empty when none was found
    #[serde(default)]
    pub email: String,
    pub country: String,
}

/// A persisted supplier candidate for one article
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Supplier {
    pub id: SupplierId,
    pub article_id: ArticleId,
    pub name: String,
    pub website: String,
    pub email: String,
    pub country: String,
    /// Whether a person confirmed the contact address
    pub email_validated: bool,
    /// User whose discovery run produced this row
    pub user_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
}

/// Supplier row joined with the article it was found for (grouping input)
#[derive(Debug, Clone, FromRow)]
pub struct SupplierWithArticle {
    pub supplier_id: SupplierId,
    pub name: String,
    pub website: String,
    pub email: String,
    pub country: String,
    pub article_id: ArticleId,
    pub article_code: String,
    pub request_id: Option<crate::common::RequestId>,
}

// =============================================================================
// SQL Queries
// =============================================================================

impl Supplier {
    /// Replace an article's whole candidate set in one transaction.
    ///
    /// The article row is locked first so two overlapping runs for the same
    /// article serialize instead of interleaving deletes and inserts.
    /// Returns `None` (and writes nothing) when the article does not exist.
    pub async fn replace_for_article(
        article_id: ArticleId,
        candidates: &[SupplierCandidate],
        user_id: Option<UserId>,
        pool: &PgPool,
    ) -> Result<Option<Vec<Self>>> {
        let mut tx = pool.begin().await?;

        let locked: Option<(ArticleId,)> =
            sqlx::query_as("SELECT id FROM articles WHERE id = $1 FOR UPDATE")
                .bind(article_id)
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            tx.rollback().await?;
            return Ok(None);
        }

        let removed = sqlx::query("DELETE FROM suppliers WHERE article_id = $1")
            .bind(article_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let mut inserted = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let supplier = sqlx::query_as::<_, Self>(
                r#"
                INSERT INTO suppliers (id, article_id, name, website, email, country, user_id)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING *
                "#,
            )
            .bind(SupplierId::new())
            .bind(article_id)
            .bind(&candidate.name)
            .bind(&candidate.website)
            .bind(&candidate.email)
            .bind(&candidate.country)
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;
            inserted.push(supplier);
        }

        tx.commit().await?;

        debug!(
            article_id = %article_id,
            removed,
            inserted = inserted.len(),
            "Replaced supplier candidates"
        );

        Ok(Some(inserted))
    }

    pub async fn find_by_id(id: SupplierId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM suppliers WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Candidates for one article in insertion order
    pub async fn find_by_article(article_id: ArticleId, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM suppliers WHERE article_id = $1 ORDER BY created_at, id",
        )
        .bind(article_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Candidates with a non-empty address for the given articles, joined
    /// with their article. Ordered by article, then by insertion, so the
    /// iteration order is stable between calls.
    pub async fn find_addressed_for_articles(
        article_ids: &[ArticleId],
        pool: &PgPool,
    ) -> Result<Vec<SupplierWithArticle>> {
        sqlx::query_as::<_, SupplierWithArticle>(
            r#"
            SELECT s.id AS supplier_id, s.name, s.website, s.email, s.country,
                   a.id AS article_id, a.code AS article_code, a.request_id
            FROM suppliers s
            JOIN articles a ON a.id = s.article_id
            WHERE s.article_id = ANY($1)
              AND TRIM(s.email) <> ''
            ORDER BY a.created_at, a.id, s.created_at, s.id
            "#,
        )
        .bind(article_ids)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn set_email_validated(
        id: SupplierId,
        validated: bool,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "UPDATE suppliers SET email_validated = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(validated)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn update_email(id: SupplierId, email: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("UPDATE suppliers SET email = $2 WHERE id = $1 RETURNING *")
            .bind(id)
            .bind(email)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Returns false if the supplier did not exist
    pub async fn delete(id: SupplierId, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query("DELETE FROM suppliers WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
