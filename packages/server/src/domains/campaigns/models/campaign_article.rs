use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection, PgPool};

use crate::common::{ArticleId, CampaignArticleId, CampaignId, RequestId};

/// Campaign × article link, fixed at campaign creation
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CampaignArticle {
    pub id: CampaignArticleId,
    pub campaign_id: CampaignId,
    pub article_id: ArticleId,
    /// First contributing request
    pub request_id: Option<RequestId>,
    /// Every contributing request, first seen first
    pub source_request_ids: Vec<RequestId>,
    pub quantity: i32,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Link joined with the article's part code
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CampaignArticleDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub link: CampaignArticle,
    pub article_code: String,
}

impl CampaignArticle {
    pub async fn insert(
        campaign_id: CampaignId,
        article_id: ArticleId,
        request_ids: &[RequestId],
        quantity: i32,
        notes: Option<&str>,
        conn: &mut PgConnection,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO email_campaign_articles
                (id, campaign_id, article_id, request_id, source_request_ids, quantity, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(CampaignArticleId::new())
        .bind(campaign_id)
        .bind(article_id)
        .bind(request_ids.first().copied())
        .bind(request_ids)
        .bind(quantity)
        .bind(notes)
        .fetch_one(conn)
        .await
        .map_err(Into::into)
    }

    pub async fn find_by_campaign(
        campaign_id: CampaignId,
        pool: &PgPool,
    ) -> Result<Vec<CampaignArticleDetail>> {
        sqlx::query_as::<_, CampaignArticleDetail>(
            r#"
            SELECT l.*, a.code AS article_code
            FROM email_campaign_articles l
            JOIN articles a ON a.id = l.article_id
            WHERE l.campaign_id = $1
            ORDER BY l.created_at, l.id
            "#,
        )
        .bind(campaign_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
