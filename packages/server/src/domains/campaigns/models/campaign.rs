use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection, PgPool};

use crate::common::{CampaignId, UserId};
use crate::domains::campaigns::models::CampaignStatus;

/// One outreach unit addressed to a single supplier contact address.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EmailCampaign {
    pub id: CampaignId,
    pub name: String,
    pub supplier_email: String,
    pub supplier_name: String,
    pub supplier_website: Option<String>,
    pub supplier_country: Option<String>,
    pub status: CampaignStatus,
    pub subject: String,
    pub body: String,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// First outbound message (first send wins)
    pub sent_at: Option<DateTime<Utc>>,
    /// Most recent inbound message
    pub last_reply_at: Option<DateTime<Utc>>,
}

/// Campaign with link and message counts, for list/detail views
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CampaignOverview {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub campaign: EmailCampaign,
    pub articles_count: i64,
    pub messages_count: i64,
}

/// Columns of a new campaign row
pub struct NewCampaign<'a> {
    pub name: &'a str,
    pub supplier_email: &'a str,
    pub supplier_name: &'a str,
    pub supplier_website: Option<&'a str>,
    pub supplier_country: Option<&'a str>,
    pub subject: &'a str,
    pub body: &'a str,
    pub user_id: UserId,
}

const OVERVIEW_SELECT: &str = r#"
    SELECT c.*,
        (SELECT COUNT(*) FROM email_campaign_articles a WHERE a.campaign_id = c.id) AS articles_count,
        (SELECT COUNT(*) FROM email_messages m WHERE m.campaign_id = c.id) AS messages_count
    FROM email_campaigns c
"#;

// =============================================================================
// SQL Queries
// =============================================================================

impl EmailCampaign {
    /// Insert a draft campaign. Takes a connection so the caller can add
    /// the article links in the same transaction.
    pub async fn insert(new: NewCampaign<'_>, conn: &mut PgConnection) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO email_campaigns (
                id, name, supplier_email, supplier_name, supplier_website,
                supplier_country, status, subject, body, user_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, 'draft', $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(CampaignId::new())
        .bind(new.name)
        .bind(new.supplier_email)
        .bind(new.supplier_name)
        .bind(new.supplier_website)
        .bind(new.supplier_country)
        .bind(new.subject)
        .bind(new.body)
        .bind(new.user_id)
        .fetch_one(conn)
        .await
        .map_err(Into::into)
    }

    /// Campaign owned by `user_id`; other users' campaigns read as missing
    pub async fn find_for_user(
        id: CampaignId,
        user_id: UserId,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM email_campaigns WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Same as `find_for_user` but locks the row until the transaction ends
    pub async fn lock_for_user(
        id: CampaignId,
        user_id: UserId,
        conn: &mut PgConnection,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM email_campaigns WHERE id = $1 AND user_id = $2 FOR UPDATE",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(conn)
        .await
        .map_err(Into::into)
    }

    pub async fn find_overview(
        id: CampaignId,
        user_id: UserId,
        pool: &PgPool,
    ) -> Result<Option<CampaignOverview>> {
        sqlx::query_as::<_, CampaignOverview>(&format!(
            "{} WHERE c.id = $1 AND c.user_id = $2",
            OVERVIEW_SELECT
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// All campaigns of a user, newest first
    pub async fn list_overviews(user_id: UserId, pool: &PgPool) -> Result<Vec<CampaignOverview>> {
        sqlx::query_as::<_, CampaignOverview>(&format!(
            "{} WHERE c.user_id = $1 ORDER BY c.created_at DESC, c.id DESC",
            OVERVIEW_SELECT
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Record the effect of a message on the campaign row.
    ///
    /// `sent_at` only fills an empty column; `last_reply_at` overwrites.
    pub async fn apply_message(
        id: CampaignId,
        status: CampaignStatus,
        sent_at: Option<DateTime<Utc>>,
        last_reply_at: Option<DateTime<Utc>>,
        conn: &mut PgConnection,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE email_campaigns
            SET status = $2,
                sent_at = COALESCE(sent_at, $3),
                last_reply_at = COALESCE($4, last_reply_at),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(sent_at)
        .bind(last_reply_at)
        .fetch_one(conn)
        .await
        .map_err(Into::into)
    }

    pub async fn set_status(
        id: CampaignId,
        status: CampaignStatus,
        conn: &mut PgConnection,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "UPDATE email_campaigns SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_one(conn)
        .await
        .map_err(Into::into)
    }

    /// Overwrite the given draft fields, leaving `None` ones untouched
    pub async fn update_content(
        id: CampaignId,
        name: Option<&str>,
        subject: Option<&str>,
        body: Option<&str>,
        conn: &mut PgConnection,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE email_campaigns
            SET name = COALESCE($2, name),
                subject = COALESCE($3, subject),
                body = COALESCE($4, body),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(subject)
        .bind(body)
        .fetch_one(conn)
        .await
        .map_err(Into::into)
    }

    /// Delete with links and messages. Returns false if nothing matched.
    pub async fn delete_for_user(id: CampaignId, user_id: UserId, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query("DELETE FROM email_campaigns WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
