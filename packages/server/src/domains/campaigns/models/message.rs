use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection, PgPool};

use crate::common::{CampaignId, MessageId};
use crate::domains::campaigns::models::MessageType;

/// Append-only record of one message exchanged within a campaign
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CampaignMessage {
    pub id: MessageId,
    pub campaign_id: CampaignId,
    pub message_type: MessageType,
    pub subject: String,
    pub body: String,
    pub from_email: String,
    pub to_email: String,
    pub external_id: Option<String>,
    /// When the message was sent or received
    pub sent_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

impl CampaignMessage {
    #[allow(clippy::too_many_arguments)]
    pub async fn insert(
        campaign_id: CampaignId,
        message_type: MessageType,
        subject: &str,
        body: &str,
        from_email: &str,
        to_email: &str,
        external_id: Option<&str>,
        sent_at: DateTime<Utc>,
        conn: &mut PgConnection,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO email_messages (
                id, campaign_id, message_type, subject, body,
                from_email, to_email, external_id, sent_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(MessageId::new())
        .bind(campaign_id)
        .bind(message_type)
        .bind(subject)
        .bind(body)
        .bind(from_email)
        .bind(to_email)
        .bind(external_id)
        .bind(sent_at)
        .fetch_one(conn)
        .await
        .map_err(Into::into)
    }

    /// Messages of a campaign, oldest first
    pub async fn find_by_campaign(campaign_id: CampaignId, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM email_messages WHERE campaign_id = $1 ORDER BY sent_at, id",
        )
        .bind(campaign_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
