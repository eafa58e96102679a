//! Campaign lifecycle
//!
//! Creation from a supplier group, message recording with its status side
//! effects, and the owner-only reads and edits. Every operation scopes the
//! campaign to its owner; someone else's campaign reads as `NotFound`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use tracing::info;
use typed_builder::TypedBuilder;

use crate::common::{CampaignId, SourcingError, SourcingResult, UserId};
use crate::domains::campaigns::activities::grouping::SupplierGroup;
use crate::domains::campaigns::models::{
    CampaignArticle, CampaignArticleDetail, CampaignMessage, CampaignOverview, CampaignStatus,
    EmailCampaign, MessageType, NewCampaign,
};
use crate::domains::requests::Article;
use crate::domains::suppliers::parsing::sanitize_address;

#[derive(Debug, Clone, TypedBuilder)]
#[builder(field_defaults(setter(into)))]
pub struct CreateCampaign {
    pub group: SupplierGroup,
    pub subject: String,
    pub body: String,
    pub user_id: UserId,
    /// Display name; the supplier name when absent
    #[builder(default)]
    pub name: Option<String>,
    /// Note stored on every article link
    #[builder(default)]
    pub notes: Option<String>,
}

/// A message to record against a campaign
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppendMessage {
    pub message_type: MessageType,
    pub subject: String,
    pub body: String,
    pub from_email: String,
    pub to_email: String,
    #[serde(default)]
    pub external_id: Option<String>,
    /// Event time; now when absent
    #[serde(default)]
    pub sent_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCampaign {
    pub name: Option<String>,
    pub subject: Option<String>,
    pub body: Option<String>,
}

fn not_found(id: CampaignId) -> SourcingError {
    SourcingError::not_found("Campaign", id)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Persist a draft campaign for a supplier group, with one article link
/// per aggregated part code.
///
/// A link points at the code's first contributing article and request and
/// also keeps every contributing request in `source_request_ids`.
pub async fn create_campaign(
    input: CreateCampaign,
    pool: &PgPool,
) -> SourcingResult<EmailCampaign> {
    let group = &input.group;

    let supplier_email = sanitize_address(&group.supplier_email).to_lowercase();
    if supplier_email.is_empty() {
        return Err(SourcingError::InvalidInput(format!(
            "group has no usable address: {:?}",
            group.supplier_email
        )));
    }
    if group.articles.is_empty() {
        return Err(SourcingError::InvalidInput("group has no articles".into()));
    }
    if let Some(part) = group.articles.iter().find(|p| p.article_ids.is_empty()) {
        return Err(SourcingError::InvalidInput(format!(
            "part {} has no articles",
            part.code
        )));
    }
    for part in &group.articles {
        let article_id = part.article_ids[0];
        if Article::find_by_id(article_id, pool).await?.is_none() {
            return Err(SourcingError::not_found("Article", article_id));
        }
    }

    let name = non_blank(input.name.as_deref()).unwrap_or(group.supplier_name.trim());
    let mut tx = pool.begin().await?;

    let campaign = EmailCampaign::insert(
        NewCampaign {
            name,
            supplier_email: &supplier_email,
            supplier_name: group.supplier_name.trim(),
            supplier_website: non_blank(Some(group.supplier_website.as_str())),
            supplier_country: non_blank(Some(group.supplier_country.as_str())),
            subject: &input.subject,
            body: &input.body,
            user_id: input.user_id,
        },
        &mut *tx,
    )
    .await?;

    for part in &group.articles {
        CampaignArticle::insert(
            campaign.id,
            part.article_ids[0],
            &part.request_ids,
            part.quantity.max(1),
            input.notes.as_deref(),
            &mut *tx,
        )
        .await?;
    }

    tx.commit().await?;

    info!(
        campaign_id = %campaign.id,
        supplier_email = %campaign.supplier_email,
        parts = group.articles.len(),
        "Created campaign"
    );
    Ok(campaign)
}

/// Insert a message and fold it into the locked campaign row.
async fn record_message(
    campaign: &EmailCampaign,
    message: &AppendMessage,
    conn: &mut PgConnection,
) -> SourcingResult<CampaignMessage> {
    let at = message.sent_at.unwrap_or_else(Utc::now);

    let stored = CampaignMessage::insert(
        campaign.id,
        message.message_type,
        &message.subject,
        &message.body,
        &message.from_email,
        &message.to_email,
        message.external_id.as_deref(),
        at,
        &mut *conn,
    )
    .await?;

    let status = campaign.status.after_message(message.message_type);
    let (sent_at, last_reply_at) = match message.message_type {
        MessageType::Sent => (Some(at), None),
        MessageType::Received => (None, Some(at)),
    };
    EmailCampaign::apply_message(campaign.id, status, sent_at, last_reply_at, conn).await?;

    info!(
        campaign_id = %campaign.id,
        message_type = %message.message_type,
        from = %campaign.status,
        to = %status,
        "Recorded campaign message"
    );
    Ok(stored)
}

/// Record a sent or received message.
///
/// Sent messages fill `sent_at` only once; received ones always refresh
/// `last_reply_at`. A closed campaign records the message and stays closed.
pub async fn append_message(
    campaign_id: CampaignId,
    user_id: UserId,
    message: AppendMessage,
    pool: &PgPool,
) -> SourcingResult<CampaignMessage> {
    let mut tx = pool.begin().await?;

    let campaign = EmailCampaign::lock_for_user(campaign_id, user_id, &mut *tx)
        .await?
        .ok_or_else(|| not_found(campaign_id))?;

    let stored = record_message(&campaign, &message, &mut *tx).await?;
    tx.commit().await?;
    Ok(stored)
}

/// Send a draft: records a `sent` message built from the campaign's own
/// subject and body.
pub async fn send_campaign(
    campaign_id: CampaignId,
    user_id: UserId,
    from_address: &str,
    pool: &PgPool,
) -> SourcingResult<CampaignMessage> {
    let mut tx = pool.begin().await?;

    let campaign = EmailCampaign::lock_for_user(campaign_id, user_id, &mut *tx)
        .await?
        .ok_or_else(|| not_found(campaign_id))?;

    if !campaign.status.can_send() {
        return Err(SourcingError::Conflict(format!(
            "campaign {} is already {}",
            campaign_id, campaign.status
        )));
    }

    let now = Utc::now();
    let message = AppendMessage {
        message_type: MessageType::Sent,
        subject: campaign.subject.clone(),
        body: campaign.body.clone(),
        from_email: from_address.to_string(),
        to_email: campaign.supplier_email.clone(),
        external_id: Some(format!("sent_{}_{}", campaign_id, now.timestamp_millis())),
        sent_at: Some(now),
    };

    let stored = record_message(&campaign, &message, &mut *tx).await?;
    tx.commit().await?;
    Ok(stored)
}

pub async fn close_campaign(
    campaign_id: CampaignId,
    user_id: UserId,
    pool: &PgPool,
) -> SourcingResult<EmailCampaign> {
    let mut tx = pool.begin().await?;

    let campaign = EmailCampaign::lock_for_user(campaign_id, user_id, &mut *tx)
        .await?
        .ok_or_else(|| not_found(campaign_id))?;

    if !campaign.status.can_close() {
        return Err(SourcingError::Conflict(format!(
            "campaign {} is already closed",
            campaign_id
        )));
    }

    let closed = EmailCampaign::set_status(campaign_id, CampaignStatus::Closed, &mut *tx).await?;
    tx.commit().await?;

    info!(campaign_id = %campaign_id, from = %campaign.status, "Closed campaign");
    Ok(closed)
}

/// Edit name, subject or body of a draft
pub async fn update_campaign(
    campaign_id: CampaignId,
    user_id: UserId,
    update: UpdateCampaign,
    pool: &PgPool,
) -> SourcingResult<EmailCampaign> {
    let mut tx = pool.begin().await?;

    let campaign = EmailCampaign::lock_for_user(campaign_id, user_id, &mut *tx)
        .await?
        .ok_or_else(|| not_found(campaign_id))?;

    if !campaign.status.is_editable() {
        return Err(SourcingError::Conflict(format!(
            "campaign {} is {} and can no longer be edited",
            campaign_id, campaign.status
        )));
    }

    let updated = EmailCampaign::update_content(
        campaign_id,
        non_blank(update.name.as_deref()),
        update.subject.as_deref(),
        update.body.as_deref(),
        &mut *tx,
    )
    .await?;
    tx.commit().await?;
    Ok(updated)
}

pub async fn delete_campaign(
    campaign_id: CampaignId,
    user_id: UserId,
    pool: &PgPool,
) -> SourcingResult<()> {
    if !EmailCampaign::delete_for_user(campaign_id, user_id, pool).await? {
        return Err(not_found(campaign_id));
    }
    info!(campaign_id = %campaign_id, "Deleted campaign");
    Ok(())
}

pub async fn get_campaign(
    campaign_id: CampaignId,
    user_id: UserId,
    pool: &PgPool,
) -> SourcingResult<CampaignOverview> {
    EmailCampaign::find_overview(campaign_id, user_id, pool)
        .await?
        .ok_or_else(|| not_found(campaign_id))
}

/// The caller's campaigns, newest first
pub async fn list_campaigns(user_id: UserId, pool: &PgPool) -> SourcingResult<Vec<CampaignOverview>> {
    Ok(EmailCampaign::list_overviews(user_id, pool).await?)
}

pub async fn campaign_articles(
    campaign_id: CampaignId,
    user_id: UserId,
    pool: &PgPool,
) -> SourcingResult<Vec<CampaignArticleDetail>> {
    EmailCampaign::find_for_user(campaign_id, user_id, pool)
        .await?
        .ok_or_else(|| not_found(campaign_id))?;
    Ok(CampaignArticle::find_by_campaign(campaign_id, pool).await?)
}

/// Messages of a campaign, oldest first
pub async fn campaign_messages(
    campaign_id: CampaignId,
    user_id: UserId,
    pool: &PgPool,
) -> SourcingResult<Vec<CampaignMessage>> {
    EmailCampaign::find_for_user(campaign_id, user_id, pool)
        .await?
        .ok_or_else(|| not_found(campaign_id))?;
    Ok(CampaignMessage::find_by_campaign(campaign_id, pool).await?)
}
