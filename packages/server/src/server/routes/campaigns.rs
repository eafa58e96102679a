use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::common::{CampaignId, RequestId, SourcingError};
use crate::domains::campaigns::activities::{
    self, AppendMessage, CreateCampaign, SupplierGroup, UpdateCampaign,
};
use crate::domains::campaigns::{
    CampaignArticleDetail, CampaignMessage, CampaignOverview, EmailCampaign,
};
use crate::server::app::AppState;
use crate::server::errors::ApiError;
use crate::server::extractors::ActingUser;

#[derive(Debug, Deserialize)]
pub struct GroupSuppliersBody {
    pub request_ids: Vec<RequestId>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCampaignBody {
    pub group: SupplierGroup,
    pub subject: String,
    pub body: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

pub async fn group_suppliers(
    Extension(state): Extension<AppState>,
    Json(body): Json<GroupSuppliersBody>,
) -> Result<Json<Vec<SupplierGroup>>, ApiError> {
    if body.request_ids.is_empty() {
        return Err(SourcingError::InvalidInput("request_ids is empty".into()).into());
    }
    Ok(Json(
        activities::group_by_address(&body.request_ids, state.pool()).await?,
    ))
}

pub async fn create(
    Extension(state): Extension<AppState>,
    ActingUser(user_id): ActingUser,
    Json(body): Json<CreateCampaignBody>,
) -> Result<(StatusCode, Json<EmailCampaign>), ApiError> {
    let input = CreateCampaign::builder()
        .group(body.group)
        .subject(body.subject)
        .body(body.body)
        .user_id(user_id)
        .name(body.name)
        .notes(body.notes)
        .build();

    let campaign = activities::create_campaign(input, state.pool()).await?;
    Ok((StatusCode::CREATED, Json(campaign)))
}

pub async fn list(
    Extension(state): Extension<AppState>,
    ActingUser(user_id): ActingUser,
) -> Result<Json<Vec<CampaignOverview>>, ApiError> {
    Ok(Json(activities::list_campaigns(user_id, state.pool()).await?))
}

pub async fn get(
    Extension(state): Extension<AppState>,
    ActingUser(user_id): ActingUser,
    Path(id): Path<CampaignId>,
) -> Result<Json<CampaignOverview>, ApiError> {
    Ok(Json(activities::get_campaign(id, user_id, state.pool()).await?))
}

pub async fn update(
    Extension(state): Extension<AppState>,
    ActingUser(user_id): ActingUser,
    Path(id): Path<CampaignId>,
    Json(body): Json<UpdateCampaign>,
) -> Result<Json<EmailCampaign>, ApiError> {
    Ok(Json(
        activities::update_campaign(id, user_id, body, state.pool()).await?,
    ))
}

pub async fn delete(
    Extension(state): Extension<AppState>,
    ActingUser(user_id): ActingUser,
    Path(id): Path<CampaignId>,
) -> Result<StatusCode, ApiError> {
    activities::delete_campaign(id, user_id, state.pool()).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn articles(
    Extension(state): Extension<AppState>,
    ActingUser(user_id): ActingUser,
    Path(id): Path<CampaignId>,
) -> Result<Json<Vec<CampaignArticleDetail>>, ApiError> {
    Ok(Json(
        activities::campaign_articles(id, user_id, state.pool()).await?,
    ))
}

pub async fn messages(
    Extension(state): Extension<AppState>,
    ActingUser(user_id): ActingUser,
    Path(id): Path<CampaignId>,
) -> Result<Json<Vec<CampaignMessage>>, ApiError> {
    Ok(Json(
        activities::campaign_messages(id, user_id, state.pool()).await?,
    ))
}

pub async fn append_message(
    Extension(state): Extension<AppState>,
    ActingUser(user_id): ActingUser,
    Path(id): Path<CampaignId>,
    Json(message): Json<AppendMessage>,
) -> Result<(StatusCode, Json<CampaignMessage>), ApiError> {
    let message = activities::append_message(id, user_id, message, state.pool()).await?;
    Ok((StatusCode::CREATED, Json(message)))
}

pub async fn send(
    Extension(state): Extension<AppState>,
    ActingUser(user_id): ActingUser,
    Path(id): Path<CampaignId>,
) -> Result<Json<CampaignMessage>, ApiError> {
    let from = state.deps.outreach_from_address.as_str();
    Ok(Json(
        activities::send_campaign(id, user_id, from, state.pool()).await?,
    ))
}

pub async fn close(
    Extension(state): Extension<AppState>,
    ActingUser(user_id): ActingUser,
    Path(id): Path<CampaignId>,
) -> Result<Json<EmailCampaign>, ApiError> {
    Ok(Json(activities::close_campaign(id, user_id, state.pool()).await?))
}
