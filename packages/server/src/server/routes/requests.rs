use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::common::{ArticleId, RequestId};
use crate::domains::requests::activities;
use crate::domains::requests::{Article, PartRequest};
use crate::server::app::AppState;
use crate::server::errors::ApiError;
use crate::server::extractors::ActingUser;

#[derive(Debug, Deserialize)]
pub struct CreateRequestBody {
    pub number: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterArticleBody {
    pub code: String,
    #[serde(default)]
    pub request_id: Option<RequestId>,
}

pub async fn create_request(
    Extension(state): Extension<AppState>,
    user: Option<ActingUser>,
    Json(body): Json<CreateRequestBody>,
) -> Result<(StatusCode, Json<PartRequest>), ApiError> {
    let request =
        activities::create_request(&body.number, user.map(|u| u.0), state.pool()).await?;
    Ok((StatusCode::CREATED, Json(request)))
}

pub async fn delete_request(
    Extension(state): Extension<AppState>,
    Path(id): Path<RequestId>,
) -> Result<StatusCode, ApiError> {
    activities::delete_request(id, state.pool()).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn register_article(
    Extension(state): Extension<AppState>,
    user: Option<ActingUser>,
    Json(body): Json<RegisterArticleBody>,
) -> Result<(StatusCode, Json<Article>), ApiError> {
    let article = activities::register_article(
        &body.code,
        body.request_id,
        user.map(|u| u.0),
        state.pool(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(article)))
}

pub async fn delete_article(
    Extension(state): Extension<AppState>,
    Path(id): Path<ArticleId>,
) -> Result<StatusCode, ApiError> {
    activities::delete_article(id, state.pool()).await?;
    Ok(StatusCode::NO_CONTENT)
}
