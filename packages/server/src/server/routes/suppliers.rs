use axum::{
    extract::{Extension, Path},
    Json,
};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::common::{ArticleId, SourcingError, SupplierId};
use crate::domains::suppliers::activities::{
    self, discover_for_article, resolve_contact_address,
};
use crate::domains::suppliers::Supplier;
use crate::server::app::AppState;
use crate::server::errors::ApiError;
use crate::server::extractors::ActingUser;

#[derive(Debug, Deserialize)]
pub struct UpdateEmailBody {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct EmailValidatedBody {
    pub email_validated: bool,
}

#[derive(Debug, Deserialize)]
pub struct ValidateDomainsBody {
    pub urls: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ValidateDomainsResponse {
    pub valid: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResolveEmailBody {
    pub company_name: String,
    pub website: String,
    #[serde(default)]
    pub region: String,
}

#[derive(Debug, Serialize)]
pub struct ResolveEmailResponse {
    /// Empty when no address was found
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
}

/// Run discovery for an article and replace its supplier set.
///
/// Dropping the request (client disconnect) cancels the run before anything
/// is written.
pub async fn discover(
    Extension(state): Extension<AppState>,
    user: Option<ActingUser>,
    Path(article_id): Path<ArticleId>,
) -> Result<Json<Vec<Supplier>>, ApiError> {
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let suppliers =
        discover_for_article(article_id, user.map(|u| u.0), &state.deps, &cancel).await?;
    Ok(Json(suppliers))
}

pub async fn list_for_article(
    Extension(state): Extension<AppState>,
    Path(article_id): Path<ArticleId>,
) -> Result<Json<Vec<Supplier>>, ApiError> {
    Ok(Json(
        activities::get_suppliers(article_id, state.pool()).await?,
    ))
}

pub async fn update_email(
    Extension(state): Extension<AppState>,
    Path(id): Path<SupplierId>,
    Json(body): Json<UpdateEmailBody>,
) -> Result<Json<Supplier>, ApiError> {
    Ok(Json(
        activities::update_address(id, &body.email, state.pool()).await?,
    ))
}

pub async fn set_email_validated(
    Extension(state): Extension<AppState>,
    Path(id): Path<SupplierId>,
    Json(body): Json<EmailValidatedBody>,
) -> Result<Json<Supplier>, ApiError> {
    Ok(Json(
        activities::set_address_verified(id, body.email_validated, state.pool()).await?,
    ))
}

pub async fn delete(
    Extension(state): Extension<AppState>,
    Path(id): Path<SupplierId>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let deleted = activities::delete_supplier(id, state.pool()).await?;
    Ok(Json(DeleteResponse { deleted }))
}

pub async fn validate_domains(
    Extension(state): Extension<AppState>,
    Json(body): Json<ValidateDomainsBody>,
) -> Result<Json<ValidateDomainsResponse>, ApiError> {
    let deps = &state.deps;
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let valid = activities::validate_domains(
        &body.urls,
        deps.registry.as_ref(),
        deps.settings.validation_concurrency,
        deps.registry_timeout,
        &cancel,
    )
    .await;
    Ok(Json(ValidateDomainsResponse { valid }))
}

pub async fn resolve_email(
    Extension(state): Extension<AppState>,
    Json(body): Json<ResolveEmailBody>,
) -> Result<Json<ResolveEmailResponse>, ApiError> {
    if body.company_name.trim().is_empty() {
        return Err(SourcingError::InvalidInput("company_name is empty".into()).into());
    }

    let deps = &state.deps;
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let email = resolve_contact_address(
        body.company_name.trim(),
        body.website.trim(),
        body.region.trim(),
        deps.knowledge.as_ref(),
        deps.provider_timeout,
        &cancel,
    )
    .await;
    Ok(Json(ResolveEmailResponse { email }))
}
