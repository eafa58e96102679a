//! Application setup and router.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, HeaderName, HeaderValue, Method},
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::kernel::ServerDeps;
use crate::server::extractors::USER_ID_HEADER;
use crate::server::routes::{campaigns, health, requests, suppliers};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub deps: Arc<ServerDeps>,
}

impl AppState {
    pub fn new(deps: ServerDeps) -> Self {
        Self {
            deps: Arc::new(deps),
        }
    }

    pub fn pool(&self) -> &sqlx::PgPool {
        &self.deps.db_pool
    }
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();

    // No configured origins means development: allow any
    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static(USER_ID_HEADER)])
}

/// Build the Axum application router
pub fn build_app(deps: ServerDeps, allowed_origins: &[String]) -> Router {
    let state = AppState::new(deps);

    Router::new()
        .route("/health", get(health::health_handler))
        // Part requests and articles
        .route("/requests", post(requests::create_request))
        .route("/requests/:id", delete(requests::delete_request))
        .route("/articles", post(requests::register_article))
        .route("/articles/:id", delete(requests::delete_article))
        // Supplier discovery and catalog
        .route("/articles/:id/discover", post(suppliers::discover))
        .route("/articles/:id/suppliers", get(suppliers::list_for_article))
        .route("/suppliers/validate-domains", post(suppliers::validate_domains))
        .route("/suppliers/resolve-email", post(suppliers::resolve_email))
        .route("/suppliers/:id", delete(suppliers::delete))
        .route("/suppliers/:id/email", patch(suppliers::update_email))
        .route(
            "/suppliers/:id/email-validated",
            patch(suppliers::set_email_validated),
        )
        // Campaigns
        .route("/campaigns/group-suppliers", post(campaigns::group_suppliers))
        .route("/campaigns", post(campaigns::create).get(campaigns::list))
        .route(
            "/campaigns/:id",
            get(campaigns::get)
                .put(campaigns::update)
                .delete(campaigns::delete),
        )
        .route("/campaigns/:id/articles", get(campaigns::articles))
        .route(
            "/campaigns/:id/messages",
            get(campaigns::messages).post(campaigns::append_message),
        )
        .route("/campaigns/:id/send", post(campaigns::send))
        .route("/campaigns/:id/close", post(campaigns::close))
        .layer(Extension(state))
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
}
