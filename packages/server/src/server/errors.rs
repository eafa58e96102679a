//! HTTP mapping of domain errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::common::SourcingError;

/// Error returned by every handler
#[derive(Debug)]
pub enum ApiError {
    Unauthorized(String),
    BadRequest(String),
    Sourcing(SourcingError),
}

impl From<SourcingError> for ApiError {
    fn from(err: SourcingError) -> Self {
        ApiError::Sourcing(err)
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Sourcing(err) => match err {
                SourcingError::NotFound { .. } => StatusCode::NOT_FOUND,
                SourcingError::Conflict(_) => StatusCode::CONFLICT,
                SourcingError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                SourcingError::Provider(_) | SourcingError::Validation(_) => {
                    StatusCode::BAD_GATEWAY
                }
                // nginx's "client closed request"; only seen in logs
                SourcingError::Cancelled => {
                    StatusCode::from_u16(499).unwrap_or(StatusCode::REQUEST_TIMEOUT)
                }
                SourcingError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Sourcing(err) => match err {
                SourcingError::NotFound { .. } => "not_found",
                SourcingError::Conflict(_) => "conflict",
                SourcingError::InvalidInput(_) => "invalid_input",
                SourcingError::Provider(_) => "provider_error",
                SourcingError::Validation(_) => "validation_error",
                SourcingError::Cancelled => "cancelled",
                SourcingError::Persistence(_) => "internal_error",
            },
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Unauthorized(message) | ApiError::BadRequest(message) => message.clone(),
            // don't leak SQL details
            ApiError::Sourcing(SourcingError::Persistence(_)) => "internal error".to_string(),
            ApiError::Sourcing(err) => err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();
        let message = self.message();

        match &self {
            ApiError::Sourcing(SourcingError::Persistence(err)) => {
                tracing::error!(error = ?err, "Request failed");
            }
            ApiError::Sourcing(SourcingError::Provider(_) | SourcingError::Validation(_)) => {
                tracing::warn!(code, %message, "Upstream error");
            }
            _ => {
                tracing::debug!(code, %message, "Client error");
            }
        }

        (status, Json(json!({ "error": code, "message": message }))).into_response()
    }
}
