//! Request extractors.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::common::UserId;
use crate::server::errors::ApiError;

/// Header set by the intranet's auth layer in front of this service
pub const USER_ID_HEADER: &str = "x-user-id";

/// The user a request acts for.
///
/// Rejects with 401 when the header is missing or not a UUID. Use
/// `Option<ActingUser>` where anonymous calls are fine.
#[derive(Debug, Clone, Copy)]
pub struct ActingUser(pub UserId);

#[async_trait]
impl<S> FromRequestParts<S> for ActingUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized(format!("missing {} header", USER_ID_HEADER)))?;

        UserId::parse(raw.trim())
            .map(ActingUser)
            .map_err(|_| ApiError::Unauthorized(format!("invalid {} header", USER_ID_HEADER)))
    }
}
