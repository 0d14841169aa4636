//! Caller identity extraction
//!
//! The auth provider in front of this service resolves the caller and
//! forwards the opaque user id in a header; the core only ever gates on
//! that id. A missing id is rejected before any store access.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::Error;

/// Header carrying the authenticated caller's opaque id
pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated caller
#[derive(Debug, Clone)]
pub struct AuthUser(pub String);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(|id| AuthUser(id.to_string()))
            .ok_or(Error::Unauthorized)
    }
}
