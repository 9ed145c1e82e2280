//! Caller identity extraction.
//!
//! Authentication happens upstream: the gateway verifies the session and
//! forwards the identity as `x-user-id` / `x-user-role` headers. This
//! extractor only turns those headers into a typed [`Caller`].

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use common::{Caller, Role, UserId};

use crate::error::ApiError;

/// The verified caller, extracted from the identity headers.
#[derive(Debug, Clone, Copy)]
pub struct AuthedCaller(pub Caller);

impl<S> FromRequestParts<S> for AuthedCaller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get("x-user-id")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| uuid::Uuid::parse_str(v).ok())
            .ok_or_else(|| ApiError::Forbidden("missing or invalid x-user-id header".to_string()))?;

        let role = parts
            .headers
            .get("x-user-role")
            .and_then(|v| v.to_str().ok())
            .and_then(Role::parse)
            .ok_or_else(|| {
                ApiError::Forbidden("missing or invalid x-user-role header".to_string())
            })?;

        Ok(AuthedCaller(Caller::new(UserId::from_uuid(id), role)))
    }
}
