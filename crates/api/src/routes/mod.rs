//! Route handlers.

pub mod health;
pub mod metrics;
pub mod orders;
pub mod products;
pub mod stores;

use axum::Json;
use domain::ApprovalStatus;
use serde::Serialize;

use crate::error::ApiError;

/// Wraps a payload in the standard success envelope.
pub(crate) fn envelope<T: Serialize>(data: T) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "success": true, "data": data }))
}

/// Parses a moderation status from its wire form.
pub(crate) fn parse_approval(s: &str) -> Result<ApprovalStatus, ApiError> {
    match s {
        "pending" => Ok(ApprovalStatus::Pending),
        "approved" => Ok(ApprovalStatus::Approved),
        "rejected" => Ok(ApprovalStatus::Rejected),
        other => Err(ApiError::BadRequest(format!(
            "unknown approval status: {other}"
        ))),
    }
}
