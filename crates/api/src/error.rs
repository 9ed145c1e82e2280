//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use ledger::LedgerError;

/// API-level error type that maps to HTTP responses.
///
/// Every error renders as the standard envelope
/// `{"success": false, "message": ...}`.
#[derive(Debug)]
pub enum ApiError {
    /// Bad request from the client.
    BadRequest(String),
    /// Caller identity missing, invalid, or not allowed.
    Forbidden(String),
    /// Ledger operation error.
    Ledger(LedgerError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::Ledger(err) => ledger_error_to_response(err),
        };

        let body = serde_json::json!({ "success": false, "message": message });
        (status, axum::Json(body)).into_response()
    }
}

fn ledger_error_to_response(err: LedgerError) -> (StatusCode, String) {
    match &err {
        LedgerError::Validation(_) | LedgerError::InvalidState(_) => {
            (StatusCode::BAD_REQUEST, err.to_string())
        }
        LedgerError::NotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()),
        LedgerError::Forbidden(_) => (StatusCode::FORBIDDEN, err.to_string()),
        LedgerError::Storage(inner) => {
            // Storage details stay server-side.
            tracing::error!(error = %inner, "storage failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error".to_string(),
            )
        }
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        ApiError::Ledger(err)
    }
}
