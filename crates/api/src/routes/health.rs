//! Liveness endpoint.

use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// GET /health — liveness check for load balancers and deploy probes.
pub async fn check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
