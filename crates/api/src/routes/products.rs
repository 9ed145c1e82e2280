//! Product listing and moderation endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::ProductId;
use ledger::NewProduct;
use serde::Deserialize;
use storage::MarketStore;
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiError;
use crate::extract::AuthedCaller;
use crate::routes::{envelope, parse_approval};

#[derive(Deserialize)]
pub struct SetStatusRequest {
    pub status: String,
}

/// POST /products — list a product under one of the caller's stores.
#[tracing::instrument(skip(state, req), fields(caller_id = %caller.id))]
pub async fn create<S: MarketStore>(
    State(state): State<Arc<AppState<S>>>,
    AuthedCaller(caller): AuthedCaller,
    Json(req): Json<NewProduct>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let product = state.ledger.create_product(&caller, req).await?;
    Ok((StatusCode::CREATED, envelope(product)))
}

/// GET /products/{id} — fetch a product, counting the read as a view.
/// Public.
#[tracing::instrument(skip(state))]
pub async fn get<S: MarketStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let product = state.ledger.get_product(ProductId::from_uuid(id)).await?;
    Ok(envelope(product))
}

/// PUT /products/{id}/status — moderate a product (admin only).
#[tracing::instrument(skip(state, req), fields(caller_id = %caller.id))]
pub async fn set_status<S: MarketStore>(
    State(state): State<Arc<AppState<S>>>,
    AuthedCaller(caller): AuthedCaller,
    Path(id): Path<Uuid>,
    Json(req): Json<SetStatusRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let status = parse_approval(&req.status)?;
    let product = state
        .ledger
        .set_product_status(&caller, ProductId::from_uuid(id), status)
        .await?;
    Ok(envelope(product))
}
