//! Store registration, moderation, orders and statistics endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use common::StoreId;
use domain::OrderStatus;
use ledger::{LedgerError, NewStore};
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

#[derive(Debug, Deserialize)]
pub struct OrdersQuery {
    pub status: Option<String>,
}

/// POST /stores — register a store owned by the caller.
#[tracing::instrument(skip(state, req), fields(caller_id = %caller.id))]
pub async fn create<S: MarketStore>(
    State(state): State<Arc<AppState<S>>>,
    AuthedCaller(caller): AuthedCaller,
    Json(req): Json<NewStore>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let store = state.ledger.create_store(&caller, req).await?;
    Ok((StatusCode::CREATED, envelope(store)))
}

/// PUT /stores/{id}/status — moderate a store (admin only).
#[tracing::instrument(skip(state, req), fields(caller_id = %caller.id))]
pub async fn set_status<S: MarketStore>(
    State(state): State<Arc<AppState<S>>>,
    AuthedCaller(caller): AuthedCaller,
    Path(id): Path<Uuid>,
    Json(req): Json<SetStatusRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let status = parse_approval(&req.status)?;
    let store = state
        .ledger
        .set_store_status(&caller, StoreId::from_uuid(id), status)
        .await?;
    Ok(envelope(store))
}

/// GET /stores/{id}/orders?status= — orders touching one store.
#[tracing::instrument(skip(state), fields(caller_id = %caller.id))]
pub async fn orders<S: MarketStore>(
    State(state): State<Arc<AppState<S>>>,
    AuthedCaller(caller): AuthedCaller,
    Path(id): Path<Uuid>,
    Query(query): Query<OrdersQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let status = query
        .status
        .as_deref()
        .map(OrderStatus::parse)
        .transpose()
        .map_err(LedgerError::from)?;

    let orders = state
        .ledger
        .store_orders(&caller, StoreId::from_uuid(id), status)
        .await?;
    Ok(envelope(orders))
}

/// GET /stores/{id}/stats — the store's denormalized counters.
#[tracing::instrument(skip(state), fields(caller_id = %caller.id))]
pub async fn stats<S: MarketStore>(
    State(state): State<Arc<AppState<S>>>,
    AuthedCaller(caller): AuthedCaller,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let stats = state
        .ledger
        .store_stats(&caller, StoreId::from_uuid(id))
        .await?;
    Ok(envelope(stats))
}

/// POST /stores/{id}/visit — record a storefront visit. Public.
#[tracing::instrument(skip(state))]
pub async fn visit<S: MarketStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.ledger.record_visit(StoreId::from_uuid(id)).await?;
    Ok(envelope(serde_json::json!({ "recorded": true })))
}

/// POST /stores/{id}/stats/reconcile — recompute counters from orders
/// (admin only).
#[tracing::instrument(skip(state), fields(caller_id = %caller.id))]
pub async fn reconcile<S: MarketStore>(
    State(state): State<Arc<AppState<S>>>,
    AuthedCaller(caller): AuthedCaller,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let stats = state
        .ledger
        .reconcile_store_stats(&caller, StoreId::from_uuid(id))
        .await?;
    Ok(envelope(stats))
}
