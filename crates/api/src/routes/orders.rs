//! Order lifecycle endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::OrderId;
use domain::OrderStatus;
use ledger::{LedgerError, NewOrder};
use serde::Deserialize;
use storage::MarketStore;
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiError;
use crate::extract::AuthedCaller;
use crate::routes::envelope;

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
    pub message: Option<String>,
}

#[derive(Deserialize)]
pub struct InquiryRequest {
    pub message: String,
}

#[derive(Deserialize)]
pub struct InquiryResponseRequest {
    pub response: String,
}

/// POST /orders — place an order.
#[tracing::instrument(skip(state, req), fields(caller_id = %caller.id))]
pub async fn create<S: MarketStore>(
    State(state): State<Arc<AppState<S>>>,
    AuthedCaller(caller): AuthedCaller,
    Json(req): Json<NewOrder>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let order = state.ledger.create_order(&caller, req).await?;
    Ok((StatusCode::CREATED, envelope(order)))
}

/// GET /orders — the caller's own orders, newest first.
#[tracing::instrument(skip(state), fields(caller_id = %caller.id))]
pub async fn list<S: MarketStore>(
    State(state): State<Arc<AppState<S>>>,
    AuthedCaller(caller): AuthedCaller,
) -> Result<Json<serde_json::Value>, ApiError> {
    let orders = state.ledger.user_orders(&caller).await?;
    Ok(envelope(orders))
}

/// GET /orders/{id} — fetch one order.
#[tracing::instrument(skip(state), fields(caller_id = %caller.id))]
pub async fn get<S: MarketStore>(
    State(state): State<Arc<AppState<S>>>,
    AuthedCaller(caller): AuthedCaller,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let order = state
        .ledger
        .get_order(&caller, OrderId::from_uuid(id))
        .await?;
    Ok(envelope(order))
}

/// PUT /orders/{id}/status — move an order to a new status.
#[tracing::instrument(skip(state, req), fields(caller_id = %caller.id))]
pub async fn update_status<S: MarketStore>(
    State(state): State<Arc<AppState<S>>>,
    AuthedCaller(caller): AuthedCaller,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let status = OrderStatus::parse(&req.status).map_err(LedgerError::from)?;
    let order = state
        .ledger
        .update_order_status(&caller, OrderId::from_uuid(id), status, req.message)
        .await?;
    Ok(envelope(order))
}

/// POST /orders/{id}/inquiry — attach an inquiry message.
#[tracing::instrument(skip(state, req), fields(caller_id = %caller.id))]
pub async fn add_inquiry<S: MarketStore>(
    State(state): State<Arc<AppState<S>>>,
    AuthedCaller(caller): AuthedCaller,
    Path(id): Path<Uuid>,
    Json(req): Json<InquiryRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let order = state
        .ledger
        .add_inquiry(&caller, OrderId::from_uuid(id), req.message)
        .await?;
    Ok(envelope(order))
}

/// POST /orders/{id}/inquiry/response — answer the inquiry.
#[tracing::instrument(skip(state, req), fields(caller_id = %caller.id))]
pub async fn answer_inquiry<S: MarketStore>(
    State(state): State<Arc<AppState<S>>>,
    AuthedCaller(caller): AuthedCaller,
    Path(id): Path<Uuid>,
    Json(req): Json<InquiryResponseRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let order = state
        .ledger
        .answer_inquiry(&caller, OrderId::from_uuid(id), req.response)
        .await?;
    Ok(envelope(order))
}
