//! HTTP boundary for the marketplace backend.
//!
//! Thin axum layer over [`ledger::OrderLedger`]: request parsing, caller
//! extraction and the `{success, data?, message?}` response envelope, with
//! structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post, put};
use ledger::OrderLedger;
use metrics_exporter_prometheus::PrometheusHandle;
use storage::MarketStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared application state accessible from all handlers.
pub struct AppState<S: MarketStore> {
    pub ledger: OrderLedger<S>,
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: MarketStore>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/orders", post(routes::orders::create::<S>))
        .route("/orders", get(routes::orders::list::<S>))
        .route("/orders/{id}", get(routes::orders::get::<S>))
        .route("/orders/{id}/status", put(routes::orders::update_status::<S>))
        .route("/orders/{id}/inquiry", post(routes::orders::add_inquiry::<S>))
        .route(
            "/orders/{id}/inquiry/response",
            post(routes::orders::answer_inquiry::<S>),
        )
        .route("/stores", post(routes::stores::create::<S>))
        .route("/stores/{id}/status", put(routes::stores::set_status::<S>))
        .route("/stores/{id}/orders", get(routes::stores::orders::<S>))
        .route("/stores/{id}/stats", get(routes::stores::stats::<S>))
        .route("/stores/{id}/visit", post(routes::stores::visit::<S>))
        .route(
            "/stores/{id}/stats/reconcile",
            post(routes::stores::reconcile::<S>),
        )
        .route("/products", post(routes::products::create::<S>))
        .route("/products/{id}", get(routes::products::get::<S>))
        .route("/products/{id}/status", put(routes::products::set_status::<S>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the application state over the given backend.
pub fn create_state<S: MarketStore>(store: S) -> Arc<AppState<S>> {
    Arc::new(AppState {
        ledger: OrderLedger::new(store),
    })
}
