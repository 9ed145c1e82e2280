//! Store statistics settlement.
//!
//! Translates order lifecycle events into counter deltas (computed by
//! `domain::stats`) and applies them through the storage layer's atomic
//! increments. Settlement is downstream of the order write and commits
//! independently: a failed counter bump is logged and skipped, never rolled
//! back into the order itself.

use chrono::Utc;
use common::{Caller, StoreId};
use domain::{Order, OrderStatus, StoreStats, stats};
use storage::CatalogStore;

use crate::{LedgerError, Result};

/// Bumps the per-store order tallies for a newly created order, once per
/// distinct store regardless of how many line items belong to it.
pub async fn settle_creation<S: CatalogStore>(store: &S, order: &Order) {
    for store_id in order.store_ids() {
        let deltas = stats::creation_deltas();
        if let Err(err) = store.bump_store_counters(store_id, &deltas).await {
            tracing::warn!(%store_id, order_id = %order.id, %err, "creation counter bump failed");
        }
    }
}

/// Bumps the per-store tallies for a status transition, using the status the
/// order held *before* the mutation.
pub async fn settle_transition<S: CatalogStore>(store: &S, order: &Order, prior: OrderStatus) {
    for store_id in order.store_ids() {
        let revenue = order.store_subtotal(store_id);
        let deltas = stats::transition_deltas(prior, order.status, revenue);
        if deltas.is_empty() {
            continue;
        }
        if let Err(err) = store.bump_store_counters(store_id, &deltas).await {
            tracing::warn!(%store_id, order_id = %order.id, %err, "transition counter bump failed");
        }
    }
}

/// Records a storefront visit: bumps all four view buckets and upserts
/// today's [`domain::DailyStat`] row. Every visit counts as one view and
/// one visitor; there is no session-level dedup.
pub async fn record_visit<S: CatalogStore>(store: &S, store_id: StoreId) -> Result<()> {
    store
        .bump_store_counters(store_id, &stats::visit_deltas())
        .await?;

    let today = Utc::now().date_naive();
    store.bump_daily_stat(store_id, today, 1, 1).await?;

    metrics::counter!("store_visits_total").increment(1);
    Ok(())
}

/// Recomputes a store's order tallies and lifetime revenue from the
/// source-of-truth orders and overwrites the denormalized counters.
///
/// Admin-only repair operation for counter drift (a crash between an order
/// write and its settlement leaves the increments unapplied). The windowed
/// revenue buckets are left as-is: with no bucket rollover process their
/// history cannot be reconstructed from order documents alone.
#[tracing::instrument(skip(store, caller), fields(caller_id = %caller.id))]
pub async fn reconcile_store_stats<S: CatalogStore + storage::OrderStore>(
    store: &S,
    caller: &Caller,
    store_id: StoreId,
) -> Result<StoreStats> {
    if !caller.is_admin() {
        return Err(LedgerError::forbidden("only admins may reconcile stats"));
    }

    let record = store
        .store(store_id)
        .await?
        .ok_or_else(|| LedgerError::not_found("store", store_id))?;

    let orders = store.orders_for_store(store_id, None).await?;

    let mut stats = record.stats;
    stats.orders.pending = 0;
    stats.orders.completed = 0;
    stats.orders.total = 0;
    stats.revenue.total = 0;

    for order in &orders {
        stats.orders.total += 1;
        match order.status {
            OrderStatus::Delivered => {
                stats.orders.completed += 1;
                stats.revenue.total += order.store_subtotal(store_id).cents();
            }
            // Rejected orders left the pending pool without completing.
            OrderStatus::Rejected => {}
            _ => stats.orders.pending += 1,
        }
    }

    store.replace_store_stats(store_id, stats).await?;
    metrics::counter!("stats_reconciliations_total").increment(1);
    tracing::info!(%store_id, orders = orders.len(), "store stats reconciled");

    Ok(stats)
}
