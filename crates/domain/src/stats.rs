//! Counter-delta rules for the store statistics aggregator.
//!
//! This module only decides *which* counters move and by how much; applying
//! the deltas is the storage layer's job and must happen through atomic
//! increments (see `storage::CatalogStore::bump_store_counters`).

use common::Money;

use crate::OrderStatus;

/// Addressable counter within a store's denormalized stats document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreCounter {
    ViewsToday,
    ViewsThisWeek,
    ViewsThisMonth,
    ViewsTotal,
    OrdersPending,
    OrdersCompleted,
    OrdersTotal,
    RevenueToday,
    RevenueThisWeek,
    RevenueThisMonth,
    RevenueTotal,
}

impl StoreCounter {
    /// Document path of the counter, e.g. `"orders.pending"`.
    pub fn path(&self) -> &'static str {
        match self {
            StoreCounter::ViewsToday => "views.today",
            StoreCounter::ViewsThisWeek => "views.thisWeek",
            StoreCounter::ViewsThisMonth => "views.thisMonth",
            StoreCounter::ViewsTotal => "views.total",
            StoreCounter::OrdersPending => "orders.pending",
            StoreCounter::OrdersCompleted => "orders.completed",
            StoreCounter::OrdersTotal => "orders.total",
            StoreCounter::RevenueToday => "revenue.today",
            StoreCounter::RevenueThisWeek => "revenue.thisWeek",
            StoreCounter::RevenueThisMonth => "revenue.thisMonth",
            StoreCounter::RevenueTotal => "revenue.total",
        }
    }
}

/// Deltas applied to each distinct store touched by a newly created order,
/// once per store regardless of how many line items belong to it.
pub fn creation_deltas() -> Vec<(StoreCounter, i64)> {
    vec![
        (StoreCounter::OrdersPending, 1),
        (StoreCounter::OrdersTotal, 1),
    ]
}

/// Deltas applied to one store when an order transitions from `prior` to
/// `new`, given that store's portion of the order revenue.
///
/// Only the terminal statuses adjust counters:
/// - `delivered`: pending −1, completed +1, revenue added to all four
///   buckets (no bucket expiry exists).
/// - `rejected`, when the *prior* status was still `pending`: pending −1.
///
/// Intermediate transitions (`preparing`, `shipping`) deliberately leave the
/// pending counter untouched; it is decremented once at the terminal step.
pub fn transition_deltas(
    prior: OrderStatus,
    new: OrderStatus,
    store_revenue: Money,
) -> Vec<(StoreCounter, i64)> {
    match new {
        OrderStatus::Delivered => vec![
            (StoreCounter::OrdersPending, -1),
            (StoreCounter::OrdersCompleted, 1),
            (StoreCounter::RevenueToday, store_revenue.cents()),
            (StoreCounter::RevenueThisWeek, store_revenue.cents()),
            (StoreCounter::RevenueThisMonth, store_revenue.cents()),
            (StoreCounter::RevenueTotal, store_revenue.cents()),
        ],
        OrderStatus::Rejected if prior == OrderStatus::Pending => {
            vec![(StoreCounter::OrdersPending, -1)]
        }
        _ => Vec::new(),
    }
}

/// Deltas applied to a store's view buckets when a visit is recorded.
pub fn visit_deltas() -> Vec<(StoreCounter, i64)> {
    vec![
        (StoreCounter::ViewsToday, 1),
        (StoreCounter::ViewsThisWeek, 1),
        (StoreCounter::ViewsThisMonth, 1),
        (StoreCounter::ViewsTotal, 1),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creation_bumps_pending_and_total_once() {
        assert_eq!(
            creation_deltas(),
            vec![
                (StoreCounter::OrdersPending, 1),
                (StoreCounter::OrdersTotal, 1),
            ]
        );
    }

    #[test]
    fn delivered_moves_pending_to_completed_and_adds_revenue() {
        let deltas = transition_deltas(
            OrderStatus::Shipping,
            OrderStatus::Delivered,
            Money::from_cents(200),
        );
        assert!(deltas.contains(&(StoreCounter::OrdersPending, -1)));
        assert!(deltas.contains(&(StoreCounter::OrdersCompleted, 1)));
        for bucket in [
            StoreCounter::RevenueToday,
            StoreCounter::RevenueThisWeek,
            StoreCounter::RevenueThisMonth,
            StoreCounter::RevenueTotal,
        ] {
            assert!(deltas.contains(&(bucket, 200)));
        }
        // total is never touched after creation
        assert!(!deltas.iter().any(|(c, _)| *c == StoreCounter::OrdersTotal));
    }

    #[test]
    fn rejection_from_pending_decrements_pending_only() {
        let deltas = transition_deltas(
            OrderStatus::Pending,
            OrderStatus::Rejected,
            Money::from_cents(999),
        );
        assert_eq!(deltas, vec![(StoreCounter::OrdersPending, -1)]);
    }

    #[test]
    fn rejection_from_preparing_changes_nothing() {
        let deltas = transition_deltas(
            OrderStatus::Preparing,
            OrderStatus::Rejected,
            Money::from_cents(999),
        );
        assert!(deltas.is_empty());
    }

    #[test]
    fn intermediate_transitions_change_nothing() {
        assert!(
            transition_deltas(OrderStatus::Pending, OrderStatus::Preparing, Money::zero())
                .is_empty()
        );
        assert!(
            transition_deltas(OrderStatus::Preparing, OrderStatus::Shipping, Money::zero())
                .is_empty()
        );
    }

    #[test]
    fn counter_paths() {
        assert_eq!(StoreCounter::OrdersPending.path(), "orders.pending");
        assert_eq!(StoreCounter::RevenueThisWeek.path(), "revenue.thisWeek");
    }
}
