//! Catalog records: stores, products and the daily visit time series.

use chrono::{DateTime, NaiveDate, Utc};
use common::{Money, ProductId, StoreId, UserId};
use serde::{Deserialize, Serialize};

use crate::stats::StoreCounter;

/// Moderation status shared by stores and products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Overlapping running-total counters for different time windows.
///
/// All four buckets are incremented unconditionally; there is no expiry or
/// rollover process (known gap, kept as observed behavior).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PeriodCounters {
    pub today: i64,
    pub this_week: i64,
    pub this_month: i64,
    pub total: i64,
}

/// Per-store order tally maintained by the statistics aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct OrderCounters {
    pub pending: i64,
    pub completed: i64,
    pub total: i64,
}

/// Denormalized per-store aggregates.
///
/// Mutated incrementally on order lifecycle and visit events; never
/// recomputed in the hot path. Revenue is in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct StoreStats {
    pub views: PeriodCounters,
    pub orders: OrderCounters,
    pub revenue: PeriodCounters,
}

impl StoreStats {
    /// Applies a batch of counter deltas in place.
    ///
    /// Storage backends with server-side increments (Postgres) bypass this;
    /// the in-memory store uses it under a single write guard.
    pub fn apply(&mut self, deltas: &[(StoreCounter, i64)]) {
        for &(counter, delta) in deltas {
            let slot = match counter {
                StoreCounter::ViewsToday => &mut self.views.today,
                StoreCounter::ViewsThisWeek => &mut self.views.this_week,
                StoreCounter::ViewsThisMonth => &mut self.views.this_month,
                StoreCounter::ViewsTotal => &mut self.views.total,
                StoreCounter::OrdersPending => &mut self.orders.pending,
                StoreCounter::OrdersCompleted => &mut self.orders.completed,
                StoreCounter::OrdersTotal => &mut self.orders.total,
                StoreCounter::RevenueToday => &mut self.revenue.today,
                StoreCounter::RevenueThisWeek => &mut self.revenue.this_week,
                StoreCounter::RevenueThisMonth => &mut self.revenue.this_month,
                StoreCounter::RevenueTotal => &mut self.revenue.total,
            };
            *slot += delta;
        }
    }
}

/// Subscription terms gating a store's product count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionDetails {
    pub max_products: u32,
    pub percentage: f64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl Default for SubscriptionDetails {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            max_products: 10,
            percentage: 0.0,
            start_date: now,
            end_date: now + chrono::Duration::days(30),
        }
    }
}

/// A merchant store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: StoreId,
    pub owner: UserId,
    pub name: String,
    pub description: String,
    pub city: String,
    pub contact_phone: String,
    pub status: ApprovalStatus,
    pub subscription: SubscriptionDetails,
    pub stats: StoreStats,
    pub created_at: DateTime<Utc>,
}

impl Store {
    /// Creates a new store pending moderation, with zeroed counters.
    pub fn new(
        owner: UserId,
        name: impl Into<String>,
        description: impl Into<String>,
        city: impl Into<String>,
        contact_phone: impl Into<String>,
    ) -> Self {
        Self {
            id: StoreId::new(),
            owner,
            name: name.into(),
            description: description.into(),
            city: city.into(),
            contact_phone: contact_phone.into(),
            status: ApprovalStatus::Pending,
            subscription: SubscriptionDetails::default(),
            stats: StoreStats::default(),
            created_at: Utc::now(),
        }
    }

    pub fn is_owned_by(&self, user: UserId) -> bool {
        self.owner == user
    }
}

/// A catalog product listed by a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub store_id: StoreId,
    pub name: String,
    pub description: String,
    pub price: Money,
    pub category: String,
    pub city: String,
    pub status: ApprovalStatus,
    /// Units sold, incremented at order-creation time (not at delivery).
    pub sales: i64,
    /// Fetch count, incremented on every public product read.
    pub views: i64,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Creates a new product pending moderation.
    pub fn new(
        store_id: StoreId,
        name: impl Into<String>,
        description: impl Into<String>,
        price: Money,
        category: impl Into<String>,
        city: impl Into<String>,
    ) -> Self {
        Self {
            id: ProductId::new(),
            store_id,
            name: name.into(),
            description: description.into(),
            price,
            category: category.into(),
            city: city.into(),
            status: ApprovalStatus::Pending,
            sales: 0,
            views: 0,
            created_at: Utc::now(),
        }
    }

    pub fn is_orderable(&self) -> bool {
        self.status == ApprovalStatus::Approved
    }
}

/// Daily per-store time series record, created lazily on the first event of
/// each calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStat {
    pub store_id: StoreId,
    pub date: NaiveDate,
    pub views: i64,
    pub visitors: i64,
}

impl DailyStat {
    pub fn empty(store_id: StoreId, date: NaiveDate) -> Self {
        Self {
            store_id,
            date,
            views: 0,
            visitors: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_store_is_pending_with_zeroed_stats() {
        let store = Store::new(UserId::new(), "Souq", "desc", "Jeddah", "0500000000");
        assert_eq!(store.status, ApprovalStatus::Pending);
        assert_eq!(store.stats, StoreStats::default());
        assert_eq!(store.subscription.max_products, 10);
    }

    #[test]
    fn new_product_is_not_orderable_until_approved() {
        let mut product = Product::new(
            StoreId::new(),
            "Widget",
            "desc",
            Money::from_cents(100),
            "tools",
            "Riyadh",
        );
        assert!(!product.is_orderable());
        product.status = ApprovalStatus::Approved;
        assert!(product.is_orderable());
    }

    #[test]
    fn stats_apply_deltas() {
        let mut stats = StoreStats::default();
        stats.apply(&[
            (StoreCounter::OrdersPending, 1),
            (StoreCounter::OrdersTotal, 1),
        ]);
        stats.apply(&[
            (StoreCounter::OrdersPending, -1),
            (StoreCounter::OrdersCompleted, 1),
            (StoreCounter::RevenueTotal, 500),
        ]);

        assert_eq!(stats.orders.pending, 0);
        assert_eq!(stats.orders.completed, 1);
        assert_eq!(stats.orders.total, 1);
        assert_eq!(stats.revenue.total, 500);
    }

    #[test]
    fn store_serializes_in_camel_case() {
        let store = Store::new(UserId::new(), "Souq", "desc", "Jeddah", "0500000000");
        let json = serde_json::to_value(&store).unwrap();
        assert!(json.get("contactPhone").is_some());
        assert!(json["stats"]["orders"].get("pending").is_some());
        assert!(json["subscription"].get("maxProducts").is_some());
    }
}
