//! Storage traits.

use async_trait::async_trait;
use chrono::NaiveDate;
use common::{OrderId, ProductId, StoreId, UserId};
use domain::{
    ApprovalStatus, DailyStat, Order, OrderStatus, Product, Store, StoreCounter, StoreStats,
};

use crate::Result;

/// Catalog persistence: stores, products, counters and the daily time series.
///
/// Counter mutations (`bump_*`) MUST be atomic in the backend — a single
/// server-side increment, never an application-level read-modify-write —
/// so concurrent order settlement cannot lose updates.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn insert_store(&self, store: &Store) -> Result<()>;

    async fn store(&self, id: StoreId) -> Result<Option<Store>>;

    async fn update_store_status(&self, id: StoreId, status: ApprovalStatus) -> Result<()>;

    /// Overwrites a store's denormalized counters wholesale.
    ///
    /// Reconciliation only; normal traffic goes through
    /// [`bump_store_counters`](CatalogStore::bump_store_counters).
    async fn replace_store_stats(&self, id: StoreId, stats: StoreStats) -> Result<()>;

    /// Atomically applies a batch of counter deltas to one store document.
    async fn bump_store_counters(
        &self,
        id: StoreId,
        deltas: &[(StoreCounter, i64)],
    ) -> Result<()>;

    async fn insert_product(&self, product: &Product) -> Result<()>;

    async fn product(&self, id: ProductId) -> Result<Option<Product>>;

    async fn update_product_status(&self, id: ProductId, status: ApprovalStatus) -> Result<()>;

    /// Number of products currently listed by a store (subscription gate).
    async fn count_store_products(&self, store_id: StoreId) -> Result<u64>;

    /// Atomically increments a product's sales counter.
    async fn bump_product_sales(&self, id: ProductId, delta: i64) -> Result<()>;

    /// Atomically increments a product's view counter.
    async fn bump_product_views(&self, id: ProductId, delta: i64) -> Result<()>;

    /// Upserts the daily stat row for `(store_id, date)` and adds the deltas.
    async fn bump_daily_stat(
        &self,
        store_id: StoreId,
        date: NaiveDate,
        views: i64,
        visitors: i64,
    ) -> Result<()>;

    /// Daily stat rows for a store from `from` onwards, oldest first.
    async fn daily_stats(&self, store_id: StoreId, from: NaiveDate) -> Result<Vec<DailyStat>>;
}

/// Order persistence.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn insert_order(&self, order: &Order) -> Result<()>;

    async fn order(&self, id: OrderId) -> Result<Option<Order>>;

    /// Replaces the full order document (status appends, inquiry slots).
    async fn replace_order(&self, order: &Order) -> Result<()>;

    /// A user's orders, newest first.
    async fn orders_for_user(&self, user: UserId) -> Result<Vec<Order>>;

    /// Orders containing at least one line item for the store, optionally
    /// filtered by status, newest first.
    async fn orders_for_store(
        &self,
        store: StoreId,
        status: Option<OrderStatus>,
    ) -> Result<Vec<Order>>;
}

/// Convenience bound for services generic over the whole backing store.
pub trait MarketStore: CatalogStore + OrderStore + Clone + Send + Sync + 'static {}

impl<T> MarketStore for T where T: CatalogStore + OrderStore + Clone + Send + Sync + 'static {}
