use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use common::{OrderId, ProductId, StoreId, UserId};
use domain::{
    ApprovalStatus, DailyStat, Order, OrderStatus, Product, Store, StoreCounter, StoreStats,
};
use tokio::sync::RwLock;

use crate::{
    Result, StorageError,
    store::{CatalogStore, OrderStore},
};

/// In-memory store implementation for testing and local runs.
///
/// Provides the same interface as the PostgreSQL implementation. Counter
/// bumps mutate under a single write guard, so they are atomic with respect
/// to concurrent tasks.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<State>>,
}

#[derive(Default)]
struct State {
    stores: HashMap<StoreId, Store>,
    products: HashMap<ProductId, Product>,
    orders: HashMap<OrderId, Order>,
    daily: HashMap<(StoreId, NaiveDate), DailyStat>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears all records.
    pub async fn clear(&self) {
        let mut state = self.inner.write().await;
        state.stores.clear();
        state.products.clear();
        state.orders.clear();
        state.daily.clear();
    }

    /// Total number of persisted orders.
    pub async fn order_count(&self) -> usize {
        self.inner.read().await.orders.len()
    }
}

fn sort_newest_first(orders: &mut [Order]) {
    orders.sort_by(|a, b| b.order_date.cmp(&a.order_date));
}

#[async_trait]
impl CatalogStore for InMemoryStore {
    async fn insert_store(&self, store: &Store) -> Result<()> {
        let mut state = self.inner.write().await;
        state.stores.insert(store.id, store.clone());
        Ok(())
    }

    async fn store(&self, id: StoreId) -> Result<Option<Store>> {
        Ok(self.inner.read().await.stores.get(&id).cloned())
    }

    async fn update_store_status(&self, id: StoreId, status: ApprovalStatus) -> Result<()> {
        let mut state = self.inner.write().await;
        let store = state
            .stores
            .get_mut(&id)
            .ok_or_else(|| StorageError::not_found("store", id))?;
        store.status = status;
        Ok(())
    }

    async fn replace_store_stats(&self, id: StoreId, stats: StoreStats) -> Result<()> {
        let mut state = self.inner.write().await;
        let store = state
            .stores
            .get_mut(&id)
            .ok_or_else(|| StorageError::not_found("store", id))?;
        store.stats = stats;
        Ok(())
    }

    async fn bump_store_counters(
        &self,
        id: StoreId,
        deltas: &[(StoreCounter, i64)],
    ) -> Result<()> {
        let mut state = self.inner.write().await;
        let store = state
            .stores
            .get_mut(&id)
            .ok_or_else(|| StorageError::not_found("store", id))?;
        store.stats.apply(deltas);
        Ok(())
    }

    async fn insert_product(&self, product: &Product) -> Result<()> {
        let mut state = self.inner.write().await;
        state.products.insert(product.id, product.clone());
        Ok(())
    }

    async fn product(&self, id: ProductId) -> Result<Option<Product>> {
        Ok(self.inner.read().await.products.get(&id).cloned())
    }

    async fn update_product_status(&self, id: ProductId, status: ApprovalStatus) -> Result<()> {
        let mut state = self.inner.write().await;
        let product = state
            .products
            .get_mut(&id)
            .ok_or_else(|| StorageError::not_found("product", id))?;
        product.status = status;
        Ok(())
    }

    async fn count_store_products(&self, store_id: StoreId) -> Result<u64> {
        let state = self.inner.read().await;
        Ok(state
            .products
            .values()
            .filter(|p| p.store_id == store_id)
            .count() as u64)
    }

    async fn bump_product_sales(&self, id: ProductId, delta: i64) -> Result<()> {
        let mut state = self.inner.write().await;
        let product = state
            .products
            .get_mut(&id)
            .ok_or_else(|| StorageError::not_found("product", id))?;
        product.sales += delta;
        Ok(())
    }

    async fn bump_product_views(&self, id: ProductId, delta: i64) -> Result<()> {
        let mut state = self.inner.write().await;
        let product = state
            .products
            .get_mut(&id)
            .ok_or_else(|| StorageError::not_found("product", id))?;
        product.views += delta;
        Ok(())
    }

    async fn bump_daily_stat(
        &self,
        store_id: StoreId,
        date: NaiveDate,
        views: i64,
        visitors: i64,
    ) -> Result<()> {
        let mut state = self.inner.write().await;
        let stat = state
            .daily
            .entry((store_id, date))
            .or_insert_with(|| DailyStat::empty(store_id, date));
        stat.views += views;
        stat.visitors += visitors;
        Ok(())
    }

    async fn daily_stats(&self, store_id: StoreId, from: NaiveDate) -> Result<Vec<DailyStat>> {
        let state = self.inner.read().await;
        let mut stats: Vec<_> = state
            .daily
            .values()
            .filter(|s| s.store_id == store_id && s.date >= from)
            .cloned()
            .collect();
        stats.sort_by_key(|s| s.date);
        Ok(stats)
    }
}

#[async_trait]
impl OrderStore for InMemoryStore {
    async fn insert_order(&self, order: &Order) -> Result<()> {
        let mut state = self.inner.write().await;
        state.orders.insert(order.id, order.clone());
        Ok(())
    }

    async fn order(&self, id: OrderId) -> Result<Option<Order>> {
        Ok(self.inner.read().await.orders.get(&id).cloned())
    }

    async fn replace_order(&self, order: &Order) -> Result<()> {
        let mut state = self.inner.write().await;
        if !state.orders.contains_key(&order.id) {
            return Err(StorageError::not_found("order", order.id));
        }
        state.orders.insert(order.id, order.clone());
        Ok(())
    }

    async fn orders_for_user(&self, user: UserId) -> Result<Vec<Order>> {
        let state = self.inner.read().await;
        let mut orders: Vec<_> = state
            .orders
            .values()
            .filter(|o| o.user_id == user)
            .cloned()
            .collect();
        sort_newest_first(&mut orders);
        Ok(orders)
    }

    async fn orders_for_store(
        &self,
        store: StoreId,
        status: Option<OrderStatus>,
    ) -> Result<Vec<Order>> {
        let state = self.inner.read().await;
        let mut orders: Vec<_> = state
            .orders
            .values()
            .filter(|o| {
                o.items.iter().any(|item| item.store_id == store)
                    && status.is_none_or(|s| o.status == s)
            })
            .cloned()
            .collect();
        sort_newest_first(&mut orders);
        Ok(orders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{Money, UserId};
    use domain::{LineItem, PaymentMethod, ShippingAddress};

    fn address() -> ShippingAddress {
        ShippingAddress {
            street: "1 Main St".to_string(),
            city: "Riyadh".to_string(),
            postal_code: None,
            country: "Saudi Arabia".to_string(),
        }
    }

    fn order_for(user: UserId, store: StoreId) -> Order {
        Order::new(
            user,
            vec![LineItem::new(
                ProductId::new(),
                "Widget",
                Money::from_cents(100),
                1,
                store,
            )],
            Money::from_cents(100),
            address(),
            PaymentMethod::Cash,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn store_roundtrip() {
        let db = InMemoryStore::new();
        let store = Store::new(UserId::new(), "Souq", "desc", "Jeddah", "0500000000");
        db.insert_store(&store).await.unwrap();

        let loaded = db.store(store.id).await.unwrap().unwrap();
        assert_eq!(loaded, store);
        assert!(db.store(StoreId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn bump_store_counters_applies_deltas() {
        let db = InMemoryStore::new();
        let store = Store::new(UserId::new(), "Souq", "desc", "Jeddah", "0500000000");
        db.insert_store(&store).await.unwrap();

        db.bump_store_counters(
            store.id,
            &[
                (StoreCounter::OrdersPending, 1),
                (StoreCounter::OrdersTotal, 1),
            ],
        )
        .await
        .unwrap();
        db.bump_store_counters(store.id, &[(StoreCounter::RevenueTotal, 250)])
            .await
            .unwrap();

        let loaded = db.store(store.id).await.unwrap().unwrap();
        assert_eq!(loaded.stats.orders.pending, 1);
        assert_eq!(loaded.stats.orders.total, 1);
        assert_eq!(loaded.stats.revenue.total, 250);
    }

    #[tokio::test]
    async fn bump_missing_store_is_not_found() {
        let db = InMemoryStore::new();
        let err = db
            .bump_store_counters(StoreId::new(), &[(StoreCounter::OrdersTotal, 1)])
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn concurrent_counter_bumps_are_not_lost() {
        let db = InMemoryStore::new();
        let store = Store::new(UserId::new(), "Souq", "desc", "Jeddah", "0500000000");
        db.insert_store(&store).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..50 {
            let db = db.clone();
            let id = store.id;
            handles.push(tokio::spawn(async move {
                db.bump_store_counters(id, &[(StoreCounter::OrdersTotal, 1)])
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let loaded = db.store(store.id).await.unwrap().unwrap();
        assert_eq!(loaded.stats.orders.total, 50);
    }

    #[tokio::test]
    async fn product_sales_bump() {
        let db = InMemoryStore::new();
        let product = Product::new(
            StoreId::new(),
            "Widget",
            "desc",
            Money::from_cents(100),
            "tools",
            "Riyadh",
        );
        db.insert_product(&product).await.unwrap();
        db.bump_product_sales(product.id, 3).await.unwrap();

        let loaded = db.product(product.id).await.unwrap().unwrap();
        assert_eq!(loaded.sales, 3);
    }

    #[tokio::test]
    async fn product_views_bump() {
        let db = InMemoryStore::new();
        let product = Product::new(
            StoreId::new(),
            "Widget",
            "desc",
            Money::from_cents(100),
            "tools",
            "Riyadh",
        );
        db.insert_product(&product).await.unwrap();
        db.bump_product_views(product.id, 1).await.unwrap();
        db.bump_product_views(product.id, 1).await.unwrap();

        let loaded = db.product(product.id).await.unwrap().unwrap();
        assert_eq!(loaded.views, 2);
        assert_eq!(loaded.sales, 0);
    }

    #[tokio::test]
    async fn count_store_products() {
        let db = InMemoryStore::new();
        let store_id = StoreId::new();
        for _ in 0..3 {
            let p = Product::new(
                store_id,
                "Widget",
                "desc",
                Money::from_cents(100),
                "tools",
                "Riyadh",
            );
            db.insert_product(&p).await.unwrap();
        }

        assert_eq!(db.count_store_products(store_id).await.unwrap(), 3);
        assert_eq!(db.count_store_products(StoreId::new()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn orders_for_user_sorted_newest_first() {
        let db = InMemoryStore::new();
        let user = UserId::new();
        let store = StoreId::new();

        let older = order_for(user, store);
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let newer = order_for(user, store);

        db.insert_order(&older).await.unwrap();
        db.insert_order(&newer).await.unwrap();
        db.insert_order(&order_for(UserId::new(), store)).await.unwrap();

        let orders = db.orders_for_user(user).await.unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].id, newer.id);
        assert_eq!(orders[1].id, older.id);
    }

    #[tokio::test]
    async fn orders_for_store_filters_by_status() {
        let db = InMemoryStore::new();
        let store = StoreId::new();

        let mut delivered = order_for(UserId::new(), store);
        delivered.record_status(OrderStatus::Delivered, None);
        let pending = order_for(UserId::new(), store);

        db.insert_order(&delivered).await.unwrap();
        db.insert_order(&pending).await.unwrap();
        db.insert_order(&order_for(UserId::new(), StoreId::new()))
            .await
            .unwrap();

        let all = db.orders_for_store(store, None).await.unwrap();
        assert_eq!(all.len(), 2);

        let only_pending = db
            .orders_for_store(store, Some(OrderStatus::Pending))
            .await
            .unwrap();
        assert_eq!(only_pending.len(), 1);
        assert_eq!(only_pending[0].id, pending.id);
    }

    #[tokio::test]
    async fn replace_missing_order_is_not_found() {
        let db = InMemoryStore::new();
        let order = order_for(UserId::new(), StoreId::new());
        let err = db.replace_order(&order).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn daily_stat_upsert() {
        let db = InMemoryStore::new();
        let store = StoreId::new();
        let day = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();

        db.bump_daily_stat(store, day, 1, 1).await.unwrap();
        db.bump_daily_stat(store, day, 1, 0).await.unwrap();
        db.bump_daily_stat(store, day.succ_opt().unwrap(), 1, 1)
            .await
            .unwrap();

        let stats = db.daily_stats(store, day).await.unwrap();
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].views, 2);
        assert_eq!(stats[0].visitors, 1);
        assert_eq!(stats[1].views, 1);
    }
}
