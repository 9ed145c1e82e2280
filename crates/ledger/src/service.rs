//! The order ledger service.

use common::{Caller, OrderId, ProductId, StoreId};
use domain::{ApprovalStatus, LineItem, Order, OrderError, OrderStatus, Product, Store, StoreStats};
use storage::MarketStore;

use crate::{
    LedgerError, NewOrder, NewProduct, NewStore, Result, auth,
    stats::{self, settle_creation, settle_transition},
};

/// Orchestrates the order lifecycle and the catalog operations on top of a
/// [`MarketStore`] backend.
///
/// Multi-document operations are sequences of independently-committed steps
/// (order write, then per-store counter settlement); there is no cross-
/// document transaction. Drift introduced by a crash mid-sequence is repaired
/// with [`OrderLedger::reconcile_store_stats`].
#[derive(Clone)]
pub struct OrderLedger<S: MarketStore> {
    store: S,
}

impl<S: MarketStore> OrderLedger<S> {
    /// Creates a new ledger over the given backend.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Gets a reference to the backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Places an order.
    ///
    /// Line items are priced from the catalog at call time; the caller's
    /// `total` is stored as-is. Each product's `sales` counter is bumped as
    /// items are resolved and is not rolled back if a later item fails
    /// validation.
    #[tracing::instrument(skip(self, input), fields(caller_id = %caller.id))]
    pub async fn create_order(&self, caller: &Caller, input: NewOrder) -> Result<Order> {
        if input.items.is_empty() {
            return Err(OrderError::NoItems.into());
        }

        let mut items = Vec::with_capacity(input.items.len());
        for entry in &input.items {
            if entry.quantity == 0 {
                return Err(OrderError::InvalidQuantity {
                    quantity: entry.quantity,
                }
                .into());
            }

            let product = self
                .store
                .product(entry.product_id)
                .await?
                .ok_or_else(|| LedgerError::not_found("product", entry.product_id))?;

            if !product.is_orderable() {
                return Err(LedgerError::InvalidState(format!(
                    "product {} is not approved for sale",
                    product.id
                )));
            }

            items.push(LineItem::new(
                product.id,
                &product.name,
                product.price,
                entry.quantity,
                product.store_id,
            ));

            // Best-effort: sales already bumped for earlier items stay bumped
            // even if a later item aborts the order.
            if let Err(err) = self
                .store
                .bump_product_sales(product.id, i64::from(entry.quantity))
                .await
            {
                tracing::warn!(product_id = %product.id, %err, "sales bump failed");
            }
        }

        let order = Order::new(
            caller.id,
            items,
            input.total,
            input.shipping_address,
            input.payment_method,
        )?;
        self.store.insert_order(&order).await?;

        settle_creation(&self.store, &order).await;

        metrics::counter!("orders_created_total").increment(1);
        tracing::info!(order_id = %order.id, items = order.items.len(), "order created");

        Ok(order)
    }

    /// Moves an order to a new status.
    ///
    /// Allowed for admins and owners of a store referenced by the order; the
    /// customer who placed it may not change its status. Counter settlement
    /// is driven by the status the order held before this call.
    #[tracing::instrument(skip(self, message), fields(caller_id = %caller.id, %order_id))]
    pub async fn update_order_status(
        &self,
        caller: &Caller,
        order_id: OrderId,
        new_status: OrderStatus,
        message: Option<String>,
    ) -> Result<Order> {
        let mut order = self.require_order(order_id).await?;

        if !auth::can_mutate_order(&self.store, caller, &order).await? {
            return Err(LedgerError::forbidden(
                "only admins and owners of a referenced store may update order status",
            ));
        }

        let prior = order.status;
        order.record_status(new_status, message);
        self.store.replace_order(&order).await?;

        settle_transition(&self.store, &order, prior).await;

        metrics::counter!("order_status_transitions_total", "status" => new_status.as_str())
            .increment(1);
        tracing::info!(%order_id, from = %prior, to = %new_status, "order status updated");

        Ok(order)
    }

    /// Attaches an inquiry message to an order. Only the customer who placed
    /// the order may ask; re-asking overwrites the previous message.
    #[tracing::instrument(skip(self, message), fields(caller_id = %caller.id, %order_id))]
    pub async fn add_inquiry(
        &self,
        caller: &Caller,
        order_id: OrderId,
        message: String,
    ) -> Result<Order> {
        let mut order = self.require_order(order_id).await?;

        if caller.id != order.user_id {
            return Err(LedgerError::forbidden(
                "only the customer who placed the order may add an inquiry",
            ));
        }

        order.set_inquiry(message);
        self.store.replace_order(&order).await?;
        Ok(order)
    }

    /// Answers an order's inquiry. Allowed for admins and referenced store
    /// owners; fails if no inquiry message exists.
    #[tracing::instrument(skip(self, response), fields(caller_id = %caller.id, %order_id))]
    pub async fn answer_inquiry(
        &self,
        caller: &Caller,
        order_id: OrderId,
        response: String,
    ) -> Result<Order> {
        let mut order = self.require_order(order_id).await?;

        if !auth::can_mutate_order(&self.store, caller, &order).await? {
            return Err(LedgerError::forbidden(
                "only admins and owners of a referenced store may respond to inquiries",
            ));
        }

        order.answer_inquiry(response)?;
        self.store.replace_order(&order).await?;
        Ok(order)
    }

    /// Fetches one order, if the caller may read it.
    pub async fn get_order(&self, caller: &Caller, order_id: OrderId) -> Result<Order> {
        let order = self.require_order(order_id).await?;

        if !auth::can_read_order(&self.store, caller, &order).await? {
            return Err(LedgerError::forbidden("not allowed to view this order"));
        }
        Ok(order)
    }

    /// The caller's own orders, newest first.
    pub async fn user_orders(&self, caller: &Caller) -> Result<Vec<Order>> {
        Ok(self.store.orders_for_user(caller.id).await?)
    }

    /// Orders touching one store, newest first, optionally filtered by
    /// status. Admin or store owner only.
    pub async fn store_orders(
        &self,
        caller: &Caller,
        store_id: StoreId,
        status: Option<OrderStatus>,
    ) -> Result<Vec<Order>> {
        let record = self.require_store(store_id).await?;

        if !caller.is_admin() && !record.is_owned_by(caller.id) {
            return Err(LedgerError::forbidden(
                "only the store owner may list its orders",
            ));
        }

        Ok(self.store.orders_for_store(store_id, status).await?)
    }

    /// Registers a store owned by the caller, pending moderation.
    #[tracing::instrument(skip(self, input), fields(caller_id = %caller.id))]
    pub async fn create_store(&self, caller: &Caller, input: NewStore) -> Result<Store> {
        let record = Store::new(
            caller.id,
            input.name,
            input.description,
            input.city,
            input.contact_phone,
        );
        self.store.insert_store(&record).await?;
        tracing::info!(store_id = %record.id, "store registered");
        Ok(record)
    }

    /// Moderates a store. Admin only.
    pub async fn set_store_status(
        &self,
        caller: &Caller,
        store_id: StoreId,
        status: ApprovalStatus,
    ) -> Result<Store> {
        if !caller.is_admin() {
            return Err(LedgerError::forbidden("only admins may moderate stores"));
        }
        self.store.update_store_status(store_id, status).await?;
        self.require_store(store_id).await
    }

    /// Lists a product under one of the caller's stores, pending moderation.
    ///
    /// The store must be approved and under its subscription's product limit.
    #[tracing::instrument(skip(self, input), fields(caller_id = %caller.id))]
    pub async fn create_product(&self, caller: &Caller, input: NewProduct) -> Result<Product> {
        let record = self.require_store(input.store_id).await?;

        if !caller.is_admin() && !record.is_owned_by(caller.id) {
            return Err(LedgerError::forbidden(
                "only the store owner may list products",
            ));
        }

        if record.status != ApprovalStatus::Approved {
            return Err(LedgerError::InvalidState(format!(
                "store {} is not approved",
                record.id
            )));
        }

        let listed = self.store.count_store_products(record.id).await?;
        if listed >= u64::from(record.subscription.max_products) {
            return Err(LedgerError::InvalidState(format!(
                "store {} has reached its product limit of {}",
                record.id, record.subscription.max_products
            )));
        }

        let product = Product::new(
            record.id,
            input.name,
            input.description,
            input.price,
            input.category,
            input.city,
        );
        self.store.insert_product(&product).await?;
        tracing::info!(product_id = %product.id, store_id = %record.id, "product listed");
        Ok(product)
    }

    /// Fetches one product, counting the read as a view. Public; no caller
    /// required.
    pub async fn get_product(&self, product_id: ProductId) -> Result<Product> {
        self.store.bump_product_views(product_id, 1).await?;
        self.store
            .product(product_id)
            .await?
            .ok_or_else(|| LedgerError::not_found("product", product_id))
    }

    /// Moderates a product. Admin only.
    pub async fn set_product_status(
        &self,
        caller: &Caller,
        product_id: ProductId,
        status: ApprovalStatus,
    ) -> Result<Product> {
        if !caller.is_admin() {
            return Err(LedgerError::forbidden("only admins may moderate products"));
        }
        self.store.update_product_status(product_id, status).await?;
        self.store
            .product(product_id)
            .await?
            .ok_or_else(|| LedgerError::not_found("product", product_id))
    }

    /// A store's denormalized counters. Admin or owner only.
    pub async fn store_stats(&self, caller: &Caller, store_id: StoreId) -> Result<StoreStats> {
        let record = self.require_store(store_id).await?;

        if !caller.is_admin() && !record.is_owned_by(caller.id) {
            return Err(LedgerError::forbidden(
                "only the store owner may view its stats",
            ));
        }
        Ok(record.stats)
    }

    /// Records a storefront visit. Public; no caller required.
    pub async fn record_visit(&self, store_id: StoreId) -> Result<()> {
        stats::record_visit(&self.store, store_id).await
    }

    /// Recomputes a store's counters from its orders. Admin only.
    pub async fn reconcile_store_stats(
        &self,
        caller: &Caller,
        store_id: StoreId,
    ) -> Result<StoreStats> {
        stats::reconcile_store_stats(&self.store, caller, store_id).await
    }

    async fn require_order(&self, order_id: OrderId) -> Result<Order> {
        self.store
            .order(order_id)
            .await?
            .ok_or_else(|| LedgerError::not_found("order", order_id))
    }

    async fn require_store(&self, store_id: StoreId) -> Result<Store> {
        self.store
            .store(store_id)
            .await?
            .ok_or_else(|| LedgerError::not_found("store", store_id))
    }
}
