//! Order entity and its value objects.
//!
//! Field names serialize in camelCase: the persisted shape of an order is the
//! wire contract clients already read.

use chrono::{DateTime, Duration, Utc};
use common::{Money, OrderId, ProductId, StoreId, UserId};
use serde::{Deserialize, Serialize};

use crate::{OrderError, OrderStatus};

/// One product+quantity entry within an order.
///
/// `name` and `unit_price` are snapshots frozen at order time, so later
/// product edits never alter historical orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Money,
    pub quantity: u32,
    /// `unit_price × quantity`, computed server-side at creation.
    pub subtotal: Money,
    pub store_id: StoreId,
}

impl LineItem {
    pub fn new(
        product_id: ProductId,
        name: impl Into<String>,
        unit_price: Money,
        quantity: u32,
        store_id: StoreId,
    ) -> Self {
        Self {
            product_id,
            name: name.into(),
            unit_price,
            quantity,
            subtotal: unit_price.multiply(quantity),
            store_id,
        }
    }
}

/// One entry in the append-only status audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusEntry {
    pub status: OrderStatus,
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

/// Shipment tracking estimate, set when an order moves to `shipping`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingInfo {
    pub last_update: DateTime<Utc>,
    pub estimated_delivery: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub street: String,
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default = "ShippingAddress::default_country")]
    pub country: String,
}

impl ShippingAddress {
    fn default_country() -> String {
        "Saudi Arabia".to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Cash,
}

/// An order placed by a customer, possibly spanning multiple stores.
///
/// Created once at checkout; afterwards mutated only by status appends and
/// the single-slot inquiry fields. Never deleted in normal flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub items: Vec<LineItem>,
    /// Caller-supplied grand total. Not recomputed from line subtotals;
    /// preserved as observed upstream behavior.
    pub total: Money,
    pub status: OrderStatus,
    pub status_history: Vec<StatusEntry>,
    pub order_date: DateTime<Utc>,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_info: Option<TrackingInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inquiry_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inquiry_response: Option<String>,
}

impl Order {
    /// Creates a new pending order with its initial history entry.
    pub fn new(
        user_id: UserId,
        items: Vec<LineItem>,
        total: Money,
        shipping_address: ShippingAddress,
        payment_method: PaymentMethod,
    ) -> Result<Self, OrderError> {
        if items.is_empty() {
            return Err(OrderError::NoItems);
        }

        let now = Utc::now();
        Ok(Self {
            id: OrderId::new(),
            user_id,
            items,
            total,
            status: OrderStatus::Pending,
            status_history: vec![StatusEntry {
                status: OrderStatus::Pending,
                timestamp: now,
                message: "order received".to_string(),
            }],
            order_date: now,
            shipping_address,
            payment_method,
            tracking_info: None,
            rejection_reason: None,
            inquiry_message: None,
            inquiry_response: None,
        })
    }

    /// Applies a status change: sets the status, appends a history entry and
    /// fills the terminal fields for `rejected` / `shipping`.
    pub fn record_status(&mut self, status: OrderStatus, message: Option<String>) {
        let now = Utc::now();

        self.status = status;
        self.status_history.push(StatusEntry {
            status,
            timestamp: now,
            message: message
                .clone()
                .unwrap_or_else(|| format!("order status updated to {status}")),
        });

        if status == OrderStatus::Rejected {
            self.rejection_reason = Some(message.unwrap_or_else(|| "order rejected".to_string()));
        }

        if status == OrderStatus::Shipping {
            self.tracking_info = Some(TrackingInfo {
                last_update: now,
                estimated_delivery: now + Duration::days(2),
            });
        }
    }

    /// Returns the distinct store ids referenced by the line items, in first
    /// appearance order.
    pub fn store_ids(&self) -> Vec<StoreId> {
        let mut ids = Vec::new();
        for item in &self.items {
            if !ids.contains(&item.store_id) {
                ids.push(item.store_id);
            }
        }
        ids
    }

    /// Sums the subtotals of the line items belonging to one store.
    pub fn store_subtotal(&self, store_id: StoreId) -> Money {
        self.items
            .iter()
            .filter(|item| item.store_id == store_id)
            .map(|item| item.subtotal)
            .sum()
    }

    /// Sets the single-slot inquiry message, overwriting any prior one.
    pub fn set_inquiry(&mut self, message: impl Into<String>) {
        self.inquiry_message = Some(message.into());
    }

    /// Sets the inquiry response. Fails if no message is currently set.
    pub fn answer_inquiry(&mut self, response: impl Into<String>) -> Result<(), OrderError> {
        if self.inquiry_message.is_none() {
            return Err(OrderError::NoInquiry);
        }
        self.inquiry_response = Some(response.into());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address() -> ShippingAddress {
        ShippingAddress {
            street: "1 Main St".to_string(),
            city: "Riyadh".to_string(),
            postal_code: None,
            country: "Saudi Arabia".to_string(),
        }
    }

    fn item(store_id: StoreId, price_cents: i64, quantity: u32) -> LineItem {
        LineItem::new(
            ProductId::new(),
            "Widget",
            Money::from_cents(price_cents),
            quantity,
            store_id,
        )
    }

    fn order_with(items: Vec<LineItem>) -> Order {
        Order::new(
            UserId::new(),
            items,
            Money::from_cents(1000),
            address(),
            PaymentMethod::Cash,
        )
        .unwrap()
    }

    #[test]
    fn line_item_subtotal_is_price_times_quantity() {
        let item = item(StoreId::new(), 995, 3);
        assert_eq!(item.subtotal.cents(), 2985);
    }

    #[test]
    fn new_order_is_pending_with_one_history_entry() {
        let order = order_with(vec![item(StoreId::new(), 100, 1)]);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.status_history.len(), 1);
        assert_eq!(order.status_history[0].status, OrderStatus::Pending);
        assert_eq!(order.status_history[0].message, "order received");
    }

    #[test]
    fn new_order_rejects_empty_items() {
        let result = Order::new(
            UserId::new(),
            vec![],
            Money::zero(),
            address(),
            PaymentMethod::Cash,
        );
        assert_eq!(result.unwrap_err(), OrderError::NoItems);
    }

    #[test]
    fn record_status_appends_history() {
        let mut order = order_with(vec![item(StoreId::new(), 100, 1)]);
        order.record_status(OrderStatus::Preparing, None);
        order.record_status(OrderStatus::Delivered, Some("left at door".to_string()));

        assert_eq!(order.status, OrderStatus::Delivered);
        assert_eq!(order.status_history.len(), 3);
        assert_eq!(order.status_history[2].status, OrderStatus::Delivered);
        assert_eq!(order.status_history[2].message, "left at door");
        assert_eq!(
            order.status_history[1].message,
            "order status updated to preparing"
        );
    }

    #[test]
    fn rejection_sets_reason() {
        let mut order = order_with(vec![item(StoreId::new(), 100, 1)]);
        order.record_status(OrderStatus::Rejected, None);
        assert_eq!(order.rejection_reason.as_deref(), Some("order rejected"));

        let mut order = order_with(vec![item(StoreId::new(), 100, 1)]);
        order.record_status(OrderStatus::Rejected, Some("out of stock".to_string()));
        assert_eq!(order.rejection_reason.as_deref(), Some("out of stock"));
    }

    #[test]
    fn shipping_sets_tracking_estimate_two_days_out() {
        let mut order = order_with(vec![item(StoreId::new(), 100, 1)]);
        order.record_status(OrderStatus::Shipping, None);

        let tracking = order.tracking_info.expect("tracking set");
        assert_eq!(
            tracking.estimated_delivery - tracking.last_update,
            Duration::days(2)
        );
    }

    #[test]
    fn store_ids_are_distinct_in_first_appearance_order() {
        let a = StoreId::new();
        let b = StoreId::new();
        let order = order_with(vec![item(a, 100, 1), item(b, 200, 1), item(a, 300, 2)]);
        assert_eq!(order.store_ids(), vec![a, b]);
    }

    #[test]
    fn store_subtotal_sums_only_that_store() {
        let a = StoreId::new();
        let b = StoreId::new();
        let order = order_with(vec![item(a, 100, 2), item(b, 500, 1), item(a, 50, 1)]);
        assert_eq!(order.store_subtotal(a).cents(), 250);
        assert_eq!(order.store_subtotal(b).cents(), 500);
    }

    #[test]
    fn inquiry_response_requires_message() {
        let mut order = order_with(vec![item(StoreId::new(), 100, 1)]);
        assert_eq!(order.answer_inquiry("hi"), Err(OrderError::NoInquiry));

        order.set_inquiry("where is it?");
        order.answer_inquiry("on the way").unwrap();
        assert_eq!(order.inquiry_response.as_deref(), Some("on the way"));
    }

    #[test]
    fn inquiry_slots_overwrite() {
        let mut order = order_with(vec![item(StoreId::new(), 100, 1)]);
        order.set_inquiry("first");
        order.set_inquiry("second");
        assert_eq!(order.inquiry_message.as_deref(), Some("second"));
    }

    #[test]
    fn serialization_roundtrip_uses_camel_case() {
        let order = order_with(vec![item(StoreId::new(), 100, 1)]);
        let json = serde_json::to_value(&order).unwrap();
        assert!(json.get("userId").is_some());
        assert!(json.get("statusHistory").is_some());
        assert!(json.get("orderDate").is_some());

        let back: Order = serde_json::from_value(json).unwrap();
        assert_eq!(back, order);
    }
}
