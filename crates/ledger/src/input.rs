//! Request payloads accepted by the ledger.

use common::{Money, ProductId, StoreId};
use domain::{PaymentMethod, ShippingAddress};
use serde::Deserialize;

/// One requested product+quantity entry at checkout.
///
/// Price and name are deliberately absent: they are resolved from the
/// catalog server-side so clients cannot set their own prices.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLineItem {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Checkout request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub items: Vec<NewLineItem>,
    /// Grand total as presented to the customer. Stored as-is.
    pub total: Money,
    pub shipping_address: ShippingAddress,
    #[serde(default)]
    pub payment_method: PaymentMethod,
}

/// Store registration request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStore {
    pub name: String,
    pub description: String,
    pub city: String,
    pub contact_phone: String,
}

/// Product listing request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub store_id: StoreId,
    pub name: String,
    pub description: String,
    pub price: Money,
    pub category: String,
    pub city: String,
}
