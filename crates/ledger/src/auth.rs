//! Authorization rules for order access.
//!
//! The caller identity arrives already verified (external auth provider);
//! this module only answers *what that caller may do* with a given order.
//! Store ownership is resolved by loading each distinct store referenced by
//! the order's line items, short-circuiting on the first match.

use common::Caller;
use domain::Order;
use storage::CatalogStore;

use crate::Result;

/// True if the caller owns at least one store referenced by the order.
pub async fn owns_referenced_store<S: CatalogStore>(
    store: &S,
    caller: &Caller,
    order: &Order,
) -> Result<bool> {
    for store_id in order.store_ids() {
        if let Some(record) = store.store(store_id).await?
            && record.is_owned_by(caller.id)
        {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Admins, the customer who placed the order, and owners of any referenced
/// store may read an order.
pub async fn can_read_order<S: CatalogStore>(
    store: &S,
    caller: &Caller,
    order: &Order,
) -> Result<bool> {
    if caller.is_admin() || caller.id == order.user_id {
        return Ok(true);
    }
    owns_referenced_store(store, caller, order).await
}

/// Only admins and owners of a referenced store may mutate an order's
/// status or answer inquiries. The customer who placed the order may not.
pub async fn can_mutate_order<S: CatalogStore>(
    store: &S,
    caller: &Caller,
    order: &Order,
) -> Result<bool> {
    if caller.is_admin() {
        return Ok(true);
    }
    owns_referenced_store(store, caller, order).await
}
