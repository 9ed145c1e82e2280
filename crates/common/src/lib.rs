//! Shared primitive types used across the marketplace backend.

mod caller;
mod money;
mod types;

pub use caller::{Caller, Role};
pub use money::Money;
pub use types::{OrderId, ProductId, StoreId, UserId};
