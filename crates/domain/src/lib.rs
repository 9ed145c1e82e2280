//! Domain layer: entities and pure business rules.
//!
//! This crate performs no I/O. Persistence lives in `storage`, orchestration
//! in `ledger`.

mod catalog;
mod error;
mod order;
mod status;
pub mod stats;

pub use catalog::{
    ApprovalStatus, DailyStat, OrderCounters, PeriodCounters, Product, Store, StoreStats,
    SubscriptionDetails,
};
pub use error::OrderError;
pub use order::{LineItem, Order, PaymentMethod, ShippingAddress, StatusEntry, TrackingInfo};
pub use status::OrderStatus;
pub use stats::StoreCounter;
