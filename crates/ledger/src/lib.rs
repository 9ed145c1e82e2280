//! Order lifecycle engine.
//!
//! [`OrderLedger`] orchestrates order creation, status transitions, the
//! inquiry slots and the catalog operations, settling the denormalized
//! per-store counters as a side effect of each lifecycle step. It is generic
//! over [`storage::MarketStore`] so the same service runs against Postgres in
//! production and the in-memory store in tests.

pub mod auth;
pub mod stats;

mod error;
mod input;
mod service;

pub use error::{LedgerError, Result};
pub use input::{NewLineItem, NewOrder, NewProduct, NewStore};
pub use service::OrderLedger;
