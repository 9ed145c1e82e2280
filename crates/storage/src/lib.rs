//! Persistence layer for the marketplace backend.
//!
//! Exposes CRUD + query operations over stores, products, orders and daily
//! stats, together with server-side atomic counter increments. Two backends
//! implement the same traits: [`InMemoryStore`] for tests and local runs,
//! [`PostgresStore`] for production.

mod error;
mod memory;
mod postgres;
mod store;

pub use error::{Result, StorageError};
pub use memory::InMemoryStore;
pub use postgres::PostgresStore;
pub use store::{CatalogStore, MarketStore, OrderStore};
