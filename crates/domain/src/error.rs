//! Pure domain rule violations.

use thiserror::Error;

/// Errors raised by order entity rules.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderError {
    /// The status string does not name one of the five known statuses.
    #[error("unknown order status: {0}")]
    UnknownStatus(String),

    /// An order must contain at least one line item.
    #[error("order must contain at least one item")]
    NoItems,

    /// Line item quantities must be at least one.
    #[error("invalid quantity: {quantity}")]
    InvalidQuantity { quantity: u32 },

    /// A response was attempted on an order without an inquiry message.
    #[error("no inquiry message to respond to")]
    NoInquiry,
}
