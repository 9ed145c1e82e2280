//! Order status machine.

use serde::{Deserialize, Serialize};

use crate::OrderError;

/// The status of an order in its lifecycle.
///
/// ```text
/// Pending ──► Preparing ──► Shipping ──► Delivered
///    │            │             │
///    └────────────┴─────────────┴──────► Rejected
/// ```
///
/// `Pending` is the initial status; `Delivered` and `Rejected` are terminal.
/// Transitions are not otherwise restricted: store owners move orders freely
/// between the non-terminal statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Preparing,
    Shipping,
    Delivered,
    Rejected,
}

impl OrderStatus {
    /// Parses a wire-format status string.
    pub fn parse(s: &str) -> Result<Self, OrderError> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "preparing" => Ok(OrderStatus::Preparing),
            "shipping" => Ok(OrderStatus::Shipping),
            "delivered" => Ok(OrderStatus::Delivered),
            "rejected" => Ok(OrderStatus::Rejected),
            other => Err(OrderError::UnknownStatus(other.to_string())),
        }
    }

    /// Returns the wire-format status name.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Shipping => "shipping",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Rejected => "rejected",
        }
    }

    /// Returns true if no further transitions are expected.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Rejected)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_statuses() {
        assert_eq!(OrderStatus::parse("pending"), Ok(OrderStatus::Pending));
        assert_eq!(OrderStatus::parse("preparing"), Ok(OrderStatus::Preparing));
        assert_eq!(OrderStatus::parse("shipping"), Ok(OrderStatus::Shipping));
        assert_eq!(OrderStatus::parse("delivered"), Ok(OrderStatus::Delivered));
        assert_eq!(OrderStatus::parse("rejected"), Ok(OrderStatus::Rejected));
    }

    #[test]
    fn parse_unknown_status_fails() {
        assert!(matches!(
            OrderStatus::parse("cancelled"),
            Err(OrderError::UnknownStatus(_))
        ));
    }

    #[test]
    fn default_is_pending() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
    }

    #[test]
    fn terminal_statuses() {
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(!OrderStatus::Preparing.is_terminal());
        assert!(!OrderStatus::Shipping.is_terminal());
        assert!(OrderStatus::Delivered.is_terminal());
        assert!(OrderStatus::Rejected.is_terminal());
    }

    #[test]
    fn serde_uses_lowercase() {
        let json = serde_json::to_string(&OrderStatus::Shipping).unwrap();
        assert_eq!(json, "\"shipping\"");
        let back: OrderStatus = serde_json::from_str("\"delivered\"").unwrap();
        assert_eq!(back, OrderStatus::Delivered);
    }
}
