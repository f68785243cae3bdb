//! Status enums for orders and payments.

use serde::{Deserialize, Serialize};

/// Fulfillment status of an order.
///
/// Orders start as `Pending` and are advanced by operators through the admin
/// surface. There is no enforced state machine beyond this enumeration; the
/// original storefront allowed any transition and that behavior is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "order_status", rename_all = "SCREAMING_SNAKE_CASE")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    OutForDelivery,
    Delivered,
    Cancelled,
}

/// Payment status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "payment_status", rename_all = "SCREAMING_SNAKE_CASE")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Completed,
    Failed,
    Refunded,
}

/// How an order is paid for.
///
/// `Card` orders require a payment-gateway intent before the order is
/// persisted; `Cod` (cash on delivery) orders skip the gateway entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "payment_method", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cod,
    Card,
}

impl PaymentMethod {
    /// Whether this method requires a gateway payment intent up front.
    #[must_use]
    pub const fn requires_prepayment(self) -> bool {
        matches!(self, Self::Card)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_serde() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::OutForDelivery).expect("serialize"),
            "\"OUT_FOR_DELIVERY\""
        );
        let status: OrderStatus = serde_json::from_str("\"DELIVERED\"").expect("deserialize");
        assert_eq!(status, OrderStatus::Delivered);
    }

    #[test]
    fn test_payment_status_serde() {
        assert_eq!(
            serde_json::to_string(&PaymentStatus::Completed).expect("serialize"),
            "\"COMPLETED\""
        );
    }

    #[test]
    fn test_payment_method_serde() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::Cod).expect("serialize"),
            "\"cod\""
        );
        let method: PaymentMethod = serde_json::from_str("\"card\"").expect("deserialize");
        assert_eq!(method, PaymentMethod::Card);
    }

    #[test]
    fn test_requires_prepayment() {
        assert!(PaymentMethod::Card.requires_prepayment());
        assert!(!PaymentMethod::Cod.requires_prepayment());
    }

    #[test]
    fn test_defaults() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
        assert_eq!(PaymentStatus::default(), PaymentStatus::Pending);
    }
}
