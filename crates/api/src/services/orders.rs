//! Order placement.
//!
//! The one multi-step flow in the system: validate the cart, address and
//! stock, compute totals, optionally create a payment intent, then persist
//! order + item snapshots + stock decrements + cart clear in a single
//! database transaction (see [`crate::db::orders`]).
//!
//! The gateway intent is created *before* the transaction so a gateway
//! failure aborts with nothing persisted.

use chrono::Utc;
use rand::distr::{Alphanumeric, SampleString};
use rust_decimal::Decimal;
use sqlx::PgPool;
use thiserror::Error;

use rosewood_core::{AddressId, PaymentMethod, UserId};

use crate::db::orders::{NewOrder, OrderLine, OrderRepository};
use crate::db::{AddressRepository, CartRepository, RepositoryError};
use crate::error::AppError;
use crate::models::order::OrderDetail;
use crate::services::payments::{PaymentClient, PaymentError};

/// Subtotals strictly above this ship free.
const FREE_SHIPPING_THRESHOLD: Decimal = Decimal::from_parts(500, 0, 0, false, 0);

/// Flat shipping fee below the free-shipping threshold.
const FLAT_SHIPPING_FEE: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

/// Tax rate applied to the subtotal (18%).
const TAX_RATE: Decimal = Decimal::from_parts(18, 0, 0, false, 2);

/// Random suffix length of generated order numbers.
const ORDER_NUMBER_SUFFIX_LENGTH: usize = 9;

/// Errors that can occur while placing an order.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The caller's cart has no lines.
    #[error("cart is empty")]
    EmptyCart,

    /// The target address doesn't exist or belongs to someone else.
    #[error("address not found")]
    AddressNotFound,

    /// A cart line asks for more than the product has in stock.
    #[error("insufficient stock for {product}")]
    InsufficientStock { product: String },

    /// Card payment requested but no gateway is configured.
    #[error("card payments are not available")]
    CardPaymentsUnavailable,

    /// The payment gateway refused or failed.
    #[error(transparent)]
    Payment(#[from] PaymentError),

    /// Underlying repository failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::EmptyCart => Self::Validation("Cart is empty".to_string()),
            OrderError::AddressNotFound => Self::NotFound("Address not found".to_string()),
            OrderError::InsufficientStock { product } => {
                Self::Validation(format!("Insufficient stock for {product}"))
            }
            OrderError::CardPaymentsUnavailable => {
                Self::Validation("Card payments are not available".to_string())
            }
            OrderError::Payment(e) => Self::Payment(e),
            OrderError::Repository(e) => Self::Repository(e),
        }
    }
}

/// Order money amounts derived from the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub shipping_cost: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl OrderTotals {
    /// Compute totals for a set of (unit price, quantity) lines.
    ///
    /// - subtotal = Σ price × quantity
    /// - shipping = 0 when the subtotal exceeds the free-shipping threshold,
    ///   the flat fee otherwise
    /// - tax = 18% of the subtotal
    /// - total = subtotal + shipping + tax
    #[must_use]
    pub fn compute(lines: &[(Decimal, i32)]) -> Self {
        let subtotal: Decimal = lines
            .iter()
            .map(|(price, qty)| price * Decimal::from(*qty))
            .sum();

        let shipping_cost = if subtotal > FREE_SHIPPING_THRESHOLD {
            Decimal::ZERO
        } else {
            FLAT_SHIPPING_FEE
        };

        let tax = (subtotal * TAX_RATE).round_dp(2);
        let total = subtotal + shipping_cost + tax;

        Self {
            subtotal,
            shipping_cost,
            tax,
            total,
        }
    }
}

/// Generate a human-readable order number: `ORD-{millis}-{random}`.
///
/// Time-based plus random; practically collision-free, not guaranteed unique
/// (the database unique constraint is the backstop).
#[must_use]
pub fn generate_order_number() -> String {
    let suffix = Alphanumeric
        .sample_string(&mut rand::rng(), ORDER_NUMBER_SUFFIX_LENGTH)
        .to_uppercase();

    format!("ORD-{}-{}", Utc::now().timestamp_millis(), suffix)
}

/// A successfully placed order.
#[derive(Debug)]
pub struct PlacedOrder {
    pub order: OrderDetail,
    /// Client-usable gateway secret, present for prepaid orders.
    pub client_secret: Option<String>,
}

/// Order placement service.
pub struct OrderService<'a> {
    pool: &'a PgPool,
    payments: Option<&'a PaymentClient>,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, payments: Option<&'a PaymentClient>) -> Self {
        Self { pool, payments }
    }

    /// Place an order from the caller's cart.
    ///
    /// Preconditions checked in this sequence: non-empty cart, address
    /// ownership, per-line stock (fail fast, naming the product). The
    /// database transaction re-checks stock with conditional decrements, so
    /// a concurrent order can't oversell between check and commit.
    ///
    /// # Errors
    ///
    /// See [`OrderError`]. On any error, no order is persisted.
    pub async fn place_order(
        &self,
        user_id: UserId,
        address_id: AddressId,
        payment_method: PaymentMethod,
    ) -> Result<PlacedOrder, OrderError> {
        let carts = CartRepository::new(self.pool);
        let addresses = AddressRepository::new(self.pool);
        let orders = OrderRepository::new(self.pool);

        let cart = carts.get_or_create(user_id).await?;
        if cart.items.is_empty() {
            return Err(OrderError::EmptyCart);
        }

        let address = addresses
            .get_for_user(address_id, user_id)
            .await?
            .ok_or(OrderError::AddressNotFound)?;

        // Fail fast on the first shortfall, reporting the product by name.
        for line in &cart.items {
            if line.product.stock < line.item.quantity {
                return Err(OrderError::InsufficientStock {
                    product: line.product.name.clone(),
                });
            }
        }

        let price_quantities: Vec<(Decimal, i32)> = cart
            .items
            .iter()
            .map(|line| (line.product.price, line.item.quantity))
            .collect();
        let totals = OrderTotals::compute(&price_quantities);

        let order_number = generate_order_number();

        // Prepaid orders need a gateway intent first; a gateway failure
        // aborts the whole placement with nothing persisted.
        let intent = match payment_method {
            PaymentMethod::Card => {
                let client = self
                    .payments
                    .ok_or(OrderError::CardPaymentsUnavailable)?;
                Some(client.create_intent(totals.total, &order_number).await?)
            }
            PaymentMethod::Cod => None,
        };

        let lines: Vec<OrderLine> = cart
            .items
            .iter()
            .map(|line| OrderLine {
                product_id: line.item.product_id,
                product_name: line.product.name.clone(),
                quantity: line.item.quantity,
                size: line.item.size.clone(),
                color: line.item.color.clone(),
                unit_price: line.product.price,
            })
            .collect();

        let order = orders
            .create_from_cart(NewOrder {
                user_id,
                address_id: address.id,
                cart_id: cart.id,
                order_number: &order_number,
                payment_method,
                payment_ref: intent.as_ref().map(|i| i.id.as_str()),
                subtotal: totals.subtotal,
                shipping_cost: totals.shipping_cost,
                tax: totals.tax,
                total: totals.total,
                lines: &lines,
            })
            .await
            .map_err(|e| match e {
                // The transaction's conditional decrement lost a race.
                RepositoryError::Conflict(msg) if msg.starts_with("Insufficient stock") => {
                    OrderError::InsufficientStock {
                        product: msg
                            .trim_start_matches("Insufficient stock for ")
                            .to_string(),
                    }
                }
                other => OrderError::Repository(other),
            })?;

        tracing::info!(
            order_id = %order.id,
            order_number = %order.order_number,
            %user_id,
            total = %order.total,
            "Order placed"
        );

        let detail = orders
            .get_for_user(order.id, user_id)
            .await?
            .ok_or_else(|| {
                RepositoryError::DataCorruption(format!(
                    "order {} vanished after placement",
                    order.id
                ))
            })?;

        Ok(PlacedOrder {
            order: detail,
            client_secret: intent.map(|i| i.client_secret),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(n: i64) -> Decimal {
        Decimal::from(n)
    }

    #[test]
    fn test_totals_free_shipping_over_threshold() {
        // Cart with one line (price 500, qty 2): subtotal 1000 > 500
        // => shipping 0, tax 180 (18%), total 1180.
        let totals = OrderTotals::compute(&[(dec(500), 2)]);
        assert_eq!(totals.subtotal, dec(1000));
        assert_eq!(totals.shipping_cost, Decimal::ZERO);
        assert_eq!(totals.tax, dec(180));
        assert_eq!(totals.total, dec(1180));
    }

    #[test]
    fn test_totals_flat_fee_below_threshold() {
        let totals = OrderTotals::compute(&[(dec(100), 4)]);
        assert_eq!(totals.subtotal, dec(400));
        assert_eq!(totals.shipping_cost, dec(50));
        assert_eq!(totals.tax, dec(72));
        assert_eq!(totals.total, dec(522));
    }

    #[test]
    fn test_totals_threshold_is_strict() {
        // Exactly at the threshold still pays the flat fee.
        let totals = OrderTotals::compute(&[(dec(500), 1)]);
        assert_eq!(totals.shipping_cost, FLAT_SHIPPING_FEE);
    }

    #[test]
    fn test_totals_identity() {
        let carts: &[&[(Decimal, i32)]] = &[
            &[(dec(599), 1)],
            &[(Decimal::new(129_900, 2), 2), (dec(250), 3)],
            &[(dec(1), 1)],
        ];

        for lines in carts {
            let totals = OrderTotals::compute(lines);
            assert_eq!(
                totals.total,
                totals.subtotal + totals.shipping_cost + totals.tax
            );
            assert_eq!(totals.tax, (totals.subtotal * TAX_RATE).round_dp(2));
        }
    }

    #[test]
    fn test_totals_multi_line_subtotal() {
        let totals = OrderTotals::compute(&[(dec(200), 2), (dec(150), 1)]);
        assert_eq!(totals.subtotal, dec(550));
        assert_eq!(totals.shipping_cost, Decimal::ZERO);
    }

    #[test]
    fn test_order_number_shape() {
        let number = generate_order_number();
        let mut parts = number.split('-');

        assert_eq!(parts.next(), Some("ORD"));

        let millis = parts.next().expect("timestamp part");
        assert!(millis.chars().all(|c| c.is_ascii_digit()));

        let suffix = parts.next().expect("random part");
        assert_eq!(suffix.len(), ORDER_NUMBER_SUFFIX_LENGTH);
        assert!(
            suffix
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        );

        assert_eq!(parts.next(), None);
    }

    #[test]
    fn test_order_numbers_vary() {
        let a = generate_order_number();
        let b = generate_order_number();
        assert_ne!(a, b);
    }
}
