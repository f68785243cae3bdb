//! Cart domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use rosewood_core::{CartId, CartItemId, ProductId, UserId};

use super::catalog::ProductSummary;

/// A single line in a cart: one (product, size, color) entry with a quantity.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: CartItemId,
    pub cart_id: CartId,
    pub product_id: ProductId,
    pub quantity: i32,
    pub size: Option<String>,
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A cart line with its product expanded, as returned to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    #[serde(flatten)]
    pub item: CartItem,
    pub product: ProductSummary,
}

/// A user's cart with all lines expanded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: CartId,
    pub user_id: UserId,
    pub items: Vec<CartLine>,
    pub created_at: DateTime<Utc>,
}
