//! Cart repository for database operations.
//!
//! A cart line is unique per (cart, product, size, color) with absent
//! size/color folding to `''`; adding an existing line merges by summing
//! quantities through `ON CONFLICT` on that expression index.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use rosewood_core::{CartId, CartItemId, ProductId, UserId};

use super::RepositoryError;
use crate::models::cart::{Cart, CartItem, CartLine};
use crate::models::catalog::ProductSummary;

#[derive(sqlx::FromRow)]
struct CartLineRow {
    id: CartItemId,
    cart_id: CartId,
    product_id: ProductId,
    quantity: i32,
    size: Option<String>,
    color: Option<String>,
    created_at: DateTime<Utc>,
    product_name: String,
    product_slug: String,
    product_price: Decimal,
    product_images: Vec<String>,
    product_stock: i32,
}

impl From<CartLineRow> for CartLine {
    fn from(row: CartLineRow) -> Self {
        Self {
            item: CartItem {
                id: row.id,
                cart_id: row.cart_id,
                product_id: row.product_id,
                quantity: row.quantity,
                size: row.size,
                color: row.color,
                created_at: row.created_at,
            },
            product: ProductSummary {
                id: row.product_id,
                name: row.product_name,
                slug: row.product_slug,
                price: row.product_price,
                images: row.product_images,
                stock: row.product_stock,
            },
        }
    }
}

const LINE_SELECT: &str = r"
    SELECT ci.id, ci.cart_id, ci.product_id, ci.quantity, ci.size, ci.color,
           ci.created_at,
           p.name  AS product_name,
           p.slug  AS product_slug,
           p.price AS product_price,
           p.images AS product_images,
           p.stock AS product_stock
    FROM cart_items ci
    JOIN products p ON p.id = ci.product_id
";

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get the caller's cart with all lines expanded, creating the cart row
    /// if it is somehow missing (registration normally creates it).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_or_create(&self, user_id: UserId) -> Result<Cart, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct CartRow {
            id: CartId,
            user_id: UserId,
            created_at: DateTime<Utc>,
        }

        let cart = sqlx::query_as::<_, CartRow>(
            r"
            INSERT INTO carts (user_id)
            VALUES ($1)
            ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
            RETURNING id, user_id, created_at
            ",
        )
        .bind(user_id)
        .fetch_one(self.pool)
        .await?;

        let items = sqlx::query_as::<_, CartLineRow>(&format!(
            "{LINE_SELECT} WHERE ci.cart_id = $1 ORDER BY ci.created_at ASC"
        ))
        .bind(cart.id)
        .fetch_all(self.pool)
        .await?;

        Ok(Cart {
            id: cart.id,
            user_id: cart.user_id,
            items: items.into_iter().map(CartLine::from).collect(),
            created_at: cart.created_at,
        })
    }

    /// The caller's cart ID, if a cart exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_cart_id(&self, user_id: UserId) -> Result<Option<CartId>, RepositoryError> {
        let id: Option<(CartId,)> =
            sqlx::query_as("SELECT id FROM carts WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(self.pool)
                .await?;

        Ok(id.map(|r| r.0))
    }

    /// Add a line to a cart, merging quantities when an identical
    /// (product, size, color) line already exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn add_item(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: i32,
        size: Option<&str>,
        color: Option<&str>,
    ) -> Result<CartLine, RepositoryError> {
        let item_id: (CartItemId,) = sqlx::query_as(
            r"
            INSERT INTO cart_items (cart_id, product_id, quantity, size, color)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (cart_id, product_id, COALESCE(size, ''), COALESCE(color, ''))
            DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity
            RETURNING id
            ",
        )
        .bind(cart_id)
        .bind(product_id)
        .bind(quantity)
        .bind(size)
        .bind(color)
        .fetch_one(self.pool)
        .await?;

        self.get_line(item_id.0).await
    }

    /// A cart line with its product, when the line belongs to `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_item_for_user(
        &self,
        item_id: CartItemId,
        user_id: UserId,
    ) -> Result<Option<CartLine>, RepositoryError> {
        let row = sqlx::query_as::<_, CartLineRow>(&format!(
            r"{LINE_SELECT}
            JOIN carts c ON c.id = ci.cart_id
            WHERE ci.id = $1 AND c.user_id = $2
            "
        ))
        .bind(item_id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(CartLine::from))
    }

    /// Set a line's quantity.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the line doesn't exist.
    pub async fn update_item_quantity(
        &self,
        item_id: CartItemId,
        quantity: i32,
    ) -> Result<CartLine, RepositoryError> {
        let result = sqlx::query("UPDATE cart_items SET quantity = $2 WHERE id = $1")
            .bind(item_id)
            .bind(quantity)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        self.get_line(item_id).await
    }

    /// Delete a line.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the line doesn't exist.
    pub async fn delete_item(&self, item_id: CartItemId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_items WHERE id = $1")
            .bind(item_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Delete all lines in a cart. The cart row itself stays.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn clear(&self, cart_id: CartId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
            .bind(cart_id)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    async fn get_line(&self, item_id: CartItemId) -> Result<CartLine, RepositoryError> {
        let row = sqlx::query_as::<_, CartLineRow>(&format!(
            "{LINE_SELECT} WHERE ci.id = $1"
        ))
        .bind(item_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(CartLine::from(row))
    }
}
