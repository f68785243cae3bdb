//! Order repository for database operations.
//!
//! Order placement is a single transaction: the order row, its item
//! snapshots, the conditional stock decrements and the cart clear all commit
//! together or not at all. Stock is decremented with
//! `UPDATE ... WHERE stock >= quantity`; a zero-row update means a concurrent
//! order drained the stock after the service's precondition check, and the
//! whole transaction rolls back.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use rosewood_core::{
    AddressId, CartId, OrderId, OrderItemId, OrderStatus, PaymentMethod, PaymentStatus, ProductId,
    UserId,
};

use super::RepositoryError;
use crate::models::address::Address;
use crate::models::catalog::ProductSummary;
use crate::models::order::{AdminOrderView, Order, OrderCustomer, OrderDetail, OrderItem, OrderLineView};

/// One line of an order about to be placed.
#[derive(Debug, Clone)]
pub struct OrderLine {
    pub product_id: ProductId,
    /// Product name at placement time; used in stock-shortfall messages.
    pub product_name: String,
    pub quantity: i32,
    pub size: Option<String>,
    pub color: Option<String>,
    /// Unit price snapshot.
    pub unit_price: Decimal,
}

/// Fields required to persist an order.
#[derive(Debug)]
pub struct NewOrder<'a> {
    pub user_id: UserId,
    pub address_id: AddressId,
    pub cart_id: CartId,
    pub order_number: &'a str,
    pub payment_method: PaymentMethod,
    pub payment_ref: Option<&'a str>,
    pub subtotal: Decimal,
    pub shipping_cost: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub lines: &'a [OrderLine],
}

/// Admin-side partial update for an order.
#[derive(Debug, Default)]
pub struct OrderPatch {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub tracking_number: Option<String>,
    pub estimated_delivery: Option<DateTime<Utc>>,
}

#[derive(sqlx::FromRow)]
struct OrderLineRow {
    id: OrderItemId,
    order_id: OrderId,
    product_id: ProductId,
    quantity: i32,
    size: Option<String>,
    color: Option<String>,
    price: Decimal,
    product_name: String,
    product_slug: String,
    product_price: Decimal,
    product_images: Vec<String>,
    product_stock: i32,
}

impl From<OrderLineRow> for OrderLineView {
    fn from(row: OrderLineRow) -> Self {
        Self {
            item: OrderItem {
                id: row.id,
                order_id: row.order_id,
                product_id: row.product_id,
                quantity: row.quantity,
                size: row.size,
                color: row.color,
                price: row.price,
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

const ITEM_SELECT: &str = r"
    SELECT oi.id, oi.order_id, oi.product_id, oi.quantity, oi.size, oi.color,
           oi.price,
           p.name  AS product_name,
           p.slug  AS product_slug,
           p.price AS product_price,
           p.images AS product_images,
           p.stock AS product_stock
    FROM order_items oi
    JOIN products p ON p.id = oi.product_id
";

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Persist an order from a cart snapshot.
    ///
    /// Runs in one transaction: insert the order, snapshot each line into
    /// `order_items`, conditionally decrement stock per product, and delete
    /// the cart's lines. The cart row itself survives, emptied.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` naming the product when a stock
    /// decrement would go negative (concurrent order won the race); the
    /// transaction is rolled back and nothing is persisted.
    pub async fn create_from_cart(&self, new: NewOrder<'_>) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let order = sqlx::query_as::<_, Order>(
            r"
            INSERT INTO orders
                (order_number, user_id, address_id, payment_method, payment_ref,
                 subtotal, shipping_cost, tax, total)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            ",
        )
        .bind(new.order_number)
        .bind(new.user_id)
        .bind(new.address_id)
        .bind(new.payment_method)
        .bind(new.payment_ref)
        .bind(new.subtotal)
        .bind(new.shipping_cost)
        .bind(new.tax)
        .bind(new.total)
        .fetch_one(&mut *tx)
        .await?;

        for line in new.lines {
            let updated = sqlx::query(
                r"
                UPDATE products
                SET stock = stock - $2, updated_at = now()
                WHERE id = $1 AND stock >= $2
                ",
            )
            .bind(line.product_id)
            .bind(line.quantity)
            .execute(&mut *tx)
            .await?;

            if updated.rows_affected() == 0 {
                // Dropping the open transaction rolls everything back.
                return Err(RepositoryError::Conflict(format!(
                    "Insufficient stock for {}",
                    line.product_name
                )));
            }

            sqlx::query(
                r"
                INSERT INTO order_items (order_id, product_id, quantity, size, color, price)
                VALUES ($1, $2, $3, $4, $5, $6)
                ",
            )
            .bind(order.id)
            .bind(line.product_id)
            .bind(line.quantity)
            .bind(&line.size)
            .bind(&line.color)
            .bind(line.unit_price)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
            .bind(new.cart_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(order)
    }

    /// An order with items and address, when it belongs to `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if the order's address row
    /// is missing.
    pub async fn get_for_user(
        &self,
        id: OrderId,
        user_id: UserId,
    ) -> Result<Option<OrderDetail>, RepositoryError> {
        let order =
            sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1 AND user_id = $2")
                .bind(id)
                .bind(user_id)
                .fetch_optional(self.pool)
                .await?;

        let Some(order) = order else {
            return Ok(None);
        };

        Ok(Some(self.expand(order).await?))
    }

    /// A user's orders newest-first with items and addresses expanded.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<OrderDetail>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(
            r"
            SELECT * FROM orders
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            ",
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        let mut details = Vec::with_capacity(orders.len());
        for order in orders {
            details.push(self.expand(order).await?);
        }

        Ok(details)
    }

    /// Number of orders a user has placed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_for_user(&self, user_id: UserId) -> Result<i64, RepositoryError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM orders WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(self.pool)
            .await?;

        Ok(count.0)
    }

    /// All orders newest-first with customer and items, optionally filtered
    /// by status (admin listing).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_all(
        &self,
        status: Option<OrderStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AdminOrderView>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(
            r"
            SELECT * FROM orders
            WHERE ($1::order_status IS NULL OR status = $1)
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            ",
        )
        .bind(status)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        self.expand_admin(orders).await
    }

    /// Count of all orders, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_all(&self, status: Option<OrderStatus>) -> Result<i64, RepositoryError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM orders WHERE ($1::order_status IS NULL OR status = $1)",
        )
        .bind(status)
        .fetch_one(self.pool)
        .await?;

        Ok(count.0)
    }

    /// The most recent orders with customer and items (admin dashboard).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn recent(&self, limit: i64) -> Result<Vec<AdminOrderView>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(
            "SELECT * FROM orders ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        self.expand_admin(orders).await
    }

    /// Revenue: the sum of order totals whose payment completed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn revenue(&self) -> Result<Decimal, RepositoryError> {
        let sum: (Option<Decimal>,) = sqlx::query_as(
            "SELECT SUM(total) FROM orders WHERE payment_status = 'COMPLETED'",
        )
        .fetch_one(self.pool)
        .await?;

        Ok(sum.0.unwrap_or_default())
    }

    /// Apply an admin patch (status, tracking, delivery estimate).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    pub async fn update(&self, id: OrderId, patch: OrderPatch) -> Result<Order, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(
            r"
            UPDATE orders SET
                status             = COALESCE($2, status),
                payment_status     = COALESCE($3, payment_status),
                tracking_number    = COALESCE($4, tracking_number),
                estimated_delivery = COALESCE($5, estimated_delivery),
                updated_at         = now()
            WHERE id = $1
            RETURNING *
            ",
        )
        .bind(id)
        .bind(patch.status)
        .bind(patch.payment_status)
        .bind(patch.tracking_number)
        .bind(patch.estimated_delivery)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(order)
    }

    /// One order in the admin view (customer + items).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    pub async fn get_admin_view(&self, id: OrderId) -> Result<AdminOrderView, RepositoryError> {
        let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let mut views = self.expand_admin(vec![order]).await?;
        views.pop().ok_or(RepositoryError::NotFound)
    }

    /// Whether `user_id` has a delivered order containing `product_id`.
    ///
    /// Used to mark reviews as verified purchases.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn has_delivered_product(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<bool, RepositoryError> {
        let exists: (bool,) = sqlx::query_as(
            r"
            SELECT EXISTS (
                SELECT 1
                FROM orders o
                JOIN order_items oi ON oi.order_id = o.id
                WHERE o.user_id = $1
                  AND oi.product_id = $2
                  AND o.status = 'DELIVERED'
            )
            ",
        )
        .bind(user_id)
        .bind(product_id)
        .fetch_one(self.pool)
        .await?;

        Ok(exists.0)
    }

    /// Expand one order into its detail view (items + address).
    async fn expand(&self, order: Order) -> Result<OrderDetail, RepositoryError> {
        let items = sqlx::query_as::<_, OrderLineRow>(&format!(
            "{ITEM_SELECT} WHERE oi.order_id = $1 ORDER BY oi.id ASC"
        ))
        .bind(order.id)
        .fetch_all(self.pool)
        .await?;

        let address =
            sqlx::query_as::<_, Address>("SELECT * FROM addresses WHERE id = $1")
                .bind(order.address_id)
                .fetch_optional(self.pool)
                .await?
                .ok_or_else(|| {
                    RepositoryError::DataCorruption(format!(
                        "order {} references missing address {}",
                        order.id, order.address_id
                    ))
                })?;

        Ok(OrderDetail {
            order,
            items: items.into_iter().map(OrderLineView::from).collect(),
            address,
        })
    }

    /// Expand orders into the admin view (customer + items) with one items
    /// query for the whole page.
    async fn expand_admin(
        &self,
        orders: Vec<Order>,
    ) -> Result<Vec<AdminOrderView>, RepositoryError> {
        if orders.is_empty() {
            return Ok(Vec::new());
        }

        let order_ids: Vec<i32> = orders.iter().map(|o| o.id.as_i32()).collect();

        let item_rows = sqlx::query_as::<_, OrderLineRow>(&format!(
            "{ITEM_SELECT} WHERE oi.order_id = ANY($1) ORDER BY oi.id ASC"
        ))
        .bind(&order_ids)
        .fetch_all(self.pool)
        .await?;

        let mut items_by_order: HashMap<OrderId, Vec<OrderLineView>> = HashMap::new();
        for row in item_rows {
            items_by_order
                .entry(row.order_id)
                .or_default()
                .push(OrderLineView::from(row));
        }

        let user_ids: Vec<i32> = orders.iter().map(|o| o.user_id.as_i32()).collect();
        let customers = sqlx::query_as::<_, OrderCustomer>(
            "SELECT id, first_name, last_name, email FROM users WHERE id = ANY($1)",
        )
        .bind(&user_ids)
        .fetch_all(self.pool)
        .await?;

        let customers_by_id: HashMap<UserId, OrderCustomer> =
            customers.into_iter().map(|c| (c.id, c)).collect();

        let mut views = Vec::with_capacity(orders.len());
        for order in orders {
            let user = customers_by_id.get(&order.user_id).cloned().ok_or_else(|| {
                RepositoryError::DataCorruption(format!(
                    "order {} references missing user {}",
                    order.id, order.user_id
                ))
            })?;
            let items = items_by_order.remove(&order.id).unwrap_or_default();
            views.push(AdminOrderView { order, user, items });
        }

        Ok(views)
    }
}
