//! Admin routes: dashboard aggregates, order management, user listing.
//!
//! Every handler takes [`RequireAdmin`]; role checks never happen inside the
//! handler bodies.

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use rosewood_core::{OrderId, OrderStatus, PaymentStatus, UserRole};

use crate::db::orders::OrderPatch;
use crate::db::{OrderRepository, ProductRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::order::AdminOrderView;
use crate::models::user::PublicUser;
use crate::response::{ApiResponse, PageQuery, Paginated};
use crate::state::AppState;

/// Recent orders shown on the dashboard.
const DASHBOARD_RECENT_ORDERS: i64 = 10;

/// Aggregate counts shown on the dashboard.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DashboardStats {
    total_users: i64,
    total_orders: i64,
    total_products: i64,
    total_revenue: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DashboardResponse {
    stats: DashboardStats,
    recent_orders: Vec<AdminOrderView>,
}

/// Query parameters for `GET /api/admin/orders`.
#[derive(Debug, Default, Deserialize)]
pub struct AdminOrderQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<OrderStatus>,
}

/// Request body for `PUT /api/admin/orders/{id}`; absent fields are left
/// unchanged.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderRequest {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub tracking_number: Option<String>,
    pub estimated_delivery: Option<DateTime<Utc>>,
}

/// A user with their order count, as listed for operators.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AdminUserView {
    #[serde(flatten)]
    user: PublicUser,
    order_count: i64,
}

/// GET /api/admin/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<impl IntoResponse> {
    let users = UserRepository::new(state.pool());
    let orders = OrderRepository::new(state.pool());
    let products = ProductRepository::new(state.pool());

    let total_users = users.count_by_role(UserRole::Customer).await?;
    let total_orders = orders.count_all(None).await?;
    let total_products = products.count_all().await?;
    let total_revenue = orders.revenue().await?;
    let recent_orders = orders.recent(DASHBOARD_RECENT_ORDERS).await?;

    Ok(ApiResponse::success(DashboardResponse {
        stats: DashboardStats {
            total_users,
            total_orders,
            total_products,
            total_revenue,
        },
        recent_orders,
    }))
}

/// GET /api/admin/orders
pub async fn list_orders(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<AdminOrderQuery>,
) -> Result<impl IntoResponse> {
    let orders = OrderRepository::new(state.pool());

    let page = PageQuery {
        page: query.page,
        limit: query.limit,
    };
    let limit = page.limit_or(crate::response::DEFAULT_PAGE_SIZE);
    let offset = page.offset(crate::response::DEFAULT_PAGE_SIZE);

    let rows = orders.list_all(query.status, limit, offset).await?;
    let total = orders.count_all(query.status).await?;

    Ok(ApiResponse::success(Paginated::new(
        rows,
        page.page(),
        limit,
        total,
    )))
}

/// PUT /api/admin/orders/{id}
pub async fn update_order(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<OrderId>,
    Json(req): Json<UpdateOrderRequest>,
) -> Result<impl IntoResponse> {
    let orders = OrderRepository::new(state.pool());

    orders
        .update(
            id,
            OrderPatch {
                status: req.status,
                payment_status: req.payment_status,
                tracking_number: req.tracking_number,
                estimated_delivery: req.estimated_delivery,
            },
        )
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                AppError::NotFound("Order not found".to_string())
            }
            other => AppError::Repository(other),
        })?;

    let view = orders.get_admin_view(id).await?;

    Ok(ApiResponse::success(view))
}

/// GET /api/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(page): Query<PageQuery>,
) -> Result<impl IntoResponse> {
    let users = UserRepository::new(state.pool());

    let limit = page.limit_or(crate::response::DEFAULT_PAGE_SIZE);
    let offset = page.offset(crate::response::DEFAULT_PAGE_SIZE);

    let rows = users.list(limit, offset).await?;
    let total = users.count().await?;

    let views: Vec<AdminUserView> = rows
        .into_iter()
        .map(|row| AdminUserView {
            user: row.user.into(),
            order_count: row.order_count,
        })
        .collect();

    Ok(ApiResponse::success(Paginated::new(
        views,
        page.page(),
        limit,
        total,
    )))
}
