//! Order routes.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use rosewood_core::{AddressId, OrderId, PaymentMethod};

use crate::db::OrderRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::order::OrderDetail;
use crate::response::{ApiResponse, PageQuery, Paginated};
use crate::services::orders::OrderService;
use crate::state::AppState;

/// Orders list uses a smaller page than the catalog.
const ORDER_PAGE_SIZE: i64 = 10;

/// Request body for `POST /api/orders`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub address_id: AddressId,
    pub payment_method: PaymentMethod,
}

/// Response payload for a placed order.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    pub order: OrderDetail,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
}

/// POST /api/orders
///
/// Converts the caller's cart into an order. On any failure (empty cart,
/// foreign address, stock shortfall, gateway refusal) nothing is persisted.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<CreateOrderRequest>,
) -> Result<impl IntoResponse> {
    let service = OrderService::new(state.pool(), state.payments());

    let placed = service
        .place_order(user.id, req.address_id, req.payment_method)
        .await?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::success(CreateOrderResponse {
            order: placed.order,
            client_secret: placed.client_secret,
        }),
    ))
}

/// GET /api/orders
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(page): Query<PageQuery>,
) -> Result<impl IntoResponse> {
    let orders = OrderRepository::new(state.pool());

    let limit = page.limit_or(ORDER_PAGE_SIZE);
    let offset = page.offset(ORDER_PAGE_SIZE);

    let details = orders.list_for_user(user.id, limit, offset).await?;
    let total = orders.count_for_user(user.id).await?;

    Ok(ApiResponse::success(Paginated::new(
        details,
        page.page(),
        limit,
        total,
    )))
}

/// GET /api/orders/{id}
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<OrderId>,
) -> Result<impl IntoResponse> {
    let detail = OrderRepository::new(state.pool())
        .get_for_user(id, user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

    Ok(ApiResponse::success(detail))
}
