//! Cart routes.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

use rosewood_core::{CartItemId, ProductId};

use crate::db::{CartRepository, ProductRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Request body for `POST /api/cart/items`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub product_id: ProductId,
    pub quantity: i32,
    pub size: Option<String>,
    pub color: Option<String>,
}

/// Request body for `PUT /api/cart/items/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    pub quantity: i32,
}

/// GET /api/cart
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse> {
    let cart = CartRepository::new(state.pool()).get_or_create(user.id).await?;

    Ok(ApiResponse::success(cart))
}

/// POST /api/cart/items
///
/// Adding an identical (product, size, color) line merges quantities into
/// the existing line.
pub async fn add_item(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<AddItemRequest>,
) -> Result<impl IntoResponse> {
    if req.quantity < 1 {
        return Err(AppError::Validation(
            "Quantity must be at least 1".to_string(),
        ));
    }

    let (product, _) = ProductRepository::new(state.pool())
        .get_by_id(req.product_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    if product.stock < req.quantity {
        return Err(AppError::Validation("Insufficient stock".to_string()));
    }

    let carts = CartRepository::new(state.pool());
    let cart = carts.get_or_create(user.id).await?;

    let line = carts
        .add_item(
            cart.id,
            req.product_id,
            req.quantity,
            req.size.as_deref(),
            req.color.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, ApiResponse::success(line)))
}

/// PUT /api/cart/items/{id}
///
/// Rejects quantities above the product's current stock; the line is left
/// unchanged on rejection.
pub async fn update_item(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<CartItemId>,
    Json(req): Json<UpdateItemRequest>,
) -> Result<impl IntoResponse> {
    if req.quantity < 1 {
        return Err(AppError::Validation(
            "Quantity must be at least 1".to_string(),
        ));
    }

    let carts = CartRepository::new(state.pool());

    let line = carts
        .get_item_for_user(id, user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Cart item not found".to_string()))?;

    if line.product.stock < req.quantity {
        return Err(AppError::Validation("Insufficient stock".to_string()));
    }

    let updated = carts.update_item_quantity(id, req.quantity).await?;

    Ok(ApiResponse::success(updated))
}

/// DELETE /api/cart/items/{id}
pub async fn remove_item(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<CartItemId>,
) -> Result<impl IntoResponse> {
    let carts = CartRepository::new(state.pool());

    carts
        .get_item_for_user(id, user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Cart item not found".to_string()))?;

    carts.delete_item(id).await?;

    Ok(ApiResponse::message("Item removed from cart"))
}

/// DELETE /api/cart
pub async fn clear(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse> {
    let carts = CartRepository::new(state.pool());

    let cart_id = carts
        .get_cart_id(user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Cart not found".to_string()))?;

    carts.clear(cart_id).await?;

    Ok(ApiResponse::message("Cart cleared"))
}
