//! Category routes.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use serde::Serialize;

use crate::db::CategoryRepository;
use crate::error::{AppError, Result};
use crate::models::catalog::{Category, Product};
use crate::response::ApiResponse;
use crate::state::AppState;

/// A category expanded with children and a page of its active products.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CategoryDetail {
    #[serde(flatten)]
    category: Category,
    children: Vec<Category>,
    products: Vec<Product>,
}

/// GET /api/categories
pub async fn index(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let categories = CategoryRepository::new(state.pool()).list().await?;

    Ok(ApiResponse::success(categories))
}

/// GET /api/categories/{slug}
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse> {
    let (category, children, products) = CategoryRepository::new(state.pool())
        .get_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

    Ok(ApiResponse::success(CategoryDetail {
        category,
        children,
        products,
    }))
}
