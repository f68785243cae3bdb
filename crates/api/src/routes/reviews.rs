//! Review routes.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

use rosewood_core::ProductId;

use crate::db::reviews::{NewReview, ReviewRepository};
use crate::db::{OrderRepository, ProductRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::response::{ApiResponse, PageQuery, Paginated};
use crate::state::AppState;

/// Reviews list page size.
const REVIEW_PAGE_SIZE: i64 = 10;

/// Request body for `POST /api/reviews`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    pub product_id: ProductId,
    pub rating: i32,
    pub comment: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

/// POST /api/reviews
///
/// The review is marked verified when the caller has a delivered order
/// containing the product. The product's mean rating and review count are
/// recomputed over all of its reviews.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<CreateReviewRequest>,
) -> Result<impl IntoResponse> {
    if !(1..=5).contains(&req.rating) {
        return Err(AppError::Validation(
            "Rating must be between 1 and 5".to_string(),
        ));
    }

    ProductRepository::new(state.pool())
        .get_by_id(req.product_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    let is_verified = OrderRepository::new(state.pool())
        .has_delivered_product(user.id, req.product_id)
        .await?;

    let review = ReviewRepository::new(state.pool())
        .create(NewReview {
            user_id: user.id,
            product_id: req.product_id,
            rating: req.rating,
            comment: req.comment.as_deref(),
            images: &req.images,
            is_verified,
        })
        .await?;

    Ok((StatusCode::CREATED, ApiResponse::success(review)))
}

/// GET /api/reviews/product/{id}
pub async fn list_for_product(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
    Query(page): Query<PageQuery>,
) -> Result<impl IntoResponse> {
    let reviews = ReviewRepository::new(state.pool());

    let limit = page.limit_or(REVIEW_PAGE_SIZE);
    let offset = page.offset(REVIEW_PAGE_SIZE);

    let rows = reviews.list_for_product(product_id, limit, offset).await?;
    let total = reviews.count_for_product(product_id).await?;

    Ok(ApiResponse::success(Paginated::new(
        rows,
        page.page(),
        limit,
        total,
    )))
}
