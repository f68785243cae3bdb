//! Product routes: public catalog plus admin management.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use rosewood_core::{CategoryId, ProductId};

use crate::db::products::{NewProduct, ProductFilter, ProductPatch, ProductSort};
use crate::db::reviews::ReviewRepository;
use crate::db::{CategoryRepository, ProductRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::catalog::{CategorySummary, Product};
use crate::models::review::ReviewView;
use crate::response::{ApiResponse, DEFAULT_PAGE_SIZE, Paginated};
use crate::state::AppState;

/// How many recent reviews a product detail page embeds.
const DETAIL_REVIEW_LIMIT: i64 = 10;

/// Query parameters for `GET /api/products`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// Category slug.
    pub category: Option<String>,
    /// Matches name, description, or an exact tag.
    pub search: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub sort_by: Option<String>,
    /// `asc` or `desc` (default).
    pub order: Option<String>,
    pub featured: Option<bool>,
}

impl ProductListQuery {
    fn filter(&self) -> ProductFilter {
        ProductFilter {
            category_slug: self.category.clone(),
            search: self.search.clone(),
            min_price: self.min_price,
            max_price: self.max_price,
            featured: self.featured.unwrap_or(false),
            sort: self
                .sort_by
                .as_deref()
                .map(ProductSort::parse)
                .unwrap_or_default(),
            ascending: self.order.as_deref() == Some("asc"),
        }
    }
}

/// A product with its category summary, as listed.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProductListItem {
    #[serde(flatten)]
    product: Product,
    category: CategorySummary,
}

/// A product with category and recent reviews, as shown on detail pages.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProductDetail {
    #[serde(flatten)]
    product: Product,
    category: CategorySummary,
    reviews: Vec<ReviewView>,
}

/// Request body for `POST /api/products` (admin).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    pub compare_price: Option<Decimal>,
    pub category_id: CategoryId,
    pub stock: i32,
    pub sku: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_featured: bool,
}

/// Request body for `PUT /api/products/{id}` (admin); absent fields are left
/// unchanged.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub compare_price: Option<Decimal>,
    pub category_id: Option<CategoryId>,
    pub stock: Option<i32>,
    pub sku: Option<String>,
    pub images: Option<Vec<String>>,
    pub sizes: Option<Vec<String>>,
    pub colors: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
}

/// GET /api/products
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> Result<impl IntoResponse> {
    let products = ProductRepository::new(state.pool());
    let filter = query.filter();

    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, crate::response::MAX_PAGE_SIZE);
    let offset = (page - 1) * limit;

    let rows = products.list(&filter, limit, offset).await?;
    let total = products.count(&filter).await?;

    let items: Vec<ProductListItem> = rows
        .into_iter()
        .map(|(product, category)| ProductListItem { product, category })
        .collect();

    Ok(ApiResponse::success(Paginated::new(
        items, page, limit, total,
    )))
}

/// GET /api/products/{id}
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<impl IntoResponse> {
    let (product, category) = ProductRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    let reviews = ReviewRepository::new(state.pool())
        .recent_for_product(product.id, DETAIL_REVIEW_LIMIT)
        .await?;

    Ok(ApiResponse::success(ProductDetail {
        product,
        category,
        reviews,
    }))
}

/// GET /api/products/slug/{slug}
pub async fn show_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse> {
    let (product, category) = ProductRepository::new(state.pool())
        .get_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    let reviews = ReviewRepository::new(state.pool())
        .recent_for_product(product.id, DETAIL_REVIEW_LIMIT)
        .await?;

    Ok(ApiResponse::success(ProductDetail {
        product,
        category,
        reviews,
    }))
}

/// POST /api/products (admin)
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(req): Json<CreateProductRequest>,
) -> Result<impl IntoResponse> {
    if req.price.is_sign_negative() {
        return Err(AppError::Validation("Price must not be negative".to_string()));
    }
    if req.stock < 0 {
        return Err(AppError::Validation("Stock must not be negative".to_string()));
    }

    // A dangling category id would otherwise surface as an opaque FK error.
    CategoryRepository::new(state.pool())
        .get_by_id(req.category_id)
        .await?
        .ok_or_else(|| AppError::Validation("Invalid category".to_string()))?;

    let product = ProductRepository::new(state.pool())
        .create(NewProduct {
            name: req.name,
            slug: req.slug,
            description: req.description,
            price: req.price,
            compare_price: req.compare_price,
            category_id: req.category_id,
            stock: req.stock,
            sku: req.sku,
            images: req.images,
            sizes: req.sizes,
            colors: req.colors,
            tags: req.tags,
            is_featured: req.is_featured,
        })
        .await?;

    Ok((StatusCode::CREATED, ApiResponse::success(product)))
}

/// PUT /api/products/{id} (admin)
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<ProductId>,
    Json(req): Json<UpdateProductRequest>,
) -> Result<impl IntoResponse> {
    if let Some(price) = req.price
        && price.is_sign_negative()
    {
        return Err(AppError::Validation("Price must not be negative".to_string()));
    }
    if let Some(stock) = req.stock
        && stock < 0
    {
        return Err(AppError::Validation("Stock must not be negative".to_string()));
    }

    if let Some(category_id) = req.category_id {
        CategoryRepository::new(state.pool())
            .get_by_id(category_id)
            .await?
            .ok_or_else(|| AppError::Validation("Invalid category".to_string()))?;
    }

    let product = ProductRepository::new(state.pool())
        .update(
            id,
            ProductPatch {
                name: req.name,
                description: req.description,
                price: req.price,
                compare_price: req.compare_price,
                category_id: req.category_id,
                stock: req.stock,
                sku: req.sku,
                images: req.images,
                sizes: req.sizes,
                colors: req.colors,
                tags: req.tags,
                is_active: req.is_active,
                is_featured: req.is_featured,
            },
        )
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                AppError::NotFound("Product not found".to_string())
            }
            other => AppError::Repository(other),
        })?;

    Ok(ApiResponse::success(product))
}

/// DELETE /api/products/{id} (admin)
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<ProductId>,
) -> Result<impl IntoResponse> {
    ProductRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                AppError::NotFound("Product not found".to_string())
            }
            other => AppError::Repository(other),
        })?;

    Ok(ApiResponse::message("Product deleted successfully"))
}
