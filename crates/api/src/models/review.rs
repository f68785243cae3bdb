//! Review domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use rosewood_core::{ProductId, ReviewId, UserId};

/// A product review row.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub user_id: UserId,
    pub product_id: ProductId,
    /// 1 through 5 inclusive.
    pub rating: i32,
    pub comment: Option<String>,
    pub images: Vec<String>,
    /// Set when the reviewer has a delivered order containing this product.
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

/// The reviewer's display identity.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewAuthor {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
}

/// A review with its author expanded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewView {
    #[serde(flatten)]
    pub review: Review,
    pub user: ReviewAuthor,
}
