//! Review repository for database operations.
//!
//! Submitting a review recomputes the product's rating aggregate from every
//! review of that product (full recomputation, not an incremental running
//! sum), inside the same transaction as the insert.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use rosewood_core::{ProductId, ReviewId, UserId};

use super::RepositoryError;
use crate::models::review::{Review, ReviewAuthor, ReviewView};

/// Fields accepted when creating a review.
#[derive(Debug)]
pub struct NewReview<'a> {
    pub user_id: UserId,
    pub product_id: ProductId,
    pub rating: i32,
    pub comment: Option<&'a str>,
    pub images: &'a [String],
    pub is_verified: bool,
}

/// Mean rating and count over a set of review ratings.
///
/// Rounded to two decimal places to match the stored `NUMERIC(3,2)` column.
/// An empty set yields `(0, 0)`.
#[must_use]
pub fn rating_summary(ratings: &[i32]) -> (Decimal, i32) {
    if ratings.is_empty() {
        return (Decimal::ZERO, 0);
    }

    let sum: i64 = ratings.iter().map(|&r| i64::from(r)).sum();
    let count = ratings.len();
    let mean = Decimal::from(sum) / Decimal::from(count);

    (mean.round_dp(2), i32::try_from(count).unwrap_or(i32::MAX))
}

#[derive(sqlx::FromRow)]
struct ReviewWithAuthorRow {
    #[sqlx(flatten)]
    review: Review,
    author_first_name: String,
    author_last_name: String,
}

impl From<ReviewWithAuthorRow> for ReviewView {
    fn from(row: ReviewWithAuthorRow) -> Self {
        let user = ReviewAuthor {
            id: row.review.user_id,
            first_name: row.author_first_name,
            last_name: row.author_last_name,
        };
        Self {
            review: row.review,
            user,
        }
    }
}

const REVIEW_SELECT: &str = r"
    SELECT r.*,
           u.first_name AS author_first_name,
           u.last_name  AS author_last_name
    FROM reviews r
    JOIN users u ON u.id = r.user_id
";

/// Repository for review database operations.
pub struct ReviewRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReviewRepository<'a> {
    /// Create a new review repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a review and recompute the product's rating aggregate.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` when the user has already
    /// reviewed the product.
    pub async fn create(&self, new: NewReview<'_>) -> Result<ReviewView, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let review_id: (ReviewId,) = sqlx::query_as(
            r"
            INSERT INTO reviews (user_id, product_id, rating, comment, images, is_verified)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            ",
        )
        .bind(new.user_id)
        .bind(new.product_id)
        .bind(new.rating)
        .bind(new.comment)
        .bind(new.images)
        .bind(new.is_verified)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            RepositoryError::from_unique_violation(e, "you have already reviewed this product")
        })?;

        // Full recomputation over every review of the product.
        let ratings: Vec<(i32,)> =
            sqlx::query_as("SELECT rating FROM reviews WHERE product_id = $1")
                .bind(new.product_id)
                .fetch_all(&mut *tx)
                .await?;

        let ratings: Vec<i32> = ratings.into_iter().map(|r| r.0).collect();
        let (mean, count) = rating_summary(&ratings);

        sqlx::query(
            "UPDATE products SET rating = $2, review_count = $3, updated_at = now() WHERE id = $1",
        )
        .bind(new.product_id)
        .bind(mean)
        .bind(count)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        let view = sqlx::query_as::<_, ReviewWithAuthorRow>(&format!(
            "{REVIEW_SELECT} WHERE r.id = $1"
        ))
        .bind(review_id.0)
        .fetch_one(self.pool)
        .await?;

        Ok(ReviewView::from(view))
    }

    /// A product's reviews newest-first with author identities.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_product(
        &self,
        product_id: ProductId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ReviewView>, RepositoryError> {
        let rows = sqlx::query_as::<_, ReviewWithAuthorRow>(&format!(
            r"{REVIEW_SELECT}
            WHERE r.product_id = $1
            ORDER BY r.created_at DESC
            LIMIT $2 OFFSET $3
            "
        ))
        .bind(product_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(ReviewView::from).collect())
    }

    /// The most recent reviews for a product (embedded in product detail).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn recent_for_product(
        &self,
        product_id: ProductId,
        limit: i64,
    ) -> Result<Vec<ReviewView>, RepositoryError> {
        self.list_for_product(product_id, limit, 0).await
    }

    /// Number of reviews for a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_for_product(&self, product_id: ProductId) -> Result<i64, RepositoryError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM reviews WHERE product_id = $1")
            .bind(product_id)
            .fetch_one(self.pool)
            .await?;

        Ok(count.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_summary_empty() {
        assert_eq!(rating_summary(&[]), (Decimal::ZERO, 0));
    }

    #[test]
    fn test_rating_summary_single() {
        let (mean, count) = rating_summary(&[4]);
        assert_eq!(mean, Decimal::from(4));
        assert_eq!(count, 1);
    }

    #[test]
    fn test_rating_summary_mean_is_arithmetic_average() {
        let (mean, count) = rating_summary(&[5, 4, 3]);
        assert_eq!(mean, Decimal::new(4, 0));
        assert_eq!(count, 3);

        let (mean, count) = rating_summary(&[5, 4]);
        assert_eq!(mean, Decimal::new(45, 1)); // 4.5
        assert_eq!(count, 2);
    }

    #[test]
    fn test_rating_summary_rounds_to_two_places() {
        // 1 + 2 + 5 = 8 / 3 = 2.666... -> 2.67
        let (mean, _) = rating_summary(&[1, 2, 5]);
        assert_eq!(mean, Decimal::new(267, 2));
    }
}
