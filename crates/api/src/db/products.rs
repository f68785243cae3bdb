//! Product repository: listing with filters, lookups, and admin management.
//!
//! Listing filters are assembled with `sqlx::QueryBuilder`; the sort column
//! comes from a closed enum, never from raw client input.

use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};

use rosewood_core::{CategoryId, ProductId};

use super::RepositoryError;
use crate::models::catalog::{CategorySummary, Product};

/// Sortable columns for product listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductSort {
    #[default]
    CreatedAt,
    Price,
    Name,
    Rating,
}

impl ProductSort {
    /// Parse the client-supplied `sortBy` value; unknown values fall back to
    /// `CreatedAt` (the reference implementation's default).
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "price" => Self::Price,
            "name" => Self::Name,
            "rating" => Self::Rating,
            _ => Self::CreatedAt,
        }
    }

    const fn column(self) -> &'static str {
        match self {
            Self::CreatedAt => "p.created_at",
            Self::Price => "p.price",
            Self::Name => "p.name",
            Self::Rating => "p.rating",
        }
    }
}

/// Filters applied to the product listing.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub category_slug: Option<String>,
    pub search: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub featured: bool,
    pub sort: ProductSort,
    pub ascending: bool,
}

impl ProductFilter {
    /// Append the WHERE clause for this filter to a query.
    fn push_where(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        qb.push(" WHERE p.is_active");

        if let Some(slug) = &self.category_slug {
            qb.push(" AND c.slug = ").push_bind(slug.clone());
        }

        if let Some(search) = &self.search {
            let pattern = format!("%{search}%");
            qb.push(" AND (p.name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR p.description ILIKE ")
                .push_bind(pattern)
                .push(" OR ")
                .push_bind(search.clone())
                .push(" = ANY(p.tags))");
        }

        if let Some(min) = self.min_price {
            qb.push(" AND p.price >= ").push_bind(min);
        }

        if let Some(max) = self.max_price {
            qb.push(" AND p.price <= ").push_bind(max);
        }

        if self.featured {
            qb.push(" AND p.is_featured");
        }
    }
}

/// Fields accepted when creating a product.
#[derive(Debug)]
pub struct NewProduct {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price: Decimal,
    pub compare_price: Option<Decimal>,
    pub category_id: CategoryId,
    pub stock: i32,
    pub sku: Option<String>,
    pub images: Vec<String>,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
    pub tags: Vec<String>,
    pub is_featured: bool,
}

/// Partial update for a product; `None` leaves the column unchanged.
#[derive(Debug, Default)]
pub struct ProductPatch {
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

#[derive(sqlx::FromRow)]
struct ProductWithCategoryRow {
    #[sqlx(flatten)]
    product: Product,
    category_name: String,
    category_slug: String,
}

impl ProductWithCategoryRow {
    fn into_pair(self) -> (Product, CategorySummary) {
        let summary = CategorySummary {
            id: self.product.category_id,
            name: self.category_name,
            slug: self.category_slug,
        };
        (self.product, summary)
    }
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List active products matching `filter`, with their category summaries.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        filter: &ProductFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<(Product, CategorySummary)>, RepositoryError> {
        let mut qb = QueryBuilder::new(
            r"
            SELECT p.*, c.name AS category_name, c.slug AS category_slug
            FROM products p
            JOIN categories c ON c.id = p.category_id
            ",
        );
        filter.push_where(&mut qb);

        qb.push(" ORDER BY ")
            .push(filter.sort.column())
            .push(if filter.ascending { " ASC" } else { " DESC" })
            .push(" LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let rows: Vec<ProductWithCategoryRow> =
            qb.build_query_as().fetch_all(self.pool).await?;

        Ok(rows.into_iter().map(ProductWithCategoryRow::into_pair).collect())
    }

    /// Count active products matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self, filter: &ProductFilter) -> Result<i64, RepositoryError> {
        let mut qb = QueryBuilder::new(
            r"
            SELECT COUNT(*)
            FROM products p
            JOIN categories c ON c.id = p.category_id
            ",
        );
        filter.push_where(&mut qb);

        let count: (i64,) = qb.build_query_as().fetch_one(self.pool).await?;

        Ok(count.0)
    }

    /// Get a product by ID with its category summary.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(
        &self,
        id: ProductId,
    ) -> Result<Option<(Product, CategorySummary)>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductWithCategoryRow>(
            r"
            SELECT p.*, c.name AS category_name, c.slug AS category_slug
            FROM products p
            JOIN categories c ON c.id = p.category_id
            WHERE p.id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(ProductWithCategoryRow::into_pair))
    }

    /// Get a product by slug with its category summary.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<(Product, CategorySummary)>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductWithCategoryRow>(
            r"
            SELECT p.*, c.name AS category_name, c.slug AS category_slug
            FROM products p
            JOIN categories c ON c.id = p.category_id
            WHERE p.slug = $1
            ",
        )
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(ProductWithCategoryRow::into_pair))
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new: NewProduct) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r"
            INSERT INTO products
                (name, slug, description, price, compare_price, category_id,
                 stock, sku, images, sizes, colors, tags, is_featured)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            ",
        )
        .bind(&new.name)
        .bind(&new.slug)
        .bind(&new.description)
        .bind(new.price)
        .bind(new.compare_price)
        .bind(new.category_id)
        .bind(new.stock)
        .bind(&new.sku)
        .bind(&new.images)
        .bind(&new.sizes)
        .bind(&new.colors)
        .bind(&new.tags)
        .bind(new.is_featured)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_unique_violation(e, "product slug already exists"))?;

        Ok(product)
    }

    /// Apply a partial update to a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    pub async fn update(
        &self,
        id: ProductId,
        patch: ProductPatch,
    ) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r"
            UPDATE products SET
                name          = COALESCE($2, name),
                description   = COALESCE($3, description),
                price         = COALESCE($4, price),
                compare_price = COALESCE($5, compare_price),
                category_id   = COALESCE($6, category_id),
                stock         = COALESCE($7, stock),
                sku           = COALESCE($8, sku),
                images        = COALESCE($9, images),
                sizes         = COALESCE($10, sizes),
                colors        = COALESCE($11, colors),
                tags          = COALESCE($12, tags),
                is_active     = COALESCE($13, is_active),
                is_featured   = COALESCE($14, is_featured),
                updated_at    = now()
            WHERE id = $1
            RETURNING *
            ",
        )
        .bind(id)
        .bind(patch.name)
        .bind(patch.description)
        .bind(patch.price)
        .bind(patch.compare_price)
        .bind(patch.category_id)
        .bind(patch.stock)
        .bind(patch.sku)
        .bind(patch.images)
        .bind(patch.sizes)
        .bind(patch.colors)
        .bind(patch.tags)
        .bind(patch.is_active)
        .bind(patch.is_featured)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(product)
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Total number of products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_all(&self) -> Result<i64, RepositoryError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
            .fetch_one(self.pool)
            .await?;

        Ok(count.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_parse_whitelist() {
        assert_eq!(ProductSort::parse("price"), ProductSort::Price);
        assert_eq!(ProductSort::parse("name"), ProductSort::Name);
        assert_eq!(ProductSort::parse("rating"), ProductSort::Rating);
        assert_eq!(ProductSort::parse("createdAt"), ProductSort::CreatedAt);
        // Arbitrary client input never reaches the ORDER BY clause
        assert_eq!(
            ProductSort::parse("price; DROP TABLE products"),
            ProductSort::CreatedAt
        );
    }
}
