//! Category repository for database operations.

use sqlx::PgPool;

use rosewood_core::CategoryId;

use super::RepositoryError;
use crate::models::catalog::{Category, CategoryTree, Product};

/// How many products a category detail page carries.
const CATEGORY_PRODUCT_LIMIT: i64 = 20;

/// Repository for category database operations.
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all categories name-ascending, each with its direct children
    /// and product count.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list(&self) -> Result<Vec<CategoryTree>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct CategoryCountRow {
            #[sqlx(flatten)]
            category: Category,
            product_count: i64,
        }

        let rows = sqlx::query_as::<_, CategoryCountRow>(
            r"
            SELECT c.*,
                   (SELECT COUNT(*) FROM products p WHERE p.category_id = c.id) AS product_count
            FROM categories c
            ORDER BY c.name ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        // Children are resolved from the same result set rather than one
        // query per category.
        let all: Vec<Category> = rows.iter().map(|r| r.category.clone()).collect();

        let trees = rows
            .into_iter()
            .map(|row| {
                let children = all
                    .iter()
                    .filter(|c| c.parent_id == Some(row.category.id))
                    .cloned()
                    .collect();
                CategoryTree {
                    category: row.category,
                    children,
                    product_count: row.product_count,
                }
            })
            .collect();

        Ok(trees)
    }

    /// Get a category by slug with its children and up to 20 active products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<(Category, Vec<Category>, Vec<Product>)>, RepositoryError> {
        let category =
            sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE slug = $1")
                .bind(slug)
                .fetch_optional(self.pool)
                .await?;

        let Some(category) = category else {
            return Ok(None);
        };

        let children =
            sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE parent_id = $1")
                .bind(category.id)
                .fetch_all(self.pool)
                .await?;

        let products = sqlx::query_as::<_, Product>(
            r"
            SELECT * FROM products
            WHERE category_id = $1 AND is_active
            ORDER BY created_at DESC
            LIMIT $2
            ",
        )
        .bind(category.id)
        .bind(CATEGORY_PRODUCT_LIMIT)
        .fetch_all(self.pool)
        .await?;

        Ok(Some((category, children, products)))
    }

    /// Look up a category by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: CategoryId) -> Result<Option<Category>, RepositoryError> {
        let category = sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(category)
    }
}
