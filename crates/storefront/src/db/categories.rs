//! Category repository for database operations.

use sqlx::PgPool;

use ventalink_core::{CategoryId, StoreId};

use super::RepositoryError;
use crate::models::Category;

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

    /// List a store's categories, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, store_id: StoreId) -> Result<Vec<Category>, RepositoryError> {
        let categories = sqlx::query_as::<_, Category>(
            r"
            SELECT id, store_id, name, sort_order, created_at
            FROM categories
            WHERE store_id = $1
            ORDER BY created_at ASC
            ",
        )
        .bind(store_id)
        .fetch_all(self.pool)
        .await?;

        Ok(categories)
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(
        &self,
        store_id: StoreId,
        name: &str,
    ) -> Result<Category, RepositoryError> {
        let category = sqlx::query_as::<_, Category>(
            r"
            INSERT INTO categories (store_id, name)
            VALUES ($1, $2)
            RETURNING id, store_id, name, sort_order, created_at
            ",
        )
        .bind(store_id)
        .bind(name)
        .fetch_one(self.pool)
        .await?;

        Ok(category)
    }

    /// Delete a category owned by `store_id`. Returns whether a row was
    /// removed. Products keep existing with their category cleared.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(
        &self,
        id: CategoryId,
        store_id: StoreId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1 AND store_id = $2")
            .bind(id)
            .bind(store_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Number of categories in a store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self, store_id: StoreId) -> Result<i64, RepositoryError> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM categories WHERE store_id = $1")
                .bind(store_id)
                .fetch_one(self.pool)
                .await?;

        Ok(count)
    }
}
