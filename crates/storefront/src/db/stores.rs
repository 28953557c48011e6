//! Store repository for database operations.

use sqlx::PgPool;

use ventalink_core::{StoreId, UserId};

use super::RepositoryError;
use crate::models::Store;

/// Fields accepted by [`StoreRepository::upsert`].
///
/// Logo and color are managed separately and left untouched by an upsert.
#[derive(Debug, Clone)]
pub struct StoreUpsert {
    pub name: String,
    pub slug: String,
    pub phone: String,
}

/// Repository for store database operations.
pub struct StoreRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StoreRepository<'a> {
    /// Create a new store repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a store by its public slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Store>, RepositoryError> {
        let store = sqlx::query_as::<_, Store>(
            r"
            SELECT id, owner_id, slug, name, phone, primary_color, logo_url,
                   is_active, deleted_at, created_at, updated_at
            FROM stores
            WHERE slug = $1
            ",
        )
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        Ok(store)
    }

    /// Get the store owned by `owner`, if any.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_owner(&self, owner: UserId) -> Result<Option<Store>, RepositoryError> {
        let store = sqlx::query_as::<_, Store>(
            r"
            SELECT id, owner_id, slug, name, phone, primary_color, logo_url,
                   is_active, deleted_at, created_at, updated_at
            FROM stores
            WHERE owner_id = $1
            ",
        )
        .bind(owner)
        .fetch_optional(self.pool)
        .await?;

        Ok(store)
    }

    /// Whether `slug` is already used by a store not owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn slug_taken_by_other(
        &self,
        slug: &str,
        owner: UserId,
    ) -> Result<bool, RepositoryError> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM stores WHERE slug = $1 AND owner_id <> $2)",
        )
        .bind(slug)
        .bind(owner)
        .fetch_one(self.pool)
        .await?;

        Ok(taken)
    }

    /// Create the owner's store, or update name/slug/phone if it exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug is taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn upsert(
        &self,
        owner: UserId,
        fields: &StoreUpsert,
    ) -> Result<Store, RepositoryError> {
        let store = sqlx::query_as::<_, Store>(
            r"
            INSERT INTO stores (owner_id, name, slug, phone)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (owner_id) DO UPDATE
                SET name = EXCLUDED.name,
                    slug = EXCLUDED.slug,
                    phone = EXCLUDED.phone,
                    updated_at = now()
            RETURNING id, owner_id, slug, name, phone, primary_color, logo_url,
                      is_active, deleted_at, created_at, updated_at
            ",
        )
        .bind(owner)
        .bind(&fields.name)
        .bind(&fields.slug)
        .bind(&fields.phone)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("slug already taken".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(store)
    }

    /// Soft-delete the store: unpublish it and stamp `deleted_at`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn deactivate(&self, id: StoreId) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE stores SET is_active = FALSE, deleted_at = now() WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    /// Undo a soft delete.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn recover(&self, id: StoreId) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE stores SET is_active = TRUE, deleted_at = NULL WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(())
    }
}
