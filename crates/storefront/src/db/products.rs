//! Product repository for database operations.
//!
//! Product creation writes the catalog entry, its gallery images, and its
//! variants in a single transaction; a half-written product never survives.

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use ventalink_core::{CategoryId, ProductId, StoreId};

use super::RepositoryError;
use crate::models::{Product, ProductImage, ProductVariant};

/// Fields for a new catalog entry.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub store_id: StoreId,
    pub category_id: Option<CategoryId>,
    pub title: String,
    pub description: Option<String>,
    pub price: Decimal,
    /// Gallery image URLs in display order.
    pub image_urls: Vec<String>,
    pub variants: Vec<NewVariant>,
}

/// A variant row to create alongside a product.
#[derive(Debug, Clone)]
pub struct NewVariant {
    pub variant_type: String,
    pub variant_value: String,
    pub price_adjustment: Decimal,
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

    /// Create a product with its images and variants atomically.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any insert fails; the
    /// transaction rolls back and nothing is persisted.
    pub async fn create(&self, new: &NewProduct) -> Result<Product, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let product = sqlx::query_as::<_, Product>(
            r"
            INSERT INTO products (store_id, category_id, title, description, price, image_url)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, store_id, category_id, title, description, price,
                      image_url, is_active, created_at
            ",
        )
        .bind(new.store_id)
        .bind(new.category_id)
        .bind(&new.title)
        .bind(&new.description)
        .bind(new.price)
        .bind(new.image_urls.first().map(String::as_str))
        .fetch_one(&mut *tx)
        .await?;

        for (index, url) in new.image_urls.iter().enumerate() {
            sqlx::query(
                r"
                INSERT INTO product_images (product_id, image_url, display_order)
                VALUES ($1, $2, $3)
                ",
            )
            .bind(product.id)
            .bind(url)
            .bind(i32::try_from(index).unwrap_or(i32::MAX))
            .execute(&mut *tx)
            .await?;
        }

        for variant in &new.variants {
            sqlx::query(
                r"
                INSERT INTO product_variants
                    (product_id, variant_type, variant_value, price_adjustment)
                VALUES ($1, $2, $3, $4)
                ",
            )
            .bind(product.id)
            .bind(&variant.variant_type)
            .bind(&variant.variant_value)
            .bind(variant.price_adjustment)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(product)
    }

    /// List every product in a store, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, store_id: StoreId) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(
            r"
            SELECT id, store_id, category_id, title, description, price,
                   image_url, is_active, created_at
            FROM products
            WHERE store_id = $1
            ORDER BY created_at DESC
            ",
        )
        .bind(store_id)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// List a store's active products for the public storefront.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_active(&self, store_id: StoreId) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(
            r"
            SELECT id, store_id, category_id, title, description, price,
                   image_url, is_active, created_at
            FROM products
            WHERE store_id = $1 AND is_active = TRUE
            ORDER BY created_at DESC
            ",
        )
        .bind(store_id)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Gallery images for a set of products, in display order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn images_for(
        &self,
        product_ids: &[ProductId],
    ) -> Result<Vec<ProductImage>, RepositoryError> {
        let ids: Vec<Uuid> = product_ids.iter().map(|id| id.as_uuid()).collect();
        let images = sqlx::query_as::<_, ProductImage>(
            r"
            SELECT id, product_id, image_url, display_order
            FROM product_images
            WHERE product_id = ANY($1)
            ORDER BY display_order ASC
            ",
        )
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        Ok(images)
    }

    /// Variants for a set of products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn variants_for(
        &self,
        product_ids: &[ProductId],
    ) -> Result<Vec<ProductVariant>, RepositoryError> {
        let ids: Vec<Uuid> = product_ids.iter().map(|id| id.as_uuid()).collect();
        let variants = sqlx::query_as::<_, ProductVariant>(
            r"
            SELECT id, product_id, variant_type, variant_value, price_adjustment
            FROM product_variants
            WHERE product_id = ANY($1)
            ",
        )
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        Ok(variants)
    }

    /// Delete a product owned by `store_id`. Returns whether a row was
    /// removed; images and variants cascade.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ProductId, store_id: StoreId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1 AND store_id = $2")
            .bind(id)
            .bind(store_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Flip a product's active flag. Returns the new state, or `None` when
    /// the product does not belong to `store_id`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn toggle_active(
        &self,
        id: ProductId,
        store_id: StoreId,
    ) -> Result<Option<bool>, RepositoryError> {
        let state = sqlx::query_scalar::<_, bool>(
            r"
            UPDATE products SET is_active = NOT is_active
            WHERE id = $1 AND store_id = $2
            RETURNING is_active
            ",
        )
        .bind(id)
        .bind(store_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(state)
    }

    /// Total product count for a store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self, store_id: StoreId) -> Result<i64, RepositoryError> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products WHERE store_id = $1")
                .bind(store_id)
                .fetch_one(self.pool)
                .await?;

        Ok(count)
    }

    /// Active product count for a store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_active(&self, store_id: StoreId) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM products WHERE store_id = $1 AND is_active = TRUE",
        )
        .bind(store_id)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }
}
