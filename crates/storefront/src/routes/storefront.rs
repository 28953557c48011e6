//! Public storefront route handlers.

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use tracing::instrument;

use ventalink_core::ProductId;

use crate::db::{CategoryRepository, ProductRepository, StoreRepository};
use crate::error::{AppError, Result};
use crate::models::{Category, ProductDetails, ProductImage, ProductVariant, PublicStore, Store};
use crate::state::AppState;

/// Everything a storefront page needs in one response.
#[derive(Debug, Serialize)]
pub struct StorefrontPayload {
    pub store: PublicStore,
    pub categories: Vec<Category>,
    pub products: Vec<ProductDetails>,
}

/// Serve a store's public page payload.
///
/// Unpublished stores (deactivated or soft-deleted) are indistinguishable
/// from missing ones.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<StorefrontPayload>> {
    let store = StoreRepository::new(state.pool())
        .get_by_slug(&slug)
        .await?
        .filter(Store::is_published)
        .ok_or_else(|| AppError::NotFound(format!("store {slug}")))?;

    let categories = CategoryRepository::new(state.pool()).list(store.id).await?;

    let product_repo = ProductRepository::new(state.pool());
    let products = product_repo.list_active(store.id).await?;
    let product_ids: Vec<ProductId> = products.iter().map(|p| p.id).collect();

    let mut images_by_product: HashMap<ProductId, Vec<ProductImage>> = HashMap::new();
    for image in product_repo.images_for(&product_ids).await? {
        images_by_product
            .entry(image.product_id)
            .or_default()
            .push(image);
    }

    let mut variants_by_product: HashMap<ProductId, Vec<ProductVariant>> = HashMap::new();
    for variant in product_repo.variants_for(&product_ids).await? {
        variants_by_product
            .entry(variant.product_id)
            .or_default()
            .push(variant);
    }

    let products = products
        .into_iter()
        .map(|product| {
            let images = images_by_product.remove(&product.id).unwrap_or_default();
            let variants = variants_by_product.remove(&product.id).unwrap_or_default();
            ProductDetails {
                product,
                images,
                variants,
            }
        })
        .collect();

    Ok(Json(StorefrontPayload {
        store: PublicStore::from(store),
        categories,
        products,
    }))
}
