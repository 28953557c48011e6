//! Merchant dashboard route handlers.
//!
//! Every handler resolves the caller's store from the verified identity
//! first; writes never cross store boundaries. Ids belonging to another
//! merchant's store are indistinguishable from missing ones.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use ventalink_core::{
    CategoryId, OrderId, OrderStatus, ProductId, StoreId, UserId,
    cart::deserialize_price,
};

use crate::db::products::{NewProduct, NewVariant};
use crate::db::stores::StoreUpsert;
use crate::db::{CategoryRepository, OrderRepository, ProductRepository, StoreRepository};
use crate::error::{AppError, Result};
use crate::middleware::AuthMerchant;
use crate::models::{Category, OrderWithItems, Product, Store};
use crate::state::AppState;

/// Resolve the caller's store or fail with 404.
async fn require_store(state: &AppState, owner: UserId) -> Result<Store> {
    StoreRepository::new(state.pool())
        .get_by_owner(owner)
        .await?
        .ok_or_else(|| AppError::NotFound("no store for this account".to_owned()))
}

// =============================================================================
// Stats
// =============================================================================

/// Store summary embedded in the stats payload.
#[derive(Debug, Serialize)]
pub struct StoreSummary {
    pub id: StoreId,
    pub name: String,
    pub slug: String,
    pub logo_url: Option<String>,
    pub share_url: String,
}

/// Dashboard overview numbers.
#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub store: Option<StoreSummary>,
    pub total_products: i64,
    pub active_products: i64,
    pub total_categories: i64,
    pub store_is_active: bool,
    pub store_deleted_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Dashboard overview: store summary and catalog counts.
#[instrument(skip(state))]
pub async fn stats(
    State(state): State<AppState>,
    AuthMerchant(owner): AuthMerchant,
) -> Result<Json<DashboardStats>> {
    let Some(store) = StoreRepository::new(state.pool()).get_by_owner(owner).await? else {
        return Ok(Json(DashboardStats {
            store: None,
            total_products: 0,
            active_products: 0,
            total_categories: 0,
            store_is_active: false,
            store_deleted_at: None,
        }));
    };

    let product_repo = ProductRepository::new(state.pool());
    let total_products = product_repo.count(store.id).await?;
    let active_products = product_repo.count_active(store.id).await?;
    let total_categories = CategoryRepository::new(state.pool()).count(store.id).await?;

    Ok(Json(DashboardStats {
        total_products,
        active_products,
        total_categories,
        store_is_active: store.is_active,
        store_deleted_at: store.deleted_at,
        store: Some(StoreSummary {
            id: store.id,
            share_url: state.config().store_url(&store.slug),
            name: store.name,
            slug: store.slug,
            logo_url: store.logo_url,
        }),
    }))
}

// =============================================================================
// Store
// =============================================================================

/// Store create/update form data.
#[derive(Debug, Deserialize)]
pub struct StoreForm {
    pub name: String,
    pub slug: String,
    pub phone: String,
}

/// A valid slug: lowercase letters, digits, and dashes only.
fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Fetch the caller's store, if one exists.
#[instrument(skip(state))]
pub async fn my_store(
    State(state): State<AppState>,
    AuthMerchant(owner): AuthMerchant,
) -> Result<Json<Option<Store>>> {
    let store = StoreRepository::new(state.pool()).get_by_owner(owner).await?;
    Ok(Json(store))
}

/// Create the caller's store, or update its name, slug, and phone.
#[instrument(skip(state, form), fields(slug = %form.slug))]
pub async fn upsert_store(
    State(state): State<AppState>,
    AuthMerchant(owner): AuthMerchant,
    Json(form): Json<StoreForm>,
) -> Result<Json<Store>> {
    let name = form.name.trim();
    let phone = form.phone.trim();
    if name.is_empty() || phone.is_empty() {
        return Err(AppError::Validation("name and phone are required".to_owned()));
    }
    if !is_valid_slug(&form.slug) {
        return Err(AppError::Validation(
            "slug may only contain lowercase letters, digits, and dashes".to_owned(),
        ));
    }

    let repo = StoreRepository::new(state.pool());
    if repo.slug_taken_by_other(&form.slug, owner).await? {
        return Err(AppError::Conflict("slug already taken".to_owned()));
    }

    let store = repo
        .upsert(
            owner,
            &StoreUpsert {
                name: name.to_owned(),
                slug: form.slug.clone(),
                phone: phone.to_owned(),
            },
        )
        .await?;

    Ok(Json(store))
}

/// Unpublish the caller's store (soft delete).
#[instrument(skip(state))]
pub async fn deactivate_store(
    State(state): State<AppState>,
    AuthMerchant(owner): AuthMerchant,
) -> Result<StatusCode> {
    let store = require_store(&state, owner).await?;
    StoreRepository::new(state.pool()).deactivate(store.id).await?;
    tracing::info!(store = %store.slug, "store deactivated");
    Ok(StatusCode::NO_CONTENT)
}

/// Undo a soft delete.
#[instrument(skip(state))]
pub async fn recover_store(
    State(state): State<AppState>,
    AuthMerchant(owner): AuthMerchant,
) -> Result<StatusCode> {
    let store = require_store(&state, owner).await?;
    StoreRepository::new(state.pool()).recover(store.id).await?;
    tracing::info!(store = %store.slug, "store recovered");
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Categories
// =============================================================================

/// Category creation form data.
#[derive(Debug, Deserialize)]
pub struct CategoryForm {
    pub name: String,
}

/// List the caller's categories.
#[instrument(skip(state))]
pub async fn list_categories(
    State(state): State<AppState>,
    AuthMerchant(owner): AuthMerchant,
) -> Result<Json<Vec<Category>>> {
    let store = require_store(&state, owner).await?;
    let categories = CategoryRepository::new(state.pool()).list(store.id).await?;
    Ok(Json(categories))
}

/// Create a category.
#[instrument(skip(state, form), fields(name = %form.name))]
pub async fn create_category(
    State(state): State<AppState>,
    AuthMerchant(owner): AuthMerchant,
    Json(form): Json<CategoryForm>,
) -> Result<(StatusCode, Json<Category>)> {
    let name = form.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("category name is required".to_owned()));
    }

    let store = require_store(&state, owner).await?;
    let category = CategoryRepository::new(state.pool())
        .create(store.id, name)
        .await?;

    Ok((StatusCode::CREATED, Json(category)))
}

/// Delete a category. Products in it keep existing with no category.
#[instrument(skip(state))]
pub async fn delete_category(
    State(state): State<AppState>,
    AuthMerchant(owner): AuthMerchant,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    let store = require_store(&state, owner).await?;
    let deleted = CategoryRepository::new(state.pool())
        .delete(CategoryId::new(id), store.id)
        .await?;
    if !deleted {
        return Err(AppError::NotFound(format!("category {id}")));
    }
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Products
// =============================================================================

/// Variant rows accepted by product creation.
#[derive(Debug, Deserialize)]
pub struct VariantForm {
    #[serde(default)]
    pub variant_type: String,
    #[serde(default)]
    pub variant_value: String,
    #[serde(default)]
    pub price_adjustment: Option<Decimal>,
}

/// Product creation form data.
#[derive(Debug, Deserialize)]
pub struct ProductForm {
    pub title: String,
    #[serde(deserialize_with = "deserialize_price")]
    pub price: Decimal,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub variants: Vec<VariantForm>,
}

/// List every product in the caller's store.
#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
    AuthMerchant(owner): AuthMerchant,
) -> Result<Json<Vec<Product>>> {
    let store = require_store(&state, owner).await?;
    let products = ProductRepository::new(state.pool()).list(store.id).await?;
    Ok(Json(products))
}

/// Create a product together with its images and variants.
#[instrument(skip(state, form), fields(title = %form.title))]
pub async fn create_product(
    State(state): State<AppState>,
    AuthMerchant(owner): AuthMerchant,
    Json(form): Json<ProductForm>,
) -> Result<(StatusCode, Json<Product>)> {
    let title = form.title.trim();
    if title.is_empty() || form.price <= Decimal::ZERO {
        return Err(AppError::Validation(
            "title and a positive price are required".to_owned(),
        ));
    }

    let store = require_store(&state, owner).await?;

    // Incomplete variant rows from the form builder are silently skipped.
    let variants: Vec<NewVariant> = form
        .variants
        .into_iter()
        .filter(|v| !v.variant_type.trim().is_empty() && !v.variant_value.trim().is_empty())
        .map(|v| NewVariant {
            variant_type: v.variant_type.trim().to_owned(),
            variant_value: v.variant_value.trim().to_owned(),
            price_adjustment: v.price_adjustment.unwrap_or(Decimal::ZERO),
        })
        .collect();

    let product = ProductRepository::new(state.pool())
        .create(&NewProduct {
            store_id: store.id,
            category_id: form.category_id,
            title: title.to_owned(),
            description: form.description.filter(|d| !d.trim().is_empty()),
            price: form.price,
            image_urls: form.images,
            variants,
        })
        .await?;
    tracing::info!(product = %product.id, store = %store.slug, "product created");

    Ok((StatusCode::CREATED, Json(product)))
}

/// Delete a product; its images and variants cascade.
#[instrument(skip(state))]
pub async fn delete_product(
    State(state): State<AppState>,
    AuthMerchant(owner): AuthMerchant,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    let store = require_store(&state, owner).await?;
    let deleted = ProductRepository::new(state.pool())
        .delete(ProductId::new(id), store.id)
        .await?;
    if !deleted {
        return Err(AppError::NotFound(format!("product {id}")));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Response for a product toggle.
#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub is_active: bool,
}

/// Flip a product between active and inactive.
#[instrument(skip(state))]
pub async fn toggle_product(
    State(state): State<AppState>,
    AuthMerchant(owner): AuthMerchant,
    Path(id): Path<Uuid>,
) -> Result<Json<ToggleResponse>> {
    let store = require_store(&state, owner).await?;
    let is_active = ProductRepository::new(state.pool())
        .toggle_active(ProductId::new(id), store.id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;
    Ok(Json(ToggleResponse { is_active }))
}

// =============================================================================
// Orders
// =============================================================================

/// Order status form data.
#[derive(Debug, Deserialize)]
pub struct OrderStatusForm {
    pub status: String,
}

/// List the caller's orders with their items, newest first.
#[instrument(skip(state))]
pub async fn list_orders(
    State(state): State<AppState>,
    AuthMerchant(owner): AuthMerchant,
) -> Result<Json<Vec<OrderWithItems>>> {
    let store = require_store(&state, owner).await?;
    let orders = OrderRepository::new(state.pool())
        .list_with_items(store.id)
        .await?;
    Ok(Json(orders))
}

/// Update an order's status.
#[instrument(skip(state, form), fields(status = %form.status))]
pub async fn update_order_status(
    State(state): State<AppState>,
    AuthMerchant(owner): AuthMerchant,
    Path(id): Path<Uuid>,
    Json(form): Json<OrderStatusForm>,
) -> Result<StatusCode> {
    let status: OrderStatus = form
        .status
        .parse()
        .map_err(AppError::Validation)?;

    let store = require_store(&state, owner).await?;
    let updated = OrderRepository::new(state.pool())
        .update_status(OrderId::new(id), store.id, status)
        .await?;
    if !updated {
        return Err(AppError::NotFound(format!("order {id}")));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_validation() {
        assert!(is_valid_slug("pizzas-juan"));
        assert!(is_valid_slug("tienda2"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("Pizzas Juan"));
        assert!(!is_valid_slug("pizzas_juan"));
        assert!(!is_valid_slug("caf\u{e9}"));
    }

    #[test]
    fn test_product_form_defaults() {
        let json = r#"{"title": "Pizza", "price": "100"}"#;
        let form: ProductForm = serde_json::from_str(json).unwrap();
        assert_eq!(form.price, Decimal::from(100));
        assert!(form.images.is_empty());
        assert!(form.variants.is_empty());
        assert_eq!(form.category_id, None);
    }

    #[test]
    fn test_order_status_form_rejects_unknown() {
        assert!("shipped".parse::<OrderStatus>().is_err());
        assert_eq!(
            "completed".parse::<OrderStatus>().unwrap(),
            OrderStatus::Completed
        );
    }
}
