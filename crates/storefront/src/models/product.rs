//! Product models: the catalog entry plus its images and variants.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

use ventalink_core::{CategoryId, ProductId, ProductImageId, StoreId, VariantId};

/// A catalog entry.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
    pub id: ProductId,
    pub store_id: StoreId,
    /// Cleared (set null) when the owning category is deleted.
    pub category_id: Option<CategoryId>,
    pub title: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// An additional product image.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProductImage {
    pub id: ProductImageId,
    pub product_id: ProductId,
    pub image_url: String,
    pub display_order: i32,
}

/// A product variant, e.g. `Talla` / `M` with a price adjustment.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProductVariant {
    pub id: VariantId,
    pub product_id: ProductId,
    pub variant_type: String,
    pub variant_value: String,
    pub price_adjustment: Decimal,
}

/// A product with its images and variants, as served to the storefront.
#[derive(Debug, Clone, Serialize)]
pub struct ProductDetails {
    #[serde(flatten)]
    pub product: Product,
    pub images: Vec<ProductImage>,
    pub variants: Vec<ProductVariant>,
}
