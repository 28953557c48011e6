//! Order models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

use ventalink_core::{OrderId, OrderItemId, OrderStatus, ProductId, StoreId};

/// A submitted order, tracked on the merchant dashboard.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Order {
    pub id: OrderId,
    pub store_id: StoreId,
    pub status: OrderStatus,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub customer_address: Option<String>,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
}

/// One line of a submitted order.
///
/// `product_title` and `price` are snapshots; the catalog entry may change
/// or disappear after submission.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub product_title: String,
    pub quantity: i32,
    pub price: Decimal,
    pub variant_info: Option<String>,
}

/// An order with its line items, as listed on the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}
