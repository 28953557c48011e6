//! Checkout route handler: order submission plus WhatsApp hand-off.
//!
//! The order is persisted before the chat link is composed, so the merchant
//! dashboard tracks it whether or not the shopper ever sends the WhatsApp
//! message. On any persistence failure the shopper's cart is left untouched
//! client-side; retry is a manual action.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use ventalink_core::{
    OrderId, ProductId,
    cart::{deserialize_price, deserialize_variant},
    whatsapp::{self, CustomerDetails, OrderLine},
};

use crate::db::{OrderRepository, StoreRepository};
use crate::db::orders::{NewOrder, NewOrderItem};
use crate::error::{AppError, Result};
use crate::models::Store;
use crate::state::AppState;

/// One cart line as submitted by the shopper.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutItem {
    pub product_id: ProductId,
    pub title: String,
    pub quantity: u32,
    /// Unit price with any variant adjustment already applied.
    #[serde(deserialize_with = "deserialize_price")]
    pub price: Decimal,
    #[serde(default, deserialize_with = "deserialize_variant")]
    pub variant_info: Option<String>,
}

/// Checkout form data plus the cart snapshot.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub customer_name: String,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub customer_address: Option<String>,
    pub items: Vec<CheckoutItem>,
}

/// Response for a submitted order.
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub order_id: OrderId,
    /// Pre-filled chat link the shopper opens to confirm with the merchant.
    pub whatsapp_url: String,
}

/// The order total as recorded: sum of `price * quantity` over all lines.
///
/// Recomputed server-side; the client never supplies a total.
fn compute_total(items: &[CheckoutItem]) -> Decimal {
    items
        .iter()
        .map(|item| item.price * Decimal::from(item.quantity))
        .sum()
}

/// Submit an order for a store.
///
/// Validation failures surface before any database work. The order and its
/// items are written in one transaction; on success the response carries
/// the order id and the composed WhatsApp link, and the shopper's cart may
/// be cleared.
#[instrument(skip(state, request), fields(items = request.items.len()))]
pub async fn submit(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(request): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<CheckoutResponse>)> {
    let customer_name = request.customer_name.trim();
    if customer_name.is_empty() {
        return Err(AppError::Validation("customer name is required".to_owned()));
    }
    if request.items.is_empty() {
        return Err(AppError::Validation("cart is empty".to_owned()));
    }

    let store = StoreRepository::new(state.pool())
        .get_by_slug(&slug)
        .await?
        .filter(Store::is_published)
        .ok_or_else(|| AppError::NotFound(format!("store {slug}")))?;

    let total = compute_total(&request.items);

    let new_order = NewOrder {
        store_id: store.id,
        customer_name: customer_name.to_owned(),
        customer_phone: none_if_blank(request.customer_phone.as_deref()),
        customer_address: none_if_blank(request.customer_address.as_deref()),
        total,
    };
    let items: Vec<NewOrderItem> = request
        .items
        .iter()
        .map(|item| NewOrderItem {
            product_id: item.product_id,
            product_title: item.title.clone(),
            quantity: i32::try_from(item.quantity).unwrap_or(i32::MAX),
            price: item.price,
            variant_info: item.variant_info.clone(),
        })
        .collect();

    let order_id = OrderRepository::new(state.pool())
        .create(&new_order, &items)
        .await?;
    tracing::info!(%order_id, store = %store.slug, %total, "order submitted");

    let customer = CustomerDetails {
        name: new_order.customer_name.clone(),
        phone: new_order.customer_phone.clone(),
        address: new_order.customer_address.clone(),
    };
    let lines: Vec<OrderLine> = request
        .items
        .iter()
        .map(|item| OrderLine {
            title: item.title.clone(),
            quantity: item.quantity,
            unit_price: item.price,
            variant: item.variant_info.clone(),
        })
        .collect();
    let whatsapp_url = whatsapp::checkout_link(&store.phone, &customer, &lines, total);

    Ok((
        StatusCode::CREATED,
        Json(CheckoutResponse {
            order_id,
            whatsapp_url,
        }),
    ))
}

fn none_if_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(title: &str, price: i64, quantity: u32) -> CheckoutItem {
        CheckoutItem {
            product_id: ProductId::generate(),
            title: title.to_owned(),
            quantity,
            price: Decimal::from(price),
            variant_info: None,
        }
    }

    #[test]
    fn test_compute_total() {
        let items = vec![item("Producto A", 25, 2), item("Producto B", 40, 1)];
        assert_eq!(compute_total(&items), Decimal::from(90));
    }

    #[test]
    fn test_compute_total_empty() {
        assert_eq!(compute_total(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_request_coerces_string_price() {
        let json = format!(
            r#"{{
                "customer_name": "Ana",
                "items": [{{
                    "product_id": "{}",
                    "title": "Producto",
                    "quantity": 1,
                    "price": "99.99"
                }}]
            }}"#,
            ProductId::generate()
        );
        let request: CheckoutRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(request.items[0].price, "99.99".parse().unwrap());
    }

    #[test]
    fn test_request_discards_structured_variant() {
        let json = format!(
            r#"{{
                "customer_name": "Ana",
                "items": [{{
                    "product_id": "{}",
                    "title": "Camisa",
                    "quantity": 1,
                    "price": 75,
                    "variant_info": {{"type": "Talla", "value": "M"}}
                }}]
            }}"#,
            ProductId::generate()
        );
        let request: CheckoutRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(request.items[0].variant_info, None);
    }

    #[test]
    fn test_none_if_blank() {
        assert_eq!(none_if_blank(None), None);
        assert_eq!(none_if_blank(Some("")), None);
        assert_eq!(none_if_blank(Some("   ")), None);
        assert_eq!(none_if_blank(Some(" Zona 1 ")), Some("Zona 1".to_owned()));
    }
}
