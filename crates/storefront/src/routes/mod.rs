//! HTTP route handlers for the storefront service.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness check
//! GET  /health/ready                    - Readiness check (database)
//!
//! # Public storefront
//! GET  /stores/{slug}                   - Store page payload (catalog)
//! POST /stores/{slug}/orders            - Submit an order (checkout)
//!
//! # Merchant dashboard (requires x-auth-user identity)
//! GET  /dashboard                       - Stats overview
//! GET  /dashboard/store                 - My store
//! PUT  /dashboard/store                 - Create or update my store
//! POST /dashboard/store/deactivate      - Unpublish (soft delete)
//! POST /dashboard/store/recover         - Undo soft delete
//! GET  /dashboard/categories            - List categories
//! POST /dashboard/categories            - Create category
//! DELETE /dashboard/categories/{id}     - Delete category
//! GET  /dashboard/products              - List products
//! POST /dashboard/products              - Create product (+images, +variants)
//! DELETE /dashboard/products/{id}       - Delete product
//! POST /dashboard/products/{id}/toggle  - Flip product active flag
//! GET  /dashboard/orders                - List orders with items
//! POST /dashboard/orders/{id}/status    - Update order status
//! ```

pub mod checkout;
pub mod dashboard;
pub mod storefront;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::state::AppState;

/// Create the merchant dashboard router.
pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::stats))
        .route(
            "/store",
            get(dashboard::my_store).put(dashboard::upsert_store),
        )
        .route("/store/deactivate", post(dashboard::deactivate_store))
        .route("/store/recover", post(dashboard::recover_store))
        .route(
            "/categories",
            get(dashboard::list_categories).post(dashboard::create_category),
        )
        .route("/categories/{id}", delete(dashboard::delete_category))
        .route(
            "/products",
            get(dashboard::list_products).post(dashboard::create_product),
        )
        .route("/products/{id}", delete(dashboard::delete_product))
        .route("/products/{id}/toggle", post(dashboard::toggle_product))
        .route("/orders", get(dashboard::list_orders))
        .route("/orders/{id}/status", post(dashboard::update_order_status))
}

/// Create all routes for the storefront service.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Public storefront
        .route("/stores/{slug}", get(storefront::show))
        .route("/stores/{slug}/orders", post(checkout::submit))
        // Merchant dashboard
        .nest("/dashboard", dashboard_routes())
}
