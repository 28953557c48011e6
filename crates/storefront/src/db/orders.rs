//! Order repository for database operations.
//!
//! Order submission inserts the order and its line items in a single
//! transaction. A half-written order (parent without items) can never be
//! observed by the dashboard.

use std::collections::HashMap;

use rust_decimal::Decimal;
use sqlx::PgPool;

use ventalink_core::{OrderId, OrderStatus, ProductId, StoreId};

use super::RepositoryError;
use crate::models::{Order, OrderItem, OrderWithItems};

/// Fields for a new order record.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub store_id: StoreId,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub customer_address: Option<String>,
    pub total: Decimal,
}

/// One line of a new order.
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub product_title: String,
    pub quantity: i32,
    pub price: Decimal,
    pub variant_info: Option<String>,
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Persist an order and its line items atomically, returning the new
    /// order's id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any insert fails; the
    /// transaction rolls back and no order record survives.
    pub async fn create(
        &self,
        new: &NewOrder,
        items: &[NewOrderItem],
    ) -> Result<OrderId, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let order_id = sqlx::query_scalar::<_, OrderId>(
            r"
            INSERT INTO orders (store_id, status, customer_name, customer_phone,
                                customer_address, total)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            ",
        )
        .bind(new.store_id)
        .bind(OrderStatus::Pending)
        .bind(&new.customer_name)
        .bind(&new.customer_phone)
        .bind(&new.customer_address)
        .bind(new.total)
        .fetch_one(&mut *tx)
        .await?;

        for item in items {
            sqlx::query(
                r"
                INSERT INTO order_items
                    (order_id, product_id, product_title, quantity, price, variant_info)
                VALUES ($1, $2, $3, $4, $5, $6)
                ",
            )
            .bind(order_id)
            .bind(item.product_id)
            .bind(&item.product_title)
            .bind(item.quantity)
            .bind(item.price)
            .bind(&item.variant_info)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(order_id)
    }

    /// List a store's orders with their items, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any query fails.
    pub async fn list_with_items(
        &self,
        store_id: StoreId,
    ) -> Result<Vec<OrderWithItems>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(
            r"
            SELECT id, store_id, status, customer_name, customer_phone,
                   customer_address, total, created_at
            FROM orders
            WHERE store_id = $1
            ORDER BY created_at DESC
            ",
        )
        .bind(store_id)
        .fetch_all(self.pool)
        .await?;

        let ids: Vec<uuid::Uuid> = orders.iter().map(|o| o.id.as_uuid()).collect();
        let items = sqlx::query_as::<_, OrderItem>(
            r"
            SELECT id, order_id, product_id, product_title, quantity, price, variant_info
            FROM order_items
            WHERE order_id = ANY($1)
            ",
        )
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        let mut by_order: HashMap<OrderId, Vec<OrderItem>> = HashMap::new();
        for item in items {
            by_order.entry(item.order_id).or_default().push(item);
        }

        Ok(orders
            .into_iter()
            .map(|order| {
                let items = by_order.remove(&order.id).unwrap_or_default();
                OrderWithItems { order, items }
            })
            .collect())
    }

    /// Update an order's status, scoped to `store_id`. Returns whether a
    /// row was updated.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update_status(
        &self,
        id: OrderId,
        store_id: StoreId,
        status: OrderStatus,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query("UPDATE orders SET status = $1 WHERE id = $2 AND store_id = $3")
            .bind(status)
            .bind(id)
            .bind(store_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
