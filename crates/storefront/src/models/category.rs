//! Category model.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use ventalink_core::{CategoryId, StoreId};

/// A catalog section within a store.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Category {
    pub id: CategoryId,
    pub store_id: StoreId,
    pub name: String,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}
