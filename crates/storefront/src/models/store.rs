//! Store models.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use ventalink_core::{StoreId, UserId};

/// A merchant's store, one per owner.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Store {
    pub id: StoreId,
    pub owner_id: UserId,
    /// URL identifier, e.g. `pizzas-juan`.
    pub slug: String,
    pub name: String,
    /// WhatsApp contact number, free-form; normalized at link time.
    pub phone: String,
    pub primary_color: String,
    pub logo_url: Option<String>,
    pub is_active: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Store {
    /// Whether the storefront page should be publicly reachable.
    #[must_use]
    pub const fn is_published(&self) -> bool {
        self.is_active && self.deleted_at.is_none()
    }
}

/// Store fields exposed on the public storefront payload.
#[derive(Debug, Clone, Serialize)]
pub struct PublicStore {
    pub id: StoreId,
    pub slug: String,
    pub name: String,
    pub phone: String,
    pub primary_color: String,
    pub logo_url: Option<String>,
}

impl From<Store> for PublicStore {
    fn from(store: Store) -> Self {
        Self {
            id: store.id,
            slug: store.slug,
            name: store.name,
            phone: store.phone,
            primary_color: store.primary_color,
            logo_url: store.logo_url,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn store(is_active: bool, deleted: bool) -> Store {
        Store {
            id: StoreId::generate(),
            owner_id: UserId::generate(),
            slug: "pizzas-juan".to_owned(),
            name: "Pizzas Juan".to_owned(),
            phone: "12345678".to_owned(),
            primary_color: "#FF0000".to_owned(),
            logo_url: None,
            is_active,
            deleted_at: deleted.then(Utc::now),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_is_published() {
        assert!(store(true, false).is_published());
        assert!(!store(false, false).is_published());
        assert!(!store(true, true).is_published());
    }

    #[test]
    fn test_public_store_hides_owner() {
        let json = serde_json::to_value(PublicStore::from(store(true, false))).unwrap();
        assert!(json.get("owner_id").is_none());
        assert_eq!(json["slug"], "pizzas-juan");
    }
}
