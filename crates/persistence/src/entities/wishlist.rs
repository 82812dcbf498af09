//! Wishlist entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the wishlists table.
#[derive(Debug, Clone, FromRow)]
pub struct WishlistEntity {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub slug: String,
    pub is_public: bool,
    pub event_date: Option<DateTime<Utc>>,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<WishlistEntity> for domain::models::Wishlist {
    fn from(entity: WishlistEntity) -> Self {
        Self {
            id: entity.id,
            title: entity.title,
            description: entity.description,
            slug: entity.slug,
            is_public: entity.is_public,
            event_date: entity.event_date,
            owner_id: entity.owner_id,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
