//! Wishlist item entity (database row mapping).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the wishlist_items table.
///
/// `reserved` is the denormalized cache of the reservation/contribution
/// state; the repositories recompute it inside the same transaction as
/// every mutation.
#[derive(Debug, Clone, FromRow)]
pub struct ItemEntity {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub url: Option<String>,
    pub image_url: Option<String>,
    pub price: Option<Decimal>,
    pub currency: String,
    pub priority: i16,
    pub reserved: bool,
    pub pooling_enabled: bool,
    pub wishlist_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<ItemEntity> for domain::models::Item {
    fn from(entity: ItemEntity) -> Self {
        Self {
            id: entity.id,
            title: entity.title,
            description: entity.description,
            url: entity.url,
            image_url: entity.image_url,
            price: entity.price,
            currency: entity.currency,
            priority: entity.priority,
            reserved: entity.reserved,
            pooling_enabled: entity.pooling_enabled,
            wishlist_id: entity.wishlist_id,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
