//! Reservation entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the reservations table.
#[derive(Debug, Clone, FromRow)]
pub struct ReservationEntity {
    pub id: Uuid,
    pub item_id: Uuid,
    pub reserver_name: String,
    pub reserver_email: Option<String>,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<ReservationEntity> for domain::models::Reservation {
    fn from(entity: ReservationEntity) -> Self {
        Self {
            id: entity.id,
            item_id: entity.item_id,
            reserver_name: entity.reserver_name,
            reserver_email: entity.reserver_email,
            message: entity.message,
            created_at: entity.created_at,
        }
    }
}
