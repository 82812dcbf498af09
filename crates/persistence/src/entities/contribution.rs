//! Contribution entity (database row mapping).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the contributions table.
#[derive(Debug, Clone, FromRow)]
pub struct ContributionEntity {
    pub id: Uuid,
    pub item_id: Uuid,
    pub contributor_name: String,
    pub contributor_email: Option<String>,
    pub amount: Decimal,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<ContributionEntity> for domain::models::Contribution {
    fn from(entity: ContributionEntity) -> Self {
        Self {
            id: entity.id,
            item_id: entity.item_id,
            contributor_name: entity.contributor_name,
            contributor_email: entity.contributor_email,
            amount: entity.amount,
            message: entity.message,
            created_at: entity.created_at,
        }
    }
}
