//! Contribution domain model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One guest's monetary pledge toward a pooling-enabled item.
///
/// Like reservations, contributions are visible to guests but withheld
/// from the owner-facing projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contribution {
    pub id: Uuid,
    pub item_id: Uuid,
    pub contributor_name: String,
    pub contributor_email: Option<String>,
    pub amount: Decimal,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}
