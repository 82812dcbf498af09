//! Reservation domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single-claimant lock on a non-pooling item.
///
/// Reservations appear only in the guest-facing projection; the wishlist
/// owner never sees them. The optional email serves solely as the
/// cancellation credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: Uuid,
    pub item_id: Uuid,
    pub reserver_name: String,
    pub reserver_email: Option<String>,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}
