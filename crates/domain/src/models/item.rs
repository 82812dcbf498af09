//! Wishlist item domain model and its owner/guest projections.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::contribution::Contribution;
use super::reservation::Reservation;

/// A desired gift entry, optionally priced, optionally pooling-enabled.
///
/// `reserved` is a cached projection of the authoritative reservation and
/// contribution rows. It is recomputed transactionally on every mutating
/// operation and never settable by guests directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub url: Option<String>,
    pub image_url: Option<String>,
    pub price: Option<Decimal>,
    pub currency: String,
    /// 0 = low, 1 = medium, 2 = high.
    pub priority: i16,
    pub reserved: bool,
    pub pooling_enabled: bool,
    pub wishlist_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Owner-facing item projection.
///
/// The owner sees the aggregate reserved/funded state but never the
/// claimant identities. `totalContributed` is omitted entirely for
/// non-pooling items, `0` for a pooling item nobody has funded yet —
/// consumers branch on its presence.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerItemView {
    #[serde(flatten)]
    pub item: Item,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_contributed: Option<Decimal>,
}

/// Guest-facing item projection with the full reservation and
/// contribution lists.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestItemView {
    #[serde(flatten)]
    pub item: Item,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_contributed: Option<Decimal>,
    pub reservations: Vec<Reservation>,
    pub contributions: Vec<Contribution>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_item(pooling: bool) -> Item {
        Item {
            id: Uuid::new_v4(),
            title: "Lego set".to_string(),
            description: None,
            url: None,
            image_url: None,
            price: Some(dec!(50.00)),
            currency: "EUR".to_string(),
            priority: 1,
            reserved: false,
            pooling_enabled: pooling,
            wishlist_id: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn test_owner_view_omits_total_for_non_pooling() {
        let view = OwnerItemView {
            item: sample_item(false),
            total_contributed: None,
        };
        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("totalContributed").is_none());
    }

    #[test]
    fn test_owner_view_keeps_zero_total_for_pooling() {
        let view = OwnerItemView {
            item: sample_item(true),
            total_contributed: Some(Decimal::ZERO),
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["totalContributed"], serde_json::json!(0.0));
    }

    #[test]
    fn test_owner_view_has_no_reservation_fields() {
        let view = OwnerItemView {
            item: sample_item(false),
            total_contributed: None,
        };
        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("reservations").is_none());
        assert!(json.get("contributions").is_none());
    }
}
