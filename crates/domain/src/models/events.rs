//! Realtime event contract pushed to wishlist subscribers.
//!
//! Events are JSON objects discriminated by a `type` field, carrying the
//! wishlist and item identity plus a per-type `data` payload. Contact
//! identifiers (emails) are never part of any payload — broadcast
//! recipients are subject to the same surprise-hiding rule as the owner
//! view.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An event broadcast to every live subscriber of a wishlist channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WishlistEvent {
    /// A guest reserved a non-pooling item.
    #[serde(rename_all = "camelCase")]
    Reservation {
        wishlist_id: Uuid,
        item_id: Uuid,
        data: ReservationData,
    },
    /// A reservation was cancelled; `reserved` reflects the recomputed state.
    #[serde(rename_all = "camelCase")]
    ReservationCancelled {
        wishlist_id: Uuid,
        item_id: Uuid,
        data: ReservationCancelledData,
    },
    /// A guest contributed toward a pooling item.
    #[serde(rename_all = "camelCase")]
    Contribution {
        wishlist_id: Uuid,
        item_id: Uuid,
        data: ContributionData,
    },
    /// The owner deleted an item.
    #[serde(rename_all = "camelCase")]
    ItemDeleted { wishlist_id: Uuid, item_id: Uuid },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationData {
    pub reserved: bool,
    pub reserver_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationCancelledData {
    pub reserved: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionData {
    pub contributor_name: String,
    pub amount: Decimal,
    pub total_contributed: Decimal,
    pub reserved: bool,
}

impl WishlistEvent {
    pub fn reservation(wishlist_id: Uuid, item_id: Uuid, reserver_name: String) -> Self {
        Self::Reservation {
            wishlist_id,
            item_id,
            data: ReservationData {
                reserved: true,
                reserver_name,
            },
        }
    }

    pub fn reservation_cancelled(wishlist_id: Uuid, item_id: Uuid, reserved: bool) -> Self {
        Self::ReservationCancelled {
            wishlist_id,
            item_id,
            data: ReservationCancelledData { reserved },
        }
    }

    pub fn contribution(
        wishlist_id: Uuid,
        item_id: Uuid,
        contributor_name: String,
        amount: Decimal,
        total_contributed: Decimal,
        reserved: bool,
    ) -> Self {
        Self::Contribution {
            wishlist_id,
            item_id,
            data: ContributionData {
                contributor_name,
                amount,
                total_contributed,
                reserved,
            },
        }
    }

    pub fn item_deleted(wishlist_id: Uuid, item_id: Uuid) -> Self {
        Self::ItemDeleted {
            wishlist_id,
            item_id,
        }
    }

    /// The wishlist channel this event belongs to.
    pub fn wishlist_id(&self) -> Uuid {
        match self {
            Self::Reservation { wishlist_id, .. }
            | Self::ReservationCancelled { wishlist_id, .. }
            | Self::Contribution { wishlist_id, .. }
            | Self::ItemDeleted { wishlist_id, .. } => *wishlist_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_reservation_event_shape() {
        let wishlist_id = Uuid::new_v4();
        let item_id = Uuid::new_v4();
        let event = WishlistEvent::reservation(wishlist_id, item_id, "Alice".to_string());

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "reservation");
        assert_eq!(json["wishlistId"], wishlist_id.to_string());
        assert_eq!(json["itemId"], item_id.to_string());
        assert_eq!(json["data"]["reserved"], true);
        assert_eq!(json["data"]["reserverName"], "Alice");
    }

    #[test]
    fn test_contribution_event_shape() {
        let event = WishlistEvent::contribution(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "Bob".to_string(),
            dec!(20),
            dec!(35.50),
            false,
        );

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "contribution");
        assert_eq!(json["data"]["contributorName"], "Bob");
        assert_eq!(json["data"]["amount"], serde_json::json!(20.0));
        assert_eq!(json["data"]["totalContributed"], serde_json::json!(35.5));
        assert_eq!(json["data"]["reserved"], false);
    }

    #[test]
    fn test_events_never_carry_emails() {
        let event = WishlistEvent::reservation(Uuid::new_v4(), Uuid::new_v4(), "Alice".to_string());
        let json = serde_json::to_string(&event).unwrap();
        assert!(!json.contains("email"));
        assert!(!json.contains("Email"));
    }

    #[test]
    fn test_item_deleted_event_shape() {
        let wishlist_id = Uuid::new_v4();
        let item_id = Uuid::new_v4();
        let event = WishlistEvent::item_deleted(wishlist_id, item_id);

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "item_deleted");
        assert_eq!(json["wishlistId"], wishlist_id.to_string());
        assert_eq!(json["itemId"], item_id.to_string());
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_event_roundtrip() {
        let event =
            WishlistEvent::reservation_cancelled(Uuid::new_v4(), Uuid::new_v4(), false);
        let json = serde_json::to_string(&event).unwrap();
        let back: WishlistEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, back);
    }
}
