//! Wishlist domain models and owner/guest projections.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::item::{GuestItemView, OwnerItemView};

/// A named, shareable collection of items owned by one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wishlist {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    /// URL-safe token used in the public share link.
    pub slug: String,
    pub is_public: bool,
    pub event_date: Option<DateTime<Utc>>,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Owner-facing projection. Items carry only aggregate funding state;
/// reservation and contribution details are withheld to keep the surprise.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerWishlistView {
    #[serde(flatten)]
    pub wishlist: Wishlist,
    pub items: Vec<OwnerItemView>,
}

/// Guest-facing projection of a public wishlist. Guests see the full
/// reservation and contribution lists, but not the owner-only fields.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestWishlistView {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub slug: String,
    pub event_date: Option<DateTime<Utc>>,
    pub items: Vec<GuestItemView>,
    pub created_at: DateTime<Utc>,
}

impl GuestWishlistView {
    pub fn new(wishlist: Wishlist, items: Vec<GuestItemView>) -> Self {
        Self {
            id: wishlist.id,
            title: wishlist.title,
            description: wishlist.description,
            slug: wishlist.slug,
            event_date: wishlist.event_date,
            items,
            created_at: wishlist.created_at,
        }
    }
}
