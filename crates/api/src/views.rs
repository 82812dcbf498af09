//! Assembly of owner- and guest-facing item projections.
//!
//! The owner view hides reservation and contribution identities entirely;
//! the guest view exposes them. Both carry `totalContributed` with the
//! three-way semantics: absent for non-pooling items, zero for a pooling
//! item nobody has funded yet, the sum otherwise.

use rust_decimal::Decimal;

use domain::models::{Contribution, GuestItemView, Item, OwnerItemView, Reservation};

fn effective_total(item: &Item, summed: Option<Decimal>) -> Option<Decimal> {
    if item.pooling_enabled {
        Some(summed.unwrap_or(Decimal::ZERO))
    } else {
        None
    }
}

/// Owner projection: aggregate funding state only.
pub fn owner_item_view(item: Item, summed: Option<Decimal>) -> OwnerItemView {
    let total_contributed = effective_total(&item, summed);
    OwnerItemView {
        item,
        total_contributed,
    }
}

/// Guest projection: full reservation and contribution lists.
pub fn guest_item_view(
    item: Item,
    summed: Option<Decimal>,
    reservations: Vec<Reservation>,
    contributions: Vec<Contribution>,
) -> GuestItemView {
    let total_contributed = effective_total(&item, summed);
    GuestItemView {
        item,
        total_contributed,
        reservations,
        contributions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn item(pooling: bool) -> Item {
        Item {
            id: Uuid::new_v4(),
            title: "Headphones".to_string(),
            description: None,
            url: None,
            image_url: None,
            price: Some(dec!(100)),
            currency: "USD".to_string(),
            priority: 0,
            reserved: false,
            pooling_enabled: pooling,
            wishlist_id: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn test_non_pooling_total_is_absent() {
        let view = owner_item_view(item(false), Some(dec!(40)));
        assert_eq!(view.total_contributed, None);
    }

    #[test]
    fn test_pooling_without_contributions_is_zero() {
        let view = owner_item_view(item(true), None);
        assert_eq!(view.total_contributed, Some(Decimal::ZERO));
    }

    #[test]
    fn test_pooling_with_contributions_is_sum() {
        let view = owner_item_view(item(true), Some(dec!(40)));
        assert_eq!(view.total_contributed, Some(dec!(40)));
    }
}
