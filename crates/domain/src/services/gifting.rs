//! Reservation/contribution state machine.
//!
//! Pure validation of the transitions a guest or owner may perform on an
//! item. The persistence layer runs these checks inside a row-locked
//! transaction so that concurrent mutations on the same item serialize
//! and the funding invariant holds after every commit.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{Item, Wishlist};
use crate::services::funding;

/// Failure modes of the gifting state machine.
///
/// All variants are request-scoped and recoverable; the API layer maps
/// them onto HTTP status categories.
#[derive(Debug, Error)]
pub enum GiftingError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Wishlist is private")]
    Forbidden,

    #[error("Item is already reserved")]
    AlreadyReserved,

    #[error("{0}")]
    InvalidState(&'static str),

    #[error("Contribution would exceed item price. Remaining: {remaining}")]
    ExceedsLimit { remaining: Decimal },

    #[error("Cannot delete item with {count} contributions totaling {total}. Handle contributions first.")]
    Blocked { count: i64, total: Decimal },

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// A guest may reserve only an available non-pooling item on a public
/// wishlist.
pub fn ensure_reservable(item: &Item, wishlist: &Wishlist) -> Result<(), GiftingError> {
    if !wishlist.is_public {
        return Err(GiftingError::Forbidden);
    }
    if item.pooling_enabled {
        return Err(GiftingError::InvalidState(
            "This item is for pooled contributions, not single reservations",
        ));
    }
    if item.reserved {
        return Err(GiftingError::AlreadyReserved);
    }
    Ok(())
}

/// A guest may contribute only to a priced, pooling-enabled item on a
/// public wishlist. Returns the price on success.
pub fn ensure_contributable(item: &Item, wishlist: &Wishlist) -> Result<Decimal, GiftingError> {
    if !wishlist.is_public {
        return Err(GiftingError::Forbidden);
    }
    if !item.pooling_enabled {
        return Err(GiftingError::InvalidState(
            "This item is not set up for pooled contributions",
        ));
    }
    item.price
        .ok_or(GiftingError::InvalidState("Item price is not set"))
}

/// Rejects a contribution that would push the pooled total past the
/// price. Reaching the price exactly is allowed.
pub fn ensure_within_price(
    price: Decimal,
    total: Decimal,
    amount: Decimal,
) -> Result<(), GiftingError> {
    if funding::would_exceed(price, total, amount) {
        return Err(GiftingError::ExceedsLimit {
            remaining: price - total,
        });
    }
    Ok(())
}

/// An item carrying pooled funds cannot be deleted until the funds are
/// reconciled out of band.
pub fn ensure_deletable(contribution_count: i64, total: Decimal) -> Result<(), GiftingError> {
    if contribution_count > 0 && total > Decimal::ZERO {
        return Err(GiftingError::Blocked {
            count: contribution_count,
            total,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn wishlist(is_public: bool) -> Wishlist {
        Wishlist {
            id: Uuid::new_v4(),
            title: "Birthday".to_string(),
            description: None,
            slug: "abc123".to_string(),
            is_public,
            event_date: None,
            owner_id: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn item(pooling: bool, reserved: bool, price: Option<Decimal>) -> Item {
        Item {
            id: Uuid::new_v4(),
            title: "Camera".to_string(),
            description: None,
            url: None,
            image_url: None,
            price,
            currency: "USD".to_string(),
            priority: 0,
            reserved,
            pooling_enabled: pooling,
            wishlist_id: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn test_reserve_available_item() {
        let result = ensure_reservable(&item(false, false, None), &wishlist(true));
        assert!(result.is_ok());
    }

    #[test]
    fn test_reserve_already_reserved_conflicts() {
        let result = ensure_reservable(&item(false, true, None), &wishlist(true));
        assert!(matches!(result, Err(GiftingError::AlreadyReserved)));
    }

    #[test]
    fn test_reserve_pooling_item_is_invalid_state() {
        let result = ensure_reservable(&item(true, false, Some(dec!(10))), &wishlist(true));
        assert!(matches!(result, Err(GiftingError::InvalidState(_))));
    }

    #[test]
    fn test_reserve_on_private_wishlist_forbidden() {
        let result = ensure_reservable(&item(false, false, None), &wishlist(false));
        assert!(matches!(result, Err(GiftingError::Forbidden)));
    }

    #[test]
    fn test_contribute_requires_pooling() {
        let result = ensure_contributable(&item(false, false, Some(dec!(10))), &wishlist(true));
        assert!(matches!(result, Err(GiftingError::InvalidState(_))));
    }

    #[test]
    fn test_contribute_requires_price() {
        let result = ensure_contributable(&item(true, false, None), &wishlist(true));
        assert!(matches!(result, Err(GiftingError::InvalidState(_))));
    }

    #[test]
    fn test_contribute_on_private_wishlist_forbidden() {
        let result = ensure_contributable(&item(true, false, Some(dec!(10))), &wishlist(false));
        assert!(matches!(result, Err(GiftingError::Forbidden)));
    }

    #[test]
    fn test_contribute_returns_price() {
        let price = ensure_contributable(&item(true, false, Some(dec!(99.90))), &wishlist(true));
        assert_eq!(price.unwrap(), dec!(99.90));
    }

    #[test]
    fn test_exceeds_limit_reports_remaining() {
        let result = ensure_within_price(dec!(50), dec!(20), dec!(31));
        match result {
            Err(GiftingError::ExceedsLimit { remaining }) => assert_eq!(remaining, dec!(30)),
            other => panic!("Expected ExceedsLimit, got {:?}", other),
        }
    }

    #[test]
    fn test_exact_funding_is_allowed() {
        assert!(ensure_within_price(dec!(50), dec!(20), dec!(30)).is_ok());
    }

    #[test]
    fn test_delete_blocked_by_pooled_funds() {
        let result = ensure_deletable(3, dec!(45));
        assert!(matches!(result, Err(GiftingError::Blocked { count: 3, .. })));
    }

    #[test]
    fn test_delete_allowed_without_funds() {
        assert!(ensure_deletable(0, Decimal::ZERO).is_ok());
    }
}
