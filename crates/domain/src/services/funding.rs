//! Pure funding engine for pooled contributions.
//!
//! No side effects beyond reading passed-in data. The aggregate keeps a
//! three-way distinction that serialization depends on:
//! - non-pooling item: not applicable (`None`)
//! - pooling item, no contributions yet: `Some(0)`
//! - pooling item with contributions: `Some(sum)`

use rust_decimal::Decimal;

use crate::models::{Contribution, Item};

/// Sum of contribution amounts for a pooling item, `None` for a
/// non-pooling item.
pub fn total_contributed(item: &Item, contributions: &[Contribution]) -> Option<Decimal> {
    if !item.pooling_enabled {
        return None;
    }
    Some(contributions.iter().map(|c| c.amount).sum())
}

/// Amount still missing until the item is fully funded. Defined only when
/// the item is pooling-enabled and has a price.
pub fn remaining(item: &Item, contributions: &[Contribution]) -> Option<Decimal> {
    let price = item.price?;
    let total = total_contributed(item, contributions)?;
    Some(price - total)
}

/// True iff adding `amount` to the current total would exceed the price.
/// Equality is allowed — reaching the price exactly completes the funding.
pub fn would_exceed(price: Decimal, total: Decimal, amount: Decimal) -> bool {
    total + amount > price
}

/// True iff the pooled total has reached the item price.
pub fn is_fully_funded(price: Decimal, total: Decimal) -> bool {
    total >= price
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn item(pooling: bool, price: Option<Decimal>) -> Item {
        Item {
            id: Uuid::new_v4(),
            title: "Telescope".to_string(),
            description: None,
            url: None,
            image_url: None,
            price,
            currency: "EUR".to_string(),
            priority: 0,
            reserved: false,
            pooling_enabled: pooling,
            wishlist_id: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn contribution(item_id: Uuid, amount: Decimal) -> Contribution {
        Contribution {
            id: Uuid::new_v4(),
            item_id,
            contributor_name: "Guest".to_string(),
            contributor_email: None,
            amount,
            message: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_total_is_not_applicable_for_non_pooling() {
        let item = item(false, Some(dec!(50)));
        assert_eq!(total_contributed(&item, &[]), None);
    }

    #[test]
    fn test_total_is_zero_for_pooling_without_contributions() {
        let item = item(true, Some(dec!(50)));
        assert_eq!(total_contributed(&item, &[]), Some(Decimal::ZERO));
    }

    #[test]
    fn test_total_sums_contributions() {
        let item = item(true, Some(dec!(50)));
        let contributions = vec![
            contribution(item.id, dec!(20)),
            contribution(item.id, dec!(10.50)),
        ];
        assert_eq!(total_contributed(&item, &contributions), Some(dec!(30.50)));
    }

    #[test]
    fn test_remaining() {
        let item = item(true, Some(dec!(50)));
        let contributions = vec![contribution(item.id, dec!(20))];
        assert_eq!(remaining(&item, &contributions), Some(dec!(30)));
    }

    #[test]
    fn test_remaining_undefined_without_price() {
        let item = item(true, None);
        assert_eq!(remaining(&item, &[]), None);
    }

    #[test]
    fn test_remaining_undefined_for_non_pooling() {
        let item = item(false, Some(dec!(50)));
        assert_eq!(remaining(&item, &[]), None);
    }

    #[test]
    fn test_would_exceed_is_strict() {
        // Equality completes the funding, it never rejects.
        assert!(!would_exceed(dec!(50), dec!(20), dec!(30)));
        assert!(would_exceed(dec!(50), dec!(20), dec!(31)));
        assert!(!would_exceed(dec!(50), Decimal::ZERO, dec!(50)));
        assert!(would_exceed(dec!(50), dec!(50), dec!(0.01)));
    }

    #[test]
    fn test_is_fully_funded() {
        assert!(is_fully_funded(dec!(50), dec!(50)));
        assert!(is_fully_funded(dec!(50), dec!(60)));
        assert!(!is_fully_funded(dec!(50), dec!(49.99)));
    }

    #[test]
    fn test_funding_scenario() {
        // price=50, contribute 20 (ok), 31 (would exceed, remaining 30),
        // then 30 (ok, fully funded).
        let item = item(true, Some(dec!(50.00)));
        let price = item.price.unwrap();

        let mut contributions = Vec::new();
        assert!(!would_exceed(
            price,
            total_contributed(&item, &contributions).unwrap(),
            dec!(20)
        ));
        contributions.push(contribution(item.id, dec!(20)));

        let total = total_contributed(&item, &contributions).unwrap();
        assert!(would_exceed(price, total, dec!(31)));
        assert_eq!(remaining(&item, &contributions), Some(dec!(30)));

        assert!(!would_exceed(price, total, dec!(30)));
        contributions.push(contribution(item.id, dec!(30)));

        let total = total_contributed(&item, &contributions).unwrap();
        assert_eq!(total, dec!(50));
        assert!(is_fully_funded(price, total));
    }
}
