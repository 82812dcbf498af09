//! Common validation logic for request payloads.

use rust_decimal::Decimal;
use validator::ValidationError;

/// Maximum length for guest display names and item titles.
pub const MAX_NAME_LENGTH: usize = 200;

/// Maximum length for free-text messages and descriptions.
pub const MAX_MESSAGE_LENGTH: usize = 2000;

/// Validates an ISO 4217-style currency code: exactly three ASCII uppercase
/// letters.
pub fn validate_currency_code(code: &str) -> Result<(), ValidationError> {
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_uppercase()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("currency_code");
        err.message = Some("Currency must be a three-letter uppercase code".into());
        Err(err)
    }
}

/// Validates that a monetary amount is strictly positive.
pub fn validate_positive_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if amount > &Decimal::ZERO {
        Ok(())
    } else {
        let mut err = ValidationError::new("positive_amount");
        err.message = Some("Amount must be greater than zero".into());
        Err(err)
    }
}

/// Validates an item priority value (0 = low, 1 = medium, 2 = high).
pub fn validate_priority(priority: i16) -> Result<(), ValidationError> {
    if (0..=2).contains(&priority) {
        Ok(())
    } else {
        let mut err = ValidationError::new("priority");
        err.message = Some("Priority must be 0, 1 or 2".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_valid_currency_codes() {
        assert!(validate_currency_code("USD").is_ok());
        assert!(validate_currency_code("EUR").is_ok());
        assert!(validate_currency_code("RUB").is_ok());
    }

    #[test]
    fn test_invalid_currency_codes() {
        assert!(validate_currency_code("usd").is_err());
        assert!(validate_currency_code("US").is_err());
        assert!(validate_currency_code("DOLLARS").is_err());
        assert!(validate_currency_code("U$D").is_err());
        assert!(validate_currency_code("").is_err());
    }

    #[test]
    fn test_positive_amount() {
        assert!(validate_positive_amount(&dec!(0.01)).is_ok());
        assert!(validate_positive_amount(&dec!(100)).is_ok());
        assert!(validate_positive_amount(&Decimal::ZERO).is_err());
        assert!(validate_positive_amount(&dec!(-5)).is_err());
    }

    #[test]
    fn test_priority_range() {
        assert!(validate_priority(0).is_ok());
        assert!(validate_priority(2).is_ok());
        assert!(validate_priority(3).is_err());
        assert!(validate_priority(-1).is_err());
    }
}
