//! # Validation Module
//!
//! Input validation for operator-supplied sale-time data.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                              │
//! │                                                                     │
//! │  Layer 1: Pricing calculator / settlement coordinator               │
//! │  └── THIS MODULE: business rule validation, before any store call   │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 2: Database (SQLite)                                         │
//! │  └── NOT NULL / CHECK / foreign key constraints                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A validation failure is always reported synchronously and never leaves
//! partial state behind.

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::Dimensions;
use crate::MAX_LINE_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates an operator-supplied item name (variable/ad-hoc lines).
///
/// Returns the trimmed name.
///
/// ```rust
/// use marlin_core::validation::validate_item_name;
///
/// assert_eq!(validate_item_name("  Banner repair ").unwrap(), "Banner repair");
/// assert!(validate_item_name("   ").is_err());
/// ```
pub fn validate_item_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(name.to_string())
}

/// Validates an operator-entered customer name (walk-in creation).
///
/// Returns the trimmed name.
pub fn validate_customer_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "customer name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "customer name".to_string(),
            max: 200,
        });
    }

    Ok(name.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Parses an operator-entered price into Money.
///
/// ## Rules
/// - Must parse as a decimal number — absence or garbage is a failure,
///   never a silent zero
/// - Must be non-negative (zero is allowed: free lines exist)
///
/// ```rust
/// use marlin_core::validation::validate_operator_price;
///
/// assert!(validate_operator_price("10.99").is_ok());
/// assert!(validate_operator_price("0").is_ok());
/// assert!(validate_operator_price("-1").is_err());
/// assert!(validate_operator_price("abc").is_err());
/// ```
pub fn validate_operator_price(raw: &str) -> ValidationResult<Money> {
    let raw = raw.trim();

    let amount: Decimal = raw.parse().map_err(|_| ValidationError::NotANumber {
        field: "price".to_string(),
        value: raw.to_string(),
    })?;

    if amount < Decimal::ZERO {
        return Err(ValidationError::NegativeAmount {
            field: "price".to_string(),
        });
    }

    Ok(Money::new(amount))
}

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_LINE_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::TooLong {
            field: "quantity".to_string(),
            max: MAX_LINE_QUANTITY as usize,
        });
    }

    Ok(())
}

/// Validates that both sides of a dimension pair are strictly positive.
///
/// `label` distinguishes main dimensions from wasted-material dimensions in
/// the reported field name. Note: *absent* waste is valid (waste disabled);
/// waste that is present with a zero side is not.
pub fn validate_dimensions(dims: &Dimensions, label: &str) -> ValidationResult<()> {
    if dims.width <= Decimal::ZERO {
        return Err(ValidationError::MustBePositive {
            field: format!("{label} width"),
        });
    }

    if dims.height <= Decimal::ZERO {
        return Err(ValidationError::MustBePositive {
            field: format!("{label} height"),
        });
    }

    Ok(())
}

/// Validates a payment amount (collections, down payments already recorded).
///
/// ## Rules
/// - Must be strictly positive; zero-amount payment records never exist
pub fn validate_payment_amount(amount: &Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "payment amount".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_validate_item_name() {
        assert_eq!(validate_item_name(" Vinyl cut ").unwrap(), "Vinyl cut");
        assert!(validate_item_name("").is_err());
        assert!(validate_item_name("   ").is_err());
        assert!(validate_item_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_operator_price() {
        assert_eq!(
            validate_operator_price(" 10.5 ").unwrap(),
            Money::new(dec!(10.5))
        );
        assert_eq!(validate_operator_price("0").unwrap(), Money::zero());
        assert!(validate_operator_price("").is_err());
        assert!(validate_operator_price("ten").is_err());
        assert!(validate_operator_price("-0.01").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-3).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_dimensions() {
        let ok = Dimensions::new(dec!(2), dec!(3));
        assert!(validate_dimensions(&ok, "main").is_ok());

        let zero_width = Dimensions::new(dec!(0), dec!(3));
        let err = validate_dimensions(&zero_width, "wasted").unwrap_err();
        assert_eq!(err.to_string(), "wasted width must be positive");

        let negative_height = Dimensions::new(dec!(2), dec!(-1));
        assert!(validate_dimensions(&negative_height, "main").is_err());
    }

    #[test]
    fn test_validate_payment_amount() {
        assert!(validate_payment_amount(&Money::new(dec!(0.01))).is_ok());
        assert!(validate_payment_amount(&Money::zero()).is_err());
        assert!(validate_payment_amount(&Money::new(dec!(-5))).is_err());
    }
}
