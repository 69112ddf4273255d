//! # Validation Module
//!
//! Input validation for line items and cart operations.
//!
//! ## Validate-Then-Mutate
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Cart::add_item("Mouse", 2, "75.00")                                    │
//! │       │                                                                 │
//! │       ├── parse_unit_price("75.00")   → Money or InvalidFormat         │
//! │       ├── (negative?)                 → MustNotBeNegative              │
//! │       ├── validate_quantity(2)        → MustBePositive                 │
//! │       ├── validate_item_name("Mouse") → Required                       │
//! │       │                                                                 │
//! │       └── all OK → only now is the cart touched                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every validator is a pure function; none of them sees the cart.

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::money::{Money, RawAmount};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

pub(crate) const FIELD_NAME: &str = "name";
pub(crate) const FIELD_QUANTITY: &str = "quantity";
pub(crate) const FIELD_QUANTITY_TO_REMOVE: &str = "quantity to remove";
pub(crate) const FIELD_UNIT_PRICE: &str = "unit_price";
pub(crate) const FIELD_EXTENDED_PRICE: &str = "extended_price";
pub(crate) const FIELD_SUBTOTAL: &str = "subtotal";
pub(crate) const FIELD_TOTAL_QUANTITY: &str = "total quantity";

// =============================================================================
// String Validators
// =============================================================================

/// Validates an item name.
///
/// ## Rules
/// - Must not be empty after trimming whitespace
///
/// The name is NOT trimmed for storage: `"Tea"` and `"Tea "` are distinct
/// cart keys.
///
/// ## Example
/// ```rust
/// use cartkit_core::validation::validate_item_name;
///
/// assert!(validate_item_name("Laptop").is_ok());
/// assert!(validate_item_name("").is_err());
/// assert!(validate_item_name("   ").is_err());
/// ```
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    if name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: FIELD_NAME.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity being added (construction or add-to-cart).
///
/// ## Rules
/// - Must be positive (> 0)
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: FIELD_QUANTITY.to_string(),
        });
    }

    Ok(())
}

/// Validates a quantity assigned to an existing line item.
///
/// ## Rules
/// - Must be non-negative (>= 0); zero is the state just before removal
pub fn validate_stored_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: FIELD_QUANTITY.to_string(),
        });
    }

    Ok(())
}

/// Validates an explicitly given removal quantity.
///
/// ## Rules
/// - Must be positive (> 0)
pub fn validate_removal_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: FIELD_QUANTITY_TO_REMOVE.to_string(),
        });
    }

    Ok(())
}

/// Adds two quantities, rejecting overflow instead of wrapping.
pub fn checked_quantity_sum(current: i64, added: i64) -> ValidationResult<i64> {
    current
        .checked_add(added)
        .ok_or_else(|| quantity_out_of_range(FIELD_QUANTITY))
}

/// Adds a line's quantity to the running cart-wide quantity.
///
/// Bounding the cart total here keeps `Cart::total_quantity` from
/// overflowing, even though each line fits on its own.
pub fn checked_total_quantity(running: i64, line: i64) -> ValidationResult<i64> {
    running
        .checked_add(line)
        .ok_or_else(|| quantity_out_of_range(FIELD_TOTAL_QUANTITY))
}

fn quantity_out_of_range(field: &str) -> ValidationError {
    ValidationError::OutOfRange {
        field: field.to_string(),
        min: Decimal::ZERO,
        max: Decimal::from(i64::MAX),
    }
}

// =============================================================================
// Amount Validators
// =============================================================================

/// Coerces a raw amount into a decimal, naming `field` on failure.
pub fn parse_amount(field: &str, raw: &RawAmount) -> ValidationResult<Decimal> {
    raw.to_decimal()
        .ok_or_else(|| ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: format!("'{raw}' is not a decimal number"),
        })
}

/// Parses and validates a unit price.
///
/// ## Rules
/// - Must parse as a decimal number
/// - Must be non-negative (>= 0); zero is allowed (free items)
///
/// ## Example
/// ```rust
/// use cartkit_core::validation::parse_unit_price;
///
/// assert!(parse_unit_price("10.99").is_ok());
/// assert!(parse_unit_price(0).is_ok());
/// assert!(parse_unit_price("-1.00").is_err());
/// assert!(parse_unit_price("abc").is_err());
/// ```
pub fn parse_unit_price(raw: impl Into<RawAmount>) -> ValidationResult<Money> {
    let price = parse_amount(FIELD_UNIT_PRICE, &raw.into())?;

    if price < Decimal::ZERO {
        return Err(ValidationError::MustNotBeNegative {
            field: FIELD_UNIT_PRICE.to_string(),
        });
    }

    Ok(Money::new(price))
}

/// Computes quantity × unit price, rounded half-up, rejecting a product that
/// a `Decimal` cannot hold.
///
/// ## Example
/// ```rust
/// use cartkit_core::validation::{checked_extended_price, parse_unit_price};
///
/// let price = parse_unit_price("0.335").unwrap();
/// assert_eq!(checked_extended_price(price, 3).unwrap().to_string(), "1.01");
///
/// let price = parse_unit_price("100000000000").unwrap();
/// assert!(checked_extended_price(price, i64::MAX).is_err());
/// ```
pub fn checked_extended_price(unit_price: Money, quantity: i64) -> ValidationResult<Money> {
    unit_price
        .checked_times(quantity)
        .map(|price| price.round_half_up())
        .ok_or_else(|| amount_out_of_range(FIELD_EXTENDED_PRICE))
}

/// Adds a line's extended price to a running subtotal, rejecting overflow.
pub fn checked_subtotal(running: Money, line: Money) -> ValidationResult<Money> {
    running
        .checked_add(line)
        .ok_or_else(|| amount_out_of_range(FIELD_SUBTOTAL))
}

fn amount_out_of_range(field: &str) -> ValidationError {
    ValidationError::OutOfRange {
        field: field.to_string(),
        min: Decimal::ZERO,
        max: Decimal::MAX,
    }
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
        assert!(validate_item_name("Maçã").is_ok());
        assert!(validate_item_name(" padded ").is_ok());

        let err = validate_item_name("\t\n").unwrap_err();
        assert_eq!(err.to_string(), "name is required");
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(i64::MAX).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
    }

    #[test]
    fn test_validate_stored_quantity_allows_zero() {
        assert!(validate_stored_quantity(0).is_ok());
        assert!(validate_stored_quantity(3).is_ok());
        assert_eq!(
            validate_stored_quantity(-1).unwrap_err().to_string(),
            "quantity must not be negative"
        );
    }

    #[test]
    fn test_validate_removal_quantity() {
        assert!(validate_removal_quantity(1).is_ok());
        assert_eq!(
            validate_removal_quantity(0).unwrap_err().to_string(),
            "quantity to remove must be positive"
        );
        assert!(validate_removal_quantity(-2).is_err());
    }

    #[test]
    fn test_checked_quantity_sum() {
        assert_eq!(checked_quantity_sum(1, 3), Ok(4));
        assert!(matches!(
            checked_quantity_sum(i64::MAX, 1),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_checked_total_quantity() {
        assert_eq!(checked_total_quantity(2, 5), Ok(7));

        let err = checked_total_quantity(i64::MAX, 1).unwrap_err();
        assert_eq!(err.field(), "total quantity");
        assert!(matches!(err, ValidationError::OutOfRange { .. }));
    }

    #[test]
    fn test_checked_extended_price() {
        let price = Money::new(dec!(0.0333));
        assert_eq!(checked_extended_price(price, 7).unwrap().amount(), dec!(0.23));

        let err = checked_extended_price(Money::new(dec!(100000000000)), i64::MAX).unwrap_err();
        assert_eq!(err.field(), "extended_price");
        assert!(matches!(err, ValidationError::OutOfRange { .. }));
    }

    #[test]
    fn test_checked_subtotal() {
        let line = Money::new(dec!(50000000000000000000000000000));
        assert_eq!(checked_subtotal(Money::zero(), line), Ok(line));

        let err = checked_subtotal(line, line).unwrap_err();
        assert_eq!(err.field(), "subtotal");
    }

    #[test]
    fn test_parse_unit_price() {
        assert_eq!(parse_unit_price("0.50").unwrap().amount(), dec!(0.50));
        assert_eq!(parse_unit_price(dec!(3.00)).unwrap().amount(), dec!(3.00));
        assert_eq!(parse_unit_price(0).unwrap(), Money::zero());

        assert!(matches!(
            parse_unit_price("-1.00"),
            Err(ValidationError::MustNotBeNegative { .. })
        ));
        assert!(matches!(
            parse_unit_price("abc"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            parse_unit_price(f64::NAN),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_parse_unit_price_keeps_precision() {
        let price = parse_unit_price("0.3333").unwrap();
        assert_eq!(price.amount(), dec!(0.3333));
    }
}
