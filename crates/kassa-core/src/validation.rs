//! # Validation Module
//!
//! Input validation for product records, quantities and discount codes.
//!
//! ## Where Validation Runs
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Products.txt line ──► Catalog::parse ──► validate_product_name        │
//! │                                          validate_price                 │
//! │                                                                         │
//! │  Discount.txt line ──► DiscountRegistry::parse ──► validate_discount_code│
//! │                                                                         │
//! │  add / remove      ──► Cart ──► validate_quantity                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use kassa_core::validation::{validate_discount_code, validate_quantity};
//!
//! assert!(validate_discount_code("A1B2").is_ok());
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::{DISCOUNT_CODE_LEN, FIELD_SEPARATOR};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name.
///
/// The name is the cart file key, so it must not be empty after trimming
/// and must not contain the field separator or a line break.
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    if name.trim().is_empty() {
        return Err(ValidationError::required("name"));
    }

    if let Some(c) = name.trim().chars().find(|&c| matches!(c, FIELD_SEPARATOR | '\n' | '\r')) {
        return Err(ValidationError::invalid_format(
            "name",
            format!("must not contain {:?}", c),
        ));
    }

    Ok(())
}

/// Validates a discount code.
///
/// ## Rules
/// - Exactly 4 characters
/// - Positions 0 and 2: uppercase ASCII letter
/// - Positions 1 and 3: ASCII digit
///
/// ## Example
/// ```rust
/// use kassa_core::validation::validate_discount_code;
///
/// assert!(validate_discount_code("A1B2").is_ok());
/// assert!(validate_discount_code("AB1").is_err());
/// assert!(validate_discount_code("a1b2").is_err());
/// ```
pub fn validate_discount_code(code: &str) -> ValidationResult<()> {
    let len = code.chars().count();
    if len != DISCOUNT_CODE_LEN {
        return Err(ValidationError::invalid_format(
            "discount code",
            format!("must be {} characters, got {}", DISCOUNT_CODE_LEN, len),
        ));
    }

    for (i, c) in code.chars().enumerate() {
        let ok = if i % 2 == 0 {
            c.is_ascii_uppercase()
        } else {
            c.is_ascii_digit()
        };

        if !ok {
            let expected = if i % 2 == 0 { "an uppercase letter" } else { "a digit" };
            return Err(ValidationError::invalid_format(
                "discount code",
                format!("character {} must be {}", i + 1, expected),
            ));
        }
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a price: must be strictly positive.
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if !price.is_positive() {
        return Err(ValidationError::must_be_positive("price"));
    }

    Ok(())
}

/// Validates a cart quantity.
///
/// Only positivity is checked. The 1-5 selector range of the shopping
/// screen is enforced by the front end, not here.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::must_be_positive("quantity"));
    }

    Ok(())
}

/// Parses an integer field from a text record.
pub(crate) fn parse_integer(field: &str, raw: &str) -> ValidationResult<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::invalid_format(field, format!("'{}' is not an integer", raw)))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Kycklingklubbor").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name("   ").is_err());
        assert!(validate_product_name("röda äpplen").is_ok());
    }

    #[test]
    fn test_validate_product_name_rejects_separators() {
        for name in ["te:grön", "mjölk\nbröd", "o\rst"] {
            assert!(
                matches!(
                    validate_product_name(name),
                    Err(ValidationError::InvalidFormat { .. })
                ),
                "{:?}",
                name
            );
        }
    }

    #[test]
    fn test_validate_discount_code() {
        assert!(validate_discount_code("A1B2").is_ok());
        assert!(validate_discount_code("Z9Z9").is_ok());

        assert!(validate_discount_code("").is_err());
        assert!(validate_discount_code("AB1").is_err());
        assert!(validate_discount_code("A1B2C").is_err());
        assert!(validate_discount_code("a1b2").is_err());
        assert!(validate_discount_code("1A2B").is_err());
        assert!(validate_discount_code("AABB").is_err());
        assert!(validate_discount_code("11B2").is_err());
        assert!(validate_discount_code("Å1B2").is_err());
    }

    #[test]
    fn test_validate_discount_code_reason() {
        let err = validate_discount_code("A1b2").unwrap_err();
        assert_eq!(
            err.to_string(),
            "discount code has invalid format: character 3 must be an uppercase letter"
        );
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(Money::from_kronor(1)).is_ok());
        assert!(validate_price(Money::zero()).is_err());
        assert!(validate_price(Money::from_kronor(-5)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(5).is_ok());
        assert!(validate_quantity(1_000).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_integer("price", "20"), Ok(20));
        assert_eq!(parse_integer("price", " 20 "), Ok(20));
        assert!(parse_integer("price", "tjugo").is_err());
        assert!(parse_integer("price", "").is_err());
        assert!(parse_integer("price", "2.5").is_err());
    }
}
