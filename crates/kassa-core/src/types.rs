//! # Domain Types
//!
//! Core domain types used throughout Kassa.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │   PriceUnit     │   │  ShoppingMode   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  name (unique)  │   │  Liter    "l"   │   │  Shopping       │       │
//! │  │  description    │   │  Kilogram "kg"  │   │  CheckingOut    │       │
//! │  │  price (> 0)    │   │  Unit     "st"  │   │                 │       │
//! │  │  unit           │   └─────────────────┘   └─────────────────┘       │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A product's name is its identity: the cart, the receipt and the catalog
//! file all refer to products by name.

use serde::Serialize;
use std::fmt;

use crate::error::ValidationError;
use crate::money::Money;
use crate::validation::{validate_price, validate_product_name, ValidationResult};
use crate::MISSING_DESCRIPTION;

// =============================================================================
// Price Unit
// =============================================================================

/// What one unit of a product's price buys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum PriceUnit {
    #[serde(rename = "l")]
    Liter,
    #[serde(rename = "kg")]
    Kilogram,
    /// Per piece ("styck").
    #[default]
    #[serde(rename = "st")]
    Unit,
}

impl PriceUnit {
    /// Parses a unit from a catalog record.
    ///
    /// Matching is case-insensitive. Unrecognized strings fall back to
    /// [`PriceUnit::Unit`] instead of failing.
    ///
    /// ## Example
    /// ```rust
    /// use kassa_core::PriceUnit;
    ///
    /// assert_eq!(PriceUnit::parse_lenient("KG"), PriceUnit::Kilogram);
    /// assert_eq!(PriceUnit::parse_lenient("påse"), PriceUnit::Unit);
    /// ```
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "l" => PriceUnit::Liter,
            "kg" => PriceUnit::Kilogram,
            _ => PriceUnit::Unit,
        }
    }

    /// Short label printed on receipts.
    pub const fn as_str(&self) -> &'static str {
        match self {
            PriceUnit::Liter => "l",
            PriceUnit::Kilogram => "kg",
            PriceUnit::Unit => "st",
        }
    }
}

impl fmt::Display for PriceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    name: String,
    description: String,
    price: Money,
    unit: PriceUnit,
}

impl Product {
    /// Creates a validated product.
    ///
    /// ## Rules
    /// - `name` is trimmed and must not be empty
    /// - `price` must be strictly positive
    /// - a blank `description` is replaced by a placeholder text
    ///
    /// ## Example
    /// ```rust
    /// use kassa_core::{Money, PriceUnit, Product};
    ///
    /// let p = Product::new("bananer", "", Money::from_kronor(20), PriceUnit::Kilogram).unwrap();
    /// assert_eq!(p.price().kronor(), 20);
    /// assert!(Product::new("gratis", "", Money::zero(), PriceUnit::Unit).is_err());
    /// ```
    pub fn new(
        name: &str,
        description: &str,
        price: Money,
        unit: PriceUnit,
    ) -> ValidationResult<Self> {
        validate_product_name(name)?;
        validate_price(price)?;

        let description = description.trim();
        let description = if description.is_empty() {
            MISSING_DESCRIPTION
        } else {
            description
        };

        Ok(Product {
            name: name.trim().to_string(),
            description: description.to_string(),
            price,
            unit,
        })
    }

    /// Unique name, also the cart key.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Price per [`PriceUnit`].
    #[inline]
    pub fn price(&self) -> Money {
        self.price
    }

    #[inline]
    pub fn unit(&self) -> PriceUnit {
        self.unit
    }

    /// Price label for the product details panel, e.g. `"20kr / kg"`.
    pub fn price_label(&self) -> String {
        format!("{}kr / {}", self.price.kronor(), self.unit)
    }
}

impl<'a> TryFrom<(&'a str, &'a str, i64, &'a str)> for Product {
    type Error = ValidationError;

    /// Builds a product from raw `(name, description, price, unit)` fields.
    fn try_from(
        (name, description, price, unit): (&'a str, &'a str, i64, &'a str),
    ) -> ValidationResult<Self> {
        Product::new(
            name,
            description,
            Money::from_kronor(price),
            PriceUnit::parse_lenient(unit),
        )
    }
}

// =============================================================================
// Shopping Mode
// =============================================================================

/// Whether the shopper is still browsing or finalizing payment.
///
/// ```text
///            begin_checkout (cart non-empty)
///   Shopping ─────────────────────────────► CheckingOut
///      ▲                                        │
///      └──── complete_payment / resume_shopping ┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShoppingMode {
    #[default]
    Shopping,
    CheckingOut,
}

impl ShoppingMode {
    /// Cart add/remove/clear/save controls are enabled.
    pub const fn allows_cart_edits(&self) -> bool {
        matches!(self, ShoppingMode::Shopping)
    }

    /// Discount entry and the pay control are enabled.
    pub const fn allows_payment(&self) -> bool {
        matches!(self, ShoppingMode::CheckingOut)
    }
}

impl fmt::Display for ShoppingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShoppingMode::Shopping => write!(f, "shopping"),
            ShoppingMode::CheckingOut => write!(f, "checking-out"),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_unit_parsing() {
        assert_eq!(PriceUnit::parse_lenient("l"), PriceUnit::Liter);
        assert_eq!(PriceUnit::parse_lenient("L"), PriceUnit::Liter);
        assert_eq!(PriceUnit::parse_lenient("kg"), PriceUnit::Kilogram);
        assert_eq!(PriceUnit::parse_lenient("Kg"), PriceUnit::Kilogram);
        assert_eq!(PriceUnit::parse_lenient("st"), PriceUnit::Unit);
        assert_eq!(PriceUnit::parse_lenient("liter"), PriceUnit::Unit);
        assert_eq!(PriceUnit::parse_lenient(""), PriceUnit::Unit);
    }

    #[test]
    fn test_price_unit_display() {
        assert_eq!(PriceUnit::Liter.to_string(), "l");
        assert_eq!(PriceUnit::Kilogram.to_string(), "kg");
        assert_eq!(PriceUnit::Unit.to_string(), "st");
    }

    #[test]
    fn test_product_rejects_non_positive_price() {
        for price in [-10, -1, 0] {
            let result = Product::new("mjölk", "Färsk", Money::from_kronor(price), PriceUnit::Liter);
            assert_eq!(
                result,
                Err(ValidationError::MustBePositive {
                    field: "price".to_string()
                })
            );
        }
    }

    #[test]
    fn test_product_accepts_positive_price() {
        for price in [1, 13, 9999] {
            let product =
                Product::new("mjölk", "Färsk", Money::from_kronor(price), PriceUnit::Liter).unwrap();
            assert_eq!(product.price().kronor(), price);
        }
    }

    #[test]
    fn test_product_requires_name() {
        let result = Product::new("  ", "Färsk", Money::from_kronor(12), PriceUnit::Liter);
        assert!(matches!(result, Err(ValidationError::Required { .. })));
    }

    #[test]
    fn test_product_name_cannot_break_cart_file() {
        for name in ["te:grön", "te\ngrön"] {
            let result = Product::new(name, "Svart", Money::from_kronor(40), PriceUnit::Unit);
            assert!(matches!(result, Err(ValidationError::InvalidFormat { .. })), "{:?}", name);
        }
    }

    #[test]
    fn test_product_description_placeholder() {
        let product = Product::new("mjölk", "", Money::from_kronor(12), PriceUnit::Liter).unwrap();
        assert_eq!(product.description(), MISSING_DESCRIPTION);

        let product = Product::new("mjölk", "Färsk", Money::from_kronor(12), PriceUnit::Liter).unwrap();
        assert_eq!(product.description(), "Färsk");
    }

    #[test]
    fn test_product_price_label() {
        let product = Product::try_from(("bananer", "Gula", 20, "kg")).unwrap();
        assert_eq!(product.price_label(), "20kr / kg");
    }

    #[test]
    fn test_shopping_mode_gates() {
        let mode = ShoppingMode::default();
        assert_eq!(mode, ShoppingMode::Shopping);
        assert!(mode.allows_cart_edits());
        assert!(!mode.allows_payment());

        let mode = ShoppingMode::CheckingOut;
        assert!(!mode.allows_cart_edits());
        assert!(mode.allows_payment());
    }
}
