//! # Shopping Cart
//!
//! The shopper's selection: product name → quantity, kept in insertion order
//! so listings and receipts come out the same every time.
//!
//! ## Cart Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  add("bananer", 4)     → [bananer: 4]                                   │
//! │  add("mjölk", 1)       → [bananer: 4, mjölk: 1]                         │
//! │  add("bananer", 1)     → [bananer: 5, mjölk: 1]      (same position)    │
//! │  remove("bananer", 2)  → [bananer: 3, mjölk: 1]                         │
//! │  remove("mjölk", 5)    → [bananer: 3]                (entry dropped)    │
//! │  remove("ost", 1)      → NotInCart                   (cart unchanged)   │
//! │  clear()               → []                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Every stored quantity is > 0
//! - Names are unique (adding an existing name increases its quantity)
//!
//! ## Persisted Form
//! One `name:quantity` line per entry. See [`Cart::to_persisted`] and
//! [`Cart::parse_persisted`].

use serde::Serialize;

use crate::catalog::Catalog;
use crate::error::{CoreError, CoreResult};
use crate::load::non_blank_lines;
use crate::validation::{parse_integer, validate_quantity};
use crate::FIELD_SEPARATOR;

/// One entry in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_name: String,
    pub quantity: i64,
}

/// The shopping cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Adds `quantity` of a product, merging with an existing entry.
    ///
    /// The cart does not check the catalog; [`crate::Session`] does.
    pub fn add(&mut self, product_name: &str, quantity: i64) -> CoreResult<()> {
        validate_quantity(quantity)?;

        if let Some(line) = self.line_mut(product_name) {
            line.quantity = line
                .quantity
                .checked_add(quantity)
                .ok_or_else(|| CoreError::QuantityOverflow {
                    product: product_name.to_string(),
                })?;
            return Ok(());
        }

        self.lines.push(CartLine {
            product_name: product_name.to_string(),
            quantity,
        });
        Ok(())
    }

    /// Removes `quantity` of a product. Drops the entry when nothing is left.
    pub fn remove(&mut self, product_name: &str, quantity: i64) -> CoreResult<()> {
        validate_quantity(quantity)?;

        let index = self
            .lines
            .iter()
            .position(|l| l.product_name == product_name)
            .ok_or_else(|| CoreError::NotInCart(product_name.to_string()))?;

        let remaining = self.lines[index].quantity - quantity;
        if remaining <= 0 {
            self.lines.remove(index);
        } else {
            self.lines[index].quantity = remaining;
        }
        Ok(())
    }

    /// Empties the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn quantity_of(&self, product_name: &str) -> Option<i64> {
        self.lines
            .iter()
            .find(|l| l.product_name == product_name)
            .map(|l| l.quantity)
    }

    pub fn contains(&self, product_name: &str) -> bool {
        self.quantity_of(product_name).is_some()
    }

    /// Entries in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Number of distinct products.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of all quantities, `None` if it does not fit in an `i64`.
    pub fn total_quantity(&self) -> Option<i64> {
        self.lines
            .iter()
            .try_fold(0_i64, |total, l| total.checked_add(l.quantity))
    }

    fn line_mut(&mut self, product_name: &str) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|l| l.product_name == product_name)
    }

    // =========================================================================
    // Persisted Form
    // =========================================================================

    /// Renders the cart as `name:quantity` lines.
    pub fn to_persisted(&self) -> String {
        self.lines
            .iter()
            .map(|l| format!("{}{}{}\n", l.product_name, FIELD_SEPARATOR, l.quantity))
            .collect()
    }

    /// Restores a cart from its persisted form.
    ///
    /// ## Rules
    /// ```text
    /// blank line                         → skipped
    /// no ':' / empty name                → CorruptCartRecord (whole load fails)
    /// fields after the quantity          → ignored
    /// quantity not an integer, or <= 0   → CorruptCartRecord (whole load fails)
    /// product not in catalog             → dropped silently
    /// product listed twice               → quantities added
    /// ```
    pub fn parse_persisted(text: &str, catalog: &Catalog) -> CoreResult<Cart> {
        let mut cart = Cart::new();

        for (line_number, line) in non_blank_lines(text) {
            let mut fields = line.split(FIELD_SEPARATOR);
            let name = fields.next().unwrap_or_default();
            let quantity = fields
                .next()
                .ok_or_else(|| CoreError::corrupt_cart(line_number, "missing quantity"))?;

            let name = name.trim();
            if name.is_empty() {
                return Err(CoreError::corrupt_cart(line_number, "missing product name"));
            }

            let quantity = parse_integer("quantity", quantity)
                .and_then(|q| validate_quantity(q).map(|_| q))
                .map_err(|e| CoreError::corrupt_cart(line_number, e.to_string()))?;

            if catalog.contains(name) {
                cart.add(name, quantity)?;
            }
        }

        Ok(cart)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
