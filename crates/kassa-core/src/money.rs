//! # Money Module
//!
//! Provides the `Money` type for prices, line totals and receipt sums.
//!
//! Catalog prices are whole kronor, so the smallest unit here is one krona.
//! Percentages are taken with integer math and always round toward zero,
//! which for the non-negative amounts on a receipt is the floor.
//!
//! ## Usage
//! ```rust
//! use kassa_core::money::Money;
//!
//! let price = Money::from_kronor(20);
//! let line = price.multiply_quantity(4);          // 80 kr
//! assert_eq!(line.percentage(1000).kronor(), 8);  // 10% of 80
//! assert_eq!(line.apply_percentage_discount(1000).kronor(), 72);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in whole kronor.
///
/// ## Where Money is Used
/// ```text
/// Product.price ──► ReceiptLine.line_total ──► Receipt.subtotal
///                                                   │
///                              discount active? ────┤
///                                                   ▼
///                                   Receipt.savings, Receipt.total
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole kronor.
    #[inline]
    pub const fn from_kronor(kronor: i64) -> Self {
        Money(kronor)
    }

    /// Returns the value in kronor.
    #[inline]
    pub const fn kronor(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Panics
    /// On overflow, like plain `i64` arithmetic: panics in debug builds and
    /// wraps in release. Receipt math goes through
    /// [`Money::checked_multiply_quantity`] instead.
    ///
    /// ## Example
    /// ```rust
    /// use kassa_core::money::Money;
    ///
    /// let unit_price = Money::from_kronor(25);
    /// assert_eq!(unit_price.multiply_quantity(3).kronor(), 75);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Like [`Money::multiply_quantity`], but `None` on overflow.
    pub fn checked_multiply_quantity(&self, qty: i64) -> Option<Money> {
        self.0.checked_mul(qty).map(Money)
    }

    /// Adds two amounts, `None` on overflow.
    pub fn checked_add(&self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Returns `bps` basis points of this amount, truncated.
    ///
    /// ## Example
    /// ```rust
    /// use kassa_core::money::Money;
    ///
    /// // 10% of 15 kr is 1.5 kr, shown as 1 kr
    /// assert_eq!(Money::from_kronor(15).percentage(1000).kronor(), 1);
    /// ```
    pub fn percentage(&self, bps: u32) -> Money {
        // i128 keeps amount * bps clear of overflow
        let share = self.0 as i128 * bps as i128 / 10_000;
        Money(share as i64)
    }

    /// Applies a percentage discount and returns the remaining amount, truncated.
    ///
    /// The remainder is computed directly rather than as `self - percentage(bps)`,
    /// so 15 kr at 10% off gives 13 kr (13.5 truncated), not 14 kr.
    ///
    /// ## Example
    /// ```rust
    /// use kassa_core::money::Money;
    ///
    /// let subtotal = Money::from_kronor(80);
    /// assert_eq!(subtotal.apply_percentage_discount(1000).kronor(), 72);
    /// ```
    pub fn apply_percentage_discount(&self, discount_bps: u32) -> Money {
        let keep_bps = 10_000_i128 - discount_bps.min(10_000) as i128;
        Money((self.0 as i128 * keep_bps / 10_000) as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================
// The operators below use plain `i64` arithmetic: they panic on overflow in
// debug builds and wrap in release.
// Use `checked_add` / `checked_multiply_quantity` for unbounded input.

/// Renders as `"<n> kr"`, the form used on receipt lines.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} kr", self.0)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
