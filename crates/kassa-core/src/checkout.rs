//! # Checkout
//!
//! Receipt computation and the [`Session`] that owns all mutable state of a
//! running checkout: the cart, the active discount and the shopping mode.
//!
//! ## Receipt Calculation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  For each cart line (insertion order):                                  │
//! │      line_total = unit_price × quantity                                 │
//! │                                                                         │
//! │  subtotal = Σ line_total                                                │
//! │                                                                         │
//! │  Discount active?                                                       │
//! │      savings = floor(subtotal × 10%)                                    │
//! │      total   = floor(subtotal × 90%)      (computed independently)      │
//! │  Otherwise                                                              │
//! │      total   = subtotal                                                 │
//! │                                                                         │
//! │  Rendered:                                                              │
//! │      bananer 4 kg: 80 kr                                                │
//! │      Du sparar: 8 kr                                                    │
//! │      Total kostnad: 72kr                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Session State Machine
//! ```text
//!                  begin_checkout()
//!                  (cart non-empty)
//!   ┌──────────┐ ─────────────────────► ┌─────────────┐
//!   │ Shopping │                        │ CheckingOut │ ◄── apply_discount()
//!   └──────────┘ ◄───────────────────── └─────────────┘
//!        ▲         resume_shopping()           │
//!        │                                     │ complete_payment()
//!        └─────────────────────────────────────┘ redeem code, empty cart,
//!                                                reset discount
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::cart::Cart;
use crate::catalog::Catalog;
use crate::discount::{ApplyOutcome, DiscountCode, DiscountRegistry, DiscountState};
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{PriceUnit, ShoppingMode};
use crate::DISCOUNT_RATE_BPS;

// =============================================================================
// Receipt
// =============================================================================

/// One priced cart entry on a receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptLine {
    pub product_name: String,
    pub quantity: i64,
    pub unit: PriceUnit,
    pub unit_price: Money,
    pub line_total: Money,
}

impl fmt::Display for ReceiptLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}: {}",
            self.product_name, self.quantity, self.unit, self.line_total
        )
    }
}

/// A computed receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub lines: Vec<ReceiptLine>,
    pub subtotal: Money,
    /// Present only when a discount is active.
    pub savings: Option<Money>,
    pub total: Money,
}

impl Receipt {
    /// Prices every cart line against the catalog.
    ///
    /// Fails with `ProductNotFound` if the cart references a product the
    /// catalog does not have, and with `QuantityOverflow` if a line total or
    /// the subtotal does not fit.
    pub fn compute(cart: &Cart, catalog: &Catalog, discount: &DiscountState) -> CoreResult<Receipt> {
        let mut lines = Vec::with_capacity(cart.len());
        let mut subtotal = Money::zero();

        for entry in cart.lines() {
            let product = catalog.find_by_name(&entry.product_name)?;
            let overflow = || CoreError::QuantityOverflow {
                product: entry.product_name.clone(),
            };

            let line_total = product
                .price()
                .checked_multiply_quantity(entry.quantity)
                .ok_or_else(overflow)?;
            subtotal = subtotal.checked_add(line_total).ok_or_else(overflow)?;

            lines.push(ReceiptLine {
                product_name: entry.product_name.clone(),
                quantity: entry.quantity,
                unit: product.unit(),
                unit_price: product.price(),
                line_total,
            });
        }

        let (savings, total) = if discount.has_discount() {
            (
                Some(subtotal.percentage(DISCOUNT_RATE_BPS)),
                subtotal.apply_percentage_discount(DISCOUNT_RATE_BPS),
            )
        } else {
            (None, subtotal)
        };

        Ok(Receipt {
            lines,
            subtotal,
            savings,
            total,
        })
    }

    /// Renders the receipt text shown to the shopper.
    pub fn render(&self) -> String {
        let mut out: Vec<String> = self.lines.iter().map(ToString::to_string).collect();

        if let Some(savings) = self.savings {
            out.push(format!("Du sparar: {}", savings));
        }
        out.push(format!("Total kostnad: {}kr", self.total.kronor()));

        out.join("\n")
    }
}

impl fmt::Display for Receipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

// =============================================================================
// Completed Purchase
// =============================================================================

/// What a successful payment hands back to the front end.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedPurchase {
    /// The receipt as it stood at payment, discount included.
    pub receipt: Receipt,
    /// The code consumed by this purchase, if any.
    pub redeemed_code: Option<DiscountCode>,
    pub completed_at: DateTime<Utc>,
}

// =============================================================================
// Session
// =============================================================================

/// The checkout context: everything one shopper can change.
///
/// The catalog is fixed for the lifetime of the session. Every mutating
/// operation checks its preconditions before touching any state, so a
/// failed call leaves the session exactly as it was.
#[derive(Debug, Clone)]
pub struct Session {
    catalog: Catalog,
    discounts: DiscountRegistry,
    cart: Cart,
    discount: DiscountState,
    mode: ShoppingMode,
    checkout_receipt: Option<Receipt>,
    unsaved: bool,
}

impl Session {
    /// Starts a session in `Shopping` mode.
    ///
    /// `cart` is usually the restored cart; it counts as saved.
    pub fn new(catalog: Catalog, discounts: DiscountRegistry, cart: Cart) -> Self {
        Session {
            catalog,
            discounts,
            cart,
            discount: DiscountState::default(),
            mode: ShoppingMode::Shopping,
            checkout_receipt: None,
            unsaved: false,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn discounts(&self) -> &DiscountRegistry {
        &self.discounts
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn discount(&self) -> &DiscountState {
        &self.discount
    }

    pub fn mode(&self) -> ShoppingMode {
        self.mode
    }

    /// The receipt snapshot taken when checkout began.
    pub fn checkout_receipt(&self) -> Option<&Receipt> {
        self.checkout_receipt.as_ref()
    }

    // =========================================================================
    // Cart Operations
    // =========================================================================

    /// Adds a catalog product to the cart.
    pub fn add_to_cart(&mut self, product_name: &str, quantity: i64) -> CoreResult<()> {
        self.catalog.find_by_name(product_name)?;
        self.cart.add(product_name, quantity)?;
        self.unsaved = true;
        Ok(())
    }

    pub fn remove_from_cart(&mut self, product_name: &str, quantity: i64) -> CoreResult<()> {
        self.cart.remove(product_name, quantity)?;
        self.unsaved = true;
        Ok(())
    }

    /// Empties the cart. Clearing an empty cart changes nothing.
    pub fn clear_cart(&mut self) {
        if self.cart.is_empty() {
            return;
        }
        self.cart.clear();
        self.unsaved = true;
    }

    /// Merges a restored cart into the current one.
    ///
    /// Entries for products outside the catalog are skipped.
    pub fn restore_cart(&mut self, restored: &Cart) -> CoreResult<()> {
        let mut merged = self.cart.clone();
        for line in restored.lines() {
            if self.catalog.contains(&line.product_name) {
                merged.add(&line.product_name, line.quantity)?;
            }
        }

        if merged != self.cart {
            self.cart = merged;
            self.unsaved = true;
        }
        Ok(())
    }

    // =========================================================================
    // Discount and Receipt
    // =========================================================================

    /// Tries to activate a discount code.
    ///
    /// When applied during checkout, the receipt snapshot is refreshed so it
    /// shows the savings line.
    pub fn apply_discount(&mut self, code: &str) -> ApplyOutcome {
        let outcome = self.discounts.try_apply(code, &mut self.discount);

        if outcome.is_applied() && self.mode == ShoppingMode::CheckingOut {
            self.checkout_receipt = self.receipt().ok();
        }
        outcome
    }

    /// Computes the receipt for the current cart and discount.
    pub fn receipt(&self) -> CoreResult<Receipt> {
        Receipt::compute(&self.cart, &self.catalog, &self.discount)
    }

    // =========================================================================
    // Mode Transitions
    // =========================================================================

    /// Moves to `CheckingOut` and snapshots the receipt.
    pub fn begin_checkout(&mut self) -> CoreResult<&Receipt> {
        if self.mode != ShoppingMode::Shopping {
            return Err(CoreError::InvalidMode {
                expected: ShoppingMode::Shopping,
                actual: self.mode,
            });
        }
        if self.cart.is_empty() {
            return Err(CoreError::EmptyCart);
        }

        let receipt = self.receipt()?;
        self.mode = ShoppingMode::CheckingOut;
        Ok(self.checkout_receipt.insert(receipt))
    }

    /// Leaves checkout without paying. The discount stays active.
    pub fn resume_shopping(&mut self) -> CoreResult<()> {
        self.require_checking_out()?;
        self.mode = ShoppingMode::Shopping;
        self.checkout_receipt = None;
        Ok(())
    }

    /// Pays for the cart.
    ///
    /// ## Effects
    /// 1. The used discount code, if any, is removed from the registry
    /// 2. The cart is emptied
    /// 3. The session returns to `Shopping`
    /// 4. The discount state is reset
    pub fn complete_payment(&mut self) -> CoreResult<CompletedPurchase> {
        self.require_checking_out()?;
        let receipt = self.receipt()?;

        let redeemed_code = self.discount.used_code().cloned();
        if let Some(code) = &redeemed_code {
            self.discounts.redeem(code);
        }

        if !self.cart.is_empty() {
            self.cart.clear();
            self.unsaved = true;
        }
        self.mode = ShoppingMode::Shopping;
        self.checkout_receipt = None;
        self.discount.reset();

        Ok(CompletedPurchase {
            receipt,
            redeemed_code,
            completed_at: Utc::now(),
        })
    }

    fn require_checking_out(&self) -> CoreResult<()> {
        if self.mode != ShoppingMode::CheckingOut {
            return Err(CoreError::InvalidMode {
                expected: ShoppingMode::CheckingOut,
                actual: self.mode,
            });
        }
        Ok(())
    }

    // =========================================================================
    // Save Tracking
    // =========================================================================

    /// Records that the cart was written to storage.
    pub fn mark_saved(&mut self) {
        self.unsaved = false;
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    /// True when quitting now would lose a non-empty cart.
    pub fn needs_save_prompt(&self) -> bool {
        self.unsaved && !self.cart.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::types::Product;

    const PRODUCTS: &str = "\
bananer:Gula och goda:20:kg
mjölk:Färsk mellanmjölk:13:l
bröd:Surdeg:35:st
";

    fn session() -> Session {
        let catalog = Catalog::parse(PRODUCTS).unwrap().value;
        let codes = DiscountRegistry::parse("A1B2\nC3D4").value;
        Session::new(catalog, codes, Cart::new())
    }

    #[test]
    fn test_receipt_single_line() {
        let mut session = session();
        session.add_to_cart("bananer", 4).unwrap();

        let receipt = session.receipt().unwrap();
        assert_eq!(receipt.render(), "bananer 4 kg: 80 kr\nTotal kostnad: 80kr");
        assert_eq!(receipt.savings, None);
        assert_eq!(receipt.subtotal.kronor(), 80);
    }

    #[test]
    fn test_receipt_with_discount() {
        let mut session = session();
        session.add_to_cart("bananer", 4).unwrap();
        assert_eq!(session.apply_discount("A1B2"), ApplyOutcome::Applied);

        assert_eq!(
            session.receipt().unwrap().to_string(),
            "bananer 4 kg: 80 kr\nDu sparar: 8 kr\nTotal kostnad: 72kr"
        );
    }

    #[test]
    fn test_receipt_follows_insertion_order() {
        let mut session = session();
        session.add_to_cart("mjölk", 2).unwrap();
        session.add_to_cart("bröd", 1).unwrap();
        session.add_to_cart("bananer", 1).unwrap();

        assert_eq!(
            session.receipt().unwrap().render(),
            "mjölk 2 l: 26 kr\nbröd 1 st: 35 kr\nbananer 1 kg: 20 kr\nTotal kostnad: 81kr"
        );
    }

    #[test]
    fn test_discount_savings_and_total_floor() {
        let catalog = Catalog::parse(PRODUCTS).unwrap().value;
        let codes = DiscountRegistry::parse("A1B2").value;
        let mut state = DiscountState::default();
        codes.try_apply("A1B2", &mut state);

        for qty in 1..=40 {
            let mut cart = Cart::new();
            cart.add("mjölk", qty).unwrap();

            let receipt = Receipt::compute(&cart, &catalog, &state).unwrap();
            let subtotal = 13 * qty;
            assert_eq!(receipt.savings.map(|m| m.kronor()), Some(subtotal / 10));
            assert_eq!(receipt.total.kronor(), subtotal * 9 / 10);
        }
    }

    #[test]
    fn test_empty_cart_receipt() {
        assert_eq!(session().receipt().unwrap().render(), "Total kostnad: 0kr");
    }

    #[test]
    fn test_receipt_for_product_missing_from_catalog() {
        let catalog = Catalog::parse(PRODUCTS).unwrap().value;
        let mut cart = Cart::new();
        cart.add("ost", 1).unwrap();

        let err = Receipt::compute(&cart, &catalog, &DiscountState::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_receipt_overflow_is_an_error() {
        let catalog = Catalog::parse(PRODUCTS).unwrap().value;
        let mut cart = Cart::new();
        cart.add("bröd", i64::MAX / 2).unwrap();

        let err = Receipt::compute(&cart, &catalog, &DiscountState::default()).unwrap_err();
        assert!(matches!(err, CoreError::QuantityOverflow { .. }));
    }

    #[test]
    fn test_add_unknown_product_fails() {
        let mut session = session();
        let err = session.add_to_cart("ost", 1).unwrap_err();

        assert!(matches!(err, CoreError::ProductNotFound(_)));
        assert!(session.cart().is_empty());
        assert!(!session.has_unsaved_changes());
    }

    #[test]
    fn test_begin_checkout_requires_items() {
        let mut session = session();
        let err = session.begin_checkout().unwrap_err();

        assert!(matches!(err, CoreError::EmptyCart));
        assert_eq!(session.mode(), ShoppingMode::Shopping);
    }

    #[test]
    fn test_begin_checkout_snapshots_receipt() {
        let mut session = session();
        session.add_to_cart("bananer", 4).unwrap();

        let text = session.begin_checkout().unwrap().render();
        assert_eq!(text, "bananer 4 kg: 80 kr\nTotal kostnad: 80kr");
        assert_eq!(session.mode(), ShoppingMode::CheckingOut);
        assert!(session.checkout_receipt().is_some());

        let err = session.begin_checkout().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Rejected);
    }

    #[test]
    fn test_discount_during_checkout_refreshes_snapshot() {
        let mut session = session();
        session.add_to_cart("bananer", 4).unwrap();
        session.begin_checkout().unwrap();

        session.apply_discount("A1B2");

        let snapshot = session.checkout_receipt().unwrap();
        assert_eq!(snapshot.savings, Some(Money::from_kronor(8)));
        assert_eq!(snapshot.total.kronor(), 72);
    }

    #[test]
    fn test_resume_shopping_keeps_discount_and_cart() {
        let mut session = session();
        session.add_to_cart("bananer", 4).unwrap();
        session.begin_checkout().unwrap();
        session.apply_discount("A1B2");

        session.resume_shopping().unwrap();

        assert_eq!(session.mode(), ShoppingMode::Shopping);
        assert!(session.checkout_receipt().is_none());
        assert!(session.discount().has_discount());
        assert_eq!(session.cart().quantity_of("bananer"), Some(4));
        assert!(session.resume_shopping().is_err());
    }

    #[test]
    fn test_complete_payment_outside_checkout_is_rejected() {
        let mut session = session();
        session.add_to_cart("bananer", 4).unwrap();

        let err = session.complete_payment().unwrap_err();
        assert!(matches!(err, CoreError::InvalidMode { .. }));
        assert_eq!(session.cart().len(), 1);
    }

    #[test]
    fn test_complete_payment_with_discount() {
        let mut session = session();
        session.add_to_cart("bananer", 4).unwrap();
        session.begin_checkout().unwrap();
        session.apply_discount("A1B2");

        let purchase = session.complete_payment().unwrap();

        assert_eq!(purchase.receipt.total.kronor(), 72);
        assert_eq!(
            purchase.redeemed_code.as_ref().map(DiscountCode::as_str),
            Some("A1B2")
        );
        assert!(session.cart().is_empty());
        assert_eq!(session.mode(), ShoppingMode::Shopping);
        assert!(!session.discount().has_discount());
        assert!(!session.discounts().contains("A1B2"));
        assert!(session.discounts().contains("C3D4"));

        // The redeemed code cannot be used again
        session.add_to_cart("mjölk", 1).unwrap();
        session.begin_checkout().unwrap();
        assert_eq!(session.apply_discount("A1B2"), ApplyOutcome::Invalid);
    }

    #[test]
    fn test_complete_payment_without_discount_keeps_codes() {
        let mut session = session();
        session.add_to_cart("bröd", 2).unwrap();
        session.begin_checkout().unwrap();

        let purchase = session.complete_payment().unwrap();

        assert!(purchase.redeemed_code.is_none());
        assert_eq!(purchase.receipt.render(), "bröd 2 st: 70 kr\nTotal kostnad: 70kr");
        assert_eq!(session.discounts().len(), 2);
    }

    #[test]
    fn test_unsaved_tracking() {
        let mut session = session();
        assert!(!session.needs_save_prompt());

        session.add_to_cart("bananer", 1).unwrap();
        assert!(session.needs_save_prompt());

        session.mark_saved();
        assert!(!session.needs_save_prompt());

        session.remove_from_cart("bananer", 1).unwrap();
        assert!(session.has_unsaved_changes());
        // Nothing to lose once the cart is empty
        assert!(!session.needs_save_prompt());
    }

    #[test]
    fn test_clear_empty_cart_is_noop() {
        let mut session = session();
        session.clear_cart();
        assert!(!session.has_unsaved_changes());

        session.add_to_cart("bananer", 2).unwrap();
        session.mark_saved();
        session.clear_cart();
        assert!(session.cart().is_empty());
        assert!(session.has_unsaved_changes());
    }

    #[test]
    fn test_restore_cart_merges() {
        let mut session = session();
        session.add_to_cart("bananer", 1).unwrap();
        session.mark_saved();

        let mut restored = Cart::new();
        restored.add("bananer", 2).unwrap();
        restored.add("ost", 3).unwrap();
        restored.add("mjölk", 1).unwrap();
        session.restore_cart(&restored).unwrap();

        assert_eq!(session.cart().quantity_of("bananer"), Some(3));
        assert_eq!(session.cart().quantity_of("mjölk"), Some(1));
        assert!(!session.cart().contains("ost"));
        assert!(session.has_unsaved_changes());
    }

    #[test]
    fn test_saved_cart_reloads_for_any_accepted_name() {
        let te = Product::new("te:grön", "Lösvikt", Money::from_kronor(40), PriceUnit::Unit);
        assert!(te.is_err());

        let products = vec![
            Product::new("röda äpplen", "Krispiga", Money::from_kronor(25), PriceUnit::Kilogram).unwrap(),
            Product::new("te grön", "Lösvikt", Money::from_kronor(40), PriceUnit::Unit).unwrap(),
        ];
        let catalog = Catalog::from_products(products).unwrap();
        let mut session = Session::new(catalog, DiscountRegistry::default(), Cart::new());
        session.add_to_cart("röda äpplen", 3).unwrap();
        session.add_to_cart("te grön", 2).unwrap();

        let saved = session.cart().to_persisted();
        let restored = Cart::parse_persisted(&saved, session.catalog()).unwrap();
        assert_eq!(&restored, session.cart());
    }

    #[test]
    fn test_completed_purchase_serializes_camel_case() {
        let mut session = session();
        session.add_to_cart("bananer", 4).unwrap();
        session.begin_checkout().unwrap();
        let purchase = session.complete_payment().unwrap();

        let json = serde_json::to_value(&purchase).unwrap();
        assert_eq!(json["receipt"]["lines"][0]["productName"], "bananer");
        assert_eq!(json["receipt"]["lines"][0]["lineTotal"], 80);
        assert!(json["redeemedCode"].is_null());
        assert!(json.get("completedAt").is_some());
    }
}
