//! # kassa-core: Pure Business Logic for Kassa
//!
//! The checkout domain model: products, discount codes, the cart, receipts
//! and the session that ties them together. Nothing in this crate touches
//! the file system; text comes in as `&str` and goes out as `String`.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Kassa Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    kassa-cli (presentation)                     │   │
//! │  │   products ──► add/remove ──► checkout ──► discount ──► pay     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ kassa-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌───────────────────┐ │   │
//! │  │   │ catalog  │ │ discount │ │   cart   │ │     checkout      │ │   │
//! │  │   │ Product  │ │ Registry │ │ CartLine │ │ Receipt, Session  │ │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └───────────────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO FILES • NO LOGGING • DETERMINISTIC                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 kassa-store (text file layer)                   │   │
//! │  │         Products.txt, Discount.txt, Cart.txt                    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Whole-krona money type with integer arithmetic
//! - [`types`] - Product, price unit and shopping mode
//! - [`validation`] - Field and code validators
//! - [`load`] - Load reports for skip-and-continue parsing
//! - [`catalog`] - The product catalog
//! - [`discount`] - Discount code registry and discount session state
//! - [`cart`] - The insertion-ordered shopping cart
//! - [`checkout`] - Receipt computation and the checkout session
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use kassa_core::{Catalog, Session, Cart, DiscountRegistry};
//!
//! let catalog = Catalog::parse("bananer:Gula och goda:20:kg").unwrap().value;
//! let codes = DiscountRegistry::parse("A1B2").value;
//! let mut session = Session::new(catalog, codes, Cart::new());
//!
//! session.add_to_cart("bananer", 4).unwrap();
//! assert_eq!(
//!     session.receipt().unwrap().render(),
//!     "bananer 4 kg: 80 kr\nTotal kostnad: 80kr"
//! );
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod discount;
pub mod error;
pub mod load;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartLine};
pub use catalog::Catalog;
pub use checkout::{CompletedPurchase, Receipt, ReceiptLine, Session};
pub use discount::{ApplyOutcome, DiscountCode, DiscountRegistry, DiscountState};
pub use error::{CoreError, CoreResult, ErrorKind, ValidationError};
pub use load::{LoadReport, RejectedLine};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Discount granted by an applied code, in basis points (1000 = 10%).
pub const DISCOUNT_RATE_BPS: u32 = 1000;

/// Description used when a catalog record has none.
pub const MISSING_DESCRIPTION: &str = "Ingen beskrivning kunde hittas för den här produkten.";

/// Length of a discount code, in characters.
pub const DISCOUNT_CODE_LEN: usize = 4;

/// Field separator shared by the catalog and cart file formats.
pub const FIELD_SEPARATOR: char = ':';
