//! # kassa-store: Text File Persistence for Kassa
//!
//! Reads the catalog and discount codes, and saves and restores the cart.
//! All parsing is delegated to kassa-core; this crate adds file access,
//! path-aware errors and logging.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Kassa Data Flow                                  │
//! │                                                                         │
//! │  kassa-cli (startup, `save`, `load`, quit)                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   kassa-store (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │     Store     │    │  CatalogFile  │    │   CartFile   │  │   │
//! │  │   │  (store.rs)   │───►│ DiscountFile  │    │ save / load  │  │   │
//! │  │   │ open_session  │    │  read once    │    │ clear        │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Products.txt   Discount.txt   Cart.txt                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - File locations and session startup
//! - [`files`] - One handle per persistence file
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kassa_store::{Store, StoreConfig};
//!
//! let store = Store::new(StoreConfig::in_dir("."));
//! let mut opened = store.open_session()?;
//!
//! opened.session.add_to_cart("bananer", 2)?;
//! store.cart().save(opened.session.cart())?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod files;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use files::{CartFile, CatalogFile, DiscountFile};
pub use store::{OpenedSession, Store, StoreConfig, CART_FILE_NAME, CATALOG_FILE_NAME, DISCOUNT_FILE_NAME};
