//! # Store
//!
//! File locations and session startup.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  StoreConfig::in_dir(dir) ← Configure file locations                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Store::new(config).open_session()                                     │
//! │       │                                                                 │
//! │       ├── 1. Products.txt  unreadable/empty → Err (abort startup)      │
//! │       ├── 2. Discount.txt  missing          → warn, no codes           │
//! │       └── 3. Cart.txt      corrupt          → warn, empty cart         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  OpenedSession { session, skipped records, cart error }                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::{Path, PathBuf};

use kassa_core::{Cart, DiscountRegistry, RejectedLine, Session};
use tracing::{info, warn};

use crate::error::{StoreError, StoreResult};
use crate::files::{CartFile, CatalogFile, DiscountFile};

/// Default catalog file name.
pub const CATALOG_FILE_NAME: &str = "Products.txt";

/// Default discount code file name.
pub const DISCOUNT_FILE_NAME: &str = "Discount.txt";

/// Default saved cart file name.
pub const CART_FILE_NAME: &str = "Cart.txt";

// =============================================================================
// Configuration
// =============================================================================

/// Where the three persistence files live.
///
/// ## Example
/// ```rust
/// use kassa_store::StoreConfig;
///
/// let config = StoreConfig::in_dir("/srv/kassa")
///     .cart_path("/tmp/Cart.txt");
///
/// assert!(config.catalog_path.ends_with("Products.txt"));
/// assert!(config.cart_path.starts_with("/tmp"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Product catalog, `name:description:price:unit`.
    pub catalog_path: PathBuf,

    /// Discount codes, one per line.
    pub discount_path: PathBuf,

    /// Saved cart, `name:quantity`.
    pub cart_path: PathBuf,
}

impl StoreConfig {
    /// Uses the default file names inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        StoreConfig {
            catalog_path: dir.join(CATALOG_FILE_NAME),
            discount_path: dir.join(DISCOUNT_FILE_NAME),
            cart_path: dir.join(CART_FILE_NAME),
        }
    }

    /// Sets the catalog file.
    pub fn catalog_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.catalog_path = path.into();
        self
    }

    /// Sets the discount code file.
    pub fn discount_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.discount_path = path.into();
        self
    }

    /// Sets the saved cart file.
    pub fn cart_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cart_path = path.into();
        self
    }
}

// =============================================================================
// Opened Session
// =============================================================================

/// A freshly started session plus what went wrong on the way.
#[derive(Debug)]
pub struct OpenedSession {
    pub session: Session,

    /// Catalog records that were skipped.
    pub rejected_products: Vec<RejectedLine>,

    /// Discount codes that were skipped.
    pub rejected_codes: Vec<RejectedLine>,

    /// Why the saved cart was not restored, if it was not.
    pub cart_error: Option<StoreError>,
}

// =============================================================================
// Store
// =============================================================================

/// Entry point to the persistence files.
#[derive(Debug, Clone)]
pub struct Store {
    config: StoreConfig,
}

impl Store {
    pub fn new(config: StoreConfig) -> Self {
        Store { config }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Returns the catalog file handle.
    pub fn catalog(&self) -> CatalogFile {
        CatalogFile::new(&self.config.catalog_path)
    }

    /// Returns the discount file handle.
    pub fn discounts(&self) -> DiscountFile {
        DiscountFile::new(&self.config.discount_path)
    }

    /// Returns the saved cart handle.
    pub fn cart(&self) -> CartFile {
        CartFile::new(&self.config.cart_path)
    }

    /// Loads everything and starts a session.
    ///
    /// Only catalog failures are returned as errors. A missing discount
    /// file gives a session without codes, and a saved cart that cannot be
    /// restored gives an empty cart with the reason in `cart_error`.
    pub fn open_session(&self) -> StoreResult<OpenedSession> {
        info!(
            catalog = %self.config.catalog_path.display(),
            discounts = %self.config.discount_path.display(),
            cart = %self.config.cart_path.display(),
            "Opening session"
        );

        let catalog = self.catalog().load()?;

        let discounts = match self.discounts().load() {
            Ok(report) => report,
            Err(e) if e.is_missing_file() => {
                warn!(error = %e, "No discount file, starting without codes");
                DiscountRegistry::parse("")
            }
            Err(e) => return Err(e),
        };

        let (cart, cart_error) = match self.cart().load(&catalog.value) {
            Ok(cart) => (cart, None),
            Err(e) => {
                warn!(error = %e, "Saved cart not restored");
                (Cart::new(), Some(e))
            }
        };

        Ok(OpenedSession {
            session: Session::new(catalog.value, discounts.value, cart),
            rejected_products: catalog.rejected,
            rejected_codes: discounts.rejected,
            cart_error,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use kassa_core::ErrorKind;
    use std::fs;
    use tempfile::TempDir;

    fn write_defaults(dir: &Path) {
        fs::write(
            dir.join(CATALOG_FILE_NAME),
            "bananer:Gula och goda:20:kg\nmjölk:Färsk:13:l\n",
        )
        .unwrap();
        fs::write(dir.join(DISCOUNT_FILE_NAME), "A1B2\nXX\n").unwrap();
    }

    #[test]
    fn test_config_builder() {
        let config = StoreConfig::in_dir("/data")
            .catalog_path("/etc/kassa/Products.txt")
            .discount_path("/etc/kassa/Discount.txt");

        assert_eq!(config.catalog_path, PathBuf::from("/etc/kassa/Products.txt"));
        assert_eq!(config.discount_path, PathBuf::from("/etc/kassa/Discount.txt"));
        assert_eq!(config.cart_path, PathBuf::from("/data").join(CART_FILE_NAME));
    }

    #[test]
    fn test_open_session() {
        let dir = TempDir::new().unwrap();
        write_defaults(dir.path());
        fs::write(dir.path().join(CART_FILE_NAME), "bananer:3\n").unwrap();

        let opened = Store::new(StoreConfig::in_dir(dir.path())).open_session().unwrap();

        assert_eq!(opened.session.catalog().len(), 2);
        assert!(opened.session.discounts().contains("A1B2"));
        assert_eq!(opened.rejected_codes.len(), 1);
        assert!(opened.rejected_products.is_empty());
        assert_eq!(opened.session.cart().quantity_of("bananer"), Some(3));
        assert!(opened.cart_error.is_none());
        assert!(!opened.session.has_unsaved_changes());
    }

    #[test]
    fn test_open_session_without_discount_file() {
        let dir = TempDir::new().unwrap();
        write_defaults(dir.path());
        fs::remove_file(dir.path().join(DISCOUNT_FILE_NAME)).unwrap();

        let opened = Store::new(StoreConfig::in_dir(dir.path())).open_session().unwrap();

        assert!(opened.session.discounts().is_empty());
    }

    #[test]
    fn test_open_session_with_corrupt_cart() {
        let dir = TempDir::new().unwrap();
        write_defaults(dir.path());
        fs::write(dir.path().join(CART_FILE_NAME), ":4\n").unwrap();

        let opened = Store::new(StoreConfig::in_dir(dir.path())).open_session().unwrap();

        assert!(opened.session.cart().is_empty());
        let err = opened.cart_error.unwrap();
        assert_eq!(err.kind(), ErrorKind::CartLoadCorrupt);
    }

    #[test]
    fn test_open_session_without_catalog_fails() {
        let dir = TempDir::new().unwrap();

        let err = Store::new(StoreConfig::in_dir(dir.path())).open_session().unwrap_err();

        assert!(err.kind().is_fatal());
    }

    #[test]
    fn test_saved_cart_survives_one_restart_only() {
        let dir = TempDir::new().unwrap();
        write_defaults(dir.path());
        let store = Store::new(StoreConfig::in_dir(dir.path()));

        let mut opened = store.open_session().unwrap();
        opened.session.add_to_cart("mjölk", 2).unwrap();
        store.cart().save(opened.session.cart()).unwrap();

        let reopened = store.open_session().unwrap();
        assert_eq!(reopened.session.cart().quantity_of("mjölk"), Some(2));

        let third = store.open_session().unwrap();
        assert!(third.session.cart().is_empty());
    }
}
