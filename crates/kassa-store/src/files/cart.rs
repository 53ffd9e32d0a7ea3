//! # Cart File
//!
//! Saves and restores the cart as `name:quantity` lines.
//!
//! ## Single-Use Restore
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  save(cart)        Cart.txt ← "bananer:4\nmjölk:1\n"   (create/replace) │
//! │                                                                         │
//! │  load(catalog)     Cart.txt missing   → empty cart, file untouched      │
//! │                    Cart.txt corrupt   → CorruptCartRecord, file kept    │
//! │                    Cart.txt OK        → cart, then file truncated       │
//! │                                                                         │
//! │  clear()           truncate, then check the length is 0                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A restored cart is not kept on disk: after a successful load the file is
//! emptied, and the shopper has to save again to keep it for next time.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use kassa_core::{Cart, Catalog};
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};

/// Handle to the persisted cart file.
#[derive(Debug, Clone)]
pub struct CartFile {
    path: PathBuf,
}

impl CartFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CartFile { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the cart, replacing any previous content.
    ///
    /// Creates the file and its parent directory if needed.
    pub fn save(&self, cart: &Cart) -> StoreResult<()> {
        debug!(path = %self.path.display(), entries = cart.len(), "Saving cart");

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }

        fs::write(&self.path, cart.to_persisted()).map_err(|e| StoreError::io(&self.path, e))?;

        info!(entries = cart.len(), "Cart saved");
        Ok(())
    }

    /// Restores the saved cart, keeping only products in `catalog`.
    ///
    /// ## Returns
    /// * `Ok(cart)` - Restored cart; empty when no file exists
    /// * `Err(Core(CorruptCartRecord))` - A malformed line; nothing restored
    /// * `Err(Io)` - The file exists but could not be read
    ///
    /// A failure to clear the file afterwards is logged, not returned.
    pub fn load(&self, catalog: &Catalog) -> StoreResult<Cart> {
        debug!(path = %self.path.display(), "Restoring saved cart");

        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No saved cart");
                return Ok(Cart::new());
            }
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };

        let cart = Cart::parse_persisted(&text, catalog)?;

        if let Err(e) = self.clear() {
            warn!(error = %e, "Saved cart could not be cleared after restore");
        }

        info!(entries = cart.len(), "Cart restored");
        Ok(cart)
    }

    /// Empties the file and verifies it is empty. A missing file is already clear.
    pub fn clear(&self) -> StoreResult<()> {
        let file = match OpenOptions::new().write(true).truncate(true).open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };

        let remaining = file
            .metadata()
            .map_err(|e| StoreError::io(&self.path, e))?
            .len();
        if remaining != 0 {
            return Err(StoreError::NotCleared {
                path: self.path.clone(),
                remaining,
            });
        }

        debug!(path = %self.path.display(), "Saved cart cleared");
        Ok(())
    }
}
