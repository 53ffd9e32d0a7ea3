//! # Catalog File
//!
//! Reads `Products.txt`: one `name:description:price:unit` record per line.
//! The store only reads the file and logs; parsing rules live in
//! [`kassa_core::Catalog::parse`].

use std::fs;
use std::path::{Path, PathBuf};

use kassa_core::{Catalog, LoadReport};
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};

/// Handle to the product catalog file.
#[derive(Debug, Clone)]
pub struct CatalogFile {
    path: PathBuf,
}

impl CatalogFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CatalogFile { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the catalog.
    ///
    /// ## Returns
    /// * `Ok(report)` - Catalog plus the records that were skipped
    /// * `Err(CatalogUnavailable)` - The file could not be read
    /// * `Err(Core(EmptyCatalog))` - The file has no non-blank line
    pub fn load(&self) -> StoreResult<LoadReport<Catalog>> {
        debug!(path = %self.path.display(), "Reading product catalog");

        let text = fs::read_to_string(&self.path).map_err(|source| StoreError::CatalogUnavailable {
            path: self.path.clone(),
            source,
        })?;

        let report = Catalog::parse(&text)?;

        for rejected in &report.rejected {
            warn!(
                path = %self.path.display(),
                line = rejected.line_number,
                content = %rejected.content,
                error = %rejected.error,
                "Skipping product record"
            );
        }

        info!(
            products = report.value.len(),
            skipped = report.rejected.len(),
            "Product catalog loaded"
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kassa_core::{CoreError, ErrorKind};
    use tempfile::TempDir;

    #[test]
    fn test_load_catalog() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Products.txt");
        fs::write(&path, "bananer:Gula och goda:20:kg\nfel rad\nmjölk:Färsk:13:l\n").unwrap();

        let report = CatalogFile::new(&path).load().unwrap();

        assert_eq!(report.value.len(), 2);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].line_number, 2);
    }

    #[test]
    fn test_missing_catalog_is_fatal() {
        let dir = TempDir::new().unwrap();
        let err = CatalogFile::new(dir.path().join("Products.txt")).load().unwrap_err();

        assert!(matches!(err, StoreError::CatalogUnavailable { .. }));
        assert!(err.kind().is_fatal());
    }

    #[test]
    fn test_empty_catalog_is_fatal() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Products.txt");
        fs::write(&path, "\n\n").unwrap();

        let err = CatalogFile::new(&path).load().unwrap_err();

        assert!(matches!(err, StoreError::Core(CoreError::EmptyCatalog)));
        assert_eq!(err.kind(), ErrorKind::FatalConfig);
    }
}
