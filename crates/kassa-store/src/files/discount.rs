//! # Discount File
//!
//! Reads `Discount.txt`: one code per line.

use std::fs;
use std::path::{Path, PathBuf};

use kassa_core::{DiscountRegistry, LoadReport};
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};

/// Handle to the discount code file.
#[derive(Debug, Clone)]
pub struct DiscountFile {
    path: PathBuf,
}

impl DiscountFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DiscountFile { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the registry. Invalid codes are logged and skipped.
    ///
    /// A missing file is an `Io` error; see [`StoreError::is_missing_file`].
    pub fn load(&self) -> StoreResult<LoadReport<DiscountRegistry>> {
        debug!(path = %self.path.display(), "Reading discount codes");

        let text = fs::read_to_string(&self.path).map_err(|e| StoreError::io(&self.path, e))?;
        let report = DiscountRegistry::parse(&text);

        for rejected in &report.rejected {
            warn!(
                path = %self.path.display(),
                line = rejected.line_number,
                content = %rejected.content,
                error = %rejected.error,
                "Skipping discount code"
            );
        }

        info!(
            codes = report.value.len(),
            skipped = report.rejected.len(),
            "Discount codes loaded"
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_codes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Discount.txt");
        fs::write(&path, "A1B2\nAB1\nC3D4\n").unwrap();

        let report = DiscountFile::new(&path).load().unwrap();

        assert!(report.value.contains("A1B2"));
        assert!(report.value.contains("C3D4"));
        assert!(!report.value.contains("AB1"));
        assert_eq!(report.rejected.len(), 1);
    }

    #[test]
    fn test_empty_file_gives_empty_registry() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Discount.txt");
        fs::write(&path, "").unwrap();

        let report = DiscountFile::new(&path).load().unwrap();
        assert!(report.value.is_empty());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = DiscountFile::new(dir.path().join("Discount.txt")).load().unwrap_err();

        assert!(err.is_missing_file());
        assert!(!err.kind().is_fatal());
    }
}
