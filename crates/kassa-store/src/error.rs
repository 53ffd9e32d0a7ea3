//! # Store Error Types
//!
//! Error types for file persistence.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  std::io::Error              CoreError (parse failures)                │
//! │       │                            │                                    │
//! │       ▼                            ▼                                    │
//! │  StoreError (this module) ← Adds the file path and categorization      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  kassa-cli: fatal → exit, everything else → operator notice            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::io;
use std::path::{Path, PathBuf};

use kassa_core::{CoreError, ErrorKind};
use thiserror::Error;

/// File persistence errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The catalog file could not be read.
    ///
    /// ## When This Occurs
    /// - The file does not exist
    /// - File permissions issue
    /// - The file is not valid UTF-8
    #[error("Product catalog {} could not be read: {source}", .path.display())]
    CatalogUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Reading or writing a persistence file failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The cart file still had content after being truncated.
    #[error("Cart file {} was not cleared ({remaining} bytes left)", .path.display())]
    NotCleared { path: PathBuf, remaining: u64 },

    /// The file was read but its content was rejected.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl StoreError {
    /// Creates an Io error for the given path.
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        StoreError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// True for an Io error caused by a missing file.
    pub fn is_missing_file(&self) -> bool {
        matches!(self, StoreError::Io { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }

    /// Returns the taxonomy bucket for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::CatalogUnavailable { .. } => ErrorKind::FatalConfig,
            StoreError::Io { .. } | StoreError::NotCleared { .. } => ErrorKind::IoFailure,
            StoreError::Core(err) => err.kind(),
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
