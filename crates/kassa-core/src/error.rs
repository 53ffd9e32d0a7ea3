//! # Error Types
//!
//! Domain-specific error types for kassa-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  kassa-core errors (this file)                                         │
//! │  ├── CoreError        - Domain and state-transition errors             │
//! │  └── ValidationError  - A single field or record failed its rules      │
//! │                                                                         │
//! │  kassa-store errors (separate crate)                                   │
//! │  └── StoreError       - File access failures, wraps CoreError          │
//! │                                                                         │
//! │  Every error maps onto one ErrorKind:                                  │
//! │                                                                         │
//! │    FatalConfig      empty or unreadable catalog → abort startup        │
//! │    Validation       bad catalog/discount record → skip, keep loading   │
//! │    CartLoadCorrupt  bad cart record → abort the whole cart load        │
//! │    NotFound         unknown product, product not in cart               │
//! │    IoFailure        read/write failure on a persistence file           │
//! │    Rejected         operation refused in the current state             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use thiserror::Error;

use crate::types::ShoppingMode;

// =============================================================================
// Error Kind
// =============================================================================

/// Coarse classification used by callers to pick a recovery strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Startup cannot continue.
    FatalConfig,
    /// A record failed validation; the record is skipped.
    Validation,
    /// The persisted cart is corrupt; nothing from it is used.
    CartLoadCorrupt,
    /// A referenced product or cart entry does not exist.
    NotFound,
    /// A persistence file could not be read or written.
    IoFailure,
    /// The operation is not allowed in the current session state.
    Rejected,
}

impl ErrorKind {
    /// True when the containing process should stop.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ErrorKind::FatalConfig)
    }
}

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The catalog source contained no usable line.
    #[error("Product catalog is empty or missing")]
    EmptyCatalog,

    /// No product with this name exists in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// The product is not in the cart.
    ///
    /// ## When This Occurs
    /// - Removing a product that was never added
    /// - Removing a product after an earlier remove already dropped it
    #[error("Product {0} is not in the cart")]
    NotInCart(String),

    /// A persisted cart record could not be parsed.
    #[error("Corrupt cart record on line {line_number}: {reason}")]
    CorruptCartRecord { line_number: usize, reason: String },

    /// Adding would overflow the stored quantity.
    #[error("Quantity for {product} would overflow")]
    QuantityOverflow { product: String },

    /// Checkout requested with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Operation requires a different shopping mode.
    #[error("Operation requires {expected} mode, session is {actual}")]
    InvalidMode {
        expected: ShoppingMode,
        actual: ShoppingMode,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Returns the taxonomy bucket for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::EmptyCatalog => ErrorKind::FatalConfig,
            CoreError::ProductNotFound(_) | CoreError::NotInCart(_) => ErrorKind::NotFound,
            CoreError::CorruptCartRecord { .. } => ErrorKind::CartLoadCorrupt,
            CoreError::QuantityOverflow { .. } | CoreError::Validation(_) => ErrorKind::Validation,
            CoreError::EmptyCart | CoreError::InvalidMode { .. } => ErrorKind::Rejected,
        }
    }

    /// Creates a CorruptCartRecord error.
    pub fn corrupt_cart(line_number: usize, reason: impl Into<String>) -> Self {
        CoreError::CorruptCartRecord {
            line_number,
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised for a single field or a single text record. During bulk loads
/// these are collected per line instead of aborting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (not an integer, wrong code pattern, ...).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Record does not have the expected number of fields.
    #[error("record has {found} fields, expected {expected}")]
    FieldCount { expected: usize, found: usize },

    /// Duplicate value (e.g., duplicate product name).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

impl ValidationError {
    pub(crate) fn required(field: &str) -> Self {
        ValidationError::Required {
            field: field.to_string(),
        }
    }

    pub(crate) fn must_be_positive(field: &str) -> Self {
        ValidationError::MustBePositive {
            field: field.to_string(),
        }
    }

    pub(crate) fn invalid_format(field: &str, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
