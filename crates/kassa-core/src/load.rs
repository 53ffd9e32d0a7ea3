//! # Load Reports
//!
//! Bulk loads of the catalog and discount codes skip bad records instead of
//! failing. The skipped records are returned alongside the loaded value so the
//! caller can show or log them; the core never logs on its own.
//!
//! ```text
//!  text ──► parse ──► LoadReport { value, rejected: [RejectedLine, ...] }
//!                                   │         │
//!                                   │         └──► warn!/operator notice
//!                                   └──► Catalog / DiscountRegistry
//! ```

use serde::Serialize;
use std::fmt;

use crate::error::ValidationError;

/// One record that was skipped during a bulk load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedLine {
    /// 1-based line number in the source.
    pub line_number: usize,
    /// The raw line as read.
    pub content: String,
    pub error: ValidationError,
}

impl fmt::Display for RejectedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {} ('{}'): {}", self.line_number, self.content, self.error)
    }
}

impl Serialize for RejectedLine {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut s = serializer.serialize_struct("RejectedLine", 3)?;
        s.serialize_field("lineNumber", &self.line_number)?;
        s.serialize_field("content", &self.content)?;
        s.serialize_field("error", &self.error.to_string())?;
        s.end()
    }
}

/// The outcome of a skip-and-continue load.
#[derive(Debug, Clone)]
pub struct LoadReport<T> {
    pub value: T,
    pub rejected: Vec<RejectedLine>,
}

impl<T> LoadReport<T> {
    /// True when every record was accepted.
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }

    /// Drops the rejection list.
    pub fn into_value(self) -> T {
        self.value
    }
}

/// Yields `(line_number, line)` for every non-blank line.
pub(crate) fn non_blank_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line))
        .filter(|(_, line)| !line.trim().is_empty())
}
