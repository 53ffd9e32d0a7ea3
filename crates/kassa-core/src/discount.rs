//! # Discount Codes
//!
//! The registry of valid, unused promotional codes plus the per-session
//! discount state.
//!
//! ## Code Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Discount.txt ──► DiscountRegistry (set of valid codes)                 │
//! │                         │                                               │
//! │              try_apply("A1B2")                                          │
//! │                         │                                               │
//! │                         ▼                                               │
//! │  DiscountState { used_code: Some(A1B2) }   ← code still in registry    │
//! │                         │                                               │
//! │                  complete_payment                                       │
//! │                         │                                               │
//! │                         ▼                                               │
//! │  registry.redeem(A1B2)  ← removed for good, state reset                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! At most one code can be active. Applying only marks the state; the code
//! is consumed at payment.

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

use crate::error::ValidationError;
use crate::load::{non_blank_lines, LoadReport, RejectedLine};
use crate::validation::validate_discount_code;

// =============================================================================
// Discount Code
// =============================================================================

/// A syntactically valid discount code, e.g. `A1B2`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct DiscountCode(String);

impl DiscountCode {
    /// Validates and wraps a code.
    pub fn parse(code: &str) -> Result<Self, ValidationError> {
        validate_discount_code(code)?;
        Ok(DiscountCode(code.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DiscountCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Discount State
// =============================================================================

/// The discount active in the current session, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountState {
    used_code: Option<DiscountCode>,
}

impl DiscountState {
    pub fn has_discount(&self) -> bool {
        self.used_code.is_some()
    }

    /// The applied code, kept until payment completes.
    pub fn used_code(&self) -> Option<&DiscountCode> {
        self.used_code.as_ref()
    }

    /// Clears the active discount.
    pub fn reset(&mut self) {
        self.used_code = None;
    }
}

// =============================================================================
// Apply Outcome
// =============================================================================

/// Result of trying to apply a code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyOutcome {
    /// The code is valid and now active.
    Applied,
    /// A code is already active; nothing changed.
    AlreadyHasDiscount,
    /// Non-empty input that is not a known, unused code.
    Invalid,
    /// Empty input; nothing to do.
    Empty,
}

impl ApplyOutcome {
    /// Operator message for this outcome. `Empty` is silent.
    pub const fn notice(&self) -> Option<&'static str> {
        match self {
            ApplyOutcome::Applied => Some("Din rabattkod har lagts till!"),
            ApplyOutcome::AlreadyHasDiscount => Some("Du har redan lagt till en rabattkod"),
            ApplyOutcome::Invalid => Some("Felaktig rabattkod."),
            ApplyOutcome::Empty => None,
        }
    }

    /// Whether the code input field should be emptied afterwards.
    pub const fn clears_input(&self) -> bool {
        true
    }

    pub const fn is_applied(&self) -> bool {
        matches!(self, ApplyOutcome::Applied)
    }
}

// =============================================================================
// Registry
// =============================================================================

/// Valid, unused discount codes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiscountRegistry {
    codes: BTreeSet<DiscountCode>,
}

impl DiscountRegistry {
    /// Parses one code per line. Invalid lines are reported and skipped,
    /// repeated codes collapse into one entry.
    ///
    /// ## Example
    /// ```rust
    /// use kassa_core::DiscountRegistry;
    ///
    /// let report = DiscountRegistry::parse("AB1\nA1B2\n");
    /// assert!(report.value.contains("A1B2"));
    /// assert!(!report.value.contains("AB1"));
    /// assert_eq!(report.rejected.len(), 1);
    /// ```
    pub fn parse(text: &str) -> LoadReport<DiscountRegistry> {
        let mut registry = DiscountRegistry::default();
        let mut rejected = Vec::new();

        for (line_number, line) in non_blank_lines(text) {
            match DiscountCode::parse(line.trim()) {
                Ok(code) => {
                    registry.codes.insert(code);
                }
                Err(error) => rejected.push(RejectedLine {
                    line_number,
                    content: line.to_string(),
                    error,
                }),
            }
        }

        LoadReport {
            value: registry,
            rejected,
        }
    }

    /// Tries to activate `code` for the session.
    ///
    /// ## Decision Order
    /// ```text
    /// discount already active?      → AlreadyHasDiscount  (state unchanged)
    /// code in registry?             → Applied             (state marked)
    /// code non-empty?               → Invalid             (state unchanged)
    /// otherwise                     → Empty               (state unchanged)
    /// ```
    pub fn try_apply(&self, code: &str, state: &mut DiscountState) -> ApplyOutcome {
        if state.has_discount() {
            return ApplyOutcome::AlreadyHasDiscount;
        }

        if let Some(found) = self.codes.iter().find(|c| c.as_str() == code) {
            state.used_code = Some(found.clone());
            return ApplyOutcome::Applied;
        }

        if code.is_empty() {
            ApplyOutcome::Empty
        } else {
            ApplyOutcome::Invalid
        }
    }

    /// Removes a used code permanently. Returns false if it was not present.
    pub fn redeem(&mut self, code: &DiscountCode) -> bool {
        self.codes.remove(code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.codes.iter().any(|c| c.as_str() == code)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DiscountCode> {
        self.codes.iter()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(text: &str) -> DiscountRegistry {
        DiscountRegistry::parse(text).value
    }

    #[test]
    fn test_parse_accepts_valid_and_reports_invalid() {
        let report = DiscountRegistry::parse("A1B2\nAB1\nC3D4\nc3d4\n\nZZZZ\n");

        assert_eq!(report.value.len(), 2);
        assert!(report.value.contains("A1B2"));
        assert!(report.value.contains("C3D4"));

        let lines: Vec<_> = report.rejected.iter().map(|r| r.line_number).collect();
        assert_eq!(lines, vec![2, 4, 6]);
    }

    #[test]
    fn test_three_character_code_rejected() {
        let report = DiscountRegistry::parse("AB1");
        assert!(report.value.is_empty());
        assert_eq!(report.rejected[0].content, "AB1");
    }

    #[test]
    fn test_duplicate_codes_collapse() {
        assert_eq!(registry("A1B2\nA1B2\n").len(), 1);
    }

    #[test]
    fn test_apply_valid_code() {
        let codes = registry("A1B2");
        let mut state = DiscountState::default();

        let outcome = codes.try_apply("A1B2", &mut state);

        assert_eq!(outcome, ApplyOutcome::Applied);
        assert!(state.has_discount());
        assert_eq!(state.used_code().map(DiscountCode::as_str), Some("A1B2"));
        // Applying does not consume the code
        assert!(codes.contains("A1B2"));
    }

    #[test]
    fn test_second_apply_never_changes_used_code() {
        let codes = registry("A1B2\nC3D4");
        let mut state = DiscountState::default();
        codes.try_apply("A1B2", &mut state);

        for attempt in ["C3D4", "A1B2", "NOPE", ""] {
            let outcome = codes.try_apply(attempt, &mut state);
            assert_eq!(outcome, ApplyOutcome::AlreadyHasDiscount);
            assert_eq!(state.used_code().map(DiscountCode::as_str), Some("A1B2"));
        }
    }

    #[test]
    fn test_invalid_and_empty_leave_state_unchanged() {
        let codes = registry("A1B2");
        let mut state = DiscountState::default();

        assert_eq!(codes.try_apply("X9X9", &mut state), ApplyOutcome::Invalid);
        assert!(!state.has_discount());

        assert_eq!(codes.try_apply("", &mut state), ApplyOutcome::Empty);
        assert!(!state.has_discount());
    }

    #[test]
    fn test_notices() {
        assert_eq!(
            ApplyOutcome::Applied.notice(),
            Some("Din rabattkod har lagts till!")
        );
        assert_eq!(ApplyOutcome::Invalid.notice(), Some("Felaktig rabattkod."));
        assert_eq!(ApplyOutcome::Empty.notice(), None);
        assert!(ApplyOutcome::AlreadyHasDiscount.clears_input());
    }

    #[test]
    fn test_redeem_removes_code() {
        let mut codes = registry("A1B2");
        let code = DiscountCode::parse("A1B2").unwrap();

        assert!(codes.redeem(&code));
        assert!(!codes.contains("A1B2"));
        assert!(!codes.redeem(&code));

        let mut state = DiscountState::default();
        assert_eq!(codes.try_apply("A1B2", &mut state), ApplyOutcome::Invalid);
    }

    #[test]
    fn test_reset_state() {
        let codes = registry("A1B2");
        let mut state = DiscountState::default();
        codes.try_apply("A1B2", &mut state);

        state.reset();
        assert!(!state.has_discount());
        assert!(state.used_code().is_none());
    }
}
