//! # Error Types
//!
//! Domain-specific error types for salon-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  salon-core errors (this file)                                         │
//! │  ├── CoreError        - General domain errors                          │
//! │  ├── ValidationError  - Sale input validation failures                 │
//! │  └── ParseError       - A ledger row that fits no known layout         │
//! │                                                                         │
//! │  salon-store errors (separate crate)                                   │
//! │  └── StoreError       - File, JSON and CSV failures                    │
//! │                                                                         │
//! │  CLI errors (in app)                                                   │
//! │  └── CliError         - What the operator sees                         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → StoreError → CliError             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `ParseError` never reaches the caller of a report. The normalizer turns it
//! into a [`SkippedRow`](crate::ledger::SkippedRow) so one bad line cannot
//! zero out a whole dashboard.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A record looked up by name or position does not exist.
    #[error("{entity} not found: {key}")]
    NotFound { entity: String, key: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates a NotFound error for a given entity type and key.
    pub fn not_found(entity: impl Into<String>, key: impl Into<String>) -> Self {
        CoreError::NotFound {
            entity: entity.into(),
            key: key.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// The Sale Recorder is the only path in the system that rejects input, so
/// these are the only errors an operator ever sees as a hard failure.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be at least one.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be below zero.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Invalid format (e.g. a price that is not a number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }
}

// =============================================================================
// Ledger Parse Error
// =============================================================================

/// Why a raw ledger row did not fit a particular layout.
///
/// One of these is produced per failed layout attempt; the reader only
/// reports the last one when every attempt fails.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ParseError {
    /// The row has the wrong number of fields for the layout.
    #[error("expected {expected} columns, found {found}")]
    ColumnCount { expected: usize, found: usize },

    /// The category column holds something that is not a category.
    #[error("unrecognized category '{value}'")]
    UnrecognizedCategory { value: String },

    /// The promotion id column holds something that is not an integer.
    #[error("invalid promotion id '{value}'")]
    InvalidPromotionId { value: String },

    /// Every field in the row is blank.
    #[error("row is empty")]
    EmptyRow,
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::required("item");
        assert_eq!(err.to_string(), "item is required");

        let err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        assert_eq!(err.to_string(), "quantity must be positive");
    }

    #[test]
    fn test_parse_error_messages() {
        let err = ParseError::ColumnCount {
            expected: 8,
            found: 5,
        };
        assert_eq!(err.to_string(), "expected 8 columns, found 5");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::required("item").into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
