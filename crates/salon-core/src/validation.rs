//! # Validation Module
//!
//! Business-rule checks for a sale before anything is written.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  item      required, not blank                                         │
//! │  quantity  ≥ 1                                                         │
//! │  price     ≥ 0, finite                                                 │
//! │  cost      ≥ 0, finite (unit cost)                                     │
//! │                                                                         │
//! │  date and customer are free text and never rejected.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use salon_core::validation::{validate_item_name, validate_quantity};
//!
//! assert!(validate_item_name("Haircut").is_ok());
//! assert!(validate_item_name("  ").is_err());
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Item names are keys into the catalog; a blank one can match nothing.
pub fn validate_item_name(item: &str) -> ValidationResult<()> {
    if item.trim().is_empty() {
        return Err(ValidationError::required("item"));
    }
    Ok(())
}

pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity < 1 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    Ok(())
}

/// Validates a money amount that may be zero (free services exist).
pub fn validate_amount(field: &str, amount: f64) -> ValidationResult<()> {
    if !amount.is_finite() {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "not a finite number".to_string(),
        });
    }
    if amount < 0.0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
