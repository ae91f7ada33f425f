//! # Error Types
//!
//! Domain-specific error types for cantina-core.
//!
//! ## Error Hierarchy
//! ```text
//! cantina-core errors (this file)
//! ├── CoreError        - Business rule violations
//! └── ValidationError  - Input validation failures
//!
//! cantina-db errors (separate crate)
//! ├── DbError          - Database operation failures
//! ├── CheckoutError    - Checkout transaction outcomes
//! └── BackupError      - Archive export/import failures
//! ```
//!
//! ## Design Principles
//! 1. `thiserror` for derive macros, never manual impls
//! 2. Context in messages (product name, quantities)
//! 3. Enum variants, never stringly-typed errors

use thiserror::Error;

/// Business rule violations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Requested more units than the stock level read when the product was
    /// offered for sale.
    ///
    /// The available figure is the caller's last read, not a live lock;
    /// checkout trusts it (see the cart module docs).
    #[error("insufficient stock for {name}: available {available}, requested {requested}")]
    InsufficientStock {
        name: String,
        available: i64,
        requested: i64,
    },

    /// Validation failure (wraps ValidationError).
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Input validation errors.
///
/// These occur before any persistence: a validation failure always means
/// nothing was changed.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },
}

/// Convenience alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            name: "Agua 600ml".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "insufficient stock for Agua 600ml: available 3, requested 5"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::MustBePositive {
            field: "amount".to_string(),
        };
        assert_eq!(err.to_string(), "amount must be positive");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
