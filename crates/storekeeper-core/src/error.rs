//! # Error Types
//!
//! Domain-specific error types for storekeeper-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  storekeeper-core errors (this file)                                   │
//! │  ├── CoreError        - Domain-level failures (hashing, rules)         │
//! │  └── ValidationError  - Form field validation failures                 │
//! │                                                                         │
//! │  storekeeper-db errors (separate crate)                                │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  storekeeper-backoffice errors (separate crate)                        │
//! │  └── BackofficeError  - What the screens see (wraps the above)         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → BackofficeError → UI    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field name, offending value)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent domain failures that are not simple field
/// validation problems. They should be caught and translated to
/// user-friendly messages by the screen layer.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Password hashing or digest parsing failed.
    ///
    /// ## When This Occurs
    /// - The OS random source is unavailable during salt generation
    /// - A stored digest is not a parseable PHC string
    #[error("Password hashing failed: {0}")]
    Hashing(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when form input doesn't meet requirements.
/// Used for early validation before any repository call runs.
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

    /// Invalid format (e.g., non-numeric zip code).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Two fields that must agree do not (password and its confirmation).
    #[error("{field} does not match")]
    Mismatch { field: String },
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
        let err = ValidationError::Required {
            field: "city".to_string(),
        };
        assert_eq!(err.to_string(), "city is required");

        let err = ValidationError::OutOfRange {
            field: "zip code".to_string(),
            min: 0,
            max: 99_999,
        };
        assert_eq!(err.to_string(), "zip code must be between 0 and 99999");

        let err = ValidationError::Mismatch {
            field: "password confirmation".to_string(),
        };
        assert_eq!(err.to_string(), "password confirmation does not match");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Mismatch {
            field: "password confirmation".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
