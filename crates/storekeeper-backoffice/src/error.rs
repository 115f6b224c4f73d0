//! # Error Types
//!
//! Screen-level errors for the back-office controllers.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Translation Layers                             │
//! │                                                                         │
//! │  storekeeper-core              storekeeper-db                           │
//! │  ┌──────────────────┐          ┌──────────────────┐                    │
//! │  │ ValidationError  │          │ DbError          │                    │
//! │  │ CoreError        │          │ (NotFound,       │                    │
//! │  │ (Hashing)        │          │  UniqueViolation,│                    │
//! │  └────────┬─────────┘          │  ...)            │                    │
//! │           │                    └────────┬─────────┘                    │
//! │           │   From impls               │                               │
//! │           ▼                            ▼                               │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              BackofficeError (THIS FILE)                        │   │
//! │  │                                                                 │   │
//! │  │  + controller-only variants:                                    │   │
//! │  │    ManagerNotFound   referential lookup came back empty         │   │
//! │  │    AlreadyExists     duplicate-name scan hit a match            │   │
//! │  │    NoSelection       action needs a selected row                │   │
//! │  │    AuthenticationFailed   login or password wrong               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Screen shows the Display message next to the offending field          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use storekeeper_core::{CoreError, ValidationError};
use storekeeper_db::DbError;

// =============================================================================
// Backoffice Error
// =============================================================================

/// Errors surfaced to the management screens.
///
/// Every controller operation returns this type. The Display messages are
/// user-facing; screens can render them directly as field hints.
#[derive(Debug, Error)]
pub enum BackofficeError {
    /// A form field failed validation.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// A repository call failed.
    #[error("Database error: {0}")]
    Db(#[from] DbError),

    /// Password hashing failed while preparing a row for persistence.
    #[error("Password hashing failed: {0}")]
    Hashing(String),

    /// The manager field did not resolve to any account.
    ///
    /// ## When This Occurs
    /// The store form's manager text matched neither the credentials nor
    /// the email column of any user. Kept distinct from field validation
    /// so the screen can point at the manager field specifically.
    #[error("No user found with credentials or email '{0}'")]
    ManagerNotFound(String),

    /// A create was attempted with a name another row already uses.
    ///
    /// Raised by the controllers' duplicate scan, before the INSERT ever
    /// runs. The schema UNIQUE constraint backstops it as
    /// [`DbError::UniqueViolation`].
    #[error("{entity} '{name}' already exists")]
    AlreadyExists { entity: &'static str, name: String },

    /// An action that needs a selected row ran without one.
    #[error("No row is selected")]
    NoSelection,

    /// Login failed.
    ///
    /// Deliberately does not say whether the account exists or the
    /// password was wrong.
    #[error("Invalid login or password")]
    AuthenticationFailed,
}

impl From<CoreError> for BackofficeError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(inner) => BackofficeError::Validation(inner),
            CoreError::Hashing(message) => BackofficeError::Hashing(message),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with BackofficeError.
pub type BackofficeResult<T> = Result<T, BackofficeError>;

// =============================================================================
// Unit Tests
// =============================================================================
