//! # storekeeper-core: Domain Layer for the Storekeeper Back-Office
//!
//! This crate is the **heart** of Storekeeper. It defines the entity model
//! and every business rule the management screens enforce, with zero storage
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Storekeeper Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 UI Layer (outside this workspace)               │   │
//! │  │    Role screen ──► Store screen ──► Auth screens               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ form structs / view state              │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              storekeeper-backoffice (controllers)               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ storekeeper-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌────────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │ validation │  │ password  │  │   error   │  │   │
//! │  │   │  Address  │  │   rules    │  │  argon2   │  │   typed   │  │   │
//! │  │   │ Role/User │  │   checks   │  │  digests  │  │  variants │  │   │
//! │  │   │   Store   │  └────────────┘  └───────────┘  └───────────┘  │   │
//! │  │   └───────────┘                                                 │   │
//! │  │                                                                 │   │
//! │  │   NO DATABASE • NO NETWORK • NO ASYNC                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 storekeeper-db (SQLite repositories)            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Entity records (Address, Permission, Role, User, Store)
//! - [`validation`] - Field validation rules shared by all screens
//! - [`password`] - Salted password hashing and verification
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: validation is deterministic - same input = same output
//! 2. **No I/O**: database and network access are FORBIDDEN here
//! 3. **Closed Permission Set**: permissions are a compile-time enumeration
//! 4. **Explicit Errors**: all errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod password;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use storekeeper_core::Role` instead of
// `use storekeeper_core::types::Role`

pub use error::{CoreError, ValidationError};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Largest postal code accepted by address forms.
///
/// ## Business Reason
/// Postal codes are five digits; anything longer is a typo, not a new
/// postal zone. The address form rejects values above this before any
/// persistence call is made.
pub const MAX_ZIP_CODE: u32 = 99_999;

/// Maximum length of a role or store name.
///
/// ## Business Reason
/// Names are business identifiers shown in list widgets; runaway lengths
/// are almost always paste accidents.
pub const MAX_NAME_LEN: usize = 64;

/// Maximum length accepted for an email address.
pub const MAX_EMAIL_LEN: usize = 254;
