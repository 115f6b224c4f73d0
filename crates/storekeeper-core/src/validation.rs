//! # Validation Module
//!
//! Field validation rules shared by every management screen.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Screen controller (storekeeper-backoffice)                   │
//! │  ├── Calls THIS MODULE field by field, in form order                   │
//! │  └── First failure aborts the submit, nothing is persisted             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Repository (storekeeper-db)                                  │
//! │  └── Typed parameters (zip codes already u32, hashes already PHC)      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  ├── UNIQUE constraints                                                │
//! │  └── CHECK (zip_code <= 99999)                                         │
//! │                                                                         │
//! │  Defense in depth: Multiple layers catch different errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,no_run
//! use storekeeper_core::validation::{parse_zip_code, validate_store_name};
//!
//! // Validate the name before any duplicate scan
//! validate_store_name("Lyon Part-Dieu").unwrap();
//!
//! // Parse the zip code field from raw form text
//! let zip = parse_zip_code("69003").unwrap();
//! ```

use crate::error::ValidationError;
use crate::{MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_ZIP_CODE};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Generic Field Validators
// =============================================================================

/// Requires a field to be non-empty after trimming.
///
/// ## Returns
/// The trimmed value, so callers persist exactly what was validated.
///
/// ## Example
/// ```rust
/// use storekeeper_core::validation::require_field;
///
/// assert_eq!(require_field("city", "  Lyon ").unwrap(), "Lyon");
/// assert!(require_field("city", "   ").is_err());
/// ```
pub fn require_field(field: &str, value: &str) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    Ok(value.to_string())
}

// =============================================================================
// Address Validators
// =============================================================================

/// Parses a zip code form field.
///
/// ## Rules
/// - Must not be empty
/// - Must parse as a non-negative integer
/// - Must not exceed [`MAX_ZIP_CODE`]
///
/// ## Example
/// ```rust
/// use storekeeper_core::validation::parse_zip_code;
///
/// assert_eq!(parse_zip_code("69003").unwrap(), 69_003);
/// assert!(parse_zip_code("ABCDE").is_err());
/// assert!(parse_zip_code("123456").is_err());
/// ```
pub fn parse_zip_code(text: &str) -> ValidationResult<u32> {
    let text = require_field("zip code", text)?;

    let zip: u32 = text.parse().map_err(|_| ValidationError::InvalidFormat {
        field: "zip code".to_string(),
        reason: "must be a whole number".to_string(),
    })?;

    if zip > MAX_ZIP_CODE {
        return Err(ValidationError::OutOfRange {
            field: "zip code".to_string(),
            min: 0,
            max: MAX_ZIP_CODE as i64,
        });
    }

    Ok(zip)
}

// =============================================================================
// Name Validators
// =============================================================================

/// Validates a store name.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most [`MAX_NAME_LEN`] characters
///
/// The duplicate scan against existing stores is the controller's job; this
/// function only checks the field in isolation.
pub fn validate_store_name(name: &str) -> ValidationResult<String> {
    validate_name("store name", name)
}

/// Validates a role name. Same rules as [`validate_store_name`].
pub fn validate_role_name(name: &str) -> ValidationResult<String> {
    validate_name("role name", name)
}

fn validate_name(field: &str, name: &str) -> ValidationResult<String> {
    let name = require_field(field, name)?;

    if name.len() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(name)
}

// =============================================================================
// Account Validators
// =============================================================================

/// Validates a password and its confirmation field together.
///
/// ## Rules
/// - Password must not be empty
/// - Confirmation must equal the password exactly (no trimming; spaces in
///   passwords are significant)
pub fn validate_passwords(password: &str, confirmation: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }

    if password != confirmation {
        return Err(ValidationError::Mismatch {
            field: "password confirmation".to_string(),
        });
    }

    Ok(())
}

/// Validates an email address.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most [`MAX_EMAIL_LEN`] characters
/// - Must contain exactly one `@` with non-empty local and domain parts
///
/// This is a form-level shape check, not RFC 5322 conformance.
pub fn validate_email(email: &str) -> ValidationResult<String> {
    let email = require_field("email", email)?;

    if email.len() > MAX_EMAIL_LEN {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: MAX_EMAIL_LEN,
        });
    }

    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    let domain = parts.next();

    match domain {
        Some(domain) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
            Ok(email)
        }
        _ => Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must look like name@domain".to_string(),
        }),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_field_trims_and_rejects_empty() {
        assert_eq!(require_field("city", "  Lyon ").unwrap(), "Lyon");
        assert!(matches!(
            require_field("city", ""),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            require_field("city", "   \t"),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_parse_zip_code_accepts_valid() {
        assert_eq!(parse_zip_code("0").unwrap(), 0);
        assert_eq!(parse_zip_code("69003").unwrap(), 69_003);
        assert_eq!(parse_zip_code(" 99999 ").unwrap(), 99_999);
    }

    #[test]
    fn test_parse_zip_code_rejects_non_numeric() {
        assert!(matches!(
            parse_zip_code("ABCDE"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            parse_zip_code("69 003"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            parse_zip_code("-1"),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_parse_zip_code_rejects_out_of_range() {
        assert!(matches!(
            parse_zip_code("123456"),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(matches!(
            parse_zip_code("100000"),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_validate_name_bounds() {
        assert_eq!(validate_store_name("Lyon Part-Dieu").unwrap(), "Lyon Part-Dieu");
        assert!(validate_role_name("").is_err());

        let long = "x".repeat(MAX_NAME_LEN + 1);
        assert!(matches!(
            validate_store_name(&long),
            Err(ValidationError::TooLong { .. })
        ));
    }

    #[test]
    fn test_validate_passwords() {
        assert!(validate_passwords("hunter2", "hunter2").is_ok());
        assert!(matches!(
            validate_passwords("hunter2", "hunter3"),
            Err(ValidationError::Mismatch { .. })
        ));
        assert!(matches!(
            validate_passwords("", ""),
            Err(ValidationError::Required { .. })
        ));
        // Whitespace is significant in passwords
        assert!(validate_passwords("a b", "a b").is_ok());
        assert!(validate_passwords("a b", "a b ").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert_eq!(validate_email("manager@example.com").unwrap(), "manager@example.com");
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("manager@").is_err());
        assert!(validate_email("a@b@c").is_err());

        let long = format!("{}@example.com", "x".repeat(MAX_EMAIL_LEN));
        assert!(matches!(
            validate_email(&long),
            Err(ValidationError::TooLong { .. })
        ));
    }
}
