//! # Password Hashing
//!
//! Salted argon2 digests for user and store logins.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Password Lifecycle                                │
//! │                                                                         │
//! │  Creation:   plaintext ──► hash() ──► PHC string ──► password_hash     │
//! │                              │                          column          │
//! │                         random salt                                     │
//! │                                                                         │
//! │  Login:      plaintext ──► verify(plaintext, stored PHC) ──► bool      │
//! │                                                                         │
//! │  The plaintext is never stored and never leaves this module as         │
//! │  anything but a digest. Lookups by password are impossible: salted     │
//! │  digests are not equality-queryable, so authentication always loads    │
//! │  the account first and verifies second.                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};

use crate::error::CoreError;

/// Hashes a plaintext password into a PHC-format digest with a fresh salt.
///
/// ## Returns
/// A self-describing PHC string (`$argon2id$v=19$...`) carrying the salt
/// and parameters, suitable for the `password_hash` columns.
pub fn hash(plain: &str) -> Result<String, CoreError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let digest = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| CoreError::Hashing(format!("failed to hash password: {}", e)))?;

    Ok(digest.to_string())
}

/// Verifies a plaintext password against a stored PHC digest.
///
/// An unparseable digest verifies as `false` rather than erroring; a
/// corrupt column must never let a login through.
pub fn verify(plain: &str, phc_digest: &str) -> bool {
    let parsed = match PasswordHash::new(phc_digest) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok()
}

// =============================================================================
// Unit Tests
// =============================================================================
