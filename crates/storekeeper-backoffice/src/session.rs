//! # Session and Authentication
//!
//! Builds the authenticated context the management controllers run under.
//!
//! ## Login Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Opening a Back-Office Session                      │
//! │                                                                         │
//! │  Store screen: store name + store password                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  AuthController::login_store() ──► load row ──► verify digest          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  User screen: credentials or email + account password                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  AuthController::login_user() ──► load row ──► verify digest           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  AuthContext { store, user } ──► injected into every controller        │
//! │                                                                         │
//! │  Both steps fail with the same AuthenticationFailed error whether      │
//! │  the row is missing or the password is wrong.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::{debug, info};

use crate::error::{BackofficeError, BackofficeResult};
use storekeeper_core::{password, Store, User};
use storekeeper_db::Database;

// =============================================================================
// Auth Context
// =============================================================================

/// The authenticated session a controller operates in.
///
/// Built once at login and handed to each controller at construction.
/// Read-only afterwards; switching store or account means logging in again.
#[derive(Debug, Clone)]
pub struct AuthContext {
    store: Store,
    user: User,
}

impl AuthContext {
    /// Creates a context from an authenticated store and user.
    pub fn new(store: Store, user: User) -> Self {
        AuthContext { store, user }
    }

    /// The store this session is bound to.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// The account performing the session's actions.
    pub fn user(&self) -> &User {
        &self.user
    }
}

// =============================================================================
// Auth Controller
// =============================================================================

/// Controller for the two login screens.
#[derive(Debug, Clone)]
pub struct AuthController {
    db: Database,
}

impl AuthController {
    /// Creates a new AuthController.
    pub fn new(db: Database) -> Self {
        AuthController { db }
    }

    /// Authenticates a user account.
    ///
    /// The login text matches either the credentials or the email column,
    /// the same lookup the store form's manager field uses.
    ///
    /// ## Returns
    /// * `Ok(User)` - Authenticated account
    /// * `Err(BackofficeError::AuthenticationFailed)` - Unknown login or
    ///   wrong password (indistinguishable on purpose)
    pub async fn login_user(&self, login: &str, password_text: &str) -> BackofficeResult<User> {
        debug!(login = %login, "User login attempt");

        let Some(user) = self.db.users().find_by_login(login).await? else {
            return Err(BackofficeError::AuthenticationFailed);
        };

        if !password::verify(password_text, &user.password_hash) {
            return Err(BackofficeError::AuthenticationFailed);
        }

        info!(credentials = %user.credentials, "User authenticated");
        Ok(user)
    }

    /// Authenticates a store by name and store password.
    pub async fn login_store(&self, store_id: &str, password_text: &str) -> BackofficeResult<Store> {
        debug!(store = %store_id, "Store login attempt");

        let Some(store) = self.db.stores().get_by_id(store_id).await? else {
            return Err(BackofficeError::AuthenticationFailed);
        };

        if !password::verify(password_text, &store.password_hash) {
            return Err(BackofficeError::AuthenticationFailed);
        }

        info!(store = %store.id, "Store authenticated");
        Ok(store)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
