//! # storekeeper-backoffice: Management Screen Controllers
//!
//! This crate mediates between the back-office screens and the database
//! layer. Controllers are UI-agnostic: they take form structs in and hand
//! view data and typed errors back, so any shell can drive them.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Storekeeper Back-Office Flow                         │
//! │                                                                         │
//! │  Screens (list widgets, form fields, buttons)                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              storekeeper-backoffice (THIS CRATE)                │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────────┐   ┌───────────────┐   ┌─────────────────┐   │   │
//! │  │   │ AuthContext  │   │  Selection<T> │   │   controllers   │   │   │
//! │  │   │ (session.rs) │──►│ (selection.rs)│◄──│ (role.rs,       │   │   │
//! │  │   │              │   │ create / edit │   │  store.rs)      │   │   │
//! │  │   └──────────────┘   └───────────────┘   └────────┬────────┘   │   │
//! │  │                                                   │            │   │
//! │  │                     ┌─────────────────────────────▼────────┐   │   │
//! │  │                     │  BackofficeError (error.rs)          │   │   │
//! │  │                     │  field hints, duplicate names,       │   │   │
//! │  │                     │  missing managers, auth failures     │   │   │
//! │  │                     └──────────────────────────────────────┘   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  storekeeper-db repositories ──► SQLite                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`session`] - Login controllers and the authenticated context
//! - [`selection`] - The create-vs-edit selection state machine
//! - [`controllers`] - One controller per management screen
//! - [`error`] - The screen-facing error taxonomy
//!
//! ## Usage
//!
//! ```rust,ignore
//! use storekeeper_backoffice::{AuthContext, AuthController, StoreController, StoreForm};
//! use storekeeper_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("storekeeper.db")).await?;
//!
//! let auth = AuthController::new(db.clone());
//! let store = auth.login_store("Main Store", store_password).await?;
//! let user = auth.login_user("admin", user_password).await?;
//!
//! let mut stores = StoreController::new(db, AuthContext::new(store, user));
//! let list = stores.load_stores().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod controllers;
pub mod error;
pub mod selection;
pub mod session;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{BackofficeError, BackofficeResult};
pub use selection::Selection;
pub use session::{AuthContext, AuthController};

// Controller re-exports for convenience
pub use controllers::role::{PermissionLists, RoleController};
pub use controllers::store::{StoreController, StoreForm};
