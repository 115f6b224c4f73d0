//! # storekeeper-db: Database Layer for Storekeeper
//!
//! This crate provides database access for the Storekeeper back-office.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Storekeeper Data Flow                                │
//! │                                                                         │
//! │  Screen controller (e.g. StoreController::submit)                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  storekeeper-db (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ (address.rs,  │    │  (embedded)  │  │   │
//! │  │   │               │    │  user.rs,     │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│  role.rs,     │    │ 001_init.sql │  │   │
//! │  │   │ Connection    │    │  store.rs)    │    │              │  │   │
//! │  │   │ Management    │    └───────────────┘    └──────────────┘  │   │
//! │  │   └───────────────┘            │                               │   │
//! │  │                        ┌───────▼───────┐                       │   │
//! │  │                        │  filter.rs    │  typed predicates     │   │
//! │  │                        └───────────────┘                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (WAL mode, foreign keys on)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`filter`] - Typed equality-predicate query builder
//! - [`repository`] - One repository per entity (address, user, role, store)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use storekeeper_db::{Database, DbConfig};
//!
//! let config = DbConfig::new("path/to/storekeeper.db");
//! let db = Database::new(config).await?;
//!
//! // Use repositories
//! let roles = db.roles().list_all().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod filter;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::address::AddressRepository;
pub use repository::role::RoleRepository;
pub use repository::store::StoreRepository;
pub use repository::user::UserRepository;
