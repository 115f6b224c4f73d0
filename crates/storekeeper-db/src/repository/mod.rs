//! # Repository Module
//!
//! Database repository implementations for Storekeeper.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  Screen controller                                                     │
//! │       │                                                                 │
//! │       │  db.users().find_by_login("jdoe")                              │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  UserRepository                                                        │
//! │  ├── create(&self, new_user)                                           │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── stream_all(&self)         ← forward-only row cursor               │
//! │  ├── query(&self, filter)      ← typed equality predicates             │
//! │  └── exists(&self, id)                                                 │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Every repository offers the same base surface (create, update,        │
//! │  delete, get_by_id, list_all, stream_all, query, exists) plus          │
//! │  entity-specific finders.                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`address::AddressRepository`] - Postal address CRUD
//! - [`user::UserRepository`] - Back-office accounts and login lookup
//! - [`role::RoleRepository`] - Role aggregates with their permission sets
//! - [`store::StoreRepository`] - Stores with transactional address creation

pub mod address;
pub mod role;
pub mod store;
pub mod user;
