//! # Domain Types
//!
//! Entity records used throughout Storekeeper.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Address      │   │      User       │   │     Store       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (rowid)     │   │  id (rowid)     │   │  id = name      │       │
//! │  │  zip_code       │   │  credentials    │   │  password_hash  │       │
//! │  │  city           │   │  email          │   │  address_id     │       │
//! │  │  street line    │   │  password_hash  │   │  manager_id?    │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │      Role       │   │   Permission    │                             │
//! │  │  ─────────────  │   │  ─────────────  │                             │
//! │  │  id (rowid)     │   │  closed enum    │                             │
//! │  │  name (unique)  │   │  ALL constant   │                             │
//! │  │  permissions    │   │  Ord = decl     │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity Pattern
//! Address, User and Role are keyed by their SQLite rowid (`i64`). Store is
//! the exception: its business name IS its primary key (`id: String`), so
//! renaming a store means creating a new one.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Permission
// =============================================================================

/// A single back-office capability.
///
/// The permission set is closed: it is a compile-time enumeration, not a
/// database table. Adding a capability means adding a variant here and
/// recompiling.
///
/// ## Ordering
/// `Ord` is derived, so permissions sort in declaration order. The role
/// editor relies on this to render its "available" list deterministically.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
pub enum Permission {
    /// Access to the sales screens (checkout, refunds).
    SalesManagement,
    /// Stock level consultation and adjustment.
    StockManagement,
    /// Product catalog maintenance.
    ProductManagement,
    /// Back-office account administration.
    UserManagement,
    /// Role creation and permission assignment.
    RoleManagement,
    /// Store creation, edition and deletion.
    StoreManagement,
    /// Employee schedule planning.
    PlanningManagement,
    /// Read access to sales statistics.
    StatisticsAccess,
}

impl Permission {
    /// Every permission, in declaration order.
    ///
    /// The role editor partitions this array into "has" / "has not" lists,
    /// so its order is what the operator sees on screen.
    pub const ALL: [Permission; 8] = [
        Permission::SalesManagement,
        Permission::StockManagement,
        Permission::ProductManagement,
        Permission::UserManagement,
        Permission::RoleManagement,
        Permission::StoreManagement,
        Permission::PlanningManagement,
        Permission::StatisticsAccess,
    ];

    /// Stable string tag, as stored in the `role_permissions` table.
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::SalesManagement => "sales_management",
            Permission::StockManagement => "stock_management",
            Permission::ProductManagement => "product_management",
            Permission::UserManagement => "user_management",
            Permission::RoleManagement => "role_management",
            Permission::StoreManagement => "store_management",
            Permission::PlanningManagement => "planning_management",
            Permission::StatisticsAccess => "statistics_access",
        }
    }

    /// Parses the stable string tag back into a permission.
    ///
    /// Returns `None` for unknown tags; callers decide whether an unknown
    /// tag in storage is an error or skippable.
    pub fn from_str_tag(tag: &str) -> Option<Permission> {
        Permission::ALL.into_iter().find(|p| p.as_str() == tag)
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Address
// =============================================================================

/// A postal address, owned by at most one store.
///
/// Addresses have their own table and rowid so a store edit can update the
/// address row in place without touching the store row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Address {
    /// SQLite rowid.
    pub id: i64,

    /// Five-digit postal code, validated against [`crate::MAX_ZIP_CODE`].
    pub zip_code: u32,

    /// City name.
    pub city: String,

    /// Street name and number as one free-form line.
    pub street_name_and_number: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Field set for creating an address; the row id and timestamps are
/// assigned by the repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAddress {
    pub zip_code: u32,
    pub city: String,
    pub street_name_and_number: String,
}

// =============================================================================
// User
// =============================================================================

/// A back-office account.
///
/// `credentials` is the login name typed at the auth screen; both it and
/// `email` are unique. The password is stored only as a salted PHC digest
/// and compared through [`crate::password::verify`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    /// SQLite rowid.
    pub id: i64,

    /// Login name, unique across accounts.
    pub credentials: String,

    /// Contact email, unique across accounts.
    pub email: String,

    /// Salted argon2 digest in PHC string format. Never a plaintext.
    pub password_hash: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Field set for creating a user account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub credentials: String,
    pub email: String,
    /// Already-hashed PHC digest; plaintexts never reach the repository.
    pub password_hash: String,
}

// =============================================================================
// Role
// =============================================================================

/// A named grouping of permissions.
///
/// The permission set lives in a join table and is rewritten as a whole on
/// every save, so `Role` is an aggregate: the row plus its set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// SQLite rowid.
    pub id: i64,

    /// Display name, unique across roles.
    pub name: String,

    /// Granted permissions. `BTreeSet` keeps iteration in declaration
    /// order via the derived `Ord` on [`Permission`].
    pub permissions: BTreeSet<Permission>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Role {
    /// Set containment check.
    pub fn has(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }
}

/// A role row without its permission set hydrated.
///
/// Forward-only role cursors yield this shape; use the repository's
/// hydrating reads to obtain full [`Role`] aggregates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct RoleRow {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Store
// =============================================================================

/// A physical sales location.
///
/// The store's business name is its primary key. Each store owns exactly
/// one address and optionally references one user as its manager; deleting
/// the store deletes neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Store {
    /// Business name, doubling as primary key.
    pub id: String,

    /// Salted argon2 digest for the store's own login.
    pub password_hash: String,

    /// Rowid of the owned address.
    pub address_id: i64,

    /// Rowid of the managing user account, if one is assigned.
    pub manager_id: Option<i64>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Field set for creating a store; the address is created in the same
/// transaction and its id filled in by the repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStore {
    /// Business name, also the primary key.
    pub id: String,
    /// Already-hashed PHC digest.
    pub password_hash: String,
    pub manager_id: Option<i64>,
}

/// A store joined with its address and manager for the detail pane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreDetails {
    pub store: Store,
    pub address: Address,
    pub manager: Option<User>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_all_is_declaration_order() {
        let mut sorted = Permission::ALL;
        sorted.sort();
        assert_eq!(sorted, Permission::ALL);
    }

    #[test]
    fn test_permission_tag_round_trip() {
        for permission in Permission::ALL {
            assert_eq!(
                Permission::from_str_tag(permission.as_str()),
                Some(permission)
            );
        }
        assert_eq!(Permission::from_str_tag("nonsense"), None);
    }

    #[test]
    fn test_btreeset_iterates_in_declaration_order() {
        let mut set = BTreeSet::new();
        set.insert(Permission::StoreManagement);
        set.insert(Permission::SalesManagement);
        set.insert(Permission::RoleManagement);

        let collected: Vec<Permission> = set.iter().copied().collect();
        assert_eq!(
            collected,
            vec![
                Permission::SalesManagement,
                Permission::RoleManagement,
                Permission::StoreManagement,
            ]
        );
    }

    #[test]
    fn test_role_has_is_set_containment() {
        let role = Role {
            id: 1,
            name: "Cashier".to_string(),
            permissions: [Permission::SalesManagement].into_iter().collect(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(role.has(Permission::SalesManagement));
        assert!(!role.has(Permission::StoreManagement));
    }

    #[test]
    fn test_permission_serde_uses_snake_case() {
        let json = serde_json::to_string(&Permission::StatisticsAccess).unwrap();
        assert_eq!(json, "\"statistics_access\"");

        let back: Permission = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Permission::StatisticsAccess);
    }

    #[test]
    fn test_store_serde_round_trip() {
        let store = Store {
            id: "Lyon Part-Dieu".to_string(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
            address_id: 7,
            manager_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_string(&store).unwrap();
        let back: Store = serde_json::from_str(&json).unwrap();
        assert_eq!(back, store);
    }
}
