//! # Role Controller
//!
//! Screen controller for role management.
//!
//! ## Screen Layout and Bindings
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Role Management Screen                              │
//! │                                                                         │
//! │  ┌──────────────┐   ┌────────────────────┐  ┌────────────────────┐     │
//! │  │  Role list   │   │  Granted           │  │  Not granted       │     │
//! │  │  ──────────  │   │  ────────          │  │  ───────────       │     │
//! │  │  Admin       │   │  sales_management  │  │  role_management   │     │
//! │  │ ▶Cashier     │   │  ...               │  │  ...               │     │
//! │  └──────┬───────┘   └─────────▲──────────┘  └─────────▲──────────┘     │
//! │         │                     │  grant / revoke       │                │
//! │         │ select(role)        └───────────┬───────────┘                │
//! │         ▼                                 │                            │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  RoleController                                                 │   │
//! │  │  - every grant/revoke saves the role immediately                │   │
//! │  │  - the two lists are always an exact partition of the           │   │
//! │  │    permission universe, rebuilt after each change               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use futures_util::StreamExt;
use tracing::{debug, info};

use crate::error::{BackofficeError, BackofficeResult};
use crate::selection::Selection;
use crate::session::AuthContext;
use storekeeper_core::validation::validate_role_name;
use storekeeper_core::{Permission, Role};
use storekeeper_db::Database;

// =============================================================================
// View Data
// =============================================================================

/// The two permission list widgets, as an exact partition.
///
/// `has` holds the selected role's permissions, `has_not` the rest of the
/// permission universe. Both are in declaration order, and together they
/// always cover every [`Permission`] exactly once.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionLists {
    pub has: Vec<Permission>,
    pub has_not: Vec<Permission>,
}

impl PermissionLists {
    fn for_role(role: &Role) -> Self {
        PermissionLists {
            has: role.permissions.iter().copied().collect(),
            has_not: Permission::ALL
                .into_iter()
                .filter(|permission| !role.permissions.contains(permission))
                .collect(),
        }
    }
}

// =============================================================================
// Role Controller
// =============================================================================

/// Controller for the role management screen.
#[derive(Debug)]
pub struct RoleController {
    db: Database,
    context: AuthContext,
    selection: Selection<Role>,
}

impl RoleController {
    /// Creates a controller bound to an authenticated session.
    pub fn new(db: Database, context: AuthContext) -> Self {
        RoleController {
            db,
            context,
            selection: Selection::default(),
        }
    }

    /// The session this controller operates in.
    pub fn context(&self) -> &AuthContext {
        &self.context
    }

    /// Loads every role for the list widget.
    pub async fn load_roles(&self) -> BackofficeResult<Vec<Role>> {
        Ok(self.db.roles().list_all().await?)
    }

    /// Creates a role from the name field and selects it.
    ///
    /// ## Rules
    /// 1. Name must be non-empty (trimmed) and within length bounds
    /// 2. No existing role may share the name (forward scan, first match
    ///    aborts)
    /// 3. The role starts with an empty permission set
    ///
    /// ## Returns
    /// The refreshed role list. The created role becomes the selection.
    pub async fn create_role(&mut self, name: &str) -> BackofficeResult<Vec<Role>> {
        let name = validate_role_name(name)?;

        let repo = self.db.roles();
        let mut rows = repo.stream_all();
        while let Some(row) = rows.next().await {
            if row?.name == name {
                debug!(name = %name, "Duplicate role name");
                return Err(BackofficeError::AlreadyExists {
                    entity: "Role",
                    name,
                });
            }
        }
        drop(rows);

        let created = self.db.roles().create(&name).await?;
        info!(
            actor = %self.context.user().credentials,
            role = %created.name,
            "Created role"
        );

        let roles = self.db.roles().list_all().await?;
        self.selection.select(created);
        Ok(roles)
    }

    /// Deletes the selected role and clears the selection.
    ///
    /// ## Returns
    /// The refreshed role list. Both permission lists become empty because
    /// nothing is selected afterwards.
    pub async fn delete_selected(&mut self) -> BackofficeResult<Vec<Role>> {
        let role = self.selection.selected().ok_or(BackofficeError::NoSelection)?;
        let id = role.id;

        self.db.roles().delete(id).await?;
        info!(
            actor = %self.context.user().credentials,
            role_id = id,
            "Deleted role"
        );

        self.selection.clear();
        Ok(self.db.roles().list_all().await?)
    }

    /// Selects a role; the permission lists repopulate from it.
    pub fn select(&mut self, role: Role) {
        self.selection.select(role);
    }

    /// Clears the selection.
    pub fn deselect(&mut self) {
        self.selection.clear();
    }

    /// Returns the selected role, if any.
    pub fn selected(&self) -> Option<&Role> {
        self.selection.selected()
    }

    /// Grants a permission to the selected role and saves it immediately.
    ///
    /// ## Returns
    /// The recomputed permission lists after the save lands.
    pub async fn grant_selected(
        &mut self,
        permission: Permission,
    ) -> BackofficeResult<PermissionLists> {
        self.change_selected(permission, true).await
    }

    /// Revokes a permission from the selected role and saves it immediately.
    pub async fn revoke_selected(
        &mut self,
        permission: Permission,
    ) -> BackofficeResult<PermissionLists> {
        self.change_selected(permission, false).await
    }

    /// Recomputes the two permission list widgets from the selection.
    pub fn permission_lists(&self) -> BackofficeResult<PermissionLists> {
        let role = self.selection.selected().ok_or(BackofficeError::NoSelection)?;
        Ok(PermissionLists::for_role(role))
    }

    /// Applies one permission change and persists the whole role.
    ///
    /// The selection is only replaced once the save has been acknowledged,
    /// so a failed write leaves the screen showing the stored state.
    async fn change_selected(
        &mut self,
        permission: Permission,
        grant: bool,
    ) -> BackofficeResult<PermissionLists> {
        let role = self.selection.selected().ok_or(BackofficeError::NoSelection)?;

        let mut updated = role.clone();
        if grant {
            updated.permissions.insert(permission);
        } else {
            updated.permissions.remove(&permission);
        }

        self.db.roles().update(&updated).await?;
        debug!(
            role = %updated.name,
            permission = %permission,
            grant,
            "Saved permission change"
        );

        let lists = PermissionLists::for_role(&updated);
        self.selection.select(updated);
        Ok(lists)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
