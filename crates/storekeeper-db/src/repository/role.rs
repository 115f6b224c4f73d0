//! # Role Repository
//!
//! Database operations for roles and their permission sets.
//!
//! ## Role as an Aggregate
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Role Persistence Shape                             │
//! │                                                                         │
//! │  roles                      role_permissions                            │
//! │  ┌────┬─────────┐          ┌─────────┬───────────────────┐             │
//! │  │ id │ name    │          │ role_id │ permission        │             │
//! │  ├────┼─────────┤          ├─────────┼───────────────────┤             │
//! │  │  1 │ Admin   │◄─────────│    1    │ role_management   │             │
//! │  │  2 │ Cashier │          │    1    │ store_management  │             │
//! │  └────┴─────────┘          │    2    │ sales_management  │             │
//! │                            └─────────┴───────────────────┘             │
//! │                                                                         │
//! │  update() rewrites the whole permission set (DELETE then INSERT)       │
//! │  inside one transaction, so a role row and its set can never be        │
//! │  observed half-saved.                                                   │
//! │                                                                         │
//! │  stream_all() yields bare RoleRow records (no join-table read per      │
//! │  row); get_by_id() and list_all() return hydrated Role aggregates.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::{BTreeSet, HashMap};

use chrono::Utc;
use futures_util::stream::BoxStream;
use futures_util::{StreamExt, TryStreamExt};
use sqlx::{QueryBuilder, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::filter::{Filter, RoleColumn};
use storekeeper_core::{Permission, Role, RoleRow};

const ROLE_COLUMNS: &str = "id, name, created_at, updated_at";

/// Repository for role database operations.
#[derive(Debug, Clone)]
pub struct RoleRepository {
    pool: SqlitePool,
}

impl RoleRepository {
    /// Creates a new RoleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        RoleRepository { pool }
    }

    /// Inserts a new role with an empty permission set.
    ///
    /// ## Returns
    /// * `Ok(Role)` - Inserted role with its assigned rowid
    /// * `Err(DbError::UniqueViolation)` - Role name already taken
    pub async fn create(&self, name: &str) -> DbResult<Role> {
        debug!(name = %name, "Inserting role");

        let now = Utc::now();

        let result = sqlx::query(
            "INSERT INTO roles (name, created_at, updated_at) VALUES (?1, ?2, ?3)",
        )
        .bind(name)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(Role {
            id: result.last_insert_rowid(),
            name: name.to_string(),
            permissions: BTreeSet::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Saves a role row and rewrites its permission set.
    ///
    /// The whole aggregate is written in one transaction: the row update,
    /// the join-table DELETE and the per-permission INSERTs either all
    /// land or none do.
    pub async fn update(&self, role: &Role) -> DbResult<()> {
        debug!(
            id = role.id,
            permissions = role.permissions.len(),
            "Updating role"
        );

        let now = Utc::now();

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("UPDATE roles SET name = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(role.id)
            .bind(&role.name)
            .bind(now)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            // Dropping the transaction rolls it back
            return Err(DbError::not_found("Role", role.id));
        }

        sqlx::query("DELETE FROM role_permissions WHERE role_id = ?1")
            .bind(role.id)
            .execute(&mut *tx)
            .await?;

        for permission in &role.permissions {
            sqlx::query("INSERT INTO role_permissions (role_id, permission) VALUES (?1, ?2)")
                .bind(role.id)
                .bind(*permission)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    /// Deletes a role by rowid.
    ///
    /// The join table cascades with the role (ON DELETE CASCADE), so no
    /// orphaned permission rows remain.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting role");

        let result = sqlx::query("DELETE FROM roles WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Role", id));
        }

        Ok(())
    }

    /// Gets a role by rowid, permission set included.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Role>> {
        let row = sqlx::query_as::<_, RoleRow>(
            "SELECT id, name, created_at, updated_at FROM roles WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let permissions: Vec<Permission> =
            sqlx::query_scalar("SELECT permission FROM role_permissions WHERE role_id = ?1")
                .bind(id)
                .fetch_all(&self.pool)
                .await?;

        Ok(Some(hydrate(row, permissions.into_iter().collect())))
    }

    /// Lists every role with its permission set, oldest first.
    ///
    /// Two queries total: one over `roles`, one over `role_permissions`,
    /// grouped in memory. Not a query per role.
    pub async fn list_all(&self) -> DbResult<Vec<Role>> {
        let rows = sqlx::query_as::<_, RoleRow>(
            "SELECT id, name, created_at, updated_at FROM roles ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        let pairs: Vec<(i64, Permission)> =
            sqlx::query_as("SELECT role_id, permission FROM role_permissions")
                .fetch_all(&self.pool)
                .await?;

        let mut sets: HashMap<i64, BTreeSet<Permission>> = HashMap::new();
        for (role_id, permission) in pairs {
            sets.entry(role_id).or_default().insert(permission);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let permissions = sets.remove(&row.id).unwrap_or_default();
                hydrate(row, permissions)
            })
            .collect())
    }

    /// Streams bare role rows as a forward-only cursor.
    ///
    /// Permission sets are NOT hydrated here; a cursor that issued a join
    /// table read per row would defeat its own laziness. Duplicate-name
    /// scans only need the name column, so this shape serves them fully.
    pub fn stream_all(&self) -> BoxStream<'_, DbResult<RoleRow>> {
        sqlx::query_as::<_, RoleRow>(
            "SELECT id, name, created_at, updated_at FROM roles ORDER BY id",
        )
        .fetch(&self.pool)
        .map_err(DbError::from)
        .boxed()
    }

    /// Runs a typed equality filter against the roles table.
    ///
    /// Returns bare rows for the same reason as [`stream_all`](Self::stream_all).
    pub async fn query(&self, filter: &Filter<RoleColumn>) -> DbResult<Vec<RoleRow>> {
        let mut builder = QueryBuilder::new(format!("SELECT {} FROM roles", ROLE_COLUMNS));
        filter.push_where(&mut builder);

        let rows = builder
            .build_query_as::<RoleRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    /// Checks whether a role row exists.
    pub async fn exists(&self, id: i64) -> DbResult<bool> {
        let found: i64 = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM roles WHERE id = ?1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(found != 0)
    }
}

fn hydrate(row: RoleRow, permissions: BTreeSet<Permission>) -> Role {
    Role {
        id: row.id,
        name: row.name,
        permissions,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_starts_with_empty_set() {
        let db = test_db().await;
        let role = db.roles().create("Cashier").await.unwrap();

        assert!(role.permissions.is_empty());
        let fetched = db.roles().get_by_id(role.id).await.unwrap().unwrap();
        assert!(fetched.permissions.is_empty());
    }

    #[tokio::test]
    async fn test_permission_set_round_trip() {
        let db = test_db().await;
        let mut role = db.roles().create("Manager").await.unwrap();

        role.permissions.insert(Permission::StoreManagement);
        role.permissions.insert(Permission::SalesManagement);
        db.roles().update(&role).await.unwrap();

        let fetched = db.roles().get_by_id(role.id).await.unwrap().unwrap();
        assert_eq!(fetched.permissions, role.permissions);
    }

    #[tokio::test]
    async fn test_update_rewrites_whole_set() {
        let db = test_db().await;
        let mut role = db.roles().create("Manager").await.unwrap();

        role.permissions.insert(Permission::SalesManagement);
        role.permissions.insert(Permission::StockManagement);
        db.roles().update(&role).await.unwrap();

        // Revoke one, grant another; the stored set must follow exactly
        role.permissions.remove(&Permission::StockManagement);
        role.permissions.insert(Permission::StatisticsAccess);
        db.roles().update(&role).await.unwrap();

        let fetched = db.roles().get_by_id(role.id).await.unwrap().unwrap();
        assert!(fetched.has(Permission::SalesManagement));
        assert!(fetched.has(Permission::StatisticsAccess));
        assert!(!fetched.has(Permission::StockManagement));
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected_by_schema() {
        let db = test_db().await;
        db.roles().create("Manager").await.unwrap();

        let err = db.roles().create("Manager").await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_delete_cascades_permission_rows() {
        let db = test_db().await;
        let mut role = db.roles().create("Manager").await.unwrap();
        role.permissions.insert(Permission::RoleManagement);
        db.roles().update(&role).await.unwrap();

        db.roles().delete(role.id).await.unwrap();

        let orphans: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM role_permissions WHERE role_id = ?1")
                .bind(role.id)
                .fetch_one(db.pool())
                .await
                .unwrap();
        assert_eq!(orphans, 0);
    }

    #[tokio::test]
    async fn test_list_all_hydrates_every_role() {
        let db = test_db().await;
        let mut admin = db.roles().create("Admin").await.unwrap();
        admin.permissions = Permission::ALL.into_iter().collect();
        db.roles().update(&admin).await.unwrap();
        db.roles().create("Trainee").await.unwrap();

        let roles = db.roles().list_all().await.unwrap();
        assert_eq!(roles.len(), 2);
        assert_eq!(roles[0].permissions.len(), Permission::ALL.len());
        assert!(roles[1].permissions.is_empty());
    }

    #[tokio::test]
    async fn test_stream_all_yields_bare_rows() {
        let db = test_db().await;
        db.roles().create("Admin").await.unwrap();
        db.roles().create("Cashier").await.unwrap();

        let repo = db.roles();
        let mut stream = repo.stream_all();
        let mut names = Vec::new();
        while let Some(row) = stream.next().await {
            names.push(row.unwrap().name);
        }
        assert_eq!(names, vec!["Admin", "Cashier"]);
    }
}
