//! # Store Repository
//!
//! Database operations for stores.
//!
//! ## Transactional Creation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  Store + Address Creation                               │
//! │                                                                         │
//! │  create_with_address(new_store, new_address)                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN                                                                 │
//! │    INSERT INTO addresses (...)      ← rowid captured                   │
//! │    INSERT INTO stores (..., address_id = rowid, ...)                   │
//! │  COMMIT                                                                │
//! │                                                                         │
//! │  Either both rows land or neither does. A failed store insert can     │
//! │  never leave an orphaned address behind.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Deleting a store deletes only the store row: its address and manager
//! account survive.

use chrono::Utc;
use futures_util::stream::BoxStream;
use futures_util::{StreamExt, TryStreamExt};
use sqlx::{QueryBuilder, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::filter::{Filter, StoreColumn};
use storekeeper_core::{Address, NewAddress, NewStore, Store, StoreDetails, User};

const STORE_COLUMNS: &str = "id, password_hash, address_id, manager_id, created_at, updated_at";

/// Repository for store database operations.
#[derive(Debug, Clone)]
pub struct StoreRepository {
    pool: SqlitePool,
}

impl StoreRepository {
    /// Creates a new StoreRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StoreRepository { pool }
    }

    /// Inserts a store and its address in a single transaction.
    ///
    /// ## Returns
    /// * `Ok((Store, Address))` - Both rows as persisted
    /// * `Err(DbError::UniqueViolation)` - Store name already taken
    /// * `Err(DbError::ForeignKeyViolation)` - manager_id doesn't exist
    pub async fn create_with_address(
        &self,
        new_store: &NewStore,
        new_address: &NewAddress,
    ) -> DbResult<(Store, Address)> {
        debug!(id = %new_store.id, city = %new_address.city, "Inserting store with address");

        let now = Utc::now();

        let mut tx = self.pool.begin().await?;

        let address_result = sqlx::query(
            r#"
            INSERT INTO addresses (zip_code, city, street_name_and_number, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(new_address.zip_code)
        .bind(&new_address.city)
        .bind(&new_address.street_name_and_number)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let address_id = address_result.last_insert_rowid();

        sqlx::query(
            r#"
            INSERT INTO stores (id, password_hash, address_id, manager_id, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&new_store.id)
        .bind(&new_store.password_hash)
        .bind(address_id)
        .bind(new_store.manager_id)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        let store = Store {
            id: new_store.id.clone(),
            password_hash: new_store.password_hash.clone(),
            address_id,
            manager_id: new_store.manager_id,
            created_at: now,
            updated_at: now,
        };
        let address = Address {
            id: address_id,
            zip_code: new_address.zip_code,
            city: new_address.city.clone(),
            street_name_and_number: new_address.street_name_and_number.clone(),
            created_at: now,
            updated_at: now,
        };

        Ok((store, address))
    }

    /// Updates a store row.
    pub async fn update(&self, store: &Store) -> DbResult<()> {
        debug!(id = %store.id, "Updating store");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE stores SET
                password_hash = ?2,
                address_id = ?3,
                manager_id = ?4,
                updated_at = ?5
            WHERE id = ?1
            "#,
        )
        .bind(&store.id)
        .bind(&store.password_hash)
        .bind(store.address_id)
        .bind(store.manager_id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Store", &store.id));
        }

        Ok(())
    }

    /// Updates a store row and its address in a single transaction.
    ///
    /// The edit screen saves both halves of the form at once; a crash
    /// between the two writes must not leave the store pointing at a
    /// half-updated address.
    pub async fn update_with_address(&self, store: &Store, address: &Address) -> DbResult<()> {
        debug!(id = %store.id, address_id = address.id, "Updating store with address");

        let now = Utc::now();

        let mut tx = self.pool.begin().await?;

        let address_result = sqlx::query(
            r#"
            UPDATE addresses SET
                zip_code = ?2,
                city = ?3,
                street_name_and_number = ?4,
                updated_at = ?5
            WHERE id = ?1
            "#,
        )
        .bind(address.id)
        .bind(address.zip_code)
        .bind(&address.city)
        .bind(&address.street_name_and_number)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        if address_result.rows_affected() == 0 {
            return Err(DbError::not_found("Address", address.id));
        }

        let store_result = sqlx::query(
            r#"
            UPDATE stores SET
                password_hash = ?2,
                address_id = ?3,
                manager_id = ?4,
                updated_at = ?5
            WHERE id = ?1
            "#,
        )
        .bind(&store.id)
        .bind(&store.password_hash)
        .bind(store.address_id)
        .bind(store.manager_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        if store_result.rows_affected() == 0 {
            return Err(DbError::not_found("Store", &store.id));
        }

        tx.commit().await?;

        Ok(())
    }

    /// Deletes a store by name.
    ///
    /// Leaves the store's address and manager account untouched.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting store");

        let result = sqlx::query("DELETE FROM stores WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Store", id));
        }

        Ok(())
    }

    /// Gets a store by name.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Store>> {
        let store = sqlx::query_as::<_, Store>(
            "SELECT id, password_hash, address_id, manager_id, created_at, updated_at
             FROM stores WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(store)
    }

    /// Gets a store with its address and manager joined in.
    ///
    /// ## Returns
    /// * `Ok(Some(StoreDetails))` - Store found, address resolved
    /// * `Ok(None)` - No store under that name
    /// * `Err(DbError::NotFound)` - Store row references a missing address
    pub async fn get_detailed(&self, id: &str) -> DbResult<Option<StoreDetails>> {
        let Some(store) = self.get_by_id(id).await? else {
            return Ok(None);
        };

        let address = sqlx::query_as::<_, Address>(
            "SELECT id, zip_code, city, street_name_and_number, created_at, updated_at
             FROM addresses WHERE id = ?1",
        )
        .bind(store.address_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Address", store.address_id))?;

        let manager = match store.manager_id {
            Some(manager_id) => {
                sqlx::query_as::<_, User>(
                    "SELECT id, credentials, email, password_hash, created_at, updated_at
                     FROM users WHERE id = ?1",
                )
                .bind(manager_id)
                .fetch_optional(&self.pool)
                .await?
            }
            None => None,
        };

        Ok(Some(StoreDetails {
            store,
            address,
            manager,
        }))
    }

    /// Lists every store, oldest first.
    pub async fn list_all(&self) -> DbResult<Vec<Store>> {
        let stores = sqlx::query_as::<_, Store>(
            "SELECT id, password_hash, address_id, manager_id, created_at, updated_at
             FROM stores ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(stores)
    }

    /// Streams every store as a forward-only cursor.
    pub fn stream_all(&self) -> BoxStream<'_, DbResult<Store>> {
        sqlx::query_as::<_, Store>(
            "SELECT id, password_hash, address_id, manager_id, created_at, updated_at
             FROM stores ORDER BY created_at, id",
        )
        .fetch(&self.pool)
        .map_err(DbError::from)
        .boxed()
    }

    /// Runs a typed equality filter against the stores table.
    pub async fn query(&self, filter: &Filter<StoreColumn>) -> DbResult<Vec<Store>> {
        let mut builder = QueryBuilder::new(format!("SELECT {} FROM stores", STORE_COLUMNS));
        filter.push_where(&mut builder);

        let stores = builder
            .build_query_as::<Store>()
            .fetch_all(&self.pool)
            .await?;

        Ok(stores)
    }

    /// Checks whether a store exists under the given name.
    pub async fn exists(&self, id: &str) -> DbResult<bool> {
        let found: i64 = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM stores WHERE id = ?1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(found != 0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use storekeeper_core::NewUser;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn sample_address() -> NewAddress {
        NewAddress {
            zip_code: 69_003,
            city: "Lyon".to_string(),
            street_name_and_number: "17 rue Garibaldi".to_string(),
        }
    }

    fn sample_store(manager_id: Option<i64>) -> NewStore {
        NewStore {
            id: "Lyon Part-Dieu".to_string(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
            manager_id,
        }
    }

    #[tokio::test]
    async fn test_create_with_address_links_rows() {
        let db = test_db().await;
        let (store, address) = db
            .stores()
            .create_with_address(&sample_store(None), &sample_address())
            .await
            .unwrap();

        assert_eq!(store.address_id, address.id);
        assert!(db.addresses().exists(address.id).await.unwrap());
        assert!(db.stores().exists(&store.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_failed_store_insert_rolls_back_address() {
        let db = test_db().await;
        db.stores()
            .create_with_address(&sample_store(None), &sample_address())
            .await
            .unwrap();

        let before: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM addresses")
            .fetch_one(db.pool())
            .await
            .unwrap();

        // Same store name: the second INSERT violates the primary key and
        // the transaction must roll the address insert back with it
        let err = db
            .stores()
            .create_with_address(&sample_store(None), &sample_address())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));

        let after: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM addresses")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_unknown_manager_rejected() {
        let db = test_db().await;
        let err = db
            .stores()
            .create_with_address(&sample_store(Some(404)), &sample_address())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn test_get_detailed_joins_manager() {
        let db = test_db().await;
        let manager = db
            .users()
            .create(&NewUser {
                credentials: "jdoe".to_string(),
                email: "jdoe@example.com".to_string(),
                password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
            })
            .await
            .unwrap();

        db.stores()
            .create_with_address(&sample_store(Some(manager.id)), &sample_address())
            .await
            .unwrap();

        let details = db
            .stores()
            .get_detailed("Lyon Part-Dieu")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(details.address.city, "Lyon");
        assert_eq!(details.manager.unwrap().credentials, "jdoe");
    }

    #[tokio::test]
    async fn test_delete_keeps_address_and_manager() {
        let db = test_db().await;
        let manager = db
            .users()
            .create(&NewUser {
                credentials: "jdoe".to_string(),
                email: "jdoe@example.com".to_string(),
                password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
            })
            .await
            .unwrap();
        let (store, address) = db
            .stores()
            .create_with_address(&sample_store(Some(manager.id)), &sample_address())
            .await
            .unwrap();

        db.stores().delete(&store.id).await.unwrap();

        assert!(db.addresses().exists(address.id).await.unwrap());
        assert!(db.users().exists(manager.id).await.unwrap());
        assert!(!db.stores().exists(&store.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_with_address_saves_both() {
        let db = test_db().await;
        let (mut store, mut address) = db
            .stores()
            .create_with_address(&sample_store(None), &sample_address())
            .await
            .unwrap();

        address.city = "Villeurbanne".to_string();
        store.password_hash = "$argon2id$v=19$m=19456,t=2,p=1$bmV3$bmV3aGFzaA".to_string();
        db.stores()
            .update_with_address(&store, &address)
            .await
            .unwrap();

        let details = db.stores().get_detailed(&store.id).await.unwrap().unwrap();
        assert_eq!(details.address.city, "Villeurbanne");
        assert_eq!(details.store.password_hash, store.password_hash);
    }

    #[tokio::test]
    async fn test_query_by_manager() {
        let db = test_db().await;
        let manager = db
            .users()
            .create(&NewUser {
                credentials: "jdoe".to_string(),
                email: "jdoe@example.com".to_string(),
                password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
            })
            .await
            .unwrap();
        db.stores()
            .create_with_address(&sample_store(Some(manager.id)), &sample_address())
            .await
            .unwrap();

        let filter = Filter::where_eq(StoreColumn::ManagerId, manager.id);
        let matches = db.stores().query(&filter).await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, "Lyon Part-Dieu");
    }
}
