//! # Address Repository
//!
//! Database operations for postal addresses.
//!
//! Addresses are plain rows with no aggregate parts. Stores reference them
//! by rowid; deleting a store leaves its address in place, so an address
//! can outlive the store that created it.

use chrono::Utc;
use futures_util::stream::BoxStream;
use futures_util::{StreamExt, TryStreamExt};
use sqlx::{QueryBuilder, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::filter::{AddressColumn, Filter};
use storekeeper_core::{Address, NewAddress};

const ADDRESS_COLUMNS: &str = "id, zip_code, city, street_name_and_number, created_at, updated_at";

/// Repository for address database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = AddressRepository::new(pool);
///
/// let address = repo
///     .create(&NewAddress {
///         zip_code: 69_003,
///         city: "Lyon".into(),
///         street_name_and_number: "17 rue Garibaldi".into(),
///     })
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct AddressRepository {
    pool: SqlitePool,
}

impl AddressRepository {
    /// Creates a new AddressRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AddressRepository { pool }
    }

    /// Inserts a new address and returns it with its assigned rowid.
    pub async fn create(&self, new: &NewAddress) -> DbResult<Address> {
        debug!(city = %new.city, zip_code = new.zip_code, "Inserting address");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO addresses (zip_code, city, street_name_and_number, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(new.zip_code)
        .bind(&new.city)
        .bind(&new.street_name_and_number)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(Address {
            id: result.last_insert_rowid(),
            zip_code: new.zip_code,
            city: new.city.clone(),
            street_name_and_number: new.street_name_and_number.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Updates an existing address.
    ///
    /// ## Returns
    /// * `Ok(())` - Update successful
    /// * `Err(DbError::NotFound)` - Address doesn't exist
    pub async fn update(&self, address: &Address) -> DbResult<()> {
        debug!(id = address.id, "Updating address");

        let now = Utc::now();

        let result = sqlx::query(
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
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Address", address.id));
        }

        Ok(())
    }

    /// Deletes an address by rowid.
    ///
    /// Fails with a foreign key violation while a store still references
    /// the address.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting address");

        let result = sqlx::query("DELETE FROM addresses WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Address", id));
        }

        Ok(())
    }

    /// Gets an address by rowid.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Address>> {
        let address = sqlx::query_as::<_, Address>(
            "SELECT id, zip_code, city, street_name_and_number, created_at, updated_at
             FROM addresses WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(address)
    }

    /// Lists every address, oldest first.
    pub async fn list_all(&self) -> DbResult<Vec<Address>> {
        let addresses = sqlx::query_as::<_, Address>(
            "SELECT id, zip_code, city, street_name_and_number, created_at, updated_at
             FROM addresses ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(addresses)
    }

    /// Streams every address as a forward-only cursor.
    ///
    /// Rows are decoded one at a time as the caller polls; nothing is
    /// buffered beyond the current row.
    pub fn stream_all(&self) -> BoxStream<'_, DbResult<Address>> {
        sqlx::query_as::<_, Address>(
            "SELECT id, zip_code, city, street_name_and_number, created_at, updated_at
             FROM addresses ORDER BY id",
        )
        .fetch(&self.pool)
        .map_err(DbError::from)
        .boxed()
    }

    /// Runs a typed equality filter against the addresses table.
    pub async fn query(&self, filter: &Filter<AddressColumn>) -> DbResult<Vec<Address>> {
        let mut builder =
            QueryBuilder::new(format!("SELECT {} FROM addresses", ADDRESS_COLUMNS));
        filter.push_where(&mut builder);

        let addresses = builder
            .build_query_as::<Address>()
            .fetch_all(&self.pool)
            .await?;

        Ok(addresses)
    }

    /// Checks whether an address row exists.
    pub async fn exists(&self, id: i64) -> DbResult<bool> {
        let found: i64 =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM addresses WHERE id = ?1)")
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

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn sample() -> NewAddress {
        NewAddress {
            zip_code: 69_003,
            city: "Lyon".to_string(),
            street_name_and_number: "17 rue Garibaldi".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let db = test_db().await;
        let created = db.addresses().create(&sample()).await.unwrap();
        assert!(created.id > 0);

        let fetched = db.addresses().get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_update_round_trip() {
        let db = test_db().await;
        let mut address = db.addresses().create(&sample()).await.unwrap();

        address.city = "Villeurbanne".to_string();
        address.zip_code = 69_100;
        db.addresses().update(&address).await.unwrap();

        let fetched = db.addresses().get_by_id(address.id).await.unwrap().unwrap();
        assert_eq!(fetched.city, "Villeurbanne");
        assert_eq!(fetched.zip_code, 69_100);
    }

    #[tokio::test]
    async fn test_update_missing_row_is_not_found() {
        let db = test_db().await;
        let mut address = db.addresses().create(&sample()).await.unwrap();
        address.id = 9_999;

        let err = db.addresses().update(&address).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_and_exists() {
        let db = test_db().await;
        let address = db.addresses().create(&sample()).await.unwrap();

        assert!(db.addresses().exists(address.id).await.unwrap());
        db.addresses().delete(address.id).await.unwrap();
        assert!(!db.addresses().exists(address.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_stream_all_yields_each_row() {
        let db = test_db().await;
        db.addresses().create(&sample()).await.unwrap();
        db.addresses()
            .create(&NewAddress {
                zip_code: 75_011,
                city: "Paris".to_string(),
                street_name_and_number: "3 rue Oberkampf".to_string(),
            })
            .await
            .unwrap();

        let repo = db.addresses();
        let mut stream = repo.stream_all();
        let mut cities = Vec::new();
        while let Some(address) = stream.next().await {
            cities.push(address.unwrap().city);
        }
        assert_eq!(cities, vec!["Lyon", "Paris"]);
    }

    #[tokio::test]
    async fn test_query_by_city_and_zip() {
        let db = test_db().await;
        db.addresses().create(&sample()).await.unwrap();

        let filter = Filter::where_eq(AddressColumn::City, "Lyon")
            .and_eq(AddressColumn::ZipCode, 69_003u32);
        let matches = db.addresses().query(&filter).await.unwrap();
        assert_eq!(matches.len(), 1);

        let filter = Filter::where_eq(AddressColumn::City, "Bordeaux");
        assert!(db.addresses().query(&filter).await.unwrap().is_empty());
    }
}
