//! # User Repository
//!
//! Database operations for back-office accounts.
//!
//! ## Login Lookup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      How Login Lookup Works                             │
//! │                                                                         │
//! │  Auth screen / manager field: "jdoe"                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  find_by_login("jdoe")                                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  WHERE credentials = 'jdoe' OR email = 'jdoe'                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Some(User) ──► caller verifies the password digest                    │
//! │                                                                         │
//! │  Passwords are salted argon2 digests. They cannot be matched with an   │
//! │  equality predicate, so authentication is always load-then-verify,     │
//! │  never a WHERE password = ? query.                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use futures_util::stream::BoxStream;
use futures_util::{StreamExt, TryStreamExt};
use sqlx::{QueryBuilder, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::filter::{Filter, UserColumn};
use storekeeper_core::{NewUser, User};

const USER_COLUMNS: &str = "id, credentials, email, password_hash, created_at, updated_at";

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Inserts a new user account.
    ///
    /// ## Returns
    /// * `Ok(User)` - Inserted account with its assigned rowid
    /// * `Err(DbError::UniqueViolation)` - Credentials or email already taken
    pub async fn create(&self, new: &NewUser) -> DbResult<User> {
        debug!(credentials = %new.credentials, "Inserting user");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO users (credentials, email, password_hash, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&new.credentials)
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(User {
            id: result.last_insert_rowid(),
            credentials: new.credentials.clone(),
            email: new.email.clone(),
            password_hash: new.password_hash.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Updates an existing user account.
    pub async fn update(&self, user: &User) -> DbResult<()> {
        debug!(id = user.id, "Updating user");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE users SET
                credentials = ?2,
                email = ?3,
                password_hash = ?4,
                updated_at = ?5
            WHERE id = ?1
            "#,
        )
        .bind(user.id)
        .bind(&user.credentials)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", user.id));
        }

        Ok(())
    }

    /// Deletes a user account by rowid.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting user");

        let result = sqlx::query("DELETE FROM users WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        Ok(())
    }

    /// Gets a user by rowid.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, credentials, email, password_hash, created_at, updated_at
             FROM users WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Gets a user matching the given login as either credentials OR email.
    ///
    /// The store form's manager field accepts both spellings, so this is
    /// the lookup the management screens use.
    pub async fn find_by_login(&self, login: &str) -> DbResult<Option<User>> {
        let filter =
            Filter::where_eq(UserColumn::Credentials, login).or_eq(UserColumn::Email, login);

        Ok(self.query(&filter).await?.into_iter().next())
    }

    /// Lists every user account, oldest first.
    pub async fn list_all(&self) -> DbResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, credentials, email, password_hash, created_at, updated_at
             FROM users ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Streams every user account as a forward-only cursor.
    pub fn stream_all(&self) -> BoxStream<'_, DbResult<User>> {
        sqlx::query_as::<_, User>(
            "SELECT id, credentials, email, password_hash, created_at, updated_at
             FROM users ORDER BY id",
        )
        .fetch(&self.pool)
        .map_err(DbError::from)
        .boxed()
    }

    /// Runs a typed equality filter against the users table.
    pub async fn query(&self, filter: &Filter<UserColumn>) -> DbResult<Vec<User>> {
        let mut builder = QueryBuilder::new(format!("SELECT {} FROM users", USER_COLUMNS));
        filter.push_where(&mut builder);

        let users = builder
            .build_query_as::<User>()
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    /// Checks whether a user row exists.
    pub async fn exists(&self, id: i64) -> DbResult<bool> {
        let found: i64 = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = ?1)")
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

    fn sample() -> NewUser {
        NewUser {
            credentials: "jdoe".to_string(),
            email: "jdoe@example.com".to_string(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let db = test_db().await;
        let created = db.users().create(&sample()).await.unwrap();

        let fetched = db.users().get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_duplicate_credentials_rejected() {
        let db = test_db().await;
        db.users().create(&sample()).await.unwrap();

        let mut dup = sample();
        dup.email = "other@example.com".to_string();
        let err = db.users().create(&dup).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let db = test_db().await;
        db.users().create(&sample()).await.unwrap();

        let mut dup = sample();
        dup.credentials = "other".to_string();
        let err = db.users().create(&dup).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_find_by_login_matches_either_column() {
        let db = test_db().await;
        let created = db.users().create(&sample()).await.unwrap();

        let by_credentials = db.users().find_by_login("jdoe").await.unwrap().unwrap();
        assert_eq!(by_credentials.id, created.id);

        let by_email = db
            .users()
            .find_by_login("jdoe@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, created.id);

        assert!(db.users().find_by_login("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_then_get_is_none() {
        let db = test_db().await;
        let created = db.users().create(&sample()).await.unwrap();

        db.users().delete(created.id).await.unwrap();
        assert!(db.users().get_by_id(created.id).await.unwrap().is_none());
    }
}
