//! # Store Controller
//!
//! Screen controller for store management.
//!
//! ## Submit Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Store Form Submit Order                              │
//! │                                                                         │
//! │  StoreForm ──► 1. name / street / city / zip non-empty                 │
//! │                2. create only: password and confirm filled             │
//! │                3. zip parses and fits five digits                      │
//! │                4. password equals confirm                              │
//! │                5. create only: duplicate-name scan over the list       │
//! │                6. manager text resolves to a user (credentials OR      │
//! │                   email), or ManagerNotFound                           │
//! │                      │                                                  │
//! │          first failure anywhere aborts; nothing is persisted           │
//! │                      │                                                  │
//! │                      ▼                                                  │
//! │   create mode: Address + Store in ONE transaction                      │
//! │   edit mode:   address rewritten, password re-hashed only when the     │
//! │                confirm field is filled, manager reassigned             │
//! │                      │                                                  │
//! │                      ▼                                                  │
//! │   refresh list ──► reselect the affected store                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The name field is the store's primary key. In edit mode the screen
//! disables it, so a submit never renames an existing store.

use futures_util::StreamExt;
use tracing::{debug, info};

use crate::error::{BackofficeError, BackofficeResult};
use crate::selection::Selection;
use crate::session::AuthContext;
use storekeeper_core::validation::{parse_zip_code, require_field, validate_store_name};
use storekeeper_core::{password, NewAddress, NewStore, Store, StoreDetails, ValidationError};
use storekeeper_db::{Database, DbError};

// =============================================================================
// Form Data
// =============================================================================

/// The store form's raw field values, exactly as typed.
///
/// Parsing and trimming happen inside [`StoreController::submit`]; the form
/// itself carries text so the screen can round-trip unparsed input.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreForm {
    pub name: String,
    pub manager: String,
    pub street: String,
    pub city: String,
    pub zip_code: String,
    pub password: String,
    pub confirm_password: String,
}

// =============================================================================
// Store Controller
// =============================================================================

/// Controller for the store management screen.
#[derive(Debug)]
pub struct StoreController {
    db: Database,
    context: AuthContext,
    selection: Selection<StoreDetails>,
}

impl StoreController {
    /// Creates a controller bound to an authenticated session.
    pub fn new(db: Database, context: AuthContext) -> Self {
        StoreController {
            db,
            context,
            selection: Selection::default(),
        }
    }

    /// The session this controller operates in.
    pub fn context(&self) -> &AuthContext {
        &self.context
    }

    /// Loads every store for the list widget.
    pub async fn load_stores(&self) -> BackofficeResult<Vec<Store>> {
        Ok(self.db.stores().list_all().await?)
    }

    /// Submits the form: creates a store when nothing is selected, updates
    /// the selected one otherwise.
    ///
    /// ## Rules
    /// Checks run in a fixed order and the first failure aborts the submit
    /// with no repository write:
    /// 1. Name, street, city and zip code non-empty (trimmed)
    /// 2. Create only: password and confirmation both filled
    /// 3. Zip code parses as a number of at most five digits
    /// 4. Password equals its confirmation (both empty passes, which is
    ///    how an edit keeps the stored password)
    /// 5. Create only: no existing store already uses the name
    /// 6. A non-empty manager field must match a user by credentials or
    ///    email
    ///
    /// ## Returns
    /// The refreshed store list. The created or updated store becomes the
    /// selection, repopulating the form from stored state.
    pub async fn submit(&mut self, form: &StoreForm) -> BackofficeResult<Vec<Store>> {
        let name = validate_store_name(&form.name)?;
        let street = require_field("street", &form.street)?;
        let city = require_field("city", &form.city)?;
        let zip_text = require_field("zip code", &form.zip_code)?;

        let creating = !self.selection.is_editing();

        if creating && (form.password.is_empty() || form.confirm_password.is_empty()) {
            return Err(ValidationError::Required {
                field: "password".to_string(),
            }
            .into());
        }

        let zip_code = parse_zip_code(&zip_text)?;

        if form.password != form.confirm_password {
            return Err(ValidationError::Mismatch {
                field: "password confirmation".to_string(),
            }
            .into());
        }

        if creating {
            let repo = self.db.stores();
            let mut rows = repo.stream_all();
            while let Some(row) = rows.next().await {
                if row?.id == name {
                    debug!(name = %name, "Duplicate store name");
                    return Err(BackofficeError::AlreadyExists {
                        entity: "Store",
                        name,
                    });
                }
            }
        }

        let manager_text = form.manager.trim();
        let manager = if manager_text.is_empty() {
            None
        } else {
            let user = self
                .db
                .users()
                .find_by_login(manager_text)
                .await?
                .ok_or_else(|| BackofficeError::ManagerNotFound(manager_text.to_string()))?;
            Some(user)
        };
        let manager_id = manager.as_ref().map(|user| user.id);

        let store_id = if creating {
            let (store, address) = self
                .db
                .stores()
                .create_with_address(
                    &NewStore {
                        id: name,
                        password_hash: password::hash(&form.password)?,
                        manager_id,
                    },
                    &NewAddress {
                        zip_code,
                        city,
                        street_name_and_number: street,
                    },
                )
                .await?;
            info!(
                actor = %self.context.user().credentials,
                store = %store.id,
                address_id = address.id,
                "Created store"
            );
            store.id
        } else {
            // Checked by is_editing above
            let details = self.selection.selected().ok_or(BackofficeError::NoSelection)?;
            let mut store = details.store.clone();
            let mut address = details.address.clone();

            address.zip_code = zip_code;
            address.city = city;
            address.street_name_and_number = street;

            // An empty confirm field means "keep the current password"
            if !form.confirm_password.is_empty() {
                store.password_hash = password::hash(&form.password)?;
            }
            store.manager_id = manager_id;

            self.db.stores().update_with_address(&store, &address).await?;
            info!(
                actor = %self.context.user().credentials,
                store = %store.id,
                "Updated store"
            );
            store.id
        };

        self.reselect(&store_id).await?;
        Ok(self.db.stores().list_all().await?)
    }

    /// Deletes the selected store and clears the selection.
    ///
    /// The store's address and manager account are left in place.
    pub async fn delete_selected(&mut self) -> BackofficeResult<Vec<Store>> {
        let details = self.selection.selected().ok_or(BackofficeError::NoSelection)?;
        let id = details.store.id.clone();

        self.db.stores().delete(&id).await?;
        info!(
            actor = %self.context.user().credentials,
            store = %id,
            "Deleted store"
        );

        self.selection.clear();
        Ok(self.db.stores().list_all().await?)
    }

    /// Selects a store by name, loading its address and manager.
    pub async fn select(&mut self, store_id: &str) -> BackofficeResult<()> {
        self.reselect(store_id).await
    }

    /// Clears the selection, returning the form to create mode.
    pub fn deselect(&mut self) {
        self.selection.clear();
    }

    /// Returns the selected store with its address and manager, if any.
    pub fn selected(&self) -> Option<&StoreDetails> {
        self.selection.selected()
    }

    /// Builds a form prefilled from the selection.
    ///
    /// Password fields come back blank; digests are never echoed into the
    /// form, and blank password fields on submit keep the stored one.
    pub fn form_for_selected(&self) -> Option<StoreForm> {
        self.selection.selected().map(|details| StoreForm {
            name: details.store.id.clone(),
            manager: details
                .manager
                .as_ref()
                .map(|user| user.credentials.clone())
                .unwrap_or_default(),
            street: details.address.street_name_and_number.clone(),
            city: details.address.city.clone(),
            zip_code: details.address.zip_code.to_string(),
            password: String::new(),
            confirm_password: String::new(),
        })
    }

    async fn reselect(&mut self, store_id: &str) -> BackofficeResult<()> {
        let details = self
            .db
            .stores()
            .get_detailed(store_id)
            .await?
            .ok_or_else(|| BackofficeError::Db(DbError::not_found("Store", store_id)))?;

        self.selection.select(details);
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use storekeeper_core::NewUser;
    use storekeeper_db::DbConfig;

    const TEST_DIGEST: &str = "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA";

    async fn test_controller() -> StoreController {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let user = db
            .users()
            .create(&NewUser {
                credentials: "admin".to_string(),
                email: "admin@example.com".to_string(),
                password_hash: TEST_DIGEST.to_string(),
            })
            .await
            .unwrap();

        let (store, _) = db
            .stores()
            .create_with_address(
                &NewStore {
                    id: "Back Office".to_string(),
                    password_hash: TEST_DIGEST.to_string(),
                    manager_id: Some(user.id),
                },
                &NewAddress {
                    zip_code: 69_003,
                    city: "Lyon".to_string(),
                    street_name_and_number: "17 rue Garibaldi".to_string(),
                },
            )
            .await
            .unwrap();

        let context = AuthContext::new(store, user);
        StoreController::new(db, context)
    }

    fn valid_form() -> StoreForm {
        StoreForm {
            name: "Lyon Part-Dieu".to_string(),
            manager: String::new(),
            street: "5 place Charles Béraudier".to_string(),
            city: "Lyon".to_string(),
            zip_code: "69003".to_string(),
            password: "tillkey".to_string(),
            confirm_password: "tillkey".to_string(),
        }
    }

    async fn store_count(controller: &StoreController) -> usize {
        controller.load_stores().await.unwrap().len()
    }

    #[tokio::test]
    async fn test_submit_creates_store_and_selects_it() {
        let mut controller = test_controller().await;

        let stores = controller.submit(&valid_form()).await.unwrap();
        assert_eq!(stores.len(), 2);

        let details = controller.selected().unwrap();
        assert_eq!(details.store.id, "Lyon Part-Dieu");
        assert_eq!(details.address.zip_code, 69_003);
        assert!(details.manager.is_none());
    }

    #[tokio::test]
    async fn test_blank_required_field_aborts_before_persistence() {
        let mut controller = test_controller().await;

        let mut form = valid_form();
        form.city = "   ".to_string();

        let err = controller.submit(&form).await.unwrap_err();
        assert!(matches!(err, BackofficeError::Validation(_)));
        assert_eq!(store_count(&controller).await, 1);
    }

    #[tokio::test]
    async fn test_bad_zip_codes_abort_before_persistence() {
        let mut controller = test_controller().await;

        let mut form = valid_form();
        form.zip_code = "ABCDE".to_string();
        let err = controller.submit(&form).await.unwrap_err();
        assert!(matches!(
            err,
            BackofficeError::Validation(ValidationError::InvalidFormat { .. })
        ));

        form.zip_code = "123456".to_string();
        let err = controller.submit(&form).await.unwrap_err();
        assert!(matches!(
            err,
            BackofficeError::Validation(ValidationError::OutOfRange { .. })
        ));

        assert_eq!(store_count(&controller).await, 1);
    }

    #[tokio::test]
    async fn test_create_requires_both_password_fields() {
        let mut controller = test_controller().await;

        let mut form = valid_form();
        form.password = String::new();
        form.confirm_password = String::new();

        let err = controller.submit(&form).await.unwrap_err();
        assert!(matches!(
            err,
            BackofficeError::Validation(ValidationError::Required { .. })
        ));
        assert_eq!(store_count(&controller).await, 1);
    }

    #[tokio::test]
    async fn test_password_mismatch_rejected() {
        let mut controller = test_controller().await;

        let mut form = valid_form();
        form.confirm_password = "tyllkey".to_string();

        let err = controller.submit(&form).await.unwrap_err();
        assert!(matches!(
            err,
            BackofficeError::Validation(ValidationError::Mismatch { .. })
        ));
        assert_eq!(store_count(&controller).await, 1);
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected() {
        let mut controller = test_controller().await;

        let mut form = valid_form();
        form.name = "Back Office".to_string();

        let err = controller.submit(&form).await.unwrap_err();
        assert!(matches!(
            err,
            BackofficeError::AlreadyExists { entity: "Store", .. }
        ));
        assert_eq!(store_count(&controller).await, 1);
    }

    #[tokio::test]
    async fn test_unknown_manager_rejected_without_creating() {
        let mut controller = test_controller().await;

        let mut form = valid_form();
        form.manager = "alice".to_string();

        let err = controller.submit(&form).await.unwrap_err();
        assert!(matches!(err, BackofficeError::ManagerNotFound(_)));
        assert_eq!(store_count(&controller).await, 1);
    }

    #[tokio::test]
    async fn test_manager_resolves_by_credentials_or_email() {
        let mut controller = test_controller().await;

        let mut form = valid_form();
        form.manager = "admin@example.com".to_string();
        controller.submit(&form).await.unwrap();

        let details = controller.selected().unwrap();
        assert_eq!(
            details.manager.as_ref().unwrap().credentials,
            "admin"
        );
    }

    #[tokio::test]
    async fn test_edit_updates_address_and_keeps_password() {
        let mut controller = test_controller().await;
        controller.select("Back Office").await.unwrap();

        let mut form = controller.form_for_selected().unwrap();
        assert!(form.password.is_empty());
        form.city = "Villeurbanne".to_string();
        form.zip_code = "69100".to_string();

        controller.submit(&form).await.unwrap();

        let details = controller.selected().unwrap();
        assert_eq!(details.address.city, "Villeurbanne");
        assert_eq!(details.address.zip_code, 69_100);
        assert_eq!(details.store.password_hash, TEST_DIGEST);
    }

    #[tokio::test]
    async fn test_edit_mismatch_keeps_stored_hash() {
        let mut controller = test_controller().await;
        controller.select("Back Office").await.unwrap();

        let mut form = controller.form_for_selected().unwrap();
        form.password = "newkey".to_string();
        form.confirm_password = "newkay".to_string();

        let err = controller.submit(&form).await.unwrap_err();
        assert!(matches!(
            err,
            BackofficeError::Validation(ValidationError::Mismatch { .. })
        ));

        let stored = controller
            .db
            .stores()
            .get_by_id("Back Office")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.password_hash, TEST_DIGEST);
    }

    #[tokio::test]
    async fn test_edit_rehashes_when_confirm_filled() {
        let mut controller = test_controller().await;
        controller.select("Back Office").await.unwrap();

        let mut form = controller.form_for_selected().unwrap();
        form.password = "newkey".to_string();
        form.confirm_password = "newkey".to_string();

        controller.submit(&form).await.unwrap();

        let stored = controller
            .db
            .stores()
            .get_by_id("Back Office")
            .await
            .unwrap()
            .unwrap();
        assert_ne!(stored.password_hash, TEST_DIGEST);
        assert!(password::verify("newkey", &stored.password_hash));
    }

    #[tokio::test]
    async fn test_edit_can_clear_manager() {
        let mut controller = test_controller().await;
        controller.select("Back Office").await.unwrap();

        let mut form = controller.form_for_selected().unwrap();
        assert_eq!(form.manager, "admin");
        form.manager = String::new();

        controller.submit(&form).await.unwrap();
        assert!(controller.selected().unwrap().manager.is_none());
    }

    #[tokio::test]
    async fn test_delete_selected_clears_form_state() {
        let mut controller = test_controller().await;
        controller.submit(&valid_form()).await.unwrap();

        let stores = controller.delete_selected().await.unwrap();
        assert_eq!(stores.len(), 1);
        assert!(stores.iter().all(|store| store.id != "Lyon Part-Dieu"));
        assert!(controller.selected().is_none());
        assert!(controller.form_for_selected().is_none());
    }

    #[tokio::test]
    async fn test_delete_without_selection_fails() {
        let mut controller = test_controller().await;

        let err = controller.delete_selected().await.unwrap_err();
        assert!(matches!(err, BackofficeError::NoSelection));
    }
}
