//! User collection adapter.
use crate::error::CredentialError;
use crate::storage::{Document, DocumentStore, Filter, StoreError};
use authgate_common::UserRecord;
use chrono::Utc;
use std::sync::Arc;

/// Unique key of the user collection
pub const USER_KEY: &str = "email";

/// Reads and creates [`UserRecord`]s in one collection
#[derive(Clone)]
pub struct UserStore {
    store: Arc<dyn DocumentStore>,
    collection: String,
}

impl UserStore {
    /// Bind to `collection`, declaring `email` unique on the store
    pub async fn new(
        store: Arc<dyn DocumentStore>,
        collection: impl Into<String>,
    ) -> Result<Self, CredentialError> {
        let collection = collection.into();
        store
            .ensure_unique_index(&collection, USER_KEY)
            .await
            .map_err(|e| store_failure(&collection, e))?;
        Ok(Self { store, collection })
    }

    /// Exact-match lookup on the email key
    pub async fn find_user_by_email(&self, email: &str) -> Result<UserRecord, CredentialError> {
        let document = self
            .store
            .find_one(&self.collection, &Filter::eq(USER_KEY, email))
            .await
            .map_err(|e| store_failure(&self.collection, e))?
            .ok_or_else(|| CredentialError::NotFound {
                email: email.to_string(),
            })?;

        serde_json::from_value(document.into()).map_err(|e| {
            CredentialError::StoreFailure(format!(
                "could not retrieve details for user {email}: {e}"
            ))
        })
    }

    /// Insert a new user created now.
    ///
    /// A unique-index rejection is reported as [`CredentialError::AlreadyExists`].
    pub async fn insert_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<(), CredentialError> {
        let record = UserRecord {
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };

        let document = to_document(&record)?;
        match self.store.insert_one(&self.collection, document).await {
            Ok(()) => Ok(()),
            Err(StoreError::DuplicateKey { .. }) => Err(CredentialError::AlreadyExists {
                email: email.to_string(),
            }),
            Err(e) => Err(CredentialError::StoreFailure(format!(
                "could not insert user {email} in db: {e}"
            ))),
        }
    }
}

pub(crate) fn to_document<T: serde::Serialize>(value: &T) -> Result<Document, CredentialError> {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::Object(doc)) => Ok(doc),
        Ok(_) => Err(CredentialError::StoreFailure(
            "record did not serialize to an object".to_string(),
        )),
        Err(e) => Err(CredentialError::StoreFailure(e.to_string())),
    }
}

pub(crate) fn store_failure(collection: &str, err: StoreError) -> CredentialError {
    CredentialError::StoreFailure(format!("{collection}: {err}"))
}
