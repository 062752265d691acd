//! Token collection adapter.
use super::users::{store_failure, to_document};
use crate::error::CredentialError;
use crate::storage::{DocumentStore, Filter};
use authgate_common::TokenRecord;
use chrono::Utc;
use std::sync::Arc;

/// Keeps the latest token issued per email
#[derive(Clone)]
pub struct TokenStore {
    store: Arc<dyn DocumentStore>,
    collection: String,
}

impl TokenStore {
    pub async fn new(
        store: Arc<dyn DocumentStore>,
        collection: impl Into<String>,
    ) -> Result<Self, CredentialError> {
        let collection = collection.into();
        store
            .ensure_unique_index(&collection, "email")
            .await
            .map_err(|e| store_failure(&collection, e))?;
        Ok(Self { store, collection })
    }

    /// Replace the token record for `email`, creating it if absent
    pub async fn store_token(&self, email: &str, token: &str) -> Result<(), CredentialError> {
        let record = TokenRecord {
            email: email.to_string(),
            token: token.to_string(),
            created_at: Utc::now(),
        };

        let mut update = to_document(&record)?;
        update.remove("email");

        self.store
            .upsert_one(&self.collection, &Filter::eq("email", email), update)
            .await
            .map_err(|e| {
                CredentialError::StoreFailure(format!("could not update token for user {email}: {e}"))
            })
    }

    /// Current token record for `email`, if any
    pub async fn find_token(&self, email: &str) -> Result<Option<TokenRecord>, CredentialError> {
        let document = self
            .store
            .find_one(&self.collection, &Filter::eq("email", email))
            .await
            .map_err(|e| store_failure(&self.collection, e))?;

        document
            .map(|doc| serde_json::from_value(doc.into()))
            .transpose()
            .map_err(|e| CredentialError::StoreFailure(e.to_string()))
    }
}
