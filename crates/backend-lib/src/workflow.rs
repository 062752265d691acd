// ============================
// crates/backend-lib/src/workflow.rs
// ============================
//! Registration and token issuance.
//!
//! Both workflows stop at the first failing step and report it as a
//! [`CredentialError`]. Plaintext passwords are never logged.
use crate::access::{TokenStore, UserStore};
use crate::auth::password::{hash_password_blocking, verify_password_blocking};
use crate::auth::{IssuedToken, TokenIssuer};
use crate::config::Settings;
use crate::error::{CredentialError, ErrorKind};
use crate::metrics::{AUTHENTICATION_REJECTED, REGISTRATION_REJECTED, TOKEN_ISSUED, USER_REGISTERED};
use crate::storage::DocumentStore;
use crate::validation::{validate_email, validate_name, validate_password};
use metrics::counter;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use zeroize::Zeroizing;

/// The two credential workflows, bound to their stores and signer
#[derive(Clone)]
pub struct Workflows {
    users: UserStore,
    tokens: TokenStore,
    issuer: TokenIssuer,
}

impl Workflows {
    pub fn from_parts(users: UserStore, tokens: TokenStore, issuer: TokenIssuer) -> Self {
        Self {
            users,
            tokens,
            issuer,
        }
    }

    /// Bind the workflows to the collections and signing key named in `settings`
    pub async fn new(
        settings: &Settings,
        store: Arc<dyn DocumentStore>,
    ) -> Result<Self, CredentialError> {
        let users = UserStore::new(store.clone(), settings.db_user_collection.clone()).await?;
        let tokens = TokenStore::new(store, settings.db_token_collection.clone()).await?;
        let issuer = TokenIssuer::new(
            settings.token_signature.expose(),
            settings.token_issuer.clone(),
        )?;
        Ok(Self::from_parts(users, tokens, issuer))
    }

    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// Create a user after validating every field and hashing the password.
    ///
    /// An email already present, either found up front or rejected by the
    /// store's unique index, fails with [`CredentialError::AlreadyExists`].
    #[instrument(skip(self, password, confirmation))]
    pub async fn register_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
        confirmation: &str,
    ) -> Result<(), CredentialError> {
        self.try_register(name, email, password, confirmation)
            .await
            .map_err(|e| rejected(REGISTRATION_REJECTED, e))?;

        counter!(USER_REGISTERED).increment(1);
        info!("user {} created", email);
        Ok(())
    }

    async fn try_register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        confirmation: &str,
    ) -> Result<(), CredentialError> {
        validate_name(name)?;
        validate_email(email)?;
        validate_password(password, confirmation)?;

        let hash = hash_password_blocking(Zeroizing::new(password.to_string())).await?;

        match self.users.find_user_by_email(email).await {
            Ok(_) => {
                return Err(CredentialError::AlreadyExists {
                    email: email.to_string(),
                })
            }
            Err(CredentialError::NotFound { .. }) => {}
            Err(e) => return Err(e),
        }

        self.users.insert_user(name, email, &hash).await
    }

    /// Check a user's password and hand out a fresh token.
    ///
    /// The token replaces whatever token was recorded for the email before.
    #[instrument(skip(self, password))]
    pub async fn authenticate_and_issue_token(
        &self,
        email: &str,
        password: &str,
    ) -> Result<IssuedToken, CredentialError> {
        let issued = self
            .try_authenticate(email, password)
            .await
            .map_err(|e| rejected(AUTHENTICATION_REJECTED, e))?;

        counter!(TOKEN_ISSUED).increment(1);
        info!("token issued for user {}", email);
        Ok(issued)
    }

    async fn try_authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<IssuedToken, CredentialError> {
        validate_email(email)?;

        let user = self.users.find_user_by_email(email).await?;
        verify_password_blocking(Zeroizing::new(password.to_string()), user.password_hash)
            .await?;

        let issued = self.issuer.issue(&user.name, &user.email)?;
        self.tokens.store_token(&user.email, &issued.token).await?;
        Ok(issued)
    }
}

fn rejected(metric: &'static str, err: CredentialError) -> CredentialError {
    let kind = err.kind();
    counter!(metric, "kind" => kind.as_str()).increment(1);

    match kind {
        ErrorKind::HashingFailure | ErrorKind::SigningFailure | ErrorKind::StoreFailure => {
            error!("{}", err);
        }
        _ => warn!("{}", err),
    }
    err
}
