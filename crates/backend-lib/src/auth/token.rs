// ============================
// crates/backend-lib/src/auth/token.rs
// ============================
//! Signed access tokens.
//!
//! Tokens are HS256 JWTs carrying the user's name and email, the issuer and
//! an expiry 24 hours after issuance.
use crate::error::CredentialError;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifetime of an issued token
pub const TOKEN_TTL_HOURS: i64 = 24;

/// Claims carried inside a token
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject name
    pub user: String,
    /// Subject email
    pub email: String,
    /// Expiry, Unix seconds
    pub exp: i64,
    /// Issued at, Unix seconds
    pub iat: i64,
    pub iss: String,
    /// Unique token id
    pub jti: String,
}

/// A freshly signed token and its expiry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    /// Unix seconds
    pub expires_at: i64,
}

/// Builds and signs tokens with a symmetric key
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("issuer", &self.issuer)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    /// Create an issuer from a UTF-8 secret. An empty secret is rejected.
    pub fn new(secret: &str, issuer: impl Into<String>) -> Result<Self, CredentialError> {
        if secret.is_empty() {
            return Err(CredentialError::SigningFailure(
                "signing key is empty".to_string(),
            ));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer: issuer.into(),
        })
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Sign a new token for a user, expiring 24 hours from now
    pub fn issue(&self, name: &str, email: &str) -> Result<IssuedToken, CredentialError> {
        self.issue_at(name, email, Utc::now())
    }

    /// Sign a new token as if issued at `now`
    pub fn issue_at(
        &self,
        name: &str,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, CredentialError> {
        let expires_at = (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp();

        let claims = Claims {
            user: name.to_string(),
            email: email.to_string(),
            exp: expires_at,
            iat: now.timestamp(),
            iss: self.issuer.clone(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| {
                CredentialError::SigningFailure(format!("could not sign token for {email}: {e}"))
            })?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Verify a token's signature, issuer and expiry, returning its claims.
    ///
    /// No request path calls this; it pairs with [`TokenIssuer::issue`] for
    /// operators and tests.
    pub fn verify(&self, token: &str) -> Result<Claims, CredentialError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| CredentialError::SigningFailure(format!("invalid token: {e}")))
    }
}
