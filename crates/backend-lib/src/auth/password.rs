// ============================
// authgate-backend-lib/src/auth/password.rs
// ============================
//! Password hashing and verification.
use crate::error::{CredentialError, Field, FieldValue};
use scrypt::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
    },
    Params, Scrypt,
};
use zeroize::Zeroizing;

/// scrypt work factor, 2^14 iterations
pub const HASH_LOG_N: u8 = 14;
const HASH_R: u32 = 8;
const HASH_P: u32 = 1;
const HASH_LEN: usize = 32;

/// Hash a password using scrypt with a random salt
pub fn hash_password(plain: &str) -> Result<String, CredentialError> {
    let params = Params::new(HASH_LOG_N, HASH_R, HASH_P, HASH_LEN)
        .map_err(|e| CredentialError::HashingFailure(e.to_string()))?;
    let salt = SaltString::generate(&mut OsRng);
    let hash = Scrypt
        .hash_password_customized(plain.as_bytes(), None, None, params, &salt)
        .map_err(|e| CredentialError::HashingFailure(e.to_string()))?
        .to_string();
    Ok(hash)
}

/// Verify a password against a stored hash.
///
/// An unparsable hash is reported as a mismatch.
pub fn verify_password(plain: &str, hash: &str) -> Result<(), CredentialError> {
    let mismatch = || CredentialError::Mismatch {
        field: Field::Password,
        value: FieldValue::for_field(Field::Password, plain),
        against: "the stored hash",
    };

    let parsed_hash = PasswordHash::new(hash).map_err(|_| mismatch())?;
    Scrypt
        .verify_password(plain.as_bytes(), &parsed_hash)
        .map_err(|_| mismatch())
}

/// Hash on the blocking pool so request tasks are not stalled
pub async fn hash_password_blocking(plain: Zeroizing<String>) -> Result<String, CredentialError> {
    tokio::task::spawn_blocking(move || hash_password(&plain))
        .await
        .map_err(|e| CredentialError::HashingFailure(e.to_string()))?
}

/// Verify on the blocking pool
pub async fn verify_password_blocking(
    plain: Zeroizing<String>,
    hash: String,
) -> Result<(), CredentialError> {
    tokio::task::spawn_blocking(move || verify_password(&plain, &hash))
        .await
        .map_err(|e| CredentialError::HashingFailure(e.to_string()))?
}
