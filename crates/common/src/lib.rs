// ================
// common/src/lib.rs
// ================
//! Common types shared between the `authgate` library, binary and tests.
//! This module defines the stored document shapes and the form/response
//! payloads of the HTTP endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered user as stored in the user collection
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// Display name chosen at registration
    pub name: String,
    /// Unique key of the collection
    pub email: String,
    /// PHC-formatted password hash, never the plaintext
    #[serde(rename = "passwordhash")]
    pub password_hash: String,
    /// Registration time
    #[serde(rename = "createdat")]
    pub created_at: DateTime<Utc>,
}

/// Latest token issued to a user, one per email
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TokenRecord {
    /// Owner of the token, foreign key to [`UserRecord::email`]
    pub email: String,
    /// Compact signed token
    pub token: String,
    /// Time of the last upsert
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Form posted to `/signup`
///
/// Missing fields deserialize as empty strings so the handler can report
/// them uniformly.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_check: String,
}

/// Form posted to `/token`
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct TokenForm {
    pub email: String,
    pub password: String,
}

/// Body returned after a successful registration
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SignupResponse {
    pub msg: String,
}

/// Body returned after a token was issued
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TokenResponse {
    /// Compact signed token
    pub token: String,
    /// Expiry as Unix seconds
    pub expiration_date: i64,
}
