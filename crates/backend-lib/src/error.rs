// crates/backend-lib/src/error.rs

//! Central error types + Axum integration.
//!
//! [`CredentialError`] is the typed outcome of the credential pipeline.
//! [`AppError`] is what the HTTP layer turns into a response.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;
use thiserror::Error;

/// Input field a validation error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Password,
}

impl Field {
    /// Values of this field must never be echoed back
    pub fn is_sensitive(self) -> bool {
        matches!(self, Field::Password)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Password => "password",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Original input carried by an error, masked when redacted
#[derive(Clone, PartialEq, Eq)]
pub struct FieldValue {
    raw: String,
    redacted: bool,
}

impl FieldValue {
    /// Wrap a value, redacting it if the field is sensitive
    pub fn for_field(field: Field, raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            redacted: field.is_sensitive(),
        }
    }

    pub fn is_redacted(&self) -> bool {
        self.redacted
    }

    /// Raw value, for callers that explicitly need it for diagnostics.
    pub fn reveal(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.redacted {
            f.write_str("[redacted]")
        } else {
            f.write_str(&self.raw)
        }
    }
}

impl fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{self}\"")
    }
}

/// Length bound that was violated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthBound {
    AtLeast(usize),
    UpTo(usize),
}

impl fmt::Display for LengthBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LengthBound::AtLeast(n) => write!(f, "at least {n}"),
            LengthBound::UpTo(n) => write!(f, "up to {n}"),
        }
    }
}

/// Failure kinds of the credential pipeline, without payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidLength,
    InvalidChars,
    Mismatch,
    AlreadyExists,
    NotFound,
    HashingFailure,
    SigningFailure,
    StoreFailure,
}

impl ErrorKind {
    /// snake_case label, used as a metric dimension
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::InvalidLength => "invalid_length",
            ErrorKind::InvalidChars => "invalid_chars",
            ErrorKind::Mismatch => "mismatch",
            ErrorKind::AlreadyExists => "already_exists",
            ErrorKind::NotFound => "not_found",
            ErrorKind::HashingFailure => "hashing_failure",
            ErrorKind::SigningFailure => "signing_failure",
            ErrorKind::StoreFailure => "store_failure",
        }
    }
}

/// Outcome of a failed validation, hashing, store or signing step
#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("{field} '{value}' should contain {bound} characters; instead of {len}")]
    InvalidLength {
        field: Field,
        value: FieldValue,
        bound: LengthBound,
        len: usize,
    },

    #[error("invalid characters for {field} '{value}'")]
    InvalidChars { field: Field, value: FieldValue },

    #[error("{field} '{value}' does not match {against}")]
    Mismatch {
        field: Field,
        value: FieldValue,
        against: &'static str,
    },

    #[error("user '{email}' already exists")]
    AlreadyExists { email: String },

    #[error("could not find user '{email}'")]
    NotFound { email: String },

    #[error("password hash creation failed: {0}")]
    HashingFailure(String),

    #[error("could not create token: {0}")]
    SigningFailure(String),

    #[error("store operation failed: {0}")]
    StoreFailure(String),
}

impl CredentialError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CredentialError::InvalidLength { .. } => ErrorKind::InvalidLength,
            CredentialError::InvalidChars { .. } => ErrorKind::InvalidChars,
            CredentialError::Mismatch { .. } => ErrorKind::Mismatch,
            CredentialError::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            CredentialError::NotFound { .. } => ErrorKind::NotFound,
            CredentialError::HashingFailure(_) => ErrorKind::HashingFailure,
            CredentialError::SigningFailure(_) => ErrorKind::SigningFailure,
            CredentialError::StoreFailure(_) => ErrorKind::StoreFailure,
        }
    }

    /// Field the error refers to, for validation and mismatch failures
    pub fn field(&self) -> Option<Field> {
        match self {
            CredentialError::InvalidLength { field, .. }
            | CredentialError::InvalidChars { field, .. }
            | CredentialError::Mismatch { field, .. } => Some(*field),
            _ => None,
        }
    }

    /// Human-readable cause. Sensitive values are already masked.
    pub fn cause(&self) -> String {
        self.to_string()
    }
}

/// Application error types with error codes and context
#[derive(Error, Debug)]
pub enum AppError {
    #[error("missing form data")]
    MissingFormData,

    #[error(transparent)]
    Credential(#[from] CredentialError),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingFormData => StatusCode::BAD_REQUEST,
            AppError::Credential(err) => match err.kind() {
                ErrorKind::InvalidLength
                | ErrorKind::InvalidChars
                | ErrorKind::Mismatch
                | ErrorKind::AlreadyExists => StatusCode::BAD_REQUEST,
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::HashingFailure
                | ErrorKind::SigningFailure
                | ErrorKind::StoreFailure => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::MissingFormData => "VAL_001",
            AppError::Credential(err) => match err.kind() {
                ErrorKind::InvalidLength => "VAL_002",
                ErrorKind::InvalidChars => "VAL_003",
                ErrorKind::Mismatch => "AUTH_001",
                ErrorKind::AlreadyExists => "USER_001",
                ErrorKind::NotFound => "NF_001",
                ErrorKind::HashingFailure => "HASH_001",
                ErrorKind::SigningFailure => "SIGN_001",
                ErrorKind::StoreFailure => "STORE_001",
            },
        }
    }

    /// Get a sanitized cause suitable for clients.
    ///
    /// Internal failures carry no cause at all.
    pub fn sanitized_message(&self) -> String {
        match self {
            AppError::MissingFormData => "missing form data".to_string(),
            AppError::Credential(err) => match err.kind() {
                ErrorKind::InvalidLength | ErrorKind::InvalidChars | ErrorKind::Mismatch => {
                    match err.field() {
                        Some(Field::Name) => "invalid username".to_string(),
                        Some(Field::Email) => "invalid email".to_string(),
                        _ => "invalid password".to_string(),
                    }
                },
                ErrorKind::AlreadyExists => "email is already in use".to_string(),
                ErrorKind::NotFound
                | ErrorKind::HashingFailure
                | ErrorKind::SigningFailure
                | ErrorKind::StoreFailure => String::new(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = serde_json::json!({
            "error": {
                "code": self.error_code(),
                "description": status.canonical_reason().unwrap_or_default(),
                "cause": self.sanitized_message(),
            }
        });

        (status, axum::Json(body)).into_response()
    }
}
