// ============================
// crates/backend-lib/src/validation/mod.rs
// ============================
//! Input validation for registration and token requests.
//!
//! All checks are pure. Lengths are counted in bytes and checked before the
//! character rules, so a value that is both too short and malformed reports
//! [`CredentialError::InvalidLength`].

use crate::error::{CredentialError, Field, FieldValue, LengthBound};
use regex::Regex;
use std::sync::LazyLock;

const MIN_NAME_LENGTH: usize = 6;
const MAX_NAME_LENGTH: usize = 36;
const MIN_EMAIL_LENGTH: usize = 11;
const MAX_EMAIL_LENGTH: usize = 64;
const MIN_PASSWORD_LENGTH: usize = 8;
const MAX_PASSWORD_LENGTH: usize = 128;

static NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_]*$").expect("name pattern"));

// Lowercase only, tld of 2 to 4 letters.
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9._%+\-]+@[a-z0-9.\-]+\.[a-z]{2,4}$").expect("email pattern")
});

/// Result type for validation operations
pub type ValidationResult = Result<(), CredentialError>;

fn validate_min_len(field: Field, value: &str, min: usize) -> ValidationResult {
    if value.len() < min {
        return Err(CredentialError::InvalidLength {
            field,
            value: FieldValue::for_field(field, value),
            bound: LengthBound::AtLeast(min),
            len: value.len(),
        });
    }
    Ok(())
}

fn validate_max_len(field: Field, value: &str, max: usize) -> ValidationResult {
    if value.len() > max {
        return Err(CredentialError::InvalidLength {
            field,
            value: FieldValue::for_field(field, value),
            bound: LengthBound::UpTo(max),
            len: value.len(),
        });
    }
    Ok(())
}

fn validate_chars(field: Field, value: &str, re: &Regex) -> ValidationResult {
    if !re.is_match(value) {
        return Err(CredentialError::InvalidChars {
            field,
            value: FieldValue::for_field(field, value),
        });
    }
    Ok(())
}

/// Validate a user name
pub fn validate_name(name: &str) -> ValidationResult {
    validate_min_len(Field::Name, name, MIN_NAME_LENGTH)?;
    validate_max_len(Field::Name, name, MAX_NAME_LENGTH)?;
    validate_chars(Field::Name, name, &NAME_REGEX)
}

/// Validate an email address
pub fn validate_email(email: &str) -> ValidationResult {
    validate_min_len(Field::Email, email, MIN_EMAIL_LENGTH)?;
    validate_max_len(Field::Email, email, MAX_EMAIL_LENGTH)?;
    validate_chars(Field::Email, email, &EMAIL_REGEX)
}

/// Validate a password against its confirmation, then its length
pub fn validate_password(password: &str, confirmation: &str) -> ValidationResult {
    if password != confirmation {
        return Err(CredentialError::Mismatch {
            field: Field::Password,
            value: FieldValue::for_field(Field::Password, password),
            against: "its confirmation",
        });
    }

    validate_min_len(Field::Password, password, MIN_PASSWORD_LENGTH)?;
    validate_max_len(Field::Password, password, MAX_PASSWORD_LENGTH)
}
