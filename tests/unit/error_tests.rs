// =========================
// tests/unit/error_tests.rs
// =========================
//! Unit tests for the error module
use authgate_backend_lib::error::{AppError, CredentialError, ErrorKind, Field};
use authgate_backend_lib::validation::{validate_email, validate_name, validate_password};
use axum::http::StatusCode;

#[test]
fn test_app_error_status_codes() {
    assert_eq!(AppError::MissingFormData.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        AppError::from(CredentialError::NotFound {
            email: "gopher@foomail.com".to_string()
        })
        .status_code(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        AppError::from(CredentialError::StoreFailure("disk full".to_string())).status_code(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
    assert_eq!(
        AppError::from(CredentialError::SigningFailure("bad key".to_string())).status_code(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[test]
fn test_validation_causes() {
    let err = AppError::from(validate_name("go").unwrap_err());
    assert_eq!(err.sanitized_message(), "invalid username");

    let err = AppError::from(validate_email("gopher@foomail").unwrap_err());
    assert_eq!(err.sanitized_message(), "invalid email");

    let err = AppError::from(validate_password("foobar12", "foobar13").unwrap_err());
    assert_eq!(err.sanitized_message(), "invalid password");
}

#[test]
fn test_internal_failures_hide_details() {
    let err = AppError::from(CredentialError::StoreFailure(
        "users: connection refused to 10.0.0.3".to_string(),
    ));
    assert_eq!(err.sanitized_message(), "");
    assert_eq!(err.error_code(), "STORE_001");
}

#[test]
fn test_password_is_redacted_in_messages() {
    let err = validate_password("hunter2", "hunter2").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidLength);
    assert_eq!(err.field(), Some(Field::Password));
    assert!(!err.to_string().contains("hunter2"));

    let err = validate_name("bad name!").unwrap_err();
    assert!(err.to_string().contains("bad name!"));
}
