// ============================
// tests/unit/password_tests.rs
// ============================
//! Unit tests for password hashing
use authgate_backend_lib::auth::{hash_password, verify_password, HASH_LOG_N};
use authgate_backend_lib::error::ErrorKind;

#[test]
fn test_password_hashing_and_verification() {
    let hash = hash_password("foobar12").unwrap();

    assert_ne!(hash, "foobar12");
    assert!(hash.starts_with("$scrypt$"));
    assert!(hash.contains(&format!("ln={HASH_LOG_N}")));
    assert!(verify_password("foobar12", &hash).is_ok());

    let err = verify_password("wrong1234", &hash).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Mismatch);
}

#[test]
fn test_hashes_are_salted() {
    let first = hash_password("foobar12").unwrap();
    let second = hash_password("foobar12").unwrap();
    assert_ne!(first, second);
}

#[test]
fn test_unrelated_hash_is_mismatch() {
    let other = hash_password("something-else").unwrap();
    assert_eq!(
        verify_password("foobar12", &other).unwrap_err().kind(),
        ErrorKind::Mismatch
    );
    assert_eq!(
        verify_password("foobar12", "not a phc string").unwrap_err().kind(),
        ErrorKind::Mismatch
    );
}
