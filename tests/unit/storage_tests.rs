// ===========================
// tests/unit/storage_tests.rs
// ===========================
//! Unit tests for store selection
use authgate_backend_lib::storage::{connect, Filter, StoreError};
use serde_json::json;
use tempfile::TempDir;

#[tokio::test]
async fn test_connect_memory() {
    let store = connect("memory://", "auth").unwrap();
    let doc = json!({"email": "gopher@foomail.com"}).as_object().cloned().unwrap();
    store.insert_one("users", doc).await.unwrap();

    let found = store
        .find_one("users", &Filter::eq("email", "gopher@foomail.com"))
        .await
        .unwrap();
    assert!(found.is_some());
}

#[tokio::test]
async fn test_connect_file_creates_database_dir() {
    let temp_dir = TempDir::new().unwrap();
    let address = format!("file://{}", temp_dir.path().display());

    let store = connect(&address, "auth").unwrap();
    store.ensure_unique_index("users", "email").await.unwrap();
    assert!(temp_dir.path().join("auth").is_dir());
}

#[test]
fn test_connect_unknown_scheme() {
    let err = connect("mongodb://localhost:27017", "auth").err().unwrap();
    assert!(matches!(err, StoreError::Connect(_)));
}
