// ===================================
// tests/integration/auth_flow_tests.rs
// ===================================
//! Workflow tests over a flat-file store
use authgate_backend_lib::error::ErrorKind;
use authgate_backend_lib::storage::{connect, Filter};
use authgate_backend_lib::workflow::Workflows;
use crate::test_utils::{file_settings, setup_test_env};
use chrono::Utc;
use tempfile::TempDir;

#[tokio::test]
async fn test_register_and_authenticate() {
    let (state, temp_dir) = setup_test_env().await.unwrap();
    let workflows = &state.workflows;

    workflows
        .register_user("gopher", "gopher@foomail.com", "foobar12", "foobar12")
        .await
        .unwrap();

    let issued = workflows
        .authenticate_and_issue_token("gopher@foomail.com", "foobar12")
        .await
        .unwrap();
    let claims = workflows.issuer().verify(&issued.token).unwrap();
    assert_eq!(claims.email, "gopher@foomail.com");
    assert!((claims.exp - (Utc::now().timestamp() + 86_400)).abs() <= 1);

    // the record landed in the token collection on disk
    let users = std::fs::read_to_string(temp_dir.path().join("auth").join("users.json")).unwrap();
    assert!(users.contains("\"passwordhash\""));
    assert!(!users.contains("foobar12"));
    let tokens = std::fs::read_to_string(temp_dir.path().join("auth").join("access.json")).unwrap();
    assert!(tokens.contains(&issued.token));

    let err = workflows
        .authenticate_and_issue_token("gopher@foomail.com", "wrong1234")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Mismatch);
}

#[tokio::test]
async fn test_reauthentication_replaces_token() {
    let (state, temp_dir) = setup_test_env().await.unwrap();
    let workflows = &state.workflows;
    workflows
        .register_user("gopher", "gopher@foomail.com", "foobar12", "foobar12")
        .await
        .unwrap();

    let first = workflows
        .authenticate_and_issue_token("gopher@foomail.com", "foobar12")
        .await
        .unwrap();
    let second = workflows
        .authenticate_and_issue_token("gopher@foomail.com", "foobar12")
        .await
        .unwrap();
    assert_ne!(first.token, second.token);

    let store = connect(&format!("file://{}", temp_dir.path().display()), "auth").unwrap();
    let record = store
        .find_one("access", &Filter::eq("email", "gopher@foomail.com"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record["token"], second.token.as_str());
}

#[tokio::test]
async fn test_users_survive_restart() {
    let temp_dir = TempDir::new().unwrap();
    let settings = file_settings(&temp_dir);

    let store = connect(&settings.db_address, &settings.db_name).unwrap();
    let workflows = Workflows::new(&settings, store).await.unwrap();
    workflows
        .register_user("gopher", "gopher@foomail.com", "foobar12", "foobar12")
        .await
        .unwrap();
    drop(workflows);

    let store = connect(&settings.db_address, &settings.db_name).unwrap();
    let workflows = Workflows::new(&settings, store).await.unwrap();
    let err = workflows
        .register_user("gopher", "gopher@foomail.com", "foobar12", "foobar12")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    assert!(workflows
        .authenticate_and_issue_token("gopher@foomail.com", "foobar12")
        .await
        .is_ok());
}

#[tokio::test]
async fn test_concurrent_registration_on_file_store() {
    let (state, _temp_dir) = setup_test_env().await.unwrap();

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let state = state.clone();
            tokio::spawn(async move {
                state
                    .workflows
                    .register_user(
                        &format!("gopher{i}"),
                        "gopher@foomail.com",
                        "foobar12",
                        "foobar12",
                    )
                    .await
            })
        })
        .collect();

    let mut created = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(()) => created += 1,
            Err(e) => assert_eq!(e.kind(), ErrorKind::AlreadyExists),
        }
    }
    assert_eq!(created, 1);
}
