// ===================================
// tests/integration/http_flow_tests.rs
// ===================================
//! End-to-end HTTP tests
use authgate_common::TokenResponse;
use crate::test_utils::{post_form, setup_test_app};
use axum::http::StatusCode;

const SIGNUP: &str =
    "username=gopher&email=gopher%40foomail.com&password=foobar12&password_check=foobar12";

#[tokio::test]
async fn test_signup_and_token() {
    let (app, _temp_dir) = setup_test_app().await.unwrap();

    let (status, body) = post_form(&app, "/signup", SIGNUP).await.unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["msg"], "user created");

    let (status, body) = post_form(&app, "/token", "email=gopher%40foomail.com&password=foobar12")
        .await
        .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    let response: TokenResponse = serde_json::from_value(body).unwrap();
    assert!(!response.token.is_empty());
    assert!(response.expiration_date > chrono::Utc::now().timestamp());
}

#[tokio::test]
async fn test_duplicate_signup() {
    let (app, _temp_dir) = setup_test_app().await.unwrap();

    post_form(&app, "/signup", SIGNUP).await.unwrap();
    let (status, body) = post_form(&app, "/signup", SIGNUP).await.unwrap();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "USER_001");
    assert_eq!(body["error"]["cause"], "email is already in use");
}

#[tokio::test]
async fn test_signup_password_mismatch() {
    let (app, _temp_dir) = setup_test_app().await.unwrap();

    let (status, body) = post_form(
        &app,
        "/signup",
        "username=gopher&email=gopher%40foomail.com&password=foobar12&password_check=foobar13",
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["cause"], "invalid password");
}

#[tokio::test]
async fn test_token_unknown_user() {
    let (app, _temp_dir) = setup_test_app().await.unwrap();

    let (status, body) = post_form(&app, "/token", "email=nobody%40foomail.com&password=foobar12")
        .await
        .unwrap();
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NF_001");
    assert_eq!(body["error"]["cause"], "");
}

#[tokio::test]
async fn test_missing_form_data() {
    let (app, _temp_dir) = setup_test_app().await.unwrap();

    let (status, body) = post_form(&app, "/token", "").await.unwrap();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["cause"], "missing form data");
    assert_eq!(body["error"]["description"], "Bad Request");
}
