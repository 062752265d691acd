// ============================
// crates/backend-lib/src/handlers/credentials.rs
// ============================
//! Signup and token endpoints.
//!
//! Both handlers reject empty form fields before the workflows run.
use crate::error::AppError;
use crate::metrics::MISSING_FORM_DATA;
use crate::AppState;
use authgate_common::{SignupForm, SignupResponse, TokenForm, TokenResponse};
use axum::{extract::State, http::StatusCode, Form, Json};
use metrics::counter;
use std::sync::Arc;
use tracing::warn;
use zeroize::Zeroizing;

/// Fails with [`AppError::MissingFormData`] on the first empty field
fn require_fields(fields: &[(&str, &str)]) -> Result<(), AppError> {
    for (name, value) in fields {
        if value.is_empty() {
            warn!("{} is empty", name);
            counter!(MISSING_FORM_DATA).increment(1);
            return Err(AppError::MissingFormData);
        }
    }
    Ok(())
}

/// `POST /signup`
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SignupForm>,
) -> Result<(StatusCode, Json<SignupResponse>), AppError> {
    let password = Zeroizing::new(form.password);
    let password_check = Zeroizing::new(form.password_check);

    require_fields(&[
        ("username", form.username.as_str()),
        ("email", form.email.as_str()),
        ("password", password.as_str()),
        ("password_check", password_check.as_str()),
    ])?;

    state
        .workflows
        .register_user(&form.username, &form.email, &password, &password_check)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            msg: "user created".to_string(),
        }),
    ))
}

/// `POST /token`
pub async fn token(
    State(state): State<Arc<AppState>>,
    Form(form): Form<TokenForm>,
) -> Result<(StatusCode, Json<TokenResponse>), AppError> {
    let password = Zeroizing::new(form.password);

    require_fields(&[("email", form.email.as_str()), ("password", password.as_str())])?;

    let issued = state
        .workflows
        .authenticate_and_issue_token(&form.email, &password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(TokenResponse {
            token: issued.token,
            expiration_date: issued.expires_at,
        }),
    ))
}
