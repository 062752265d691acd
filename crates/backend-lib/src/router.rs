// ============================
// crates/backend-lib/src/router.rs
// ============================
//! HTTP router.
use crate::handlers::{health, signup, token};
use crate::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/signup", post(signup))
        .route("/token", post(token))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
