//! Liveness endpoint.
use axum::Json;
use serde_json::{json, Value};

/// Service name and version
pub async fn health() -> Json<Value> {
    Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
