// ============================
// crates/backend-lib/src/handlers/mod.rs
// ============================
//! HTTP handlers.
pub mod credentials;
pub mod health;

pub use credentials::{signup, token};
pub use health::health;
