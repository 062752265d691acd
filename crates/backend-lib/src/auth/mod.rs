// ============================
// authgate-backend-lib/src/auth/mod.rs
// ============================
//! Authentication primitives: password hashing and token signing.

pub mod password;
pub mod token;

pub use password::{hash_password, verify_password, HASH_LOG_N};
pub use token::{Claims, IssuedToken, TokenIssuer, TOKEN_TTL_HOURS};
