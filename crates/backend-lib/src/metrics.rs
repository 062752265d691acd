// ==============
// crates/backend-lib/src/metrics.rs

//! Central place for metric keys
pub const USER_REGISTERED: &str = "user.registered";
pub const REGISTRATION_REJECTED: &str = "user.registration_rejected";
pub const TOKEN_ISSUED: &str = "token.issued";
pub const AUTHENTICATION_REJECTED: &str = "token.authentication_rejected";
pub const MISSING_FORM_DATA: &str = "http.missing_form_data";
