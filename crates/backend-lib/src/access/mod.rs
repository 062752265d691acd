//! Adapters between the credential records and the document store.

pub mod tokens;
pub mod users;

pub use tokens::TokenStore;
pub use users::UserStore;
