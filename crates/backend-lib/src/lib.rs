// ============================
// authgate-backend-lib/src/lib.rs
// ============================
//! Core backend-lib functionality for the `authgate` credential service.

pub mod access;
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod router;
pub mod storage;
pub mod validation;
pub mod workflow;

use crate::config::Settings;
use crate::storage::DocumentStore;
use crate::workflow::Workflows;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Registration and token workflows
    pub workflows: Workflows,
    /// Settings manager
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Create a new application state over an already connected store
    pub async fn new(store: Arc<dyn DocumentStore>, settings: Settings) -> anyhow::Result<Self> {
        let workflows = Workflows::new(&settings, store).await?;
        Ok(Self {
            workflows,
            settings: Arc::new(settings),
        })
    }

    /// Connect the store named in `settings` and build the state on it
    pub async fn from_settings(settings: Settings) -> anyhow::Result<Self> {
        let store = storage::connect(&settings.db_address, &settings.db_name)?;
        Self::new(store, settings).await
    }
}
