pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod sessions;
pub mod store;

use std::time::Duration;

use crate::{
    config::AppConfig, error::BackendError, services::backend_client::BackendClient,
    sessions::SessionRegistry, store::Stores,
};

/// Shared state handed to every handler through `web::Data`.
pub struct AppState {
    pub config: AppConfig,
    pub backend: BackendClient,
    pub stores: Stores,
    pub sessions: SessionRegistry,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self, BackendError> {
        let backend = BackendClient::new(&config)?;
        let sessions = SessionRegistry::new(
            Duration::from_millis(config.search_debounce_ms),
            chrono::Duration::minutes(config.session_idle_minutes),
        );

        Ok(Self {
            config,
            backend,
            stores: Stores::new(),
            sessions,
        })
    }
}
