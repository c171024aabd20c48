use std::sync::Arc;

use anyhow::Result;

use crate::{backend::BackendClient, config::AppConfig};

/// Shared handler state: configuration plus the typed backend client.
/// There is no database and no server-side session store; everything a
/// page shows is fetched from the backends per request.
#[derive(Clone)]
pub struct AppState {
    config: Arc<AppConfig>,
    backend: BackendClient,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self> {
        let backend = BackendClient::new(&config)?;
        Ok(Self {
            config: Arc::new(config),
            backend,
        })
    }

    pub fn backend(&self) -> &BackendClient {
        &self.backend
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
