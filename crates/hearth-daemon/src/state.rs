//! Application state management

use anyhow::{Context, Result};
use hearth_store::FileStore;
use std::sync::Arc;
use tracing::info;

use crate::config::Config;

/// Shared application state
pub struct AppState {
    /// Document store backing the REST API
    pub store: FileStore,
    /// Configuration
    pub config: Config,
}

impl AppState {
    /// Create new application state
    pub fn new(config: Config) -> Result<Arc<Self>> {
        let store = FileStore::new(&config.storage.path)
            .with_context(|| format!("Failed to open document store at {}", config.storage.path))?;

        info!(path = %store.base_dir().display(), "Document store ready");

        Ok(Arc::new(Self { store, config }))
    }
}
