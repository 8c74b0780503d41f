//! Editor configuration loading

use hearth_core::collision::{CollisionGuard, DEFAULT_MODEL_RADIUS};
use hearth_store::{AnyStore, FileStore, HttpStore, MemoryStore, StoreError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read editor config: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse editor config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Main editor configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EditorConfig {
    #[serde(default)]
    pub editor: EditorSettings,
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorSettings {
    /// Key of the scene document in the store
    #[serde(default = "default_document_key")]
    pub document_key: String,
    /// Delay before a drag autosave fires, in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Reject drags that bring two models too close together
    #[serde(default = "default_true")]
    pub collision_guard: bool,
    /// Bounding radius of a model in world units
    #[serde(default = "default_model_radius")]
    pub model_radius: f64,
    /// World units moved per unit of pointer displacement (NDC)
    #[serde(default = "default_movement_scale")]
    pub movement_scale: f64,
    /// Rotation applied per key press, in degrees
    #[serde(default = "default_key_rotation")]
    pub key_rotation_deg: f64,
    /// Rotation applied per control point click, in degrees
    #[serde(default = "default_control_rotation")]
    pub control_rotation_deg: f64,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            document_key: default_document_key(),
            debounce_ms: default_debounce_ms(),
            collision_guard: true,
            model_radius: default_model_radius(),
            movement_scale: default_movement_scale(),
            key_rotation_deg: default_key_rotation(),
            control_rotation_deg: default_control_rotation(),
        }
    }
}

impl EditorSettings {
    pub fn debounce_delay(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Collision guard to apply while dragging, if enabled
    pub fn collision(&self) -> Option<CollisionGuard> {
        self.collision_guard
            .then(|| CollisionGuard::new(self.model_radius))
    }
}

fn default_document_key() -> String {
    "scenes/scene_data".to_string()
}

fn default_debounce_ms() -> u64 {
    1000
}

fn default_true() -> bool {
    true
}

fn default_model_radius() -> f64 {
    DEFAULT_MODEL_RADIUS
}

fn default_movement_scale() -> f64 {
    5.0
}

fn default_key_rotation() -> f64 {
    15.0
}

fn default_control_rotation() -> f64 {
    45.0
}

/// Which document store backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    File,
    #[default]
    Http,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    /// Directory for the file backend
    #[serde(default = "default_store_path")]
    pub path: String,
    /// Daemon base URL for the http backend
    #[serde(default = "default_store_url")]
    pub url: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            path: default_store_path(),
            url: default_store_url(),
        }
    }
}

fn default_store_path() -> String {
    "./data".to_string()
}

fn default_store_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

impl StoreConfig {
    /// Build the configured store
    pub fn open(&self) -> Result<AnyStore, StoreError> {
        let store = match self.backend {
            StoreBackend::Memory => AnyStore::from(MemoryStore::new()),
            StoreBackend::File => AnyStore::from(FileStore::new(&self.path)?),
            StoreBackend::Http => AnyStore::from(HttpStore::new(&self.url)?),
        };
        info!(backend = store.backend(), "Opened document store");
        Ok(store)
    }
}

impl EditorConfig {
    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Build the configured document store
    pub fn open_store(&self) -> Result<AnyStore, StoreError> {
        self.store.open()
    }
}

/// Load configuration from file, falling back to defaults when it is absent
pub fn load_config(path: &Path) -> Result<EditorConfig, ConfigError> {
    if path.exists() {
        let content = std::fs::read_to_string(path)?;
        let config = EditorConfig::from_toml(&content)?;
        info!(path = %path.display(), "Loaded editor configuration");
        Ok(config)
    } else {
        info!(
            path = %path.display(),
            "Editor configuration file not found, using defaults"
        );
        Ok(EditorConfig::default())
    }
}
