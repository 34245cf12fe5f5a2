use std::sync::Arc;

use fontsvg_db::{DbResult, FontRegistry, FontStore, JsonFileRegistry};

use crate::cache::FontCache;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Family name to stored file mapping.
    pub registry: Arc<dyn FontRegistry>,
    /// Uploaded font files on disk.
    pub store: FontStore,
    /// Parsed fonts keyed by stored filename.
    pub font_cache: Arc<FontCache>,
}

impl AppState {
    /// Open the upload directory and JSON registry named by `config`,
    /// creating both when missing.
    pub async fn from_config(config: &ServerConfig) -> DbResult<Self> {
        let store = FontStore::open(&config.uploads_dir).await?;
        let registry = JsonFileRegistry::open(&config.registry_path).await?;

        Ok(Self {
            config: Arc::new(config.clone()),
            registry: Arc::new(registry),
            store,
            font_cache: Arc::new(FontCache::new()),
        })
    }
}
