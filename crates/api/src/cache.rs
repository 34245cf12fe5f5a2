//! Parsed-font cache.
//!
//! Decoding a WOFF2 upload and parsing its tables is far more expensive than
//! laying out a short string, so each stored file is parsed once and shared.
//! Files are immutable once stored, which makes the filename a safe key.

use std::collections::HashMap;
use std::sync::Arc;

use fontsvg_core::error::CoreError;
use fontsvg_core::font::LoadedFont;
use fontsvg_db::FontStore;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct FontCache {
    fonts: RwLock<HashMap<String, Arc<LoadedFont>>>,
}

impl FontCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the cache with a font parsed during upload.
    pub async fn insert(&self, filename: &str, font: Arc<LoadedFont>) {
        self.fonts.write().await.insert(filename.to_string(), font);
    }

    /// Return the parsed font for `filename`, loading it from `store` on a miss.
    ///
    /// A file that is missing or no longer parses is reported as
    /// [`CoreError::Render`]: the registry promised a renderable font.
    pub async fn get_or_load(
        &self,
        store: &FontStore,
        filename: &str,
    ) -> Result<Arc<LoadedFont>, CoreError> {
        if let Some(font) = self.fonts.read().await.get(filename) {
            return Ok(Arc::clone(font));
        }

        let bytes = store
            .read(filename)
            .await
            .map_err(|e| CoreError::Render(format!("cannot read stored font: {e}")))?;

        let font = tokio::task::spawn_blocking(move || LoadedFont::from_bytes(&bytes))
            .await
            .map_err(|e| CoreError::Internal(format!("font decode task failed: {e}")))?
            .map_err(|e| CoreError::Render(format!("stored font {filename} is unreadable: {e}")))?;

        let font = Arc::new(font);
        tracing::debug!(filename, format = font.format().as_str(), "Font cached");

        let mut fonts = self.fonts.write().await;
        let entry = fonts
            .entry(filename.to_string())
            .or_insert_with(|| Arc::clone(&font));
        Ok(Arc::clone(entry))
    }
}
