//! In-memory registry, for tests and ephemeral deployments.

use async_trait::async_trait;
use fontsvg_core::error::CoreError;
use fontsvg_core::types::{FontAsset, FontMetadata};
use tokio::sync::RwLock;

use super::{new_asset, FontRegistry};
use crate::store::StoredFont;
use crate::DbResult;

#[derive(Debug, Default)]
pub struct MemoryRegistry {
    fonts: RwLock<Vec<FontAsset>>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FontRegistry for MemoryRegistry {
    async fn register(&self, metadata: &FontMetadata, stored: &StoredFont) -> DbResult<FontAsset> {
        let mut fonts = self.fonts.write().await;
        if fonts.iter().any(|f| f.font_family == metadata.family_name) {
            return Err(CoreError::DuplicateFamily(metadata.family_name.clone()).into());
        }
        let asset = new_asset(metadata, stored);
        fonts.push(asset.clone());
        Ok(asset)
    }

    async fn list(&self) -> DbResult<Vec<FontAsset>> {
        Ok(self.fonts.read().await.clone())
    }

    async fn resolve(&self, family_name: &str) -> DbResult<FontAsset> {
        self.fonts
            .read()
            .await
            .iter()
            .find(|f| f.font_family == family_name)
            .cloned()
            .ok_or_else(|| CoreError::font_not_found(family_name).into())
    }
}
