//! Registry persisted as a single pretty-printed JSON array.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use fontsvg_core::error::CoreError;
use fontsvg_core::types::{FontAsset, FontMetadata};
use tokio::sync::Mutex;

use super::{new_asset, FontRegistry};
use crate::store::StoredFont;
use crate::{DbError, DbResult};

/// JSON-file backend.
///
/// The whole array is read, modified and written back on every
/// registration. Registrations are serialized by an in-process lock and
/// each write goes to a temporary file that is renamed over the registry,
/// so readers always see a complete array.
#[derive(Debug)]
pub struct JsonFileRegistry {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileRegistry {
    /// Open the registry at `path`, creating an empty one (and its parent
    /// directory) when missing.
    pub async fn open(path: impl Into<PathBuf>) -> DbResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| DbError::io(parent, e))?;
        }

        match tokio::fs::try_exists(&path).await {
            Ok(true) => {}
            Ok(false) => {
                write_atomic(&path, b"[]").await?;
                tracing::info!(path = %path.display(), "Created empty font registry");
            }
            Err(e) => return Err(DbError::io(&path, e)),
        }

        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> DbResult<Vec<FontAsset>> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| DbError::io(&self.path, e))?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl FontRegistry for JsonFileRegistry {
    async fn register(&self, metadata: &FontMetadata, stored: &StoredFont) -> DbResult<FontAsset> {
        let _guard = self.write_lock.lock().await;

        let mut fonts = self.read_all().await?;
        if fonts.iter().any(|f| f.font_family == metadata.family_name) {
            return Err(CoreError::DuplicateFamily(metadata.family_name.clone()).into());
        }

        let asset = new_asset(metadata, stored);
        fonts.push(asset.clone());

        let json = serde_json::to_vec_pretty(&fonts)?;
        write_atomic(&self.path, &json).await?;

        tracing::info!(
            font_family = %asset.font_family,
            filename = %asset.filename,
            total = fonts.len(),
            "Font registered"
        );
        Ok(asset)
    }

    async fn list(&self) -> DbResult<Vec<FontAsset>> {
        self.read_all().await
    }

    async fn resolve(&self, family_name: &str) -> DbResult<FontAsset> {
        self.read_all()
            .await?
            .into_iter()
            .find(|f| f.font_family == family_name)
            .ok_or_else(|| CoreError::font_not_found(family_name).into())
    }
}

/// Write `data` next to `path` and rename it into place.
async fn write_atomic(path: &Path, data: &[u8]) -> DbResult<()> {
    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    tokio::fs::write(&tmp, data)
        .await
        .map_err(|e| DbError::io(&tmp, e))?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| DbError::io(path, e))
}
