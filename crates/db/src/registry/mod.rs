//! Font registry abstraction and its backends.

pub mod json_file;
pub mod memory;

use async_trait::async_trait;
use fontsvg_core::naming;
use fontsvg_core::types::{FontAsset, FontMetadata};

use crate::store::StoredFont;
use crate::DbResult;

/// The authoritative set of renderable fonts, keyed by family name.
///
/// Backends must keep family names unique (exact, case-sensitive match)
/// and must not acknowledge a registration before it is durable.
#[async_trait]
pub trait FontRegistry: Send + Sync {
    /// Append a new asset, or fail with `CoreError::DuplicateFamily` when
    /// the family is already present.
    async fn register(&self, metadata: &FontMetadata, stored: &StoredFont) -> DbResult<FontAsset>;

    /// All assets in insertion order.
    async fn list(&self) -> DbResult<Vec<FontAsset>>;

    /// Exact-match lookup, failing with `CoreError::NotFound`.
    async fn resolve(&self, family_name: &str) -> DbResult<FontAsset>;

    /// Whether the backing storage is readable.
    async fn health_check(&self) -> DbResult<()> {
        self.list().await.map(|_| ())
    }
}

/// Build the record persisted for a newly registered font.
pub(crate) fn new_asset(metadata: &FontMetadata, stored: &StoredFont) -> FontAsset {
    FontAsset {
        font_family: metadata.family_name.clone(),
        filename: stored.filename.clone(),
        url: naming::public_url(&stored.filename),
        original_filename: Some(stored.original_filename.clone()),
    }
}
