//! The client's view of available fonts.
//!
//! A family becomes selectable only after its file has been downloaded and
//! parsed locally. Files that fail to load are remembered and never
//! retried for the rest of the session.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use fontsvg_core::font::LoadedFont;
use fontsvg_core::types::{FontAsset, FontVariant};

use crate::api::FontApiClient;

/// Families offered before anything is uploaded.
pub const DEFAULT_FAMILIES: [&str; 1] = ["Wendy One"];

struct LoadedEntry {
    asset: FontAsset,
    font: Arc<LoadedFont>,
}

pub struct FontLibrary {
    families: Vec<String>,
    loaded: HashMap<String, LoadedEntry>,
    failed: HashSet<String>,
    selected: String,
    variant: FontVariant,
}

impl Default for FontLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl FontLibrary {
    pub fn new() -> Self {
        let families: Vec<String> = DEFAULT_FAMILIES.iter().map(|f| f.to_string()).collect();
        let selected = DEFAULT_FAMILIES[0].to_string();
        Self {
            families,
            loaded: HashMap::new(),
            failed: HashSet::new(),
            selected,
            variant: FontVariant::Regular,
        }
    }

    /// Selectable families, most recently loaded first.
    pub fn families(&self) -> &[String] {
        &self.families
    }

    pub fn selected(&self) -> &str {
        &self.selected
    }

    /// Select `family` if it is offered. Returns whether it was.
    pub fn select(&mut self, family: &str) -> bool {
        if !self.families.iter().any(|f| f == family) {
            return false;
        }
        self.selected = family.to_string();
        true
    }

    pub fn variant(&self) -> FontVariant {
        self.variant
    }

    pub fn set_variant(&mut self, variant: FontVariant) {
        self.variant = variant;
    }

    /// Whether `family` came from the server rather than the defaults.
    pub fn is_uploaded(&self, family: &str) -> bool {
        self.loaded.contains_key(family)
    }

    pub fn asset(&self, family: &str) -> Option<&FontAsset> {
        self.loaded.get(family).map(|entry| &entry.asset)
    }

    /// The locally parsed font for `family`, if any.
    pub fn font(&self, family: &str) -> Option<Arc<LoadedFont>> {
        self.loaded.get(family).map(|entry| Arc::clone(&entry.font))
    }

    pub fn has_failed(&self, filename: &str) -> bool {
        self.failed.contains(filename)
    }

    /// Download and install `asset`. Returns whether the family is now
    /// selectable.
    pub async fn load(&mut self, api: &FontApiClient, asset: &FontAsset) -> bool {
        if self.failed.contains(&asset.filename) {
            return false;
        }
        if self.loaded.contains_key(&asset.font_family) {
            return true;
        }

        match api.fetch_font(&asset.url).await {
            Ok(bytes) => self.install(asset, &bytes),
            Err(e) => {
                tracing::warn!(filename = %asset.filename, error = %e, "Could not download font");
                self.failed.insert(asset.filename.clone());
                false
            }
        }
    }

    /// Parse `bytes` as the file for `asset` and offer its family.
    pub fn install(&mut self, asset: &FontAsset, bytes: &[u8]) -> bool {
        if self.failed.contains(&asset.filename) {
            return false;
        }
        if asset.font_family.trim().is_empty() {
            tracing::warn!(filename = %asset.filename, "Font has no name, skipping");
            self.failed.insert(asset.filename.clone());
            return false;
        }

        let font = match LoadedFont::from_bytes(bytes) {
            Ok(font) => Arc::new(font),
            Err(e) => {
                tracing::warn!(filename = %asset.filename, error = %e, "Could not load font");
                self.failed.insert(asset.filename.clone());
                return false;
            }
        };

        if !self.families.contains(&asset.font_family) {
            self.families.insert(0, asset.font_family.clone());
        }
        self.loaded.insert(
            asset.font_family.clone(),
            LoadedEntry {
                asset: asset.clone(),
                font,
            },
        );
        tracing::debug!(font_family = %asset.font_family, "Font loaded locally");
        true
    }
}
