//! Success envelopes for the font API.
//!
//! Every JSON body carries a `success` flag; error bodies are produced by
//! [`crate::error::AppError`].

use fontsvg_core::types::FontAsset;
use serde::Serialize;

/// `{ "success": true, "font": FontAsset }`
#[derive(Debug, Serialize)]
pub struct FontResponse {
    pub success: bool,
    pub font: FontAsset,
}

impl FontResponse {
    pub fn new(font: FontAsset) -> Self {
        Self {
            success: true,
            font,
        }
    }
}

/// `{ "success": bool, "fonts": [FontAsset] }`
///
/// A registry that cannot be read is reported as `success: false` with an
/// empty list rather than an error status.
#[derive(Debug, Serialize)]
pub struct FontListResponse {
    pub success: bool,
    pub fonts: Vec<FontAsset>,
}

impl FontListResponse {
    pub fn ok(fonts: Vec<FontAsset>) -> Self {
        Self {
            success: true,
            fonts,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            success: false,
            fonts: Vec::new(),
        }
    }
}
