//! Container format detection.
//!
//! Detection is by content only. The extension check in
//! [`is_font_extension`] is a usability pre-filter for clients, never a
//! substitute for [`detect`].

use crate::error::CoreError;
use crate::types::FontFormat;

/// Extensions offered to users when picking files.
pub const FONT_EXTENSIONS: [&str; 4] = ["ttf", "otf", "woff", "woff2"];

/// Identify the container from its first four bytes.
pub fn detect(bytes: &[u8]) -> Result<FontFormat, CoreError> {
    let magic: [u8; 4] = bytes
        .get(..4)
        .and_then(|m| m.try_into().ok())
        .ok_or_else(|| CoreError::InvalidFontFormat("file is too short".into()))?;

    match &magic {
        [0x00, 0x01, 0x00, 0x00] | b"true" => Ok(FontFormat::TrueType),
        b"OTTO" => Ok(FontFormat::OpenType),
        b"ttcf" => Ok(FontFormat::Collection),
        b"wOFF" => Ok(FontFormat::Woff),
        b"wOF2" => Ok(FontFormat::Woff2),
        _ => Err(CoreError::InvalidFontFormat(format!(
            "unrecognized signature {:02x}{:02x}{:02x}{:02x}",
            magic[0], magic[1], magic[2], magic[3]
        ))),
    }
}

/// Case-insensitive extension check against [`FONT_EXTENSIONS`].
///
/// ```
/// use fontsvg_core::format::is_font_extension;
///
/// assert!(is_font_extension("Roboto-Bold.TTF"));
/// assert!(is_font_extension("inter.woff2"));
/// assert!(!is_font_extension("notes.txt"));
/// assert!(!is_font_extension("ttf"));
/// ```
pub fn is_font_extension(file_name: &str) -> bool {
    std::path::Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            FONT_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}
