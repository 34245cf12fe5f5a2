//! Font validation and family-name extraction.

use ttf_parser::name::Name;
use ttf_parser::{name_id, Face, PlatformId};

use crate::error::CoreError;
use crate::font::LoadedFont;
use crate::naming;
use crate::types::{FamilySource, FontMetadata};

const WINDOWS_ENGLISH_US: u16 = 0x0409;
const MAC_ROMAN_ENCODING: u16 = 0;

/// Validate uploaded bytes and extract the family name.
///
/// Detection is by content. A font that parses but carries no usable
/// family name is accepted with a name derived from `original_filename`;
/// the returned metadata records that through
/// [`FamilySource::FileName`].
///
/// # Errors
///
/// - [`CoreError::InvalidFontFormat`] when the bytes are not a supported
///   font.
/// - [`CoreError::Validation`] when neither the font nor the file name
///   yields a family name.
pub fn validate(bytes: &[u8], original_filename: &str) -> Result<FontMetadata, CoreError> {
    let font = LoadedFont::from_bytes(bytes)?;
    validate_loaded(&font, original_filename)
}

/// [`validate`] for a font that has already been loaded.
pub fn validate_loaded(
    font: &LoadedFont,
    original_filename: &str,
) -> Result<FontMetadata, CoreError> {
    let face = font.face()?;

    if let Some(family_name) = family_name(&face) {
        return Ok(FontMetadata {
            family_name,
            family_source: FamilySource::Embedded,
            format: font.format(),
        });
    }

    let stem = naming::file_stem(original_filename);
    if stem.is_empty() {
        return Err(CoreError::Validation(
            "font has no family name and the file name is empty".into(),
        ));
    }

    tracing::warn!(
        original_filename,
        family = %stem,
        "Font carries no family name, using file name"
    );
    Ok(FontMetadata {
        family_name: stem,
        family_source: FamilySource::FileName,
        format: font.format(),
    })
}

/// Family name from the `name` table.
///
/// Preference order: name ID 1 from Windows English records, any other
/// Unicode ID 1 record, a Macintosh Roman ID 1 record, then the same
/// sequence for the typographic family (ID 16).
pub fn family_name(face: &Face<'_>) -> Option<String> {
    [name_id::FAMILY, name_id::TYPOGRAPHIC_FAMILY]
        .into_iter()
        .find_map(|id| best_name(face, id))
}

fn best_name(face: &Face<'_>, id: u16) -> Option<String> {
    let candidates: Vec<Name<'_>> = face
        .names()
        .into_iter()
        .filter(|n| n.name_id == id)
        .collect();

    let windows_english = candidates.iter().find(|n| {
        n.platform_id == PlatformId::Windows && n.language_id == WINDOWS_ENGLISH_US
    });

    windows_english
        .and_then(decode_name)
        .or_else(|| {
            candidates
                .iter()
                .filter(|n| n.is_unicode())
                .find_map(decode_name)
        })
        .or_else(|| {
            candidates
                .iter()
                .filter(|n| is_mac_roman(n))
                .find_map(decode_name)
        })
}

fn is_mac_roman(name: &Name<'_>) -> bool {
    name.platform_id == PlatformId::Macintosh && name.encoding_id == MAC_ROMAN_ENCODING
}

fn decode_name(name: &Name<'_>) -> Option<String> {
    let decoded = if name.is_unicode() {
        name.to_string()?
    } else if is_mac_roman(name) {
        decode_mac_roman(name.name)
    } else {
        return None;
    };

    let trimmed = decoded.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn decode_mac_roman(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| {
            if b < 0x80 {
                char::from(b)
            } else {
                MAC_ROMAN_HIGH[usize::from(b - 0x80)]
            }
        })
        .collect()
}

/// Mac OS Roman code points 0x80..=0xFF.
const MAC_ROMAN_HIGH: [char; 128] = [
    '\u{00C4}', '\u{00C5}', '\u{00C7}', '\u{00C9}', '\u{00D1}', '\u{00D6}', '\u{00DC}', '\u{00E1}',
    '\u{00E0}', '\u{00E2}', '\u{00E4}', '\u{00E3}', '\u{00E5}', '\u{00E7}', '\u{00E9}', '\u{00E8}',
    '\u{00EA}', '\u{00EB}', '\u{00ED}', '\u{00EC}', '\u{00EE}', '\u{00EF}', '\u{00F1}', '\u{00F3}',
    '\u{00F2}', '\u{00F4}', '\u{00F6}', '\u{00F5}', '\u{00FA}', '\u{00F9}', '\u{00FB}', '\u{00FC}',
    '\u{2020}', '\u{00B0}', '\u{00A2}', '\u{00A3}', '\u{00A7}', '\u{2022}', '\u{00B6}', '\u{00DF}',
    '\u{00AE}', '\u{00A9}', '\u{2122}', '\u{00B4}', '\u{00A8}', '\u{2260}', '\u{00C6}', '\u{00D8}',
    '\u{221E}', '\u{00B1}', '\u{2264}', '\u{2265}', '\u{00A5}', '\u{00B5}', '\u{2202}', '\u{2211}',
    '\u{220F}', '\u{03C0}', '\u{222B}', '\u{00AA}', '\u{00BA}', '\u{03A9}', '\u{00E6}', '\u{00F8}',
    '\u{00BF}', '\u{00A1}', '\u{00AC}', '\u{221A}', '\u{0192}', '\u{2248}', '\u{2206}', '\u{00AB}',
    '\u{00BB}', '\u{2026}', '\u{00A0}', '\u{00C0}', '\u{00C3}', '\u{00D5}', '\u{0152}', '\u{0153}',
    '\u{2013}', '\u{2014}', '\u{201C}', '\u{201D}', '\u{2018}', '\u{2019}', '\u{00F7}', '\u{25CA}',
    '\u{00FF}', '\u{0178}', '\u{2044}', '\u{20AC}', '\u{2039}', '\u{203A}', '\u{FB01}', '\u{FB02}',
    '\u{2021}', '\u{00B7}', '\u{201A}', '\u{201E}', '\u{2030}', '\u{00C2}', '\u{00CA}', '\u{00C1}',
    '\u{00CB}', '\u{00C8}', '\u{00CD}', '\u{00CE}', '\u{00CF}', '\u{00CC}', '\u{00D3}', '\u{00D4}',
    '\u{F8FF}', '\u{00D2}', '\u{00DA}', '\u{00DB}', '\u{00D9}', '\u{0131}', '\u{02C6}', '\u{02DC}',
    '\u{00AF}', '\u{02D8}', '\u{02D9}', '\u{02DA}', '\u{00B8}', '\u{02DD}', '\u{02DB}', '\u{02C7}',
];
