//! Shared domain types: registry records, validator output, render requests.

use serde::{Deserialize, Serialize};

/// One registered, renderable font.
///
/// Serialized in the registry file and over HTTP as
/// `{ "fontFamily", "filename", "url" }`. The original upload name is kept
/// for diagnostics only and omitted from the JSON when absent, so registry
/// files written by older deployments still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontAsset {
    /// Canonical, unique family name.
    pub font_family: String,
    /// Stored file name inside the uploads directory (the storage locator).
    pub filename: String,
    /// Public URL the binary is served from.
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_filename: Option<String>,
}

/// Where the family name of a validated font came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FamilySource {
    /// Read from the font's `name` table.
    Embedded,
    /// The font carried no usable family name; derived from the file name.
    FileName,
}

/// Container format detected from the leading magic bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFormat {
    TrueType,
    OpenType,
    Collection,
    Woff,
    Woff2,
}

impl FontFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            FontFormat::TrueType => "truetype",
            FontFormat::OpenType => "opentype",
            FontFormat::Collection => "collection",
            FontFormat::Woff => "woff",
            FontFormat::Woff2 => "woff2",
        }
    }
}

/// Result of a successful validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontMetadata {
    pub family_name: String,
    pub family_source: FamilySource,
    pub format: FontFormat,
}

impl FontMetadata {
    /// True when the family name had to be derived from the file name.
    pub fn used_filename_fallback(&self) -> bool {
        self.family_source == FamilySource::FileName
    }
}

/// CSS-style weight hint. Only the fallback renderer looks at it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

impl FontWeight {
    /// Lenient parse: accepts `normal`, `bold` and the numeric weights.
    /// Anything at or above 600 counts as bold.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        match value.to_ascii_lowercase().as_str() {
            "normal" | "regular" => Some(FontWeight::Normal),
            "bold" | "bolder" => Some(FontWeight::Bold),
            other => other.parse::<u16>().ok().map(|n| {
                if n >= 600 {
                    FontWeight::Bold
                } else {
                    FontWeight::Normal
                }
            }),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FontWeight::Normal => "normal",
            FontWeight::Bold => "bold",
        }
    }
}

/// CSS-style style hint. Only the fallback renderer looks at it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

impl FontStyle {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "normal" => Some(FontStyle::Normal),
            "italic" | "oblique" => Some(FontStyle::Italic),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FontStyle::Normal => "normal",
            FontStyle::Italic => "italic",
        }
    }
}

/// The four variants a user can pick in the client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontVariant {
    #[default]
    Regular,
    Bold,
    Italic,
    BoldItalic,
}

impl FontVariant {
    pub const ALL: [FontVariant; 4] = [
        FontVariant::Regular,
        FontVariant::Bold,
        FontVariant::Italic,
        FontVariant::BoldItalic,
    ];

    pub fn weight(self) -> FontWeight {
        match self {
            FontVariant::Bold | FontVariant::BoldItalic => FontWeight::Bold,
            FontVariant::Regular | FontVariant::Italic => FontWeight::Normal,
        }
    }

    pub fn style(self) -> FontStyle {
        match self {
            FontVariant::Italic | FontVariant::BoldItalic => FontStyle::Italic,
            FontVariant::Regular | FontVariant::Bold => FontStyle::Normal,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FontVariant::Regular => "regular",
            FontVariant::Bold => "bold",
            FontVariant::Italic => "italic",
            FontVariant::BoldItalic => "bold-italic",
        }
    }
}

impl std::str::FromStr for FontVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FontVariant::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown variant '{s}' (expected regular, bold, italic or bold-italic)"))
    }
}

/// Body of `POST /api/generate-svg`.
///
/// `fontSize` is kept as a raw JSON value because clients send numbers,
/// numeric strings, or nothing at all; see [`crate::size::resolve_font_size`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "lenient_family")]
    pub font_family: String,
    #[serde(default)]
    pub font_size: serde_json::Value,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_weight"
    )]
    pub font_weight: Option<FontWeight>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_style"
    )]
    pub font_style: Option<FontStyle>,
}

/// A family that is not a string names no registered font.
fn lenient_family<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(match raw {
        serde_json::Value::String(s) => s,
        _ => String::new(),
    })
}

/// Unrecognised hints are dropped instead of rejecting the request.
fn lenient_weight<'de, D>(deserializer: D) -> Result<Option<FontWeight>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(match raw {
        serde_json::Value::String(s) => FontWeight::parse(&s),
        serde_json::Value::Number(n) => FontWeight::parse(&n.to_string()),
        _ => None,
    })
}

fn lenient_style<'de, D>(deserializer: D) -> Result<Option<FontStyle>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(match raw {
        serde_json::Value::String(s) => FontStyle::parse(&s),
        _ => None,
    })
}

impl RenderRequest {
    /// Text to render; missing text renders as the empty string.
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }
}
