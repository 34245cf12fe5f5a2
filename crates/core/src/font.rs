//! Loaded font data wrapper around `ttf-parser`.

use std::sync::Arc;

use ttf_parser::gpos::{PairAdjustment, PositioningSubtable};
use ttf_parser::{Face, GlyphId, Tag};

use crate::error::CoreError;
use crate::format;
use crate::types::FontFormat;
use crate::{woff, woff2};

/// A font decoded to plain sfnt bytes, ready for outline queries.
///
/// Holds owned bytes plus the global metrics; a `ttf_parser::Face` is
/// re-created on demand, which costs no allocation. WOFF and WOFF2 inputs
/// are decoded once, at construction.
#[derive(Clone)]
pub struct LoadedFont {
    sfnt: Arc<[u8]>,
    format: FontFormat,
    units_per_em: u16,
    ascender: i16,
    descender: i16,
}

impl LoadedFont {
    /// Detect the container, decode it if needed, and parse the first face.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidFontFormat`] when the bytes are not a
    /// supported font or the decoded font lacks its required tables.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CoreError> {
        let format = format::detect(bytes)?;
        let sfnt: Arc<[u8]> = match format {
            FontFormat::TrueType | FontFormat::OpenType | FontFormat::Collection => {
                Arc::from(bytes)
            }
            FontFormat::Woff => Arc::from(woff::decode(bytes)?),
            FontFormat::Woff2 => Arc::from(woff2::decode(bytes)?),
        };

        let face = Face::parse(&sfnt, 0)
            .map_err(|e| CoreError::InvalidFontFormat(format!("{} font: {e}", format.as_str())))?;
        if face.units_per_em() == 0 {
            return Err(CoreError::InvalidFontFormat("units per em is zero".into()));
        }

        // hhea metrics even when OS/2 asks for typo metrics.
        let hhea = face.tables().hhea;
        Ok(Self {
            format,
            units_per_em: face.units_per_em(),
            ascender: hhea.ascender,
            descender: hhea.descender,
            sfnt,
        })
    }

    /// Parse a face over the owned bytes.
    ///
    /// Cannot fail for a value built by [`LoadedFont::from_bytes`]; the
    /// error is surfaced as [`CoreError::Render`] rather than a panic.
    pub fn face(&self) -> Result<Face<'_>, CoreError> {
        Face::parse(&self.sfnt, 0).map_err(|e| CoreError::Render(e.to_string()))
    }

    pub fn format(&self) -> FontFormat {
        self.format
    }

    pub fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    pub fn ascender(&self) -> i16 {
        self.ascender
    }

    pub fn descender(&self) -> i16 {
        self.descender
    }

    /// Scale factor from design units to pixels at `font_size`.
    pub fn scale(&self, font_size: f64) -> f64 {
        font_size / f64::from(self.units_per_em)
    }
}

/// Glyph for `ch`, falling back to `.notdef` (glyph 0).
pub fn glyph_or_notdef(face: &Face<'_>, ch: char) -> GlyphId {
    face.glyph_index(ch).unwrap_or(GlyphId(0))
}

/// Pairwise kerning in design units.
///
/// A font with a GPOS `kern` feature is kerned from its pair adjustments
/// alone. Otherwise the legacy `kern` table is read, limited to horizontal
/// subtables without a state machine.
pub fn kerning(face: &Face<'_>, left: GlyphId, right: GlyphId) -> i16 {
    gpos_kerning(face, left, right).unwrap_or_else(|| {
        face.tables()
            .kern
            .and_then(|kern| {
                kern.subtables
                    .into_iter()
                    .filter(|st| st.horizontal && !st.has_state_machine && !st.has_cross_stream)
                    .find_map(|st| st.glyphs_kerning(left, right))
            })
            .unwrap_or(0)
    })
}

/// `None` when the font has no GPOS `kern` feature.
fn gpos_kerning(face: &Face<'_>, left: GlyphId, right: GlyphId) -> Option<i16> {
    let gpos = face.tables().gpos?;
    let kern = Tag::from_bytes(b"kern");
    let mut lookup_indices = gpos
        .features
        .into_iter()
        .filter(|feature| feature.tag == kern)
        .flat_map(|feature| feature.lookup_indices)
        .peekable();
    lookup_indices.peek()?;

    let adjustment = lookup_indices
        .filter_map(|index| gpos.lookups.get(index))
        .flat_map(|lookup| lookup.subtables.into_iter::<PositioningSubtable<'_>>())
        .find_map(|subtable| match subtable {
            PositioningSubtable::Pair(pair) => pair_x_advance(&pair, left, right),
            _ => None,
        });
    Some(adjustment.unwrap_or(0))
}

fn pair_x_advance(pair: &PairAdjustment<'_>, left: GlyphId, right: GlyphId) -> Option<i16> {
    let index = pair.coverage().get(left)?;
    let (first, _) = match pair {
        PairAdjustment::Format1 { sets, .. } => sets.get(index)?.get(right)?,
        PairAdjustment::Format2 {
            classes, matrix, ..
        } => matrix.get((classes.0.get(left), classes.1.get(right)))?,
    };
    Some(first.x_advance)
}

impl std::fmt::Debug for LoadedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedFont")
            .field("format", &self.format)
            .field("units_per_em", &self.units_per_em)
            .field("ascender", &self.ascender)
            .field("descender", &self.descender)
            .field("sfnt_len", &self.sfnt.len())
            .finish()
    }
}
