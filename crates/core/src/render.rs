//! Glyph-outline text renderer.
//!
//! Lays a single line of text out with advance widths and `kern` pairs,
//! traces every glyph outline into one SVG path, and wraps it in a
//! document sized to the line box. The line is anchored at its top: the
//! font ascender sits at `y = 0` and the baseline at `ascender * scale`.

use std::fmt::Write as _;

use svg::node::element::Path;
use svg::Document;
use ttf_parser::{GlyphId, OutlineBuilder};

use crate::error::CoreError;
use crate::font::{glyph_or_notdef, kerning, LoadedFont};
use crate::size::validate_font_size;

/// Decimal places kept in path coordinates and document dimensions.
pub const PATH_PRECISION: usize = 2;

/// Paint applied to rendered glyphs; inherits the surrounding text color.
pub const DEFAULT_FILL: &str = "currentColor";

/// Horizontal and vertical extents of a laid-out line, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    /// Advance width including kerning.
    pub width: f64,
    /// Distance from the top of the line box to the baseline.
    pub ascent: f64,
    /// Distance from the baseline to the bottom of the line box (positive).
    pub descent: f64,
}

impl TextMetrics {
    pub fn height(&self) -> f64 {
        self.ascent + self.descent
    }
}

/// A rendered, self-contained SVG document.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgDocument {
    pub width: f64,
    pub height: f64,
    pub markup: String,
}

impl std::fmt::Display for SvgDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.markup)
    }
}

/// Measure one line of `text` at `font_size`.
pub fn measure(font: &LoadedFont, text: &str, font_size: f64) -> Result<TextMetrics, CoreError> {
    let font_size = validate_font_size(font_size)?;
    let face = font.face()?;
    let scale = font.scale(font_size);

    let mut width = 0.0;
    let mut prev: Option<GlyphId> = None;
    for ch in text.chars() {
        let gid = glyph_or_notdef(&face, ch);
        if let Some(prev) = prev {
            width += f64::from(kerning(&face, prev, gid)) * scale;
        }
        width += f64::from(face.glyph_hor_advance(gid).unwrap_or(0)) * scale;
        prev = Some(gid);
    }

    Ok(TextMetrics {
        width,
        ascent: f64::from(font.ascender()) * scale,
        descent: -f64::from(font.descender()) * scale,
    })
}

/// Render `text` as glyph outlines at `font_size` pixels.
///
/// Characters the font does not map are drawn with glyph 0 (`.notdef`)
/// and never abort rendering. Empty text yields an empty path inside a
/// zero-width document of full line height.
///
/// # Errors
///
/// - [`CoreError::InvalidSize`] when `font_size` is not a positive number.
/// - [`CoreError::Render`] when the font's tables cannot be read.
pub fn render(font: &LoadedFont, text: &str, font_size: f64) -> Result<SvgDocument, CoreError> {
    let font_size = validate_font_size(font_size)?;
    let face = font.face()?;
    let scale = font.scale(font_size);
    let baseline = f64::from(font.ascender()) * scale;

    let mut path = PathBuilder::new(scale, baseline);
    let mut prev: Option<GlyphId> = None;
    for ch in text.chars() {
        let gid = glyph_or_notdef(&face, ch);
        if let Some(prev) = prev {
            path.origin_x += f64::from(kerning(&face, prev, gid)) * scale;
        }
        face.outline_glyph(gid, &mut path);
        path.origin_x += f64::from(face.glyph_hor_advance(gid).unwrap_or(0)) * scale;
        prev = Some(gid);
    }

    let width = path.origin_x;
    let height = (f64::from(font.ascender()) - f64::from(font.descender())) * scale;
    let width_attr = fmt_scalar(width);
    let height_attr = fmt_scalar(height);

    let document = Document::new()
        .set("width", width_attr.as_str())
        .set("height", height_attr.as_str())
        .set("viewBox", format!("0 0 {width_attr} {height_attr}"))
        .add(
            Path::new()
                .set("fill", DEFAULT_FILL)
                .set("d", path.finish()),
        );

    Ok(SvgDocument {
        width,
        height,
        markup: document.to_string(),
    })
}

/// Collects outline segments as absolute SVG path commands, flipping the
/// font's y-up space into SVG's y-down space around the baseline.
struct PathBuilder {
    data: String,
    scale: f64,
    baseline: f64,
    origin_x: f64,
}

impl PathBuilder {
    fn new(scale: f64, baseline: f64) -> Self {
        Self {
            data: String::new(),
            scale,
            baseline,
            origin_x: 0.0,
        }
    }

    fn point(&mut self, x: f32, y: f32) {
        let px = self.origin_x + f64::from(x) * self.scale;
        let py = self.baseline - f64::from(y) * self.scale;
        let _ = write!(self.data, "{} {}", fmt_scalar(px), fmt_scalar(py));
    }

    fn command(&mut self, cmd: char, points: &[(f32, f32)]) {
        self.data.push(cmd);
        for (i, &(x, y)) in points.iter().enumerate() {
            if i > 0 {
                self.data.push(' ');
            }
            self.point(x, y);
        }
    }

    fn finish(self) -> String {
        self.data
    }
}

impl OutlineBuilder for PathBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        self.command('M', &[(x, y)]);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.command('L', &[(x, y)]);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.command('Q', &[(x1, y1), (x, y)]);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.command('C', &[(x1, y1), (x2, y2), (x, y)]);
    }

    fn close(&mut self) {
        self.data.push('Z');
    }
}

/// Format a coordinate with at most [`PATH_PRECISION`] decimals,
/// trailing zeros stripped.
///
/// ```
/// use fontsvg_core::render::fmt_scalar;
///
/// assert_eq!(fmt_scalar(12.0), "12");
/// assert_eq!(fmt_scalar(12.5), "12.5");
/// assert_eq!(fmt_scalar(55.199999), "55.2");
/// assert_eq!(fmt_scalar(-0.001), "0");
/// ```
pub fn fmt_scalar(v: f64) -> String {
    let precision = PATH_PRECISION;
    let s = format!("{v:.precision$}");
    let s = if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_owned()
    } else {
        s
    };
    if s == "-0" {
        "0".to_owned()
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{
        gpos_kern_pair, os2_table, with_tables, SANS_TTF, SANS_WOFF, SANS_WOFF2,
        SOURCE_CODE_PRO_WOFF2,
    };
    use assert_matches::assert_matches;

    fn sans() -> LoadedFont {
        LoadedFont::from_bytes(SANS_TTF).unwrap()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn single_glyph_path_is_top_anchored() {
        let doc = render(&sans(), "H", 100.0).unwrap();

        // ascender 900, descender -250 at 1000 upem
        assert!(approx(doc.width, 70.0));
        assert!(approx(doc.height, 115.0));
        assert!(doc.markup.contains(r#"width="70""#));
        assert!(doc.markup.contains(r#"height="115""#));
        assert!(doc.markup.contains(r#"viewBox="0 0 70 115""#));
        assert!(doc.markup.contains(r#"fill="currentColor""#));
        // First point (80, 0) sits on the baseline at y = 90.
        assert!(doc.markup.contains("M8 90L8 20L18 20"), "{}", doc.markup);
    }

    #[test]
    fn baseline_follows_hhea_ascender_despite_typo_metrics_flag() {
        let bytes = with_tables(
            SANS_TTF,
            vec![(*b"OS/2", os2_table(1 << 7, 1100, -400))],
        );
        let doc = render(&LoadedFont::from_bytes(&bytes).unwrap(), "H", 100.0).unwrap();

        assert!(approx(doc.height, 115.0));
        assert!(doc.markup.contains("M8 90L8 20L18 20"), "{}", doc.markup);
    }

    #[test]
    fn gpos_kerning_applies_to_measured_width() {
        let bytes = with_tables(SANS_TTF, vec![(*b"GPOS", gpos_kern_pair(5, 4, -50))]);
        let font = LoadedFont::from_bytes(&bytes).unwrap();
        assert_eq!(measure(&font, "VA", 1000.0).unwrap().width, 1350.0);
        assert_eq!(measure(&font, "AV", 1000.0).unwrap().width, 1400.0);
    }

    #[test]
    fn advances_accumulate_and_kerning_applies() {
        let font = sans();
        assert!(approx(measure(&font, "Hi", 100.0).unwrap().width, 100.0));
        // A (700) + V (700) - 80
        assert_eq!(measure(&font, "AV", 1000.0).unwrap().width, 1320.0);
        assert_eq!(measure(&font, "VA", 1000.0).unwrap().width, 1400.0);
    }

    #[test]
    fn quadratic_outlines_emit_q_commands() {
        let doc = render(&sans(), "o", 10.0).unwrap();
        assert!(doc.markup.contains('Q'));
        assert!(doc.markup.contains('Z'));
    }

    #[test]
    fn missing_glyphs_render_as_notdef() {
        let font = sans();
        let doc = render(&font, "Z", 100.0).unwrap();
        assert!(approx(doc.width, 50.0));
        assert!(doc.markup.contains("M5 90"), "{}", doc.markup);
    }

    #[test]
    fn empty_text_is_a_valid_degenerate_document() {
        let doc = render(&sans(), "", 48.0).unwrap();
        assert_eq!(doc.width, 0.0);
        assert!(doc.height >= 48.0);
        assert!(doc.markup.starts_with("<svg"));
        assert!(doc.markup.contains("<path"));
    }

    #[test]
    fn doubling_size_doubles_extents() {
        let font = sans();
        let small = render(&font, "HiAVo", 40.0).unwrap();
        let large = render(&font, "HiAVo", 80.0).unwrap();
        assert!(approx(large.width, 2.0 * small.width));
        assert!(approx(large.height, 2.0 * small.height));
    }

    #[test]
    fn all_containers_render_identically() {
        let ttf = render(&sans(), "HiAVo i", 64.0).unwrap();
        for bytes in [SANS_WOFF, SANS_WOFF2] {
            let font = LoadedFont::from_bytes(bytes).unwrap();
            assert_eq!(render(&font, "HiAVo i", 64.0).unwrap(), ttf);
        }
    }

    #[test]
    fn real_world_font_renders_a_path() {
        let font = LoadedFont::from_bytes(SOURCE_CODE_PRO_WOFF2).unwrap();
        let doc = render(&font, "fn main()", 48.0).unwrap();
        assert!(doc.width > 0.0);
        assert!(doc.height >= 48.0);
        assert!(doc.markup.contains(" d=\"M"));
    }

    #[test]
    fn non_positive_size_is_rejected() {
        assert_matches!(render(&sans(), "H", 0.0), Err(CoreError::InvalidSize(_)));
        assert_matches!(render(&sans(), "H", -10.0), Err(CoreError::InvalidSize(_)));
    }

    #[test]
    fn scalar_formatting() {
        assert_eq!(fmt_scalar(1.005), "1");
        assert_eq!(fmt_scalar(-3.456), "-3.46");
        assert_eq!(fmt_scalar(100.0), "100");
    }
}
