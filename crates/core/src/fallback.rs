//! Degraded `<text>`-based SVG output for when outline rendering is
//! unavailable.
//!
//! The document references the font by family name and relies on the
//! viewer to have it; only the box size is computed here, from whatever
//! [`TextMeasure`] the caller can offer.

use crate::font::LoadedFont;
use crate::render::{self, SvgDocument};
use crate::types::{FontStyle, FontWeight};

/// Padding added around the measured text, split evenly on both sides.
pub const FALLBACK_PADDING: f64 = 40.0;
/// Horizontal origin of the text element.
pub const FALLBACK_TEXT_X: f64 = 20.0;
/// Distance from the font size to the baseline.
pub const FALLBACK_BASELINE_OFFSET: f64 = 10.0;

/// Width measurement for the fallback renderer.
pub trait TextMeasure {
    fn measure_width(
        &self,
        text: &str,
        font_size: f64,
        weight: FontWeight,
        style: FontStyle,
    ) -> f64;
}

/// Character-class estimate used when no font data is available locally.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateMeasure;

impl ApproximateMeasure {
    fn em_width(ch: char) -> f64 {
        match ch {
            ' ' => 0.28,
            'i' | 'j' | 'l' | 'I' | '.' | ',' | ':' | ';' | '\'' | '!' | '|' => 0.28,
            'f' | 't' | 'r' | '(' | ')' | '[' | ']' | '-' => 0.36,
            'm' | 'w' | 'M' | 'W' | '@' => 0.85,
            'A'..='Z' => 0.68,
            '0'..='9' => 0.56,
            c if is_wide(c) => 1.0,
            _ => 0.52,
        }
    }
}

/// East Asian wide ranges that occupy a full em.
fn is_wide(c: char) -> bool {
    matches!(c as u32,
        0x1100..=0x115F
        | 0x2E80..=0xA4CF
        | 0xAC00..=0xD7A3
        | 0xF900..=0xFAFF
        | 0xFE30..=0xFE4F
        | 0xFF00..=0xFF60
        | 0xFFE0..=0xFFE6
        | 0x1F300..=0x1FAFF
        | 0x20000..=0x3FFFD)
}

impl TextMeasure for ApproximateMeasure {
    fn measure_width(
        &self,
        text: &str,
        font_size: f64,
        weight: FontWeight,
        _style: FontStyle,
    ) -> f64 {
        let ems: f64 = text.chars().map(Self::em_width).sum();
        let weight_factor = match weight {
            FontWeight::Bold => 1.08,
            FontWeight::Normal => 1.0,
        };
        ems * font_size * weight_factor
    }
}

/// Measurement from a locally loaded font's advance widths.
///
/// Weight and style are ignored since the font file fixes both. Falls back
/// to [`ApproximateMeasure`] if the font cannot be read.
#[derive(Debug, Clone)]
pub struct OutlineMeasure<'a> {
    font: &'a LoadedFont,
}

impl<'a> OutlineMeasure<'a> {
    pub fn new(font: &'a LoadedFont) -> Self {
        Self { font }
    }
}

impl TextMeasure for OutlineMeasure<'_> {
    fn measure_width(
        &self,
        text: &str,
        font_size: f64,
        weight: FontWeight,
        style: FontStyle,
    ) -> f64 {
        match render::measure(self.font, text, font_size) {
            Ok(metrics) => metrics.width,
            Err(err) => {
                tracing::debug!(error = %err, "Outline measurement failed, estimating");
                ApproximateMeasure.measure_width(text, font_size, weight, style)
            }
        }
    }
}

/// Everything the fallback document needs.
#[derive(Debug, Clone)]
pub struct FallbackRequest<'a> {
    pub text: &'a str,
    pub font_family: &'a str,
    pub font_size: f64,
    pub weight: FontWeight,
    pub style: FontStyle,
}

/// Build the fallback document. Never fails.
///
/// Layout: `width = ceil(measured) + 40`, `height = size + 40`, the text
/// starts at `x = 20` with its baseline at `y = size + 10`.
pub fn render_fallback(measure: &dyn TextMeasure, req: &FallbackRequest<'_>) -> SvgDocument {
    let measured = measure.measure_width(req.text, req.font_size, req.weight, req.style);
    let measured = if measured.is_finite() && measured > 0.0 {
        measured
    } else {
        0.0
    };

    let width = measured.ceil() + FALLBACK_PADDING;
    let height = req.font_size + FALLBACK_PADDING;
    let w = render::fmt_scalar(width);
    let h = render::fmt_scalar(height);

    let markup = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">
    <text x="{x}" y="{y}" font-family="{family}" font-size="{size}" font-weight="{weight}" font-style="{style}" fill="{fill}">{text}</text>
</svg>"#,
        x = render::fmt_scalar(FALLBACK_TEXT_X),
        y = render::fmt_scalar(req.font_size + FALLBACK_BASELINE_OFFSET),
        family = escape_xml(req.font_family),
        size = render::fmt_scalar(req.font_size),
        weight = req.weight.as_str(),
        style = req.style.as_str(),
        fill = render::DEFAULT_FILL,
        text = escape_xml(req.text),
    );

    SvgDocument {
        width,
        height,
        markup,
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}
