//! Font-size coercion for render requests.
//!
//! Clients send the size as a JSON number, a numeric string (`"48"`,
//! `"48px"`), or not at all. The accepted value is the leading integer of
//! that input; anything that does not yield a positive integer falls back
//! to [`DEFAULT_FONT_SIZE`].

use serde_json::Value;

use crate::error::CoreError;

/// Size used when the request carries no usable size.
pub const DEFAULT_FONT_SIZE: f64 = 100.0;

/// Resolve the requested size to a positive pixel size.
///
/// # Examples
///
/// ```
/// use fontsvg_core::size::resolve_font_size;
/// use serde_json::json;
///
/// assert_eq!(resolve_font_size(&json!(48)), 48.0);
/// assert_eq!(resolve_font_size(&json!(48.9)), 48.0);
/// assert_eq!(resolve_font_size(&json!("72px")), 72.0);
/// assert_eq!(resolve_font_size(&json!(0)), 100.0);
/// assert_eq!(resolve_font_size(&json!(-12)), 100.0);
/// assert_eq!(resolve_font_size(&json!("large")), 100.0);
/// assert_eq!(resolve_font_size(&json!(null)), 100.0);
/// ```
pub fn resolve_font_size(raw: &Value) -> f64 {
    let parsed = match raw {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()).map(f64::trunc),
        Value::String(s) => leading_integer(s),
        _ => None,
    };

    match parsed {
        Some(size) if size > 0.0 => size,
        _ => DEFAULT_FONT_SIZE,
    }
}

/// Reject sizes the renderer cannot lay out.
pub fn validate_font_size(size: f64) -> Result<f64, CoreError> {
    if size.is_finite() && size > 0.0 {
        Ok(size)
    } else {
        Err(CoreError::InvalidSize(size))
    }
}

/// Parse an optional sign and the run of ASCII digits at the start of `s`,
/// after leading whitespace. Trailing garbage is ignored.
fn leading_integer(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let value: f64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}
