//! File naming rules for stored fonts and downloaded SVGs.

/// Public path prefix stored fonts are served under.
pub const UPLOADS_URL_PREFIX: &str = "/uploads/";

/// Base name used when an upload arrives without a usable name.
const FALLBACK_UPLOAD_NAME: &str = "font";

/// Reduce an uploaded file name to a safe base name.
///
/// Directory components (either separator style) and control characters
/// are dropped, so the result can never escape the uploads directory.
///
/// # Examples
///
/// ```
/// use fontsvg_core::naming::sanitize_upload_name;
///
/// assert_eq!(sanitize_upload_name("Roboto-Regular.ttf"), "Roboto-Regular.ttf");
/// assert_eq!(sanitize_upload_name("../../etc/passwd"), "passwd");
/// assert_eq!(sanitize_upload_name("C:\\fonts\\Inter.woff2"), "Inter.woff2");
/// assert_eq!(sanitize_upload_name(".."), "font");
/// assert_eq!(sanitize_upload_name(""), "font");
/// ```
pub fn sanitize_upload_name(original: &str) -> String {
    let base = original.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base.chars().filter(|c| !c.is_control()).collect();
    let cleaned = cleaned.trim();

    if cleaned.is_empty() || cleaned == "." || cleaned == ".." {
        FALLBACK_UPLOAD_NAME.to_string()
    } else {
        cleaned.to_string()
    }
}

/// Stored file name: creation time in milliseconds, a dash, and the
/// sanitized original name.
///
/// ```
/// use fontsvg_core::naming::stored_filename;
///
/// assert_eq!(stored_filename("Roboto.ttf", 1700000000123), "1700000000123-Roboto.ttf");
/// ```
pub fn stored_filename(original: &str, created_at_millis: i64) -> String {
    format!("{created_at_millis}-{}", sanitize_upload_name(original))
}

/// Public URL for a stored file name.
pub fn public_url(stored: &str) -> String {
    format!("{UPLOADS_URL_PREFIX}{stored}")
}

/// The file name without its last extension, as used for family-name
/// fallback. Empty when nothing usable remains.
///
/// ```
/// use fontsvg_core::naming::file_stem;
///
/// assert_eq!(file_stem("My Font.otf"), "My Font");
/// assert_eq!(file_stem("dir/Family.Name.woff2"), "Family.Name");
/// assert_eq!(file_stem(".ttf"), ".ttf");
/// assert_eq!(file_stem(""), "");
/// ```
pub fn file_stem(original: &str) -> String {
    let base = original.rsplit(['/', '\\']).next().unwrap_or_default();
    std::path::Path::new(base)
        .file_stem()
        .and_then(|s| s.to_str())
        .map(str::trim)
        .unwrap_or_default()
        .to_string()
}

/// Name offered when saving a rendered SVG.
///
/// Convention: `{family}_{text}.svg`, where whitespace is removed from
/// both parts, the text part keeps at most six characters, empty text
/// becomes `Sample`, and text that is only whitespace becomes `Text`.
///
/// ```
/// use fontsvg_core::naming::download_filename;
///
/// assert_eq!(download_filename("Open Sans", "Hello world"), "OpenSans_Hellow.svg");
/// assert_eq!(download_filename("Roboto", ""), "Roboto_Sample.svg");
/// assert_eq!(download_filename("Roboto", "   "), "Roboto_Text.svg");
/// ```
pub fn download_filename(font_family: &str, text: &str) -> String {
    let safe_font = strip_whitespace(font_family);
    let source = if text.is_empty() { "Sample" } else { text };
    let mut safe_text: String = strip_whitespace(source).chars().take(6).collect();
    if safe_text.is_empty() {
        safe_text.push_str("Text");
    }
    format!("{safe_font}_{safe_text}.svg")
}

fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}
