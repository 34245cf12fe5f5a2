#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} '{key}'")]
    NotFound { entity: &'static str, key: String },

    #[error("Invalid font format: {0}")]
    InvalidFontFormat(String),

    #[error("Font family already registered: {0}")]
    DuplicateFamily(String),

    #[error("Invalid font size: {0}")]
    InvalidSize(f64),

    #[error("Render failed: {0}")]
    Render(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for an unknown font family.
    pub fn font_not_found(family: impl Into<String>) -> Self {
        CoreError::NotFound {
            entity: "Font",
            key: family.into(),
        }
    }
}
