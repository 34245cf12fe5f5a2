use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use fontsvg_core::error::CoreError;
use fontsvg_db::DbError;
use serde_json::json;

/// Message returned for every sanitized server-side failure.
pub const SERVER_ERROR_MESSAGE: &str = "Server error";

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`DbError`] for storage
/// errors, and adds HTTP-specific variants. Implements [`IntoResponse`] to
/// produce `{ "success": false, "error": ..., "code": ... }` bodies.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `fontsvg_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A registry or file-store error from `fontsvg_db`.
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => classify_core_error(core),
            AppError::Database(db) => classify_db_error(db),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let body = json!({
            "success": false,
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn classify_core_error(err: &CoreError) -> (StatusCode, &'static str, String) {
    match err {
        CoreError::NotFound { entity, .. } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} not found"),
        ),
        CoreError::InvalidFontFormat(detail) => {
            tracing::debug!(%detail, "Rejected invalid font");
            (
                StatusCode::BAD_REQUEST,
                "INVALID_FONT",
                "Invalid font file".to_string(),
            )
        }
        CoreError::DuplicateFamily(_) => (
            StatusCode::BAD_REQUEST,
            "DUPLICATE_FAMILY",
            "Font already uploaded".to_string(),
        ),
        CoreError::InvalidSize(size) => (
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            format!("Invalid font size: {size}"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Render(detail) => {
            tracing::error!(error = %detail, "SVG generation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "RENDER_FAILED",
                "SVG generation failed".to_string(),
            )
        }
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            internal()
        }
    }
}

/// Storage errors: domain errors pass through, I/O and JSON are sanitized.
fn classify_db_error(err: &DbError) -> (StatusCode, &'static str, String) {
    match err {
        DbError::Core(core) => classify_core_error(core),
        other => {
            tracing::error!(error = %other, "Storage error");
            internal()
        }
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        SERVER_ERROR_MESSAGE.to_string(),
    )
}
