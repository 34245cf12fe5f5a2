//! Handlers for font upload, listing and SVG generation.
//!
//! Upload stores the file first and validates it afterwards; any failure
//! after the file hits the disk removes it again, so the uploads directory
//! only ever holds registered fonts.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use axum::Json;
use fontsvg_core::error::CoreError;
use fontsvg_core::font::LoadedFont;
use fontsvg_core::render;
use fontsvg_core::size::resolve_font_size;
use fontsvg_core::types::{FontAsset, RenderRequest};
use fontsvg_core::validator;
use fontsvg_db::StoredFont;

use crate::error::{AppError, AppResult};
use crate::response::{FontListResponse, FontResponse};
use crate::state::AppState;

/// Multipart field carrying the font file.
pub const UPLOAD_FIELD: &str = "font";

/// Content type of generated documents.
pub const SVG_CONTENT_TYPE: &str = "image/svg+xml";

/// POST /api/upload-font
pub async fn upload_font(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<FontResponse>> {
    let mut upload: Option<(String, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or("font").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        upload = Some((filename, data));
        break;
    }

    let Some((original_filename, data)) = upload else {
        return Err(AppError::BadRequest("No file uploaded".into()));
    };

    let stored = state.store.save(&original_filename, &data).await?;

    let result = register_stored(&state, &stored, data).await;
    if let Err(err) = &result {
        tracing::info!(
            filename = %stored.filename,
            error = %err,
            "Upload rejected, removing stored file"
        );
        if let Err(cleanup) = state.store.remove(&stored.filename).await {
            tracing::warn!(filename = %stored.filename, error = %cleanup, "Failed to remove rejected upload");
        }
    }
    let font = result?;

    Ok(Json(FontResponse::new(font)))
}

/// Validate a stored upload, register it, and warm the font cache.
async fn register_stored(
    state: &AppState,
    stored: &StoredFont,
    data: Bytes,
) -> AppResult<FontAsset> {
    let original_filename = stored.original_filename.clone();
    let (font, metadata) = tokio::task::spawn_blocking(move || {
        let font = LoadedFont::from_bytes(&data)?;
        let metadata = validator::validate_loaded(&font, &original_filename)?;
        Ok::<_, CoreError>((font, metadata))
    })
    .await
    .map_err(|e| AppError::InternalError(format!("validation task failed: {e}")))??;

    let asset = state.registry.register(&metadata, stored).await?;
    state
        .font_cache
        .insert(&stored.filename, Arc::new(font))
        .await;

    tracing::info!(
        font_family = %asset.font_family,
        filename = %asset.filename,
        format = metadata.format.as_str(),
        size = stored.size,
        from_filename = metadata.used_filename_fallback(),
        "Font uploaded"
    );
    Ok(asset)
}

/// GET /api/fonts
///
/// Always answers 200; an unreadable registry yields `success: false`.
pub async fn list_fonts(State(state): State<AppState>) -> Json<FontListResponse> {
    match state.registry.list().await {
        Ok(fonts) => Json(FontListResponse::ok(fonts)),
        Err(e) => {
            tracing::error!(error = %e, "Failed to read font registry");
            Json(FontListResponse::unavailable())
        }
    }
}

/// POST /api/generate-svg
///
/// The family is resolved before any file is touched, so an unknown family
/// is a 404 regardless of what the uploads directory holds.
pub async fn generate_svg(
    State(state): State<AppState>,
    payload: Result<Json<RenderRequest>, JsonRejection>,
) -> AppResult<Response> {
    let Json(req) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let asset = state.registry.resolve(&req.font_family).await?;
    let font_size = resolve_font_size(&req.font_size);
    let font = state
        .font_cache
        .get_or_load(&state.store, &asset.filename)
        .await?;

    let text = req.text().to_owned();
    let chars = text.chars().count();
    let document = tokio::task::spawn_blocking(move || render::render(&font, &text, font_size))
        .await
        .map_err(|e| AppError::InternalError(format!("render task failed: {e}")))??;

    tracing::debug!(
        font_family = %asset.font_family,
        font_size,
        chars,
        width = document.width,
        height = document.height,
        "SVG generated"
    );

    Ok(([(CONTENT_TYPE, SVG_CONTENT_TYPE)], document.markup).into_response())
}
