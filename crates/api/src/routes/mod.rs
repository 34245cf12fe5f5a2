pub mod health;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::fonts;
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// POST /upload-font     multipart upload, field "font"
/// GET  /fonts           registered fonts in upload order
/// POST /generate-svg    render text as outline SVG
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/upload-font", post(fonts::upload_font))
        .route("/fonts", get(fonts::list_fonts))
        .route("/generate-svg", post(fonts::generate_svg))
}
