use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the font registry can be read.
    pub registry_healthy: bool,
}

/// GET /health -- returns service and registry health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let registry_healthy = match state.registry.health_check().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Registry health check failed");
            false
        }
    };

    let status = if registry_healthy { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        registry_healthy,
    })
}

/// Mount health check routes (root level, not under `/api`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
