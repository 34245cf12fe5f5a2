//! Integration tests for the health check endpoint and general HTTP behaviour.

mod common;

use axum::http::StatusCode;
use common::{body_json, body_text, get};

// ---------------------------------------------------------------------------
// Test: GET /health returns 200 with expected JSON fields
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_check_returns_ok_with_json() {
    let app = common::build_test_app().await;
    let response = get(app.router.clone(), "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["registry_healthy"], true);
}

// ---------------------------------------------------------------------------
// Test: A corrupt registry reports degraded health
// ---------------------------------------------------------------------------

#[tokio::test]
async fn corrupt_registry_reports_degraded() {
    let app = common::build_test_app().await;
    std::fs::write(&app.state.config.registry_path, "{ not json").unwrap();

    let json = body_json(get(app.router.clone(), "/health").await).await;

    assert_eq!(json["status"], "degraded");
    assert_eq!(json["registry_healthy"], false);
}

// ---------------------------------------------------------------------------
// Test: Unknown route returns 404
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = common::build_test_app().await;
    let response = get(app.router.clone(), "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: Files in the public directory are served at the root
// ---------------------------------------------------------------------------

#[tokio::test]
async fn public_assets_are_served() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("public")).unwrap();
    std::fs::write(
        dir.path().join("public/index.html"),
        "<!doctype html><title>Font to SVG</title>",
    )
    .unwrap();
    let app = common::build_test_app_in(dir).await;

    let response = get(app.router.clone(), "/index.html").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Font to SVG"));
}

// ---------------------------------------------------------------------------
// Test: x-request-id header is present in response
// ---------------------------------------------------------------------------

#[tokio::test]
async fn response_contains_x_request_id_header() {
    let app = common::build_test_app().await;
    let response = get(app.router.clone(), "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let request_id = response.headers().get("x-request-id");
    assert!(
        request_id.is_some(),
        "Response must contain an x-request-id header"
    );

    // The value should be a valid UUID (36 chars with hyphens).
    let id_str = request_id.unwrap().to_str().unwrap();
    assert_eq!(id_str.len(), 36);
}
