//! Integration tests for `POST /api/generate-svg`.

mod common;

use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use common::{body_json, body_text, post_json, svg_attr, upload, SANS_TTF, SANS_WOFF2};
use serde_json::json;

async fn app_with_sans() -> common::TestApp {
    let app = common::build_test_app().await;
    let response = upload(app.router.clone(), "font", "sans.ttf", SANS_TTF).await;
    assert_eq!(response.status(), StatusCode::OK);
    app
}

// ---------------------------------------------------------------------------
// Test: A registered family renders to outline paths
// ---------------------------------------------------------------------------

#[tokio::test]
async fn renders_registered_family_as_paths() {
    let app = app_with_sans().await;

    let response = post_json(
        app.router.clone(),
        "/api/generate-svg",
        json!({ "text": "Hi", "fontFamily": "Fixture Sans", "fontSize": 48 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_TYPE], "image/svg+xml");

    let svg = body_text(response).await;
    assert!(svg.contains("<svg"));
    assert!(svg.contains("<path"));
    assert!(!svg.contains("<text"));
    assert!(svg_attr(&svg, "height") >= 48.0);
    assert!(svg_attr(&svg, "width") > 0.0);
}

// ---------------------------------------------------------------------------
// Test: Unknown families are a 404 JSON error
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_family_returns_404() {
    let app = app_with_sans().await;

    let response = post_json(
        app.router.clone(),
        "/api/generate-svg",
        json!({ "text": "Hi", "fontFamily": "Nonexistent", "fontSize": 48 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Font not found");
    assert_eq!(json["code"], "NOT_FOUND");
}

// ---------------------------------------------------------------------------
// Test: A missing or non-string family is a 404, not a bad request
// ---------------------------------------------------------------------------

#[tokio::test]
async fn non_string_family_returns_404() {
    let app = app_with_sans().await;

    for family in [json!(null), json!(7), json!({ "name": "Fixture Sans" })] {
        let response = post_json(
            app.router.clone(),
            "/api/generate-svg",
            json!({ "text": "Hi", "fontFamily": family, "fontSize": 48 }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{family}");

        let json = body_json(response).await;
        assert_eq!(json["code"], "NOT_FOUND");
    }
}

// ---------------------------------------------------------------------------
// Test: Family matching is case-sensitive
// ---------------------------------------------------------------------------

#[tokio::test]
async fn family_lookup_is_case_sensitive() {
    let app = app_with_sans().await;

    let response = post_json(
        app.router.clone(),
        "/api/generate-svg",
        json!({ "text": "Hi", "fontFamily": "fixture sans" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: Unusable sizes fall back to 100
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unusable_sizes_render_at_default_size() {
    let app = app_with_sans().await;

    for size in [json!(0), json!("abc"), json!(-12), json!(null)] {
        let response = post_json(
            app.router.clone(),
            "/api/generate-svg",
            json!({ "text": "H", "fontFamily": "Fixture Sans", "fontSize": size }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK, "size {size}");

        let svg = body_text(response).await;
        assert_eq!(svg_attr(&svg, "height"), 115.0, "size {size}");
        assert_eq!(svg_attr(&svg, "width"), 70.0, "size {size}");
    }
}

// ---------------------------------------------------------------------------
// Test: Numeric strings are honoured
// ---------------------------------------------------------------------------

#[tokio::test]
async fn numeric_string_size_is_parsed() {
    let app = app_with_sans().await;

    let response = post_json(
        app.router.clone(),
        "/api/generate-svg",
        json!({ "text": "H", "fontFamily": "Fixture Sans", "fontSize": "200" }),
    )
    .await;
    let svg = body_text(response).await;
    assert_eq!(svg_attr(&svg, "height"), 230.0);
}

// ---------------------------------------------------------------------------
// Test: Empty text still yields a document
// ---------------------------------------------------------------------------

#[tokio::test]
async fn empty_text_yields_document() {
    let app = app_with_sans().await;

    let response = post_json(
        app.router.clone(),
        "/api/generate-svg",
        json!({ "text": "", "fontFamily": "Fixture Sans", "fontSize": 48 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let svg = body_text(response).await;
    assert!(svg.contains("<svg"));
    assert_eq!(svg_attr(&svg, "width"), 0.0);
}

// ---------------------------------------------------------------------------
// Test: WOFF2 uploads render the same outlines as the TTF
// ---------------------------------------------------------------------------

#[tokio::test]
async fn woff2_renders_like_ttf() {
    let ttf_app = app_with_sans().await;
    let woff2_app = common::build_test_app().await;
    upload(woff2_app.router.clone(), "font", "sans.woff2", SANS_WOFF2).await;

    let request = json!({ "text": "AVo", "fontFamily": "Fixture Sans", "fontSize": 64 });
    let from_ttf = body_text(post_json(ttf_app.router.clone(), "/api/generate-svg", request.clone()).await).await;
    let from_woff2 = body_text(post_json(woff2_app.router.clone(), "/api/generate-svg", request).await).await;

    assert_eq!(from_ttf, from_woff2);
}

// ---------------------------------------------------------------------------
// Test: A registered font whose file no longer parses is a 500
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unreadable_stored_font_returns_500() {
    let dir = tempfile::TempDir::new().unwrap();
    let uploads = dir.path().join("uploads");
    std::fs::create_dir_all(&uploads).unwrap();
    std::fs::write(uploads.join("1700000000000-broken.ttf"), b"truncated").unwrap();
    std::fs::write(
        uploads.join("fonts.json"),
        json!([{
            "fontFamily": "Broken",
            "filename": "1700000000000-broken.ttf",
            "url": "/uploads/1700000000000-broken.ttf"
        }])
        .to_string(),
    )
    .unwrap();
    let app = common::build_test_app_in(dir).await;

    let response = post_json(
        app.router.clone(),
        "/api/generate-svg",
        json!({ "text": "Hi", "fontFamily": "Broken", "fontSize": 48 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    assert_eq!(json["error"], "SVG generation failed");
    assert_eq!(json["code"], "RENDER_FAILED");
}

// ---------------------------------------------------------------------------
// Test: Malformed JSON bodies are a 400
// ---------------------------------------------------------------------------

#[tokio::test]
async fn malformed_body_returns_400() {
    let app = app_with_sans().await;

    let request = axum::http::Request::builder()
        .method(axum::http::Method::POST)
        .uri("/api/generate-svg")
        .header(CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from("{\"fontFamily\": "))
        .unwrap();
    let response = tower::ServiceExt::oneshot(app.router.clone(), request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}
