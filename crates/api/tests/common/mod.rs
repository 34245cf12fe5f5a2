#![allow(dead_code)]

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use fontsvg_api::config::ServerConfig;
use fontsvg_api::router::build_app_router;
use fontsvg_api::state::AppState;

macro_rules! fixture {
    ($name:literal) => {
        include_bytes!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/../../fixtures/fonts/",
            $name
        ))
    };
}

pub const SANS_TTF: &[u8] = fixture!("fixture-sans.ttf");
pub const SANS_WOFF2: &[u8] = fixture!("fixture-sans.woff2");
pub const SERIF_TTF: &[u8] = fixture!("fixture-serif.ttf");
pub const NAMELESS_TTF: &[u8] = fixture!("nameless.ttf");

const BOUNDARY: &str = "fontsvg-test-boundary";

/// A running app plus the temporary directory backing its storage.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub dir: TempDir,
}

impl TestApp {
    /// Stored font files, excluding the registry.
    pub fn stored_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(&self.state.config.uploads_dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name != "fonts.json")
            .collect();
        names.sort();
        names
    }
}

/// Build a test `ServerConfig` rooted at `dir`.
pub fn test_config(dir: &std::path::Path) -> ServerConfig {
    let uploads_dir = dir.join("uploads");
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        registry_path: uploads_dir.join("fonts.json"),
        uploads_dir,
        public_dir: dir.join("public"),
        max_upload_bytes: 20 * 1024 * 1024,
    }
}

/// Build the full application router over fresh temporary storage.
pub async fn build_test_app() -> TestApp {
    build_test_app_in(TempDir::new().unwrap()).await
}

/// Build the full application router over `dir`, which may be pre-seeded.
pub async fn build_test_app_in(dir: TempDir) -> TestApp {
    let config = test_config(dir.path());
    let state = AppState::from_config(&config).await.unwrap();
    let router = build_app_router(state.clone(), &config);
    TestApp { router, state, dir }
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST a single multipart file part to `/api/upload-font`.
pub async fn upload(app: Router, field: &str, filename: &str, bytes: &[u8]) -> Response<Body> {
    let mut body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
         Content-Type: application/octet-stream\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/upload-font")
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

/// Read a numeric attribute from the root `<svg>` element.
pub fn svg_attr(svg: &str, name: &str) -> f64 {
    let needle = format!(" {name}=\"");
    let start = svg.find(&needle).unwrap() + needle.len();
    let end = start + svg[start..].find('"').unwrap();
    svg[start..end].parse().unwrap()
}
