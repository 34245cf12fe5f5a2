#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;

use fontsvg_api::config::ServerConfig;
use fontsvg_api::router::build_app_router;
use fontsvg_api::state::AppState;
use fontsvg_client::api::FontApiClient;
use fontsvg_client::notify::RecordingNotifier;
use fontsvg_client::session::ClientSession;

pub const SANS_TTF: &[u8] = include_bytes!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../../fixtures/fonts/fixture-sans.ttf"
));

pub const SERIF_TTF: &[u8] = include_bytes!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../../fixtures/fonts/fixture-serif.ttf"
));

/// A font server listening on an ephemeral local port.
pub struct TestServer {
    pub base_url: String,
    pub dir: TempDir,
}

pub fn test_config(dir: &Path) -> ServerConfig {
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

pub async fn spawn_server() -> TestServer {
    spawn_server_in(TempDir::new().unwrap()).await
}

/// Start a server over `dir`, which may be pre-seeded.
pub async fn spawn_server_in(dir: TempDir) -> TestServer {
    let config = test_config(dir.path());
    let state = AppState::from_config(&config).await.unwrap();
    let app = build_app_router(state, &config);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestServer {
        base_url: format!("http://{addr}"),
        dir,
    }
}

/// Start a server that stores uploads normally but serves `/uploads/` from
/// an empty directory, so every stored font 404s on download.
pub async fn spawn_server_without_downloads() -> TestServer {
    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path());
    let state = AppState::from_config(&config).await.unwrap();

    let empty = dir.path().join("empty");
    std::fs::create_dir_all(&empty).unwrap();
    let serving = ServerConfig {
        uploads_dir: empty,
        ..config
    };
    let app = build_app_router(state, &serving);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestServer {
        base_url: format!("http://{addr}"),
        dir,
    }
}

/// A base URL nothing listens on.
pub fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

pub fn session(base_url: &str) -> (ClientSession, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::new());
    let session = ClientSession::new(FontApiClient::new(base_url), notifier.clone());
    (session, notifier)
}

/// Write `bytes` to `dir/name` and return the path.
pub fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}
