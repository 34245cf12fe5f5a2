use std::path::PathBuf;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Directory holding uploaded font files, served under `/uploads`.
    pub uploads_dir: PathBuf,
    /// The JSON registry file.
    pub registry_path: PathBuf,
    /// Static front-end assets served for every other path.
    pub public_dir: PathBuf,
    /// Largest accepted request body in bytes.
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:3000`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `UPLOADS_DIR`          | `uploads`                  |
    /// | `REGISTRY_PATH`        | `<UPLOADS_DIR>/fonts.json` |
    /// | `PUBLIC_DIR`           | `public`                   |
    /// | `MAX_UPLOAD_BYTES`     | `20971520`                 |
    pub fn from_env() -> Self {
        let uploads_dir = PathBuf::from(env_or("UPLOADS_DIR", "uploads"));
        let registry_path = std::env::var("REGISTRY_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| uploads_dir.join("fonts.json"));

        Self {
            host: env_or("HOST", "0.0.0.0"),
            port: parse_env("PORT", 3000),
            cors_origins: env_or("CORS_ORIGINS", "http://localhost:3000")
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
            request_timeout_secs: parse_env("REQUEST_TIMEOUT_SECS", 30),
            uploads_dir,
            registry_path,
            public_dir: PathBuf::from(env_or("PUBLIC_DIR", "public")),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 20 * 1024 * 1024),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse `key` when set. Panics on a value that does not parse.
fn parse_env<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{key} must be a valid {}: {e}", std::any::type_name::<T>())),
        Err(_) => default,
    }
}
