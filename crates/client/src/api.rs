//! HTTP client for the font API.
//!
//! Wraps the three `/api` endpoints plus static font downloads using
//! [`reqwest`].

use fontsvg_core::types::{FontAsset, RenderRequest};
use serde::Deserialize;

use crate::error::ClientError;

/// HTTP client for a single font server.
#[derive(Debug, Clone)]
pub struct FontApiClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct FontListBody {
    success: bool,
    #[serde(default)]
    fonts: Vec<FontAsset>,
}

#[derive(Debug, Deserialize)]
struct UploadBody {
    success: bool,
    font: Option<FontAsset>,
    error: Option<String>,
}

impl FontApiClient {
    /// Create a client for `base_url`, e.g. `http://localhost:3000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET /api/fonts`
    pub async fn list_fonts(&self) -> Result<Vec<FontAsset>, ClientError> {
        let response = self.client.get(self.url("/api/fonts")).send().await?;
        let body: FontListBody = Self::ensure_success(response).await?.json().await?;
        if !body.success {
            return Err(ClientError::Rejected("Font registry unavailable".into()));
        }
        Ok(body.fonts)
    }

    /// `POST /api/upload-font` with the bytes as the `font` field.
    pub async fn upload_font(
        &self,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<FontAsset, ClientError> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str("application/octet-stream")?;
        let form = reqwest::multipart::Form::new().part("font", part);

        let response = self
            .client
            .post(self.url("/api/upload-font"))
            .multipart(form)
            .send()
            .await?;

        let body: UploadBody = Self::ensure_success(response).await?.json().await?;
        match body {
            UploadBody {
                success: true,
                font: Some(font),
                ..
            } => Ok(font),
            UploadBody { error, .. } => Err(ClientError::Rejected(
                error.unwrap_or_else(|| "Font upload failed".into()),
            )),
        }
    }

    /// `POST /api/generate-svg`, returning the SVG markup.
    pub async fn generate_svg(&self, request: &RenderRequest) -> Result<String, ClientError> {
        let response = self
            .client
            .post(self.url("/api/generate-svg"))
            .json(request)
            .send()
            .await?;
        Ok(Self::ensure_success(response).await?.text().await?)
    }

    /// Download a stored font by its public URL (`/uploads/...`).
    pub async fn fetch_font(&self, url: &str) -> Result<Vec<u8>, ClientError> {
        let response = self.client.get(self.url(url)).send().await?;
        let bytes = Self::ensure_success(response).await?.bytes().await?;
        Ok(bytes.to_vec())
    }

    // ---- private helpers ----

    /// Pass 2xx responses through; turn anything else into
    /// [`ClientError::Server`] carrying the server's error message.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        Err(ClientError::Server {
            status: status.as_u16(),
            message: error_message(&body),
        })
    }
}

/// The `error` field of a JSON error envelope, or the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}
