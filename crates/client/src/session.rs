//! Upload and render orchestration.
//!
//! Server rendering is always attempted first. Any failure, whether the
//! server is unreachable or answers with an error, produces a fallback
//! `<text>` document instead; rendering never fails from the caller's
//! point of view.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use fontsvg_core::fallback::{
    render_fallback, ApproximateMeasure, FallbackRequest, OutlineMeasure, TextMeasure,
};
use fontsvg_core::format::is_font_extension;
use fontsvg_core::naming::download_filename;
use fontsvg_core::types::{FontAsset, RenderRequest};

use crate::api::FontApiClient;
use crate::error::ClientError;
use crate::library::FontLibrary;
use crate::notify::{Notification, Notifier};

/// Text rendered when the caller supplies none.
pub const PLACEHOLDER_TEXT: &str = "Type text here";

pub const MSG_INVALID_SELECTION: &str = "Please select valid font files (TTF, OTF, WOFF, WOFF2)";
pub const MSG_UPLOAD_FAILED: &str = "Font upload failed";
pub const MSG_SVG_SERVER: &str = "SVG downloaded successfully!";
pub const MSG_SVG_FALLBACK: &str = "SVG downloaded (fallback mode)";
pub const MSG_SVG_FAILED: &str = "Failed to generate SVG";

/// Which path produced a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Server,
    Fallback,
}

#[derive(Debug, Clone)]
pub struct RenderedSvg {
    pub markup: String,
    /// Suggested download name, see [`download_filename`].
    pub filename: String,
    pub mode: RenderMode,
}

/// Result of a batch upload.
#[derive(Debug, Default, Clone)]
pub struct UploadSummary {
    pub uploaded: Vec<FontAsset>,
    pub failed: Vec<String>,
    /// Files skipped for their extension.
    pub skipped: Vec<PathBuf>,
}

pub struct ClientSession {
    api: FontApiClient,
    library: FontLibrary,
    notifier: Arc<dyn Notifier>,
}

impl ClientSession {
    pub fn new(api: FontApiClient, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            library: FontLibrary::new(),
            notifier,
        }
    }

    pub fn api(&self) -> &FontApiClient {
        &self.api
    }

    pub fn library(&self) -> &FontLibrary {
        &self.library
    }

    pub fn library_mut(&mut self) -> &mut FontLibrary {
        &mut self.library
    }

    fn notify(&self, notification: Notification) {
        self.notifier.notify(notification);
    }

    /// Load every font the server knows about. An unreachable server is
    /// not an error: the session keeps working with what it has.
    pub async fn sync_fonts(&mut self) -> usize {
        let fonts = match self.api.list_fonts().await {
            Ok(fonts) => fonts,
            Err(e) => {
                tracing::info!(error = %e, "Server not available, working in offline mode");
                return 0;
            }
        };

        let mut loaded = 0;
        for asset in &fonts {
            if self.library.load(&self.api, asset).await {
                loaded += 1;
            }
        }
        tracing::info!(server = fonts.len(), loaded, "Fonts synchronised");
        loaded
    }

    /// Upload `paths` one at a time, skipping anything without a font
    /// extension. Each accepted font is loaded locally and selected.
    pub async fn upload_files(&mut self, paths: &[PathBuf]) -> UploadSummary {
        let (fonts, skipped): (Vec<&PathBuf>, Vec<&PathBuf>) = paths
            .iter()
            .partition(|path| is_font_extension(&display_name(path)));

        let mut summary = UploadSummary {
            skipped: skipped.into_iter().cloned().collect(),
            ..UploadSummary::default()
        };

        if fonts.is_empty() {
            self.notify(Notification::error(MSG_INVALID_SELECTION));
            return summary;
        }

        tracing::info!(count = fonts.len(), "Uploading font files");

        for path in fonts {
            let name = display_name(path);
            match self.upload_one(path).await {
                Ok(asset) => summary.uploaded.push(asset),
                Err(ClientError::NotLoaded(family)) => {
                    tracing::warn!(file = %name, font_family = %family, "Uploaded font could not be loaded");
                    summary.failed.push(name);
                }
                Err(e) => {
                    tracing::warn!(file = %name, error = %e, "Font upload failed");
                    let message = match e {
                        ClientError::Rejected(message) if !message.is_empty() => message,
                        ClientError::Rejected(_) => MSG_UPLOAD_FAILED.to_string(),
                        _ => format!("Failed to upload {name}"),
                    };
                    self.notify(Notification::error(message));
                    summary.failed.push(name);
                }
            }
        }

        if !summary.uploaded.is_empty() {
            self.notify(Notification::success(format!(
                "Successfully uploaded {} font(s)!",
                summary.uploaded.len()
            )));
        }
        summary
    }

    /// Upload a single file, then load and select its family.
    ///
    /// A font the server stored but this session cannot load is reported as
    /// [`ClientError::NotLoaded`].
    pub async fn upload_one(&mut self, path: &Path) -> Result<FontAsset, ClientError> {
        let name = display_name(path);
        if !is_font_extension(&name) {
            return Err(ClientError::UnsupportedFile(name));
        }

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ClientError::io(path, e))?;
        let asset = self.api.upload_font(&name, bytes).await?;
        tracing::info!(font_family = %asset.font_family, "Font uploaded");

        if !self.library.load(&self.api, &asset).await {
            return Err(ClientError::NotLoaded(asset.font_family));
        }
        self.library.select(&asset.font_family);
        Ok(asset)
    }

    /// Render `text` in the selected family and variant.
    pub async fn render(&self, text: &str, font_size: u32) -> RenderedSvg {
        let text = if text.is_empty() { PLACEHOLDER_TEXT } else { text };
        let family = self.library.selected();
        let variant = self.library.variant();
        let filename = download_filename(family, text);

        let request = RenderRequest {
            text: Some(text.to_string()),
            font_family: family.to_string(),
            font_size: serde_json::json!(font_size),
            font_weight: Some(variant.weight()),
            font_style: Some(variant.style()),
        };

        match self.api.generate_svg(&request).await {
            Ok(markup) => {
                return RenderedSvg {
                    markup,
                    filename,
                    mode: RenderMode::Server,
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "SVG generation error, falling back to local rendering");
            }
        }

        let local = self.library.font(family);
        let measure: Box<dyn TextMeasure + '_> = match local.as_deref() {
            Some(font) => Box::new(OutlineMeasure::new(font)),
            None => Box::new(ApproximateMeasure),
        };
        let document = render_fallback(
            measure.as_ref(),
            &FallbackRequest {
                text,
                font_family: family,
                font_size: f64::from(font_size),
                weight: variant.weight(),
                style: variant.style(),
            },
        );

        RenderedSvg {
            markup: document.markup,
            filename,
            mode: RenderMode::Fallback,
        }
    }

    /// Render and write the document into `out_dir` under its download
    /// name.
    pub async fn download(
        &self,
        text: &str,
        font_size: u32,
        out_dir: &Path,
    ) -> Result<(PathBuf, RenderMode), ClientError> {
        let rendered = self.render(text, font_size).await;
        let path = out_dir.join(&rendered.filename);

        if let Err(e) = tokio::fs::write(&path, rendered.markup.as_bytes()).await {
            self.notify(Notification::error(MSG_SVG_FAILED));
            return Err(ClientError::io(path, e));
        }

        let message = match rendered.mode {
            RenderMode::Server => MSG_SVG_SERVER,
            RenderMode::Fallback => MSG_SVG_FALLBACK,
        };
        self.notify(Notification::success(message));
        Ok((path, rendered.mode))
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
