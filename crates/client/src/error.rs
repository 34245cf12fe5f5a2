use std::path::PathBuf;

use fontsvg_core::error::CoreError;

/// Errors from the client layer.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request itself failed (connection refused, DNS, timeout).
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// The server answered 2xx but reported `success: false`.
    #[error("{0}")]
    Rejected(String),

    /// The server accepted the upload but the font could not be loaded back.
    #[error("Uploaded font '{0}' could not be loaded")]
    NotLoaded(String),

    /// A local file that is not a font by extension.
    #[error("Unsupported font file: {0}")]
    UnsupportedFile(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ClientError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ClientError::Io {
            path: path.into(),
            source,
        }
    }
}
