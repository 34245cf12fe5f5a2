//! Persistence for uploaded fonts.
//!
//! Two concerns live here: the [`FontRegistry`] (which families exist and
//! where their files are) and the [`FontStore`] (the directory holding the
//! font binaries). Callers only ever mutate the registry through
//! [`FontRegistry::register`].

use std::path::PathBuf;

use fontsvg_core::error::CoreError;

pub mod registry;
pub mod store;

pub use registry::json_file::JsonFileRegistry;
pub use registry::memory::MemoryRegistry;
pub use registry::FontRegistry;
pub use store::{FontStore, StoredFont};

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A domain error (duplicate family, unknown family).
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Registry file is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

impl DbError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DbError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type DbResult<T> = Result<T, DbError>;
