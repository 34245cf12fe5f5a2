//! The uploads directory holding font binaries.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use fontsvg_core::error::CoreError;
use fontsvg_core::naming;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::{DbError, DbResult};

/// Attempts at finding a free timestamped name before giving up.
const MAX_NAME_ATTEMPTS: i64 = 16;

/// A font binary written to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFont {
    /// Name inside the store directory; the storage locator.
    pub filename: String,
    /// Name as uploaded.
    pub original_filename: String,
    pub size: u64,
}

/// Flat directory of uploaded font files.
///
/// Files are named `<unix-millis>-<original name>` and never overwritten.
#[derive(Debug, Clone)]
pub struct FontStore {
    root: PathBuf,
}

impl FontStore {
    /// Use `root` as the store directory, creating it when missing.
    pub async fn open(root: impl Into<PathBuf>) -> DbResult<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|e| DbError::io(&root, e))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write an upload under a fresh timestamped name.
    pub async fn save(&self, original_filename: &str, bytes: &[u8]) -> DbResult<StoredFont> {
        let now = chrono::Utc::now().timestamp_millis();

        for bump in 0..MAX_NAME_ATTEMPTS {
            let filename = naming::stored_filename(original_filename, now + bump);
            let path = self.root.join(&filename);

            let mut file = match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(DbError::io(&path, e)),
            };

            write_or_discard(&mut file, &path, bytes).await?;

            tracing::debug!(filename = %filename, size = bytes.len(), "Stored upload");
            return Ok(StoredFont {
                filename,
                original_filename: original_filename.to_string(),
                size: bytes.len() as u64,
            });
        }

        Err(CoreError::Internal(format!(
            "no free file name for upload '{original_filename}'"
        ))
        .into())
    }

    /// Read a stored file back.
    pub async fn read(&self, filename: &str) -> DbResult<Vec<u8>> {
        let path = self.path_of(filename)?;
        tokio::fs::read(&path)
            .await
            .map_err(|e| DbError::io(path, e))
    }

    /// Delete a stored file. Deleting a file that is already gone succeeds.
    pub async fn remove(&self, filename: &str) -> DbResult<()> {
        let path = self.path_of(filename)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(filename, "Removed stored upload");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DbError::io(path, e)),
        }
    }

    /// Absolute path of a stored file, rejecting names that would leave
    /// the store directory.
    pub fn path_of(&self, filename: &str) -> DbResult<PathBuf> {
        if filename.is_empty()
            || filename.contains(['/', '\\'])
            || filename == "."
            || filename == ".."
        {
            return Err(CoreError::Validation(format!("invalid stored file name '{filename}'")).into());
        }
        Ok(self.root.join(filename))
    }
}

/// Write `bytes` to the freshly created `path`, deleting it again when the
/// write fails part way.
async fn write_or_discard<W>(file: &mut W, path: &Path, bytes: &[u8]) -> DbResult<()>
where
    W: AsyncWrite + Unpin,
{
    let written = match file.write_all(bytes).await {
        Ok(()) => file.flush().await,
        Err(e) => Err(e),
    };
    if let Err(e) = written {
        if let Err(cleanup) = tokio::fs::remove_file(path).await {
            tracing::warn!(path = %path.display(), error = %cleanup, "Failed to remove partial upload");
        }
        return Err(DbError::io(path, e));
    }
    Ok(())
}
