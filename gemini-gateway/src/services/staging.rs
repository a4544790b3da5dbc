//! Local staging of uploaded files.
//!
//! Every upload is written under the staging directory with a UUID name and
//! lives exactly as long as its [`StagedFile`] handle.

use service_core::error::AppError;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct UploadStore {
    base_path: PathBuf,
}

impl UploadStore {
    pub async fn new(base_path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path).await?;
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Write `data` to a fresh file in the staging directory.
    pub async fn stage(
        &self,
        original_name: Option<&str>,
        content_type: Option<&str>,
        data: &[u8],
    ) -> Result<StagedFile, AppError> {
        let file_name = match original_name.and_then(safe_extension) {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
            None => Uuid::new_v4().to_string(),
        };

        // Handle exists before the write so a partial file is still removed.
        let staged = StagedFile {
            path: self.base_path.join(file_name),
            original_name: original_name.unwrap_or_default().to_string(),
            content_type: content_type.map(str::to_string),
            removed: false,
        };

        fs::write(&staged.path, data).await?;

        tracing::debug!(
            path = %staged.path.display(),
            original_name = %staged.original_name,
            size = data.len(),
            "Staged upload"
        );

        Ok(staged)
    }
}

fn safe_extension(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.len() <= 16)
        .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(str::to_ascii_lowercase)
}

/// A file staged for the duration of one request.
///
/// Call [`StagedFile::delete`] once the file is no longer needed. A handle that
/// is dropped without it removes the file synchronously instead.
#[derive(Debug)]
pub struct StagedFile {
    path: PathBuf,
    original_name: String,
    content_type: Option<String>,
    removed: bool,
}

impl StagedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name as sent by the client, empty if none was given.
    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    /// Content type as declared by the client.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub async fn read(&self) -> std::io::Result<Vec<u8>> {
        fs::read(&self.path).await
    }

    /// Remove the file. Failures are logged, never returned.
    pub async fn delete(mut self) {
        self.removed = true;
        log_removal(&self.path, fs::remove_file(&self.path).await);
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        // Drop cannot await, so this is a blocking unlink.
        if !self.removed {
            log_removal(&self.path, std::fs::remove_file(&self.path));
        }
    }
}

fn log_removal(path: &Path, result: std::io::Result<()>) {
    match result {
        Ok(()) => tracing::debug!(path = %path.display(), "Removed staged upload"),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "Staged upload already absent")
        }
        Err(e) => tracing::warn!(
            path = %path.display(),
            error = %e,
            "Failed to remove staged upload"
        ),
    }
}
