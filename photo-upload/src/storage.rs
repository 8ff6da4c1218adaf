//! Object storage abstraction
//!
//! The upload service only needs two things from a backend: durably store
//! bytes under a path, then hand out a URL the object can be fetched from.

use crate::models::{ImageFile, StoredObject};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("URL resolution failed: {0}")]
    ResolveFailed(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Invalid storage path: {0}")]
    InvalidPath(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Object storage backend
#[async_trait]
pub trait StorageClient: Send + Sync {
    /// Store the file's bytes at `path` and return a handle to the object
    async fn store(&self, path: &str, file: &ImageFile) -> StorageResult<StoredObject>;

    /// Resolve a fetchable URL for a previously stored object
    async fn resolve_url(&self, object: &StoredObject) -> StorageResult<String>;
}

/// Rejects empty, absolute and parent-escaping paths
pub(crate) fn validate_path(path: &str) -> StorageResult<()> {
    if path.is_empty()
        || path.starts_with('/')
        || path.split('/').any(|segment| segment == ".." || segment.is_empty())
    {
        return Err(StorageError::InvalidPath(path.to_string()));
    }
    Ok(())
}

/// Object store on the local filesystem
///
/// Objects land at `<root>/<path>`; URLs are `file://` URLs of the absolute
/// object path.
#[derive(Debug, Clone)]
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_file(&self, path: &str) -> StorageResult<PathBuf> {
        validate_path(path)?;
        Ok(path.split('/').fold(self.root.clone(), |acc, seg| acc.join(seg)))
    }
}

#[async_trait]
impl StorageClient for FsStorage {
    async fn store(&self, path: &str, file: &ImageFile) -> StorageResult<StoredObject> {
        let target = self.object_file(path)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&target, &file.bytes).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::PermissionDenied {
                StorageError::PermissionDenied(target.display().to_string())
            } else {
                StorageError::UploadFailed(format!("{}: {}", target.display(), e))
            }
        })?;

        log::debug!("Stored {} bytes at {}", file.size(), target.display());
        Ok(StoredObject {
            path: path.to_string(),
        })
    }

    async fn resolve_url(&self, object: &StoredObject) -> StorageResult<String> {
        let target = self.object_file(&object.path)?;
        let absolute = tokio::fs::canonicalize(&target)
            .await
            .map_err(|e| StorageError::ResolveFailed(format!("{}: {}", target.display(), e)))?;
        let url = url::Url::from_file_path(&absolute).map_err(|()| {
            StorageError::ResolveFailed(format!("{} is not an absolute path", absolute.display()))
        })?;
        Ok(url.to_string())
    }
}
