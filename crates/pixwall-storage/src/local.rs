//! Local filesystem store for originals and thumbnails.
//!
//! Originals live directly under the uploads directory; thumbnails live in
//! a parallel `thumbnails/` subdirectory under the same storage name.
//! Storage names are validated against path traversal even though the
//! naming layer should never produce one.

use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

pub const THUMBNAILS_SUBDIR: &str = "thumbnails";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage name: {0}")]
    InvalidName(String),

    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Storage configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Filesystem storage rooted at the uploads directory.
#[derive(Clone, Debug)]
pub struct LocalStore {
    upload_dir: PathBuf,
    thumbnail_dir: PathBuf,
}

impl LocalStore {
    /// Create the store, ensuring both directories exist.
    pub async fn new(upload_dir: impl Into<PathBuf>) -> StorageResult<Self> {
        let upload_dir = upload_dir.into();
        let thumbnail_dir = upload_dir.join(THUMBNAILS_SUBDIR);

        fs::create_dir_all(&thumbnail_dir).await.map_err(|e| {
            StorageError::Config(format!(
                "Failed to create storage directory {}: {}",
                thumbnail_dir.display(),
                e
            ))
        })?;

        Ok(LocalStore {
            upload_dir,
            thumbnail_dir,
        })
    }

    /// Reject storage names that could resolve outside the store.
    fn validate_name(name: &str) -> StorageResult<()> {
        if name.is_empty()
            || name.contains("..")
            || name.contains('/')
            || name.contains('\\')
        {
            return Err(StorageError::InvalidName(name.to_string()));
        }
        Ok(())
    }

    pub fn original_path(&self, name: &str) -> StorageResult<PathBuf> {
        Self::validate_name(name)?;
        Ok(self.upload_dir.join(name))
    }

    pub fn thumbnail_path(&self, name: &str) -> StorageResult<PathBuf> {
        Self::validate_name(name)?;
        Ok(self.thumbnail_dir.join(name))
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Write an original and verify the write landed (file exists and is
    /// non-empty). Returns the path written.
    pub async fn write_original(&self, name: &str, data: &[u8]) -> StorageResult<PathBuf> {
        let path = self.original_path(name)?;

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to create {}: {}", path.display(), e))
        })?;
        file.write_all(data).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to write {}: {}", path.display(), e))
        })?;
        file.sync_all().await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to sync {}: {}", path.display(), e))
        })?;

        // Verify, as the original save path did: an empty or missing file
        // counts as a failed save even when no write call errored.
        let verified = fs::metadata(&path)
            .await
            .map(|m| m.is_file() && m.len() > 0)
            .unwrap_or(false);
        if !verified {
            return Err(StorageError::WriteFailed(format!(
                "Verification failed after writing {}",
                path.display()
            )));
        }

        tracing::info!(path = %path.display(), size_bytes = data.len(), "Stored original");
        Ok(path)
    }

    /// Write a non-record artifact (e.g. a URL export table) into the
    /// uploads directory so it is served like any other static file.
    pub async fn write_artifact(&self, name: &str, data: &[u8]) -> StorageResult<PathBuf> {
        let path = self.original_path(name)?;
        fs::write(&path, data).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to write {}: {}", path.display(), e))
        })?;
        tracing::info!(path = %path.display(), size_bytes = data.len(), "Stored artifact");
        Ok(path)
    }

    /// Delete the original for `name`, tolerating absence.
    pub async fn delete_original(&self, name: &str) -> StorageResult<()> {
        let path = self.original_path(name)?;
        Self::remove_tolerant(&path).await
    }

    /// Delete the thumbnail for `name`, tolerating absence.
    pub async fn delete_thumbnail(&self, name: &str) -> StorageResult<()> {
        let path = self.thumbnail_path(name)?;
        Self::remove_tolerant(&path).await
    }

    async fn remove_tolerant(path: &Path) -> StorageResult<()> {
        if !fs::try_exists(path).await.unwrap_or(false) {
            tracing::debug!(path = %path.display(), "File already absent, nothing to delete");
            return Ok(());
        }
        fs::remove_file(path).await.map_err(|e| {
            StorageError::DeleteFailed(format!("Failed to delete {}: {}", path.display(), e))
        })?;
        tracing::info!(path = %path.display(), "Deleted file");
        Ok(())
    }

    pub async fn original_exists(&self, name: &str) -> StorageResult<bool> {
        let path = self.original_path(name)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }

    pub async fn thumbnail_exists(&self, name: &str) -> StorageResult<bool> {
        let path = self.thumbnail_path(name)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_write_and_verify_original() {
        let dir = tempdir().unwrap();
        let store = LocalStore::new(dir.path()).await.unwrap();

        let path = store.write_original("abc_cat.jpg", b"jpeg bytes").await.unwrap();
        assert!(path.exists());
        assert!(store.original_exists("abc_cat.jpg").await.unwrap());
    }

    #[tokio::test]
    async fn test_write_empty_fails_verification() {
        let dir = tempdir().unwrap();
        let store = LocalStore::new(dir.path()).await.unwrap();

        let result = store.write_original("abc_empty.png", b"").await;
        assert!(matches!(result, Err(StorageError::WriteFailed(_))));
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = tempdir().unwrap();
        let store = LocalStore::new(dir.path()).await.unwrap();

        for name in ["../escape.png", "a/b.png", "..", "a\\b.png", ""] {
            assert!(matches!(
                store.original_path(name),
                Err(StorageError::InvalidName(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_delete_tolerates_absence() {
        let dir = tempdir().unwrap();
        let store = LocalStore::new(dir.path()).await.unwrap();

        assert!(store.delete_original("never_written.jpg").await.is_ok());
        assert!(store.delete_thumbnail("never_written.jpg").await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_removes_file() {
        let dir = tempdir().unwrap();
        let store = LocalStore::new(dir.path()).await.unwrap();

        store.write_original("abc_dog.png", b"png bytes").await.unwrap();
        store.delete_original("abc_dog.png").await.unwrap();
        assert!(!store.original_exists("abc_dog.png").await.unwrap());
    }

    #[tokio::test]
    async fn test_thumbnail_dir_created() {
        let dir = tempdir().unwrap();
        let store = LocalStore::new(dir.path()).await.unwrap();

        let thumb = store.thumbnail_path("abc_cat.jpg").unwrap();
        assert!(thumb.parent().unwrap().exists());
        assert!(thumb.starts_with(dir.path().join(THUMBNAILS_SUBDIR)));
    }
}
