use std::path::PathBuf;
use std::time::Instant;
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid path component: {0}")]
    InvalidName(String),

    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Per-event media subdirectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaDir {
    Photos,
    Thumbnails,
    Logos,
}

impl MediaDir {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaDir::Photos => "photos",
            MediaDir::Thumbnails => "thumbnails",
            MediaDir::Logos => "logos",
        }
    }
}

/// Reject path components that could escape the event tree.
fn validate_component(component: &str) -> StorageResult<()> {
    if component.is_empty()
        || component.contains("..")
        || component.contains('/')
        || component.contains('\\')
        || component.starts_with('.')
    {
        return Err(StorageError::InvalidName(component.to_string()));
    }
    Ok(())
}

/// Local filesystem tree keyed by event slug.
#[derive(Clone, Debug)]
pub struct EventStore {
    root: PathBuf,
    base_url: String,
}

impl EventStore {
    /// Create a store rooted at `root` (created if absent), serving files
    /// under `base_url`.
    pub async fn new(root: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let root = root.into();

        fs::create_dir_all(&root).await.map_err(|e| {
            StorageError::WriteFailed(format!(
                "Failed to create storage root {}: {}",
                root.display(),
                e
            ))
        })?;

        Ok(EventStore { root, base_url })
    }

    /// Resolve and validate the path of one stored file.
    pub fn file_path(&self, slug: &str, dir: MediaDir, filename: &str) -> StorageResult<PathBuf> {
        validate_component(slug)?;
        validate_component(filename)?;
        Ok(self.root.join(slug).join(dir.as_str()).join(filename))
    }

    /// Public URL of one stored file.
    pub fn url_for(&self, slug: &str, dir: MediaDir, filename: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            slug,
            dir.as_str(),
            filename
        )
    }

    /// Create the three media subdirectories for an event.
    pub async fn ensure_event_dirs(&self, slug: &str) -> StorageResult<()> {
        validate_component(slug)?;
        for dir in [MediaDir::Photos, MediaDir::Thumbnails, MediaDir::Logos] {
            fs::create_dir_all(self.root.join(slug).join(dir.as_str())).await?;
        }
        Ok(())
    }

    pub async fn write(
        &self,
        slug: &str,
        dir: MediaDir,
        filename: &str,
        data: &[u8],
    ) -> StorageResult<PathBuf> {
        let path = self.file_path(slug, dir, filename)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let start = Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(data).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            event = %slug,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Stored file"
        );

        Ok(path)
    }

    pub async fn read(&self, slug: &str, dir: MediaDir, filename: &str) -> StorageResult<Vec<u8>> {
        let path = self.file_path(slug, dir, filename)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(filename.to_string()));
        }

        fs::read(&path).await.map_err(|e| {
            StorageError::ReadFailed(format!("Failed to read file {}: {}", path.display(), e))
        })
    }

    /// Delete a stored file. Deleting an absent file is not an error.
    pub async fn delete(&self, slug: &str, dir: MediaDir, filename: &str) -> StorageResult<()> {
        let path = self.file_path(slug, dir, filename)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(());
        }

        fs::remove_file(&path).await.map_err(|e| {
            StorageError::DeleteFailed(format!("Failed to delete file {}: {}", path.display(), e))
        })?;

        tracing::info!(path = %path.display(), event = %slug, "Deleted file");

        Ok(())
    }

    pub async fn exists(&self, slug: &str, dir: MediaDir, filename: &str) -> StorageResult<bool> {
        let path = self.file_path(slug, dir, filename)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }

    /// Best-effort removal of a photo's original and derivative files.
    /// Used by the intake rollback and the admin deletion flow; failures
    /// are logged, not propagated.
    pub async fn delete_photo_files(
        &self,
        slug: &str,
        filename: &str,
        resized_filename: Option<&str>,
        thumbnail_filename: Option<&str>,
    ) {
        let mut photo_files = vec![filename];
        photo_files.extend(resized_filename);

        for name in photo_files {
            if let Err(e) = self.delete(slug, MediaDir::Photos, name).await {
                tracing::warn!(error = %e, filename = %name, "Failed to delete photo file");
            }
        }
        if let Some(name) = thumbnail_filename {
            if let Err(e) = self.delete(slug, MediaDir::Thumbnails, name).await {
                tracing::warn!(error = %e, filename = %name, "Failed to delete thumbnail file");
            }
        }
    }
}
