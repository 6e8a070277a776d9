//! Media store abstraction for uploaded videos and thumbnails.
//!
//! Handlers push bytes in and keep the returned [`UploadedMedia`] on the
//! owning record. The `public_id` is what later deletes the object.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use crate::{AppError, AppResult};

/// Metadata describing a stored media object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedMedia {
    /// Store-specific identifier used for deletion.
    pub public_id: String,
    /// Public URL to access the object.
    pub url: String,
    /// Object size in bytes.
    pub size: u64,
    /// MIME content type.
    pub content_type: String,
    /// MD5 hash of the object.
    pub md5: String,
}

/// Media store trait.
#[async_trait::async_trait]
pub trait MediaStore: Send + Sync {
    /// Store `data` under `key`.
    async fn upload(&self, key: &str, data: &[u8], content_type: &str)
    -> AppResult<UploadedMedia>;

    /// Remove a previously stored object. Removing a missing object is not an error.
    async fn delete(&self, public_id: &str) -> AppResult<()>;

    /// Public URL for a key.
    fn public_url(&self, key: &str) -> String;
}

/// Shared handle to the configured media store.
pub type MediaStoreHandle = Arc<dyn MediaStore>;

/// Build a storage key of the form `{folder}/{random}.{ext}`.
///
/// The extension is taken from the client filename when it is plain
/// alphanumeric, otherwise it is dropped.
#[must_use]
pub fn media_key(folder: &str, random: &str, filename: Option<&str>) -> String {
    let ext = filename
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.len() <= 8)
        .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(str::to_ascii_lowercase);

    match ext {
        Some(ext) => format!("{folder}/{random}.{ext}"),
        None => format!("{folder}/{random}"),
    }
}

/// Local filesystem media store.
pub struct LocalMediaStore {
    base_path: PathBuf,
    base_url: String,
}

impl LocalMediaStore {
    /// Create a new local media store.
    #[must_use]
    pub const fn new(base_path: PathBuf, base_url: String) -> Self {
        Self {
            base_path,
            base_url,
        }
    }

    fn resolve(&self, key: &str) -> AppResult<PathBuf> {
        let relative = Path::new(key);
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(AppError::Upstream(format!("Invalid media key: {key}")));
        }
        Ok(self.base_path.join(relative))
    }
}

#[async_trait::async_trait]
impl MediaStore for LocalMediaStore {
    async fn upload(
        &self,
        key: &str,
        data: &[u8],
        content_type: &str,
    ) -> AppResult<UploadedMedia> {
        let path = self.resolve(key)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Upstream(format!("Failed to create directory: {e}")))?;
        }

        tokio::fs::write(&path, data)
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to write media: {e}")))?;

        tracing::debug!(key = %key, size = data.len(), "Stored media object");

        Ok(UploadedMedia {
            public_id: key.to_string(),
            url: self.public_url(key),
            size: data.len() as u64,
            content_type: content_type.to_string(),
            md5: format!("{:x}", md5::compute(data)),
        })
    }

    async fn delete(&self, public_id: &str) -> AppResult<()> {
        let path = self.resolve(public_id)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Upstream(format!("Failed to delete media: {e}"))),
        }
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }
}

/// Store that keeps nothing. Used by tests and when uploads are disabled.
#[derive(Debug, Default)]
pub struct NoOpMediaStore;

#[async_trait::async_trait]
impl MediaStore for NoOpMediaStore {
    async fn upload(
        &self,
        key: &str,
        data: &[u8],
        content_type: &str,
    ) -> AppResult<UploadedMedia> {
        Ok(UploadedMedia {
            public_id: key.to_string(),
            url: self.public_url(key),
            size: data.len() as u64,
            content_type: content_type.to_string(),
            md5: format!("{:x}", md5::compute(data)),
        })
    }

    async fn delete(&self, _public_id: &str) -> AppResult<()> {
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("/media/{key}")
    }
}
