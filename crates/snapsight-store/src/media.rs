//! Photo and thumbnail persistence

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;

use crate::TRACING_TARGET;
use crate::capture::CaptureId;
use crate::error::Result;
use crate::store::Store;

/// File extension for stored images.
const IMAGE_EXTENSION: &str = "jpg";

/// Stores full-size capture photos under a directory.
///
/// Bytes are written as-is; the store does no decoding or resizing.
#[derive(Debug, Clone)]
pub struct PhotoStore {
    dir: PathBuf,
}

impl PhotoStore {
    /// Creates a photo store rooted at the given directory.
    ///
    /// The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the directory this store writes into.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl Store for PhotoStore {
    type Item = Bytes;

    async fn save(&self, id: &CaptureId, item: &Bytes) -> Result<PathBuf> {
        save_image(&self.dir, id, item).await
    }

    async fn find(&self, id: &CaptureId) -> Result<Option<Bytes>> {
        find_image(&self.dir, id).await
    }
}

/// Stores capture thumbnails under a directory.
///
/// Thumbnails arrive pre-scaled; like [`PhotoStore`] this writes the
/// bytes without touching the image data.
#[derive(Debug, Clone)]
pub struct ThumbnailStore {
    dir: PathBuf,
}

impl ThumbnailStore {
    /// Creates a thumbnail store rooted at the given directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the directory this store writes into.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl Store for ThumbnailStore {
    type Item = Bytes;

    async fn save(&self, id: &CaptureId, item: &Bytes) -> Result<PathBuf> {
        save_image(&self.dir, id, item).await
    }

    async fn find(&self, id: &CaptureId) -> Result<Option<Bytes>> {
        find_image(&self.dir, id).await
    }
}

fn image_path(dir: &Path, id: &CaptureId) -> PathBuf {
    dir.join(format!("{id}.{IMAGE_EXTENSION}"))
}

async fn save_image(dir: &Path, id: &CaptureId, bytes: &Bytes) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = image_path(dir, id);
    tokio::fs::write(&path, bytes).await?;

    tracing::debug!(
        target: TRACING_TARGET,
        path = %path.display(),
        size = bytes.len(),
        "image saved"
    );
    Ok(path)
}

async fn find_image(dir: &Path, id: &CaptureId) -> Result<Option<Bytes>> {
    match tokio::fs::read(image_path(dir, id)).await {
        Ok(bytes) => Ok(Some(Bytes::from(bytes))),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(error) => Err(error.into()),
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn capture_id() -> CaptureId {
        CaptureId::from("2024-05-04-10-30-15-123")
    }

    #[tokio::test]
    async fn test_photo_round_trip() {
        let temp = TempDir::new().expect("Temp dir");
        let store = PhotoStore::new(temp.path());
        let bytes = Bytes::from_static(b"\xff\xd8\xff\xe0 jpeg bytes");

        let path = store.save(&capture_id(), &bytes).await.expect("Saved");
        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some("2024-05-04-10-30-15-123.jpg")
        );

        let found = store.find(&capture_id()).await.expect("Found");
        assert_eq!(found, Some(bytes));
    }

    #[tokio::test]
    async fn test_find_missing_returns_none() {
        let temp = TempDir::new().expect("Temp dir");
        let store = PhotoStore::new(temp.path());

        let found = store.find(&capture_id()).await.expect("No error");
        assert_eq!(found, None);
    }

    #[tokio::test]
    async fn test_save_creates_directory() {
        let temp = TempDir::new().expect("Temp dir");
        let store = ThumbnailStore::new(temp.path().join("nested").join("thumbnails"));
        let bytes = Bytes::from_static(b"thumb");

        let path = store.save(&capture_id(), &bytes).await.expect("Saved");
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_save_replaces_existing() {
        let temp = TempDir::new().expect("Temp dir");
        let store = PhotoStore::new(temp.path());

        store
            .save(&capture_id(), &Bytes::from_static(b"first"))
            .await
            .expect("Saved");
        store
            .save(&capture_id(), &Bytes::from_static(b"second"))
            .await
            .expect("Saved");

        let found = store.find(&capture_id()).await.expect("Found");
        assert_eq!(found, Some(Bytes::from_static(b"second")));
    }

    #[tokio::test]
    async fn test_photo_and_thumbnail_share_id() {
        let temp = TempDir::new().expect("Temp dir");
        let photos = PhotoStore::new(temp.path().join("photos"));
        let thumbnails = ThumbnailStore::new(temp.path().join("thumbnails"));
        let id = capture_id();

        photos
            .save(&id, &Bytes::from_static(b"photo"))
            .await
            .expect("Saved");
        thumbnails
            .save(&id, &Bytes::from_static(b"thumb"))
            .await
            .expect("Saved");

        assert_eq!(
            photos.find(&id).await.expect("Found"),
            Some(Bytes::from_static(b"photo"))
        );
        assert_eq!(
            thumbnails.find(&id).await.expect("Found"),
            Some(Bytes::from_static(b"thumb"))
        );
    }
}
