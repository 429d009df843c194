//! Annotation record persistence

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use snapsight_core::annotate::{AnnotateImageResponse, AnnotateOutcome, Capability};

use crate::TRACING_TARGET;
use crate::capture::CaptureId;
use crate::error::Result;
use crate::store::Store;

/// File extension for stored annotation records.
const RECORD_EXTENSION: &str = "json";

/// A stored annotation result.
///
/// Records keep the normalized response rather than the formatted
/// caption, so display strings can be rebuilt later without
/// re-annotating the image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    /// Capability the image was annotated with
    pub capability: Capability,
    /// Normalized annotation response
    pub response: AnnotateImageResponse,
    /// When the record was written
    pub saved_at: Timestamp,
}

impl AnnotationRecord {
    /// Creates a record stamped with the current time.
    pub fn new(capability: Capability, response: AnnotateImageResponse) -> Self {
        Self {
            capability,
            response,
            saved_at: Timestamp::now(),
        }
    }

    /// Creates a record from an annotation outcome.
    ///
    /// Only the normalized response is kept; the formatted caption is
    /// a display concern.
    pub fn from_outcome(outcome: &AnnotateOutcome) -> Self {
        Self::new(outcome.capability, outcome.response.clone())
    }
}

/// Stores annotation records as pretty-printed JSON files.
#[derive(Debug, Clone)]
pub struct AnnotationStore {
    dir: PathBuf,
}

impl AnnotationStore {
    /// Creates an annotation store rooted at the given directory.
    ///
    /// The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the directory this store writes into.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, id: &CaptureId) -> PathBuf {
        self.dir.join(format!("{id}.{RECORD_EXTENSION}"))
    }
}

#[async_trait]
impl Store for AnnotationStore {
    type Item = AnnotationRecord;

    async fn save(&self, id: &CaptureId, item: &AnnotationRecord) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.record_path(id);
        let json = serde_json::to_vec_pretty(item)?;
        tokio::fs::write(&path, json).await?;

        tracing::debug!(
            target: TRACING_TARGET,
            path = %path.display(),
            capability = %item.capability,
            "annotation saved"
        );
        Ok(path)
    }

    async fn find(&self, id: &CaptureId) -> Result<Option<AnnotationRecord>> {
        let bytes = match tokio::fs::read(self.record_path(id)).await {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(error.into()),
        };

        Ok(Some(serde_json::from_slice(&bytes)?))
    }
}

#[cfg(test)]
mod tests {
    use snapsight_core::annotate::EntityAnnotation;
    use tempfile::TempDir;

    use super::*;

    fn capture_id() -> CaptureId {
        CaptureId::from("2024-05-04-10-30-15-123")
    }

    fn label_response() -> AnnotateImageResponse {
        AnnotateImageResponse::default().with_labels(vec![
            EntityAnnotation::new("Street", 0.87),
            EntityAnnotation::new("Snapshot", 0.85),
        ])
    }

    #[tokio::test]
    async fn test_record_round_trip() {
        let temp = TempDir::new().expect("Temp dir");
        let store = AnnotationStore::new(temp.path());
        let record = AnnotationRecord::new(Capability::Object, label_response());

        store.save(&capture_id(), &record).await.expect("Saved");
        let found = store.find(&capture_id()).await.expect("Found");
        assert_eq!(found, Some(record));
    }

    #[tokio::test]
    async fn test_find_missing_returns_none() {
        let temp = TempDir::new().expect("Temp dir");
        let store = AnnotationStore::new(temp.path());

        let found = store.find(&capture_id()).await.expect("No error");
        assert_eq!(found, None);
    }

    #[tokio::test]
    async fn test_record_keeps_normalized_response() {
        let response = AnnotateImageResponse::default().with_text("STOP\nAHEAD\n");
        let outcome = AnnotateOutcome::new(Capability::Text, response.clone());

        let record = AnnotationRecord::from_outcome(&outcome);
        assert_eq!(record.capability, Capability::Text);
        assert_eq!(record.response, response);
    }

    #[tokio::test]
    async fn test_stored_file_is_readable_json() {
        let temp = TempDir::new().expect("Temp dir");
        let store = AnnotationStore::new(temp.path());
        let record = AnnotationRecord::new(Capability::Object, label_response());

        let path = store.save(&capture_id(), &record).await.expect("Saved");
        let contents = tokio::fs::read_to_string(&path).await.expect("Readable");

        assert!(contents.contains("\"capability\": \"object\""));
        assert!(contents.contains("labelAnnotations"));
    }

    #[tokio::test]
    async fn test_corrupted_record_is_an_error() {
        let temp = TempDir::new().expect("Temp dir");
        let store = AnnotationStore::new(temp.path());
        let path = temp.path().join("2024-05-04-10-30-15-123.json");
        tokio::fs::write(&path, b"not json").await.expect("Written");

        let result = store.find(&capture_id()).await;
        assert!(matches!(result, Err(crate::Error::Serialization(_))));
    }
}
