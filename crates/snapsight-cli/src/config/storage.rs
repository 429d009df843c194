//! Local capture storage configuration.

use std::path::PathBuf;

use clap::Args;
use serde::{Deserialize, Serialize};
use snapsight_store::{AnnotationStore, PhotoStore, ThumbnailStore};

use crate::TRACING_TARGET_CONFIG;

/// Capture storage options.
///
/// Captures are stored under a single output directory, split into
/// `photos/`, `thumbnails/` and `annotations/` subdirectories that
/// share the capture id as file name.
#[derive(Debug, Clone, Serialize, Deserialize, Args)]
pub struct StorageConfig {
    /// Directory captures are stored under.
    #[arg(long, env = "SNAPSIGHT_OUTPUT_DIR", default_value = "captures")]
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Disables all local persistence for this run.
    #[arg(long)]
    #[serde(default)]
    pub no_store: bool,
}

impl StorageConfig {
    /// Creates the store for full-size photos.
    pub fn photo_store(&self) -> PhotoStore {
        PhotoStore::new(self.output_dir.join("photos"))
    }

    /// Creates the store for thumbnails.
    pub fn thumbnail_store(&self) -> ThumbnailStore {
        ThumbnailStore::new(self.output_dir.join("thumbnails"))
    }

    /// Creates the store for annotation records.
    pub fn annotation_store(&self) -> AnnotationStore {
        AnnotationStore::new(self.output_dir.join("annotations"))
    }

    /// Logs the storage configuration.
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            output_dir = %self.output_dir.display(),
            no_store = self.no_store,
            "Storage configuration"
        );
    }
}

// Default value functions for serde
fn default_output_dir() -> PathBuf {
    PathBuf::from("captures")
}
