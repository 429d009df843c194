//! Capture store abstraction

use std::path::PathBuf;

use async_trait::async_trait;

use crate::capture::CaptureId;
use crate::error::Result;

/// A keyed store for one artifact of a capture.
///
/// Every implementation persists at most one item per capture id;
/// saving again under the same id replaces the previous item.
#[async_trait]
pub trait Store: Send + Sync {
    /// The item type this store persists.
    type Item;

    /// Persists the item under the given capture id.
    ///
    /// Returns the path the item was written to.
    async fn save(&self, id: &CaptureId, item: &Self::Item) -> Result<PathBuf>;

    /// Loads the item stored under the given capture id.
    ///
    /// Returns `Ok(None)` when nothing is stored under the id.
    async fn find(&self, id: &CaptureId) -> Result<Option<Self::Item>>;
}
