//! Convenience re-exports of the crate's primary types.

pub use crate::capture::CaptureId;
pub use crate::error::{Error, Result};
pub use crate::media::{PhotoStore, ThumbnailStore};
pub use crate::record::{AnnotationRecord, AnnotationStore};
pub use crate::store::Store;
