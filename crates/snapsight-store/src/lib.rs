#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod capture;
mod error;
mod media;
mod record;
mod store;

#[doc(hidden)]
pub mod prelude;

pub use crate::capture::CaptureId;
pub use crate::error::{Error, Result};
pub use crate::media::{PhotoStore, ThumbnailStore};
pub use crate::record::{AnnotationRecord, AnnotationStore};
pub use crate::store::Store;

/// Tracing target for this crate.
pub const TRACING_TARGET: &str = "snapsight_store";
