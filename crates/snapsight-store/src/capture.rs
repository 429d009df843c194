//! Capture identifiers

use derive_more::{AsRef, Display};
use jiff::Zoned;
use serde::{Deserialize, Serialize};

/// Wall-clock pattern behind every capture id.
pub const CAPTURE_ID_FORMAT: &str = "%Y-%m-%d-%H-%M-%S-%3f";

/// Identifier shared by the photo, thumbnail and annotation record of
/// a single capture.
///
/// Ids are derived from the capture wall-clock time with millisecond
/// precision, so they sort chronologically as plain strings and double
/// as human-readable file names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(Display, AsRef, Serialize, Deserialize)]
#[as_ref(str)]
pub struct CaptureId(String);

impl CaptureId {
    /// Creates an id from the current wall-clock time.
    pub fn now() -> Self {
        Self::from_zoned(&Zoned::now())
    }

    /// Creates an id from the given zoned timestamp.
    pub fn from_zoned(zoned: &Zoned) -> Self {
        Self(zoned.strftime(CAPTURE_ID_FORMAT).to_string())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for CaptureId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for CaptureId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
