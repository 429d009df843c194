//! Outcome of a completed annotation call.

use serde::{Deserialize, Serialize};

use super::capability::Capability;
use super::response::AnnotateImageResponse;

/// Result of one annotation call, normalized and formatted.
///
/// Carries the normalized response alongside the formatted caption:
/// the response is what gets persisted, the caption is what gets
/// shown. A response with nothing usable still yields an outcome, not
/// an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotateOutcome {
    /// Capability the image was annotated with.
    pub capability: Capability,
    /// Normalized service response.
    pub response: AnnotateImageResponse,
    /// Formatted caption, absent when the response held nothing usable.
    pub caption: Option<String>,
}

impl AnnotateOutcome {
    /// Creates an outcome by formatting the response for the capability.
    pub fn new(capability: Capability, response: AnnotateImageResponse) -> Self {
        let caption = capability.format(&response);
        Self {
            capability,
            response,
            caption,
        }
    }

    /// Returns true when formatting produced a caption.
    pub fn has_caption(&self) -> bool {
        self.caption.is_some()
    }

    /// Message for display: the caption, or the not-found line.
    pub fn display_message(&self) -> String {
        match &self.caption {
            Some(caption) => caption.clone(),
            None => format!("No {} result found", self.capability.identifier()),
        }
    }
}
