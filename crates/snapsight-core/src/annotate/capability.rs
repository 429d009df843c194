//! Annotation capability variants and their wire policies.
//!
//! This module provides the [`Capability`] enum, the closed set of
//! annotations the pipeline can request. Each variant owns its wire
//! feature descriptor, its result bound, and the formatting of a
//! normalized response into a display caption.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use super::request::{AnnotateRequest, Feature};
use super::response::AnnotateImageResponse;

/// Upper bound on labels requested for object detection.
pub const MAX_LABEL_RESULTS: u32 = 3;

/// One annotation capability of the pipeline.
///
/// The set is closed: a request always carries exactly one of these,
/// and dispatch is by identifier, never by ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, EnumString, EnumIter, IntoStaticStr)]
#[derive(Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    /// Full-page text recognition.
    Text,
    /// Object label detection.
    Object,
}

impl Capability {
    /// Stable identifier of this capability.
    ///
    /// Used for selector matching and interpolated into user-facing
    /// messages.
    pub fn identifier(&self) -> &'static str {
        (*self).into()
    }

    /// Wire descriptor for the feature entry of this capability.
    pub fn feature_type(&self) -> &'static str {
        match self {
            Self::Text => "TEXT_DETECTION",
            Self::Object => "LABEL_DETECTION",
        }
    }

    /// Result bound requested from the service, when bounded.
    ///
    /// Text recognition is unbounded; label detection asks for at most
    /// [`MAX_LABEL_RESULTS`] entries.
    pub fn max_results(&self) -> Option<u32> {
        match self {
            Self::Text => None,
            Self::Object => Some(MAX_LABEL_RESULTS),
        }
    }

    /// Builds the request payload for this capability.
    ///
    /// `content` is the already-encoded image. The payload always
    /// carries exactly one feature entry.
    pub fn build_request(&self, content: impl Into<String>) -> AnnotateRequest {
        AnnotateRequest::new(content, Feature::new(self.feature_type(), self.max_results()))
    }

    /// Formats a normalized response into a display caption.
    ///
    /// Returns `None` when the response carries nothing usable for this
    /// capability: no text annotation for [`Capability::Text`], no
    /// labels for [`Capability::Object`]. An empty recognized text is
    /// still a caption; only absence yields `None`.
    pub fn format(&self, response: &AnnotateImageResponse) -> Option<String> {
        match self {
            Self::Text => response
                .full_text_annotation
                .as_ref()
                .map(|annotation| annotation.text.clone()),
            Self::Object => {
                if response.label_annotations.is_empty() {
                    return None;
                }

                let labels = response
                    .label_annotations
                    .iter()
                    .map(|label| label.description.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");

                Some(labels)
            }
        }
    }

    /// Resolves a capability from its identifier.
    ///
    /// Matching is exact; anything else resolves to `None` rather than
    /// an error, since an unmatched selector is a legitimate no-op
    /// state for callers.
    pub fn for_identifier(identifier: &str) -> Option<Self> {
        Self::iter().find(|capability| capability.identifier() == identifier)
    }

    /// Returns the identifiers of every capability, in declaration order.
    pub fn identifiers() -> impl Iterator<Item = &'static str> {
        Self::iter().map(|capability| capability.identifier())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::response::{EntityAnnotation, TextAnnotation};

    fn labeled_response() -> AnnotateImageResponse {
        AnnotateImageResponse {
            full_text_annotation: None,
            label_annotations: vec![
                EntityAnnotation::new("Street", 0.87294734),
                EntityAnnotation::new("Snapshot", 0.8523099),
                EntityAnnotation::new("Town", 0.8481104),
            ],
        }
    }

    #[test]
    fn test_identifier_display() {
        assert_eq!(Capability::Text.to_string(), "text");
        assert_eq!(Capability::Object.to_string(), "object");
        assert_eq!(Capability::Text.identifier(), "text");
        assert_eq!(Capability::Object.as_ref(), "object");
    }

    #[test]
    fn test_feature_descriptors() {
        assert_eq!(Capability::Text.feature_type(), "TEXT_DETECTION");
        assert_eq!(Capability::Object.feature_type(), "LABEL_DETECTION");
    }

    #[test]
    fn test_max_results_policy() {
        assert_eq!(Capability::Text.max_results(), None);
        assert_eq!(Capability::Object.max_results(), Some(3));
    }

    #[test]
    fn test_for_identifier_resolves_variants() {
        assert_eq!(Capability::for_identifier("text"), Some(Capability::Text));
        assert_eq!(
            Capability::for_identifier("object"),
            Some(Capability::Object)
        );
    }

    #[test]
    fn test_for_identifier_rejects_unknown() {
        assert_eq!(Capability::for_identifier("label"), None);
        assert_eq!(Capability::for_identifier("TEXT"), None);
        assert_eq!(Capability::for_identifier(""), None);
    }

    #[test]
    fn test_identifiers_cover_all_variants() {
        let identifiers: Vec<_> = Capability::identifiers().collect();
        assert_eq!(identifiers, vec!["text", "object"]);
    }

    #[test]
    fn test_format_text_passes_through_verbatim() {
        let response = AnnotateImageResponse {
            full_text_annotation: Some(TextAnnotation::new(
                "WAITING?\nPLEASE\nTURN OFF\nYOUR\nENGINE\n",
            )),
            label_annotations: Vec::new(),
        };

        assert_eq!(
            Capability::Text.format(&response).as_deref(),
            Some("WAITING?\nPLEASE\nTURN OFF\nYOUR\nENGINE\n")
        );
    }

    #[test]
    fn test_format_text_absent_is_none() {
        let response = AnnotateImageResponse::default();
        assert_eq!(Capability::Text.format(&response), None);
    }

    #[test]
    fn test_format_text_empty_is_still_a_caption() {
        let response = AnnotateImageResponse {
            full_text_annotation: Some(TextAnnotation::new("")),
            label_annotations: Vec::new(),
        };

        assert_eq!(Capability::Text.format(&response).as_deref(), Some(""));
    }

    #[test]
    fn test_format_object_joins_labels_in_order() {
        assert_eq!(
            Capability::Object.format(&labeled_response()).as_deref(),
            Some("Street, Snapshot, Town")
        );
    }

    #[test]
    fn test_format_object_empty_is_none() {
        let response = AnnotateImageResponse::default();
        assert_eq!(Capability::Object.format(&response), None);
    }

    #[test]
    fn test_serialization() {
        let capability = Capability::Object;
        let serialized = serde_json::to_string(&capability).unwrap();
        assert_eq!(serialized, "\"object\"");

        let deserialized: Capability = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, capability);
    }
}
