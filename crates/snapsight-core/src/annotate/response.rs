//! Normalized response types for the annotation endpoint.
//!
//! The service reply varies with the requested feature: fields that
//! were not asked for come back null or missing entirely. Normalization
//! maps that envelope into one stable in-memory shape so downstream
//! code never branches on wire-level absence.

use serde::{Deserialize, Serialize};

use super::{Error, Result};

/// Normalized result of one annotation call.
///
/// `label_annotations` is always present in memory; a null or missing
/// wire value is repaired to an empty list during normalization. An
/// absent `full_text_annotation` stays absent, since absence means no
/// text was detected, which is distinct from detected-but-empty text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotateImageResponse {
    /// Page-level text recognition result, absent when none was detected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_text_annotation: Option<TextAnnotation>,
    /// Detected labels in service order, empty when none.
    #[serde(default)]
    pub label_annotations: Vec<EntityAnnotation>,
}

/// Recognized page text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextAnnotation {
    /// Recognized text, with the service's own line breaks preserved.
    #[serde(default)]
    pub text: String,
}

/// One detected label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityAnnotation {
    /// Human-readable label description.
    #[serde(default)]
    pub description: String,
    /// Detection confidence reported by the service.
    #[serde(default)]
    pub score: f64,
}

/// Raw wire shape of one response object.
///
/// Kept separate from [`AnnotateImageResponse`] so the null-repair of
/// the label list is an explicit normalization step instead of a
/// deserializer side effect.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireResponse {
    #[serde(default)]
    full_text_annotation: Option<TextAnnotation>,
    #[serde(default)]
    label_annotations: Option<Vec<EntityAnnotation>>,
}

impl AnnotateImageResponse {
    /// Normalizes a raw response envelope.
    ///
    /// The envelope is a JSON array carrying the response object at
    /// index 0; trailing elements are ignored. A non-array envelope, an
    /// empty array, or an unparseable first element is a malformed
    /// response.
    pub fn from_envelope(envelope: &serde_json::Value) -> Result<Self> {
        let elements = envelope.as_array().ok_or_else(|| {
            Error::malformed_response().with_message("expected a response array envelope")
        })?;

        let first = elements.first().ok_or_else(|| {
            Error::malformed_response().with_message("response envelope is empty")
        })?;

        let wire: WireResponse = serde_json::from_value(first.clone()).map_err(|source| {
            Error::malformed_response()
                .with_message("response object does not match the annotation schema")
                .with_source(source)
        })?;

        Ok(Self {
            full_text_annotation: wire.full_text_annotation,
            // Null-repair: a null or missing label list becomes an
            // empty one here, never downstream.
            label_annotations: wire.label_annotations.unwrap_or_default(),
        })
    }

    /// Sets the recognized text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.full_text_annotation = Some(TextAnnotation::new(text));
        self
    }

    /// Sets the detected labels.
    pub fn with_labels(mut self, labels: Vec<EntityAnnotation>) -> Self {
        self.label_annotations = labels;
        self
    }

    /// Returns true when text was detected.
    pub fn has_text(&self) -> bool {
        self.full_text_annotation.is_some()
    }

    /// Returns true when at least one label was detected.
    pub fn has_labels(&self) -> bool {
        !self.label_annotations.is_empty()
    }
}

impl TextAnnotation {
    /// Creates a text annotation.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl EntityAnnotation {
    /// Creates a label annotation.
    pub fn new(description: impl Into<String>, score: f64) -> Self {
        Self {
            description: description.into(),
            score,
        }
    }
}
