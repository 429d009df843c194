//! Request payload types for the annotation endpoint.

use serde::{Deserialize, Serialize};

/// Request payload for one image annotation call.
///
/// Serializes to the wire shape the hosted annotation function expects:
/// one encoded image and exactly one feature entry. Construction is
/// pure; the encoded content is not validated here, a bad payload
/// surfaces as a rejection from the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotateRequest {
    /// Image to annotate.
    pub image: ImagePayload,
    /// Requested features, always exactly one entry.
    pub features: Vec<Feature>,
}

/// Encoded image carried by a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePayload {
    /// Base64-encoded image bytes.
    pub content: String,
}

/// One requested annotation feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    /// Wire descriptor of the feature.
    #[serde(rename = "type")]
    pub feature_type: String,
    /// Upper bound on returned results, omitted when unbounded.
    #[serde(rename = "maxResults", skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
}

impl AnnotateRequest {
    /// Creates a request carrying one image and one feature.
    pub fn new(content: impl Into<String>, feature: Feature) -> Self {
        Self {
            image: ImagePayload {
                content: content.into(),
            },
            features: vec![feature],
        }
    }

    /// Returns the encoded image content.
    pub fn content(&self) -> &str {
        &self.image.content
    }

    /// Returns the requested feature.
    pub fn feature(&self) -> Option<&Feature> {
        self.features.first()
    }
}

impl Feature {
    /// Creates a feature entry.
    pub fn new(feature_type: impl Into<String>, max_results: Option<u32>) -> Self {
        Self {
            feature_type: feature_type.into(),
            max_results,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::annotate::Capability;

    #[test]
    fn test_object_request_wire_shape() {
        let request = Capability::Object.build_request("abc123");
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(
            value,
            json!({
                "image": { "content": "abc123" },
                "features": [ { "type": "LABEL_DETECTION", "maxResults": 3 } ]
            })
        );
    }

    #[test]
    fn test_text_request_omits_max_results() {
        let request = Capability::Text.build_request("abc123");
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(
            value,
            json!({
                "image": { "content": "abc123" },
                "features": [ { "type": "TEXT_DETECTION" } ]
            })
        );
    }

    #[test]
    fn test_request_round_trip() {
        let request = Capability::Object.build_request("abc123");
        let serialized = serde_json::to_string(&request).unwrap();
        let deserialized: AnnotateRequest = serde_json::from_str(&serialized).unwrap();

        assert_eq!(deserialized, request);
        assert_eq!(deserialized.content(), "abc123");
        let feature = deserialized.feature().unwrap();
        assert_eq!(feature.feature_type, "LABEL_DETECTION");
        assert_eq!(feature.max_results, Some(3));
    }

    #[test]
    fn test_single_feature_entry() {
        let request = Capability::Text.build_request("abc123");
        assert_eq!(request.features.len(), 1);
    }
}
