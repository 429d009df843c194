//! Image annotation abstractions.
//!
//! This module provides the closed set of annotation capabilities, the
//! wire request and normalized response types, and the gateway that
//! orchestrates a single annotation call against an injected backend.

use std::sync::Arc;

pub mod capability;
pub mod gateway;
pub mod outcome;
pub mod request;
pub mod response;

pub use capability::Capability;
pub use gateway::AnnotationGateway;
pub use outcome::AnnotateOutcome;
pub use request::{AnnotateRequest, Feature, ImagePayload};
pub use response::{AnnotateImageResponse, EntityAnnotation, TextAnnotation};

pub use crate::{Error, ErrorKind, Result};

/// Type alias for a shared annotation backend.
pub type BoxedBackend = Arc<dyn AnnotateBackend>;

/// Tracing target for annotation operations.
pub const TRACING_TARGET: &str = "snapsight_core::annotate";

/// Transport seam for the hosted annotation function.
///
/// Implementations submit one request and hand back the raw response
/// envelope exactly as the service returned it. Envelope validation and
/// normalization happen in the caller, keeping every transport equally
/// dumb.
#[async_trait::async_trait]
pub trait AnnotateBackend: Send + Sync {
    /// Submits one annotation request and returns the raw envelope.
    ///
    /// The bearer token, when present, is the session credential to
    /// attach to the call.
    async fn annotate_image(
        &self,
        request: &AnnotateRequest,
        bearer_token: Option<&str>,
    ) -> Result<serde_json::Value>;
}
