//! Annotation pipeline orchestration.
//!
//! This module provides the [`AnnotationGateway`], the one place where
//! a full annotation call is driven end to end: session check, image
//! encoding, request construction, a single timeout-guarded backend
//! call, normalization, and formatting.

use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use super::capability::Capability;
use super::outcome::AnnotateOutcome;
use super::response::AnnotateImageResponse;
use super::{AnnotateBackend, BoxedBackend, TRACING_TARGET};
use crate::auth::{Authenticator, BoxedAuthenticator};
use crate::encode::{BoxedEncoder, ImageEncoder};
use crate::error::{Error, Result};

/// Default upper bound on one remote annotation call.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(10);

/// Drives one annotation call end to end.
///
/// The gateway owns no transport of its own; the authenticator, the
/// encoder, and the backend are all injected. A call is a single
/// attempt: whatever fails, fails, and nothing is retried. The backend
/// call is the only suspension point bounded by the configured
/// timeout; an expired wait is abandoned and surfaces as a timeout
/// error, even if the service finishes the work on its side.
#[derive(Clone)]
pub struct AnnotationGateway {
    authenticator: BoxedAuthenticator,
    encoder: BoxedEncoder,
    backend: BoxedBackend,
    timeout: Duration,
}

impl std::fmt::Debug for AnnotationGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnnotationGateway")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl AnnotationGateway {
    /// Creates a gateway with the default call timeout.
    pub fn new(
        authenticator: impl Authenticator + 'static,
        encoder: impl ImageEncoder + 'static,
        backend: impl AnnotateBackend + 'static,
    ) -> Self {
        Self::from_shared(Arc::new(authenticator), Arc::new(encoder), Arc::new(backend))
    }

    /// Creates a gateway from already-shared collaborators.
    pub fn from_shared(
        authenticator: BoxedAuthenticator,
        encoder: BoxedEncoder,
        backend: BoxedBackend,
    ) -> Self {
        Self {
            authenticator,
            encoder,
            backend,
            timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    /// Sets the upper bound on one backend call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the configured call timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Annotates one image with the given capability.
    ///
    /// The normalized response rides along in the outcome even when
    /// formatting finds nothing usable; "no result" is an outcome, not
    /// an error.
    pub async fn annotate(&self, image: &[u8], capability: Capability) -> Result<AnnotateOutcome> {
        let call_id = Uuid::now_v7();

        self.ensure_signed_in().await?;

        let content = self.encoder.encode(image);
        let request = capability.build_request(content);
        let token = self.authenticator.bearer_token().await;

        tracing::debug!(
            target: TRACING_TARGET,
            call_id = %call_id,
            capability = %capability,
            image_bytes = image.len(),
            "invoking annotation backend"
        );

        let call = self.backend.annotate_image(&request, token.as_deref());
        let envelope = match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result?,
            Err(_) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    call_id = %call_id,
                    capability = %capability,
                    timeout_ms = self.timeout.as_millis(),
                    "annotation call timed out"
                );

                return Err(Error::timeout()
                    .with_message("annotation call exceeded the configured timeout"));
            }
        };

        let response = AnnotateImageResponse::from_envelope(&envelope)?;
        let outcome = AnnotateOutcome::new(capability, response);

        tracing::debug!(
            target: TRACING_TARGET,
            call_id = %call_id,
            capability = %capability,
            labels = outcome.response.label_annotations.len(),
            has_text = outcome.response.has_text(),
            has_caption = outcome.has_caption(),
            "annotation call completed"
        );

        Ok(outcome)
    }

    /// Establishes the session when none is present.
    ///
    /// The check and the sign-in are not atomic; concurrent callers may
    /// both sign in, which is harmless because sign-in is idempotent.
    async fn ensure_signed_in(&self) -> Result<()> {
        if !self.authenticator.is_authenticated().await {
            tracing::debug!(
                target: TRACING_TARGET,
                "no active session, signing in"
            );
            self.authenticator.sign_in().await?;
        }

        Ok(())
    }
}
