//! Annotation endpoint client
//!
//! This module provides the HTTP client for the hosted callable
//! annotation function. Requests are serialized into the callable
//! `data` envelope and responses are unwrapped from its `result` /
//! `error` convention before the payload is handed back to the caller.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;
use serde_json::{Value, json};
use snapsight_core::annotate::{AnnotateBackend, AnnotateRequest};
use url::Url;

use crate::TRACING_TARGET_CLIENT;
use crate::config::VisionConfig;
use crate::error::{Error, Result};

/// HTTP client for the callable annotation function.
///
/// The client is cheap to clone and can be shared across tasks; the
/// underlying connection pool is reused between calls.
#[derive(Clone)]
pub struct VisionClient {
    http: reqwest::Client,
    config: VisionConfig,
    endpoint: Url,
}

impl VisionClient {
    /// Creates a new client from the given configuration.
    pub fn new(config: VisionConfig) -> Result<Self> {
        let endpoint = config.function_url()?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            http,
            config,
            endpoint,
        })
    }

    /// Returns the configuration this client was built from.
    pub fn config(&self) -> &VisionConfig {
        &self.config
    }

    /// Returns the resolved URL of the callable function.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Calls the annotation function and returns the raw result payload.
    ///
    /// The request is serialized to a JSON string and wrapped in the
    /// callable `data` envelope. The response body is parsed and the
    /// `result` payload extracted, with callable-level errors mapped to
    /// [`Error::Callable`].
    async fn invoke(
        &self,
        request: &AnnotateRequest,
        bearer_token: Option<&str>,
    ) -> Result<Value> {
        let data = serde_json::to_string(request).map_err(Error::Encode)?;

        let mut call = self.http.post(self.endpoint.clone()).json(&json!({ "data": data }));
        if let Some(token) = bearer_token {
            call = call.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        let response = call.send().await?;
        let status = response.status();
        let text = response.text().await?;
        let body: Value = serde_json::from_str(&text).map_err(Error::Decode)?;

        unwrap_result(status, body)
    }
}

/// Extracts the `result` payload from a callable response body.
///
/// An `error` object in the body takes precedence over the HTTP status,
/// so that structured callable errors keep their status code string.
fn unwrap_result(status: StatusCode, body: Value) -> Result<Value> {
    if let Some(error) = body.get("error") {
        let code = error
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or("UNKNOWN")
            .to_string();
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("Callable function call failed")
            .to_string();
        return Err(Error::callable(code, message));
    }

    if !status.is_success() {
        return Err(Error::callable(
            format!("HTTP_{}", status.as_u16()),
            format!("Callable endpoint returned status {status}"),
        ));
    }

    body.get("result").cloned().ok_or(Error::MissingResult)
}

#[async_trait]
impl AnnotateBackend for VisionClient {
    async fn annotate_image(
        &self,
        request: &AnnotateRequest,
        bearer_token: Option<&str>,
    ) -> snapsight_core::Result<Value> {
        let started = Instant::now();
        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            endpoint = %self.endpoint,
            authenticated = bearer_token.is_some(),
            "calling annotation function"
        );

        match self.invoke(request, bearer_token).await {
            Ok(envelope) => {
                tracing::debug!(
                    target: TRACING_TARGET_CLIENT,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "annotation call succeeded"
                );
                Ok(envelope)
            }
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET_CLIENT,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    error = %error,
                    "annotation call failed"
                );
                Err(error.into())
            }
        }
    }
}

impl std::fmt::Debug for VisionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisionClient")
            .field("endpoint", &self.endpoint.as_str())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unwrap_result_returns_payload() {
        let body = json!({ "result": [{ "labelAnnotations": [] }] });
        let payload = unwrap_result(StatusCode::OK, body).expect("Payload present");
        assert_eq!(payload, json!([{ "labelAnnotations": [] }]));
    }

    #[test]
    fn test_unwrap_result_maps_callable_error() {
        let body = json!({
            "error": { "status": "UNAUTHENTICATED", "message": "Missing credentials" }
        });

        let error = unwrap_result(StatusCode::UNAUTHORIZED, body).unwrap_err();
        match error {
            Error::Callable { status, message } => {
                assert_eq!(status, "UNAUTHENTICATED");
                assert_eq!(message, "Missing credentials");
            }
            other => panic!("Expected callable error, got {other:?}"),
        }
    }

    #[test]
    fn test_unwrap_result_error_over_status() {
        let body = json!({
            "error": { "status": "INTERNAL", "message": "Function crashed" }
        });

        // Structured error beats the success status code.
        let error = unwrap_result(StatusCode::OK, body).unwrap_err();
        assert!(matches!(error, Error::Callable { .. }));
    }

    #[test]
    fn test_unwrap_result_http_status_without_error() {
        let error = unwrap_result(StatusCode::BAD_GATEWAY, json!({})).unwrap_err();
        match error {
            Error::Callable { status, .. } => assert_eq!(status, "HTTP_502"),
            other => panic!("Expected callable error, got {other:?}"),
        }
    }

    #[test]
    fn test_unwrap_result_missing_result() {
        let error = unwrap_result(StatusCode::OK, json!({ "ok": true })).unwrap_err();
        assert!(matches!(error, Error::MissingResult));
    }

    #[test]
    fn test_client_debug_hides_config() {
        let config = VisionConfig::builder()
            .with_base_url("https://annotate.example.net")
            .expect("Valid URL")
            .with_api_key("secret-key")
            .build()
            .expect("Valid config");

        let client = VisionClient::new(config).expect("Valid client");
        let output = format!("{client:?}");
        assert!(output.contains("annotate.example.net"));
        assert!(!output.contains("secret-key"));
    }
}
