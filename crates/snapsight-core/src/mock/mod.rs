//! Mock collaborators for testing the annotation pipeline.
//!
//! This module provides scripted implementations of the pipeline seams
//! ([`AnnotateBackend`], [`Authenticator`], [`ImageEncoder`]) that
//! return canned results and record how they were called.
//!
//! # Feature Flag
//!
//! This module is only available when the `test-utils` feature is enabled:
//!
//! ```toml
//! [dev-dependencies]
//! snapsight-core = { version = "...", features = ["test-utils"] }
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use snapsight_core::annotate::AnnotationGateway;
//! use snapsight_core::mock::{MockAuthenticator, MockBackend, MockEncoder};
//!
//! let gateway = AnnotationGateway::new(
//!     MockAuthenticator::signed_in(),
//!     MockEncoder::default(),
//!     MockBackend::with_envelope(serde_json::json!([{}])),
//! );
//! ```

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::annotate::{AnnotateBackend, AnnotateRequest};
use crate::auth::Authenticator;
use crate::encode::ImageEncoder;
use crate::error::{Error, ErrorKind, Result};

/// Configuration for the mock backend.
///
/// Describes the canned response the backend should produce, suitable
/// for wiring an offline pipeline from CLI flags.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct MockConfig {
    /// Recognized text to return for text annotation requests.
    #[cfg_attr(feature = "config", arg(long = "mock-text", env = "MOCK_TEXT"))]
    #[serde(default)]
    pub mock_text: Option<String>,

    /// Label descriptions to return for object annotation requests.
    #[cfg_attr(
        feature = "config",
        arg(long = "mock-labels", env = "MOCK_LABELS", value_delimiter = ',')
    )]
    #[serde(default)]
    pub mock_labels: Option<Vec<String>>,
}

impl MockConfig {
    /// Returns true when a canned response has been configured.
    pub fn is_configured(&self) -> bool {
        self.mock_text.is_some() || self.mock_labels.is_some()
    }

    /// Converts this configuration into a backend serving the canned
    /// response.
    ///
    /// With neither text nor labels configured the backend answers with
    /// an empty response object, which normalizes to a no-result
    /// outcome.
    pub fn into_backend(self) -> MockBackend {
        let mut object = serde_json::Map::new();

        if let Some(text) = self.mock_text {
            object.insert("fullTextAnnotation".to_string(), json!({ "text": text }));
        }

        if let Some(labels) = self.mock_labels {
            let entries = labels
                .iter()
                .map(|label| json!({ "description": label, "score": 0.9 }))
                .collect::<Vec<_>>();
            object.insert("labelAnnotations".to_string(), Value::Array(entries));
        }

        MockBackend::with_envelope(Value::Array(vec![Value::Object(object)]))
    }
}

/// What the scripted backend does when called.
#[derive(Debug)]
enum Script {
    /// Answer with a canned envelope.
    Envelope(Value),
    /// Fail with the given error kind.
    Fail(ErrorKind),
    /// Never resolve, for timeout tests.
    Hang,
}

/// Scripted annotation backend.
///
/// Records every request and bearer token it receives.
#[derive(Debug)]
pub struct MockBackend {
    script: Script,
    requests: Mutex<Vec<AnnotateRequest>>,
    tokens: Mutex<Vec<Option<String>>>,
    calls: AtomicUsize,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::with_envelope(json!([{}]))
    }
}

impl MockBackend {
    fn with_script(script: Script) -> Self {
        Self {
            script,
            requests: Mutex::new(Vec::new()),
            tokens: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Creates a backend answering every call with the given envelope.
    pub fn with_envelope(envelope: Value) -> Self {
        Self::with_script(Script::Envelope(envelope))
    }

    /// Creates a backend failing every call with the given error kind.
    pub fn failing(kind: ErrorKind) -> Self {
        Self::with_script(Script::Fail(kind))
    }

    /// Creates a backend whose calls never resolve.
    pub fn never_resolving() -> Self {
        Self::with_script(Script::Hang)
    }

    /// Returns how many times the backend was called.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Returns the requests received so far.
    pub fn requests(&self) -> Vec<AnnotateRequest> {
        self.requests.lock().expect("mock state poisoned").clone()
    }

    /// Returns the bearer tokens received so far.
    pub fn tokens(&self) -> Vec<Option<String>> {
        self.tokens.lock().expect("mock state poisoned").clone()
    }
}

#[async_trait::async_trait]
impl AnnotateBackend for MockBackend {
    async fn annotate_image(
        &self,
        request: &AnnotateRequest,
        bearer_token: Option<&str>,
    ) -> Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .expect("mock state poisoned")
            .push(request.clone());
        self.tokens
            .lock()
            .expect("mock state poisoned")
            .push(bearer_token.map(str::to_string));

        match &self.script {
            Script::Envelope(envelope) => Ok(envelope.clone()),
            Script::Fail(kind) => Err(Error::new(*kind).with_message("scripted failure")),
            Script::Hang => std::future::pending().await,
        }
    }
}

/// Scripted session authenticator.
///
/// Tracks sign-in calls and flips to authenticated on a successful
/// sign-in, like a real session would.
#[derive(Debug, Default)]
pub struct MockAuthenticator {
    authenticated: AtomicBool,
    fail_sign_in: bool,
    token: Option<String>,
    sign_in_calls: AtomicUsize,
}

impl MockAuthenticator {
    /// Creates an authenticator with an established session.
    pub fn signed_in() -> Self {
        Self {
            authenticated: AtomicBool::new(true),
            ..Default::default()
        }
    }

    /// Creates an authenticator without a session.
    pub fn signed_out() -> Self {
        Self::default()
    }

    /// Creates an authenticator whose sign-in always fails.
    pub fn failing() -> Self {
        Self {
            fail_sign_in: true,
            ..Default::default()
        }
    }

    /// Sets the bearer token handed out while authenticated.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Returns how many times sign-in was attempted.
    pub fn sign_in_calls(&self) -> usize {
        self.sign_in_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Authenticator for MockAuthenticator {
    async fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::SeqCst)
    }

    async fn sign_in(&self) -> Result<()> {
        self.sign_in_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_sign_in {
            return Err(Error::authentication().with_message("scripted sign-in failure"));
        }

        self.authenticated.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn bearer_token(&self) -> Option<String> {
        if self.authenticated.load(Ordering::SeqCst) {
            self.token.clone()
        } else {
            None
        }
    }
}

/// Encoder returning a fixed string.
#[derive(Debug)]
pub struct MockEncoder {
    output: String,
    calls: AtomicUsize,
}

impl Default for MockEncoder {
    fn default() -> Self {
        Self::returning("bW9jaw==")
    }
}

impl MockEncoder {
    /// Creates an encoder returning the given output for every call.
    pub fn returning(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Returns how many times the encoder was called.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ImageEncoder for MockEncoder {
    fn encode(&self, _image: &[u8]) -> String {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.output.clone()
    }
}
