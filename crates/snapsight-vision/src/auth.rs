//! Identity endpoint authenticators
//!
//! This module implements the session side of the annotation flow: an
//! anonymous authenticator that signs up against the identity endpoint
//! and caches the issued token until shortly before expiry, plus a
//! static authenticator for endpoints that take a fixed token or none.

use async_trait::async_trait;
use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use snapsight_core::Authenticator;
use tokio::sync::RwLock;
use url::Url;

use crate::TRACING_TARGET_AUTH;
use crate::config::VisionConfig;
use crate::error::{Error, Result};

/// Fallback session lifetime when the identity endpoint reports none.
const DEFAULT_SESSION_SECONDS: i64 = 3600;

/// Sessions this close to expiry are treated as expired so a token is
/// never attached to a call that may outlive it.
const EXPIRY_MARGIN: SignedDuration = SignedDuration::from_secs(60);

/// An anonymous identity session issued by the sign-up endpoint.
#[derive(Debug, Clone)]
struct Session {
    id_token: String,
    local_id: String,
    expires_at: Timestamp,
}

impl Session {
    fn from_response(response: SignUpResponse, now: Timestamp) -> Self {
        let seconds = response
            .expires_in
            .parse::<i64>()
            .unwrap_or(DEFAULT_SESSION_SECONDS);
        let expires_at = now
            .checked_add(SignedDuration::from_secs(seconds))
            .unwrap_or(Timestamp::MAX);

        Self {
            id_token: response.id_token,
            local_id: response.local_id,
            expires_at,
        }
    }

    fn is_valid_at(&self, now: Timestamp) -> bool {
        now.checked_add(EXPIRY_MARGIN)
            .map(|at| self.expires_at > at)
            .unwrap_or(false)
    }
}

/// Anonymous sign-up request body.
#[derive(Debug, Serialize)]
struct SignUpRequest {
    #[serde(rename = "returnSecureToken")]
    return_secure_token: bool,
}

impl Default for SignUpRequest {
    fn default() -> Self {
        Self {
            return_secure_token: true,
        }
    }
}

/// Anonymous sign-up response body.
///
/// The identity endpoint reports the session lifetime as a string of
/// seconds rather than a number.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignUpResponse {
    id_token: String,
    #[serde(default)]
    local_id: String,
    #[serde(default)]
    expires_in: String,
}

/// Authenticator backed by anonymous identity endpoint sessions.
///
/// Sign-in creates a fresh anonymous account and caches its token; the
/// cached session is reused until it nears expiry. Signing in again is
/// always safe since each call simply replaces the cached session, so
/// concurrent callers racing through a session check cannot corrupt it.
pub struct AnonymousAuthenticator {
    http: reqwest::Client,
    sign_up_url: Url,
    session: RwLock<Option<Session>>,
}

impl AnonymousAuthenticator {
    /// Creates an authenticator for the configured identity endpoint.
    pub fn from_config(config: &VisionConfig) -> Result<Self> {
        let sign_up_url = config.sign_up_url()?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            http,
            sign_up_url,
            session: RwLock::new(None),
        })
    }

    async fn request_session(&self) -> Result<Session> {
        let response = self
            .http
            .post(self.sign_up_url.clone())
            .json(&SignUpRequest::default())
            .send()
            .await?;

        let text = response.text().await?;
        let body: Value = serde_json::from_str(&text).map_err(Error::Decode)?;

        if let Some(error) = body.get("error") {
            let code = error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("UNKNOWN")
                .to_string();
            let message = format!("Identity endpoint rejected anonymous sign-up: {code}");
            return Err(Error::callable(code, message));
        }

        let response: SignUpResponse = serde_json::from_value(body).map_err(Error::Decode)?;
        Ok(Session::from_response(response, Timestamp::now()))
    }
}

#[async_trait]
impl Authenticator for AnonymousAuthenticator {
    async fn is_authenticated(&self) -> bool {
        self.session
            .read()
            .await
            .as_ref()
            .is_some_and(|session| session.is_valid_at(Timestamp::now()))
    }

    async fn sign_in(&self) -> snapsight_core::Result<()> {
        match self.request_session().await {
            Ok(session) => {
                tracing::debug!(
                    target: TRACING_TARGET_AUTH,
                    local_id = %session.local_id,
                    expires_at = %session.expires_at,
                    "anonymous sign-in succeeded"
                );
                *self.session.write().await = Some(session);
                Ok(())
            }
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET_AUTH,
                    error = %error,
                    "anonymous sign-in failed"
                );
                Err(match error {
                    // Any structured rejection of the sign-up call is an
                    // authentication failure, whatever its status code.
                    Error::Callable { status, message } => snapsight_core::Error::authentication()
                        .with_message(format!("{status}: {message}")),
                    other => other.into(),
                })
            }
        }
    }

    async fn bearer_token(&self) -> Option<String> {
        let now = Timestamp::now();
        self.session
            .read()
            .await
            .as_ref()
            .filter(|session| session.is_valid_at(now))
            .map(|session| session.id_token.clone())
    }
}

impl std::fmt::Debug for AnonymousAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnonymousAuthenticator")
            .field("sign_up_url", &self.sign_up_url.as_str())
            .finish_non_exhaustive()
    }
}

/// Authenticator with a fixed token, or none at all.
///
/// Useful for endpoints that accept unauthenticated calls and for
/// wiring pre-issued tokens through without a sign-in round trip.
#[derive(Debug, Clone, Default)]
pub struct StaticAuthenticator {
    token: Option<String>,
}

impl StaticAuthenticator {
    /// Creates an authenticator that never attaches a token.
    pub fn anonymous() -> Self {
        Self { token: None }
    }

    /// Creates an authenticator with a fixed bearer token.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }
}

#[async_trait]
impl Authenticator for StaticAuthenticator {
    async fn is_authenticated(&self) -> bool {
        true
    }

    async fn sign_in(&self) -> snapsight_core::Result<()> {
        Ok(())
    }

    async fn bearer_token(&self) -> Option<String> {
        self.token.clone()
    }
}
