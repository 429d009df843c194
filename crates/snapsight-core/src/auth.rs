//! Session authentication seam.

use std::sync::Arc;

use crate::error::Result;

/// Type alias for a shared authenticator.
pub type BoxedAuthenticator = Arc<dyn Authenticator>;

/// Session management for the annotation backend.
///
/// Implementations own whatever session state the backend requires.
/// Callers check the session and establish it when missing; the check
/// and the sign-in are separate calls, so two concurrent callers may
/// both sign in. Sign-in is required to be idempotent, which makes
/// that race harmless.
#[async_trait::async_trait]
pub trait Authenticator: Send + Sync {
    /// Returns true when a usable session is present.
    async fn is_authenticated(&self) -> bool;

    /// Establishes a session.
    ///
    /// Calling this while already signed in must be safe.
    async fn sign_in(&self) -> Result<()>;

    /// Returns the credential to attach to backend calls, if any.
    async fn bearer_token(&self) -> Option<String>;
}
