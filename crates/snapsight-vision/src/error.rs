//! Error types for snapsight-vision.

use snapsight_core::ErrorKind;
use thiserror::Error;

/// Callable error status reported when the session credential was
/// missing or rejected.
const STATUS_UNAUTHENTICATED: &str = "UNAUTHENTICATED";

/// Error type for the snapsight-vision library.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP transport errors from reqwest.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint URL construction failed.
    #[error("invalid endpoint: {0}")]
    Url(#[from] url::ParseError),

    /// Request payload could not be serialized.
    #[error("request encoding failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// Response body was not valid JSON.
    #[error("response decoding failed: {0}")]
    Decode(#[source] serde_json::Error),

    /// Successful response without a result field.
    #[error("callable response carries no result")]
    MissingResult,

    /// The callable endpoint reported an error.
    #[error("callable error {status}: {message}")]
    Callable {
        /// Status code string reported by the endpoint.
        status: String,
        /// Human-readable message reported by the endpoint.
        message: String,
    },

    /// Configuration errors.
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a callable error from the reported status and message.
    pub fn callable(status: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Callable {
            status: status.into(),
            message: message.into(),
        }
    }

    /// Returns true when the endpoint rejected the session credential.
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Callable { status, .. } if status == STATUS_UNAUTHENTICATED)
    }
}

impl From<Error> for snapsight_core::Error {
    fn from(error: Error) -> Self {
        let kind = match &error {
            Error::Http(source) if source.is_timeout() => ErrorKind::Timeout,
            Error::Http(_) => ErrorKind::RemoteCall,
            Error::Url(_) | Error::Config(_) => ErrorKind::Configuration,
            Error::Encode(_) => ErrorKind::Serialization,
            Error::Decode(_) | Error::MissingResult => ErrorKind::MalformedResponse,
            Error::Callable { .. } if error.is_unauthenticated() => ErrorKind::Authentication,
            Error::Callable { .. } => ErrorKind::RemoteCall,
        };

        let message = error.to_string();
        snapsight_core::Error::new(kind)
            .with_message(message)
            .with_source(error)
    }
}

/// Result type alias for snapsight-vision operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthenticated_maps_to_authentication() {
        let error = Error::callable("UNAUTHENTICATED", "missing credential");
        assert!(error.is_unauthenticated());

        let core: snapsight_core::Error = error.into();
        assert!(core.is_authentication());
    }

    #[test]
    fn test_other_callable_maps_to_remote_call() {
        let error = Error::callable("INTERNAL", "function crashed");
        assert!(!error.is_unauthenticated());

        let core: snapsight_core::Error = error.into();
        assert_eq!(core.kind(), ErrorKind::RemoteCall);
    }

    #[test]
    fn test_missing_result_maps_to_malformed_response() {
        let core: snapsight_core::Error = Error::MissingResult.into();
        assert!(core.is_malformed_response());
    }
}
