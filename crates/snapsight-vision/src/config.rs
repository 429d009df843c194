//! Vision client configuration
//!
//! This module provides configuration structures and builders for the
//! annotation endpoint client: [`VisionConfig`] carries everything the
//! client and the session authenticator need, while [`ConnectConfig`]
//! is the thin CLI-facing form that converts into it.

use std::sync::Arc;
use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use snapsight_core::BoxedAuthenticator;
use url::Url;

use crate::auth::{AnonymousAuthenticator, StaticAuthenticator};
use crate::client::VisionClient;
use crate::error::{Error, Result};

/// Name of the callable annotation function.
pub const DEFAULT_FUNCTION: &str = "annotateImage";

/// Configuration for the annotation endpoint client
///
/// Contains all the settings needed to reach the hosted callable
/// function and the identity endpoint used for anonymous sessions.
#[derive(Debug, Clone, Builder)]
#[builder(
    name = "VisionBuilder",
    pattern = "owned",
    setter(into, strip_option, prefix = "with"),
    build_fn(validate = "Self::validate_config")
)]
pub struct VisionConfig {
    /// Base URL of the hosted functions endpoint
    #[builder(setter(custom))]
    pub base_url: Url,
    /// Name of the callable annotation function
    #[builder(default = "DEFAULT_FUNCTION.to_string()")]
    pub function: String,
    /// Identity endpoint used for anonymous sign-in
    #[builder(default = "VisionConfig::default_auth_url()")]
    pub auth_url: Url,
    /// API key appended to identity endpoint calls
    #[builder(default)]
    pub api_key: Option<String>,
    /// Request timeout duration
    #[builder(default = "Duration::from_secs(30)")]
    pub timeout: Duration,
    /// Connection timeout duration
    #[builder(default = "Duration::from_secs(10)")]
    pub connect_timeout: Duration,
    /// User agent string for requests
    #[builder(default = "VisionConfig::default_user_agent()")]
    pub user_agent: String,
}

impl VisionConfig {
    /// Create a new configuration builder
    pub fn builder() -> VisionBuilder {
        VisionBuilder::default()
    }

    fn default_auth_url() -> Url {
        "https://identitytoolkit.googleapis.com"
            .parse()
            .expect("Valid default URL")
    }

    fn default_user_agent() -> String {
        format!("snapsight-vision/{}", env!("CARGO_PKG_VERSION"))
    }

    /// Returns the full URL of the callable annotation function.
    ///
    /// The function name is joined onto the base URL, so a base URL
    /// with a path must end in a trailing slash to keep that path.
    pub fn function_url(&self) -> Result<Url> {
        Ok(self.base_url.join(&self.function)?)
    }

    /// Returns the anonymous sign-up URL of the identity endpoint.
    pub fn sign_up_url(&self) -> Result<Url> {
        let mut url = self.auth_url.join("v1/accounts:signUp")?;
        if let Some(key) = &self.api_key {
            url.query_pairs_mut().append_pair("key", key);
        }
        Ok(url)
    }

    /// Converts this configuration into an annotation client.
    pub fn into_client(self) -> Result<VisionClient> {
        VisionClient::new(self)
    }

    /// Builds the authenticator matching this configuration.
    ///
    /// With an API key present this is the anonymous session
    /// authenticator; without one the endpoint is assumed to accept
    /// unauthenticated calls and a static authenticator is used.
    pub fn authenticator(&self) -> Result<BoxedAuthenticator> {
        match &self.api_key {
            Some(_) => Ok(Arc::new(AnonymousAuthenticator::from_config(self)?)),
            None => Ok(Arc::new(StaticAuthenticator::anonymous())),
        }
    }
}

impl VisionBuilder {
    /// Set the base URL of the hosted functions endpoint
    pub fn with_base_url(mut self, url: &str) -> Result<Self> {
        self.base_url =
            Some(url.parse().map_err(|e| {
                Error::invalid_config(format!("Invalid base URL '{}': {}", url, e))
            })?);
        Ok(self)
    }

    fn validate_config(&self) -> std::result::Result<(), String> {
        if let Some(timeout) = &self.timeout {
            if timeout.as_secs() == 0 {
                return Err("Timeout must be greater than 0".to_string());
            }
        }

        if let Some(connect_timeout) = &self.connect_timeout {
            if connect_timeout.as_secs() == 0 {
                return Err("Connect timeout must be greater than 0".to_string());
            }
        }

        if let Some(function) = &self.function {
            if function.is_empty() {
                return Err("Function name must not be empty".to_string());
            }
        }

        Ok(())
    }
}

/// CLI-facing configuration for the annotation endpoint.
///
/// This is the flat form meant to be flattened into a clap command;
/// [`ConnectConfig::into_config`] turns it into a full [`VisionConfig`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct ConnectConfig {
    /// Base URL of the hosted functions endpoint
    #[cfg_attr(feature = "config", arg(long = "vision-url", env = "VISION_URL"))]
    #[serde(default)]
    pub vision_url: Option<Url>,

    /// Name of the callable annotation function
    #[cfg_attr(
        feature = "config",
        arg(
            long = "vision-function",
            env = "VISION_FUNCTION",
            default_value = DEFAULT_FUNCTION
        )
    )]
    #[serde(default = "default_function")]
    pub vision_function: String,

    /// Identity endpoint used for anonymous sign-in
    #[cfg_attr(
        feature = "config",
        arg(
            long = "auth-url",
            env = "AUTH_URL",
            default_value = "https://identitytoolkit.googleapis.com"
        )
    )]
    #[serde(default = "default_auth_url")]
    pub auth_url: Url,

    /// API key for the identity endpoint; omit for endpoints that
    /// accept unauthenticated calls
    #[cfg_attr(feature = "config", arg(long = "api-key", env = "VISION_API_KEY"))]
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_function() -> String {
    DEFAULT_FUNCTION.to_string()
}

fn default_auth_url() -> Url {
    "https://identitytoolkit.googleapis.com"
        .parse()
        .expect("Valid default URL")
}

impl ConnectConfig {
    /// Converts this CLI configuration into a full client configuration.
    pub fn into_config(self) -> Result<VisionConfig> {
        let vision_url = self.vision_url.ok_or_else(|| {
            Error::invalid_config("Vision endpoint URL is required (--vision-url or VISION_URL)")
        })?;

        let mut builder = VisionConfig::builder()
            .with_base_url(vision_url.as_str())?
            .with_function(self.vision_function)
            .with_auth_url(self.auth_url);

        if let Some(key) = self.api_key {
            builder = builder.with_api_key(key);
        }

        builder
            .build()
            .map_err(|e| Error::invalid_config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder_defaults() {
        let config = VisionConfig::builder()
            .with_base_url("https://annotate.example.net")
            .expect("Valid URL")
            .build()
            .expect("Valid config");

        assert_eq!(config.base_url.as_str(), "https://annotate.example.net/");
        assert_eq!(config.function, "annotateImage");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.api_key, None);
        assert!(config.user_agent.contains("snapsight-vision"));
    }

    #[test]
    fn test_invalid_base_url() {
        let result = VisionConfig::builder().with_base_url("not-a-valid-url");
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_zero_timeout() {
        let result = VisionConfig::builder()
            .with_base_url("https://annotate.example.net")
            .expect("Valid URL")
            .with_timeout(Duration::from_secs(0))
            .build();

        assert!(result.is_err());
    }

    #[test]
    fn test_validation_empty_function() {
        let result = VisionConfig::builder()
            .with_base_url("https://annotate.example.net")
            .expect("Valid URL")
            .with_function("")
            .build();

        assert!(result.is_err());
    }

    #[test]
    fn test_function_url_join() {
        let config = VisionConfig::builder()
            .with_base_url("https://annotate.example.net")
            .expect("Valid URL")
            .build()
            .expect("Valid config");

        assert_eq!(
            config.function_url().unwrap().as_str(),
            "https://annotate.example.net/annotateImage"
        );
    }

    #[test]
    fn test_sign_up_url_carries_key() {
        let config = VisionConfig::builder()
            .with_base_url("https://annotate.example.net")
            .expect("Valid URL")
            .with_api_key("test-key")
            .build()
            .expect("Valid config");

        assert_eq!(
            config.sign_up_url().unwrap().as_str(),
            "https://identitytoolkit.googleapis.com/v1/accounts:signUp?key=test-key"
        );
    }

    #[test]
    fn test_sign_up_url_without_key() {
        let config = VisionConfig::builder()
            .with_base_url("https://annotate.example.net")
            .expect("Valid URL")
            .build()
            .expect("Valid config");

        assert_eq!(
            config.sign_up_url().unwrap().as_str(),
            "https://identitytoolkit.googleapis.com/v1/accounts:signUp"
        );
    }

    #[test]
    fn test_connect_config_into_config() {
        let connect = ConnectConfig {
            vision_url: Some("https://annotate.example.net".parse().unwrap()),
            vision_function: "annotateImage".to_string(),
            auth_url: default_auth_url(),
            api_key: Some("test-key".to_string()),
        };

        let config = connect.into_config().expect("Valid config");
        assert_eq!(config.base_url.as_str(), "https://annotate.example.net/");
        assert_eq!(config.api_key.as_deref(), Some("test-key"));
    }

    #[test]
    fn test_connect_config_requires_url() {
        let connect = ConnectConfig {
            vision_url: None,
            vision_function: "annotateImage".to_string(),
            auth_url: default_auth_url(),
            api_key: None,
        };

        assert!(connect.into_config().is_err());
    }
}
