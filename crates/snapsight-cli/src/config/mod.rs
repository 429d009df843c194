//! CLI configuration management.
//!
//! This module defines the complete CLI configuration hierarchy:
//!
//! ```text
//! Cli
//! ├── image, capability, timeout  # What to annotate and how long to wait
//! ├── connect: ConnectConfig      # Annotation endpoint and identity
//! ├── storage: StorageConfig      # Local capture persistence
//! └── mock: MockConfig            # Canned annotations (feature-gated)
//! ```
//!
//! All configuration can be provided via CLI arguments or environment
//! variables. Use `--help` to see all available options.
//!
//! # Example
//!
//! ```bash
//! # Configure the endpoint explicitly
//! snapsight photo.jpg text --vision-url "https://example.cloudfunctions.net/"
//!
//! # Or via environment variables
//! VISION_URL="https://example.cloudfunctions.net/" snapsight photo.jpg text
//! ```

mod provider;
mod storage;

use std::path::PathBuf;
use std::process;

use clap::Parser;
pub use provider::create_gateway;
use serde::{Deserialize, Serialize};
use snapsight_core::annotate::Capability;
use snapsight_vision::ConnectConfig;
pub use storage::StorageConfig;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_STARTUP};

/// Complete CLI configuration.
///
/// Combines all configuration groups for the annotation tool:
/// - [`ConnectConfig`]: Annotation endpoint and identity settings
/// - [`StorageConfig`]: Local capture persistence
/// - `MockConfig`: Canned annotation responses (feature-gated)
#[derive(Debug, Clone, Parser, Serialize, Deserialize)]
#[command(name = "snapsight")]
#[command(about = "Annotates captured images with text or object detection")]
#[command(version)]
pub struct Cli {
    /// Path to the image to annotate.
    pub image: PathBuf,

    /// Capability to annotate the image with (`text` or `object`).
    pub capability: String,

    /// Annotation call timeout in seconds.
    #[arg(long, env = "SNAPSIGHT_TIMEOUT_SECS", default_value_t = 10)]
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Annotation endpoint configuration.
    #[clap(flatten)]
    pub connect: ConnectConfig,

    /// Local capture storage configuration.
    #[clap(flatten)]
    pub storage: StorageConfig,

    /// Canned annotation configuration.
    #[cfg(feature = "mock")]
    #[clap(flatten)]
    pub mock: snapsight_core::mock::MockConfig,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    ///
    /// This is the preferred way to initialize the CLI configuration as it ensures
    /// .env files are loaded before clap parses arguments, allowing environment
    /// variables from .env to be used as defaults.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from .env file if the dotenv feature is enabled.
    ///
    /// This should be called before parsing CLI arguments so that clap's `env`
    /// feature can pick up values from .env files.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Initializes tracing with environment-based filtering.
    pub fn init_tracing() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    /// Logs build information at debug level.
    fn log_build_info() {
        tracing::debug!(
            target: TRACING_TARGET_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "Build information"
        );
    }

    /// Validates all configuration values.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.timeout_secs == 0 {
            return Err(anyhow::anyhow!(
                "Annotation timeout must be greater than 0 seconds"
            ));
        }
        Ok(())
    }

    /// Logs configuration at startup (no sensitive information).
    pub fn log(&self) {
        Self::log_build_info();
        self.storage.log();

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            image = %self.image.display(),
            capability = %self.capability,
            timeout_secs = self.timeout_secs,
            vision_url = ?self.connect.vision_url.as_ref().map(|u| u.as_str()),
            vision_function = %self.connect.vision_function,
            "Annotation configuration"
        );
    }

    /// Resolves the capability selector against the known identifiers.
    pub fn resolve_capability(&self) -> Option<Capability> {
        Capability::for_identifier(&self.capability)
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [
            cfg!(feature = "dotenv").then_some("dotenv"),
            cfg!(feature = "mock").then_some("mock"),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

// Default value functions for serde
const fn default_timeout_secs() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_args_parse_with_defaults() {
        let cli = Cli::try_parse_from(["snapsight", "photo.jpg", "text"]).expect("Valid args");

        assert_eq!(cli.image, PathBuf::from("photo.jpg"));
        assert_eq!(cli.capability, "text");
        assert_eq!(cli.timeout_secs, 10);
        assert!(!cli.storage.no_store);
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn capability_selector_resolves() {
        let cli = Cli::try_parse_from(["snapsight", "photo.jpg", "object"]).expect("Valid args");
        assert_eq!(cli.resolve_capability(), Some(Capability::Object));
    }

    #[test]
    fn unknown_capability_does_not_resolve() {
        let cli = Cli::try_parse_from(["snapsight", "photo.jpg", "face"]).expect("Valid args");
        assert_eq!(cli.resolve_capability(), None);
    }

    #[test]
    fn zero_timeout_fails_validation() {
        let cli = Cli::try_parse_from(["snapsight", "photo.jpg", "text", "--timeout-secs", "0"])
            .expect("Valid args");
        assert!(cli.validate().is_err());
    }

    #[test]
    fn missing_capability_is_a_parse_error() {
        assert!(Cli::try_parse_from(["snapsight", "photo.jpg"]).is_err());
    }
}
