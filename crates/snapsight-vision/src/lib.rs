#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for the main library
pub const TRACING_TARGET: &str = "snapsight_vision";

/// Tracing target for client operations
pub const TRACING_TARGET_CLIENT: &str = "snapsight_vision::client";

/// Tracing target for session operations
pub const TRACING_TARGET_AUTH: &str = "snapsight_vision::auth";

mod auth;
mod client;
mod config;
mod error;
#[doc(hidden)]
pub mod prelude;

pub use crate::auth::{AnonymousAuthenticator, StaticAuthenticator};
pub use crate::client::VisionClient;
pub use crate::config::{ConnectConfig, VisionBuilder, VisionConfig};
pub use crate::error::{Error, Result};
