//! Convenience re-exports of the crate's primary types.

pub use crate::auth::{AnonymousAuthenticator, StaticAuthenticator};
pub use crate::client::VisionClient;
pub use crate::config::{ConnectConfig, VisionBuilder, VisionConfig};
pub use crate::error::{Error, Result};
