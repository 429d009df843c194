#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

pub mod annotate;
mod auth;
mod encode;
mod error;
#[cfg(feature = "test-utils")]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub mod mock;
#[doc(hidden)]
pub mod prelude;

pub use crate::auth::{Authenticator, BoxedAuthenticator};
pub use crate::encode::{Base64Encoder, BoxedEncoder, ImageEncoder};
pub use crate::error::{BoxedError, Error, ErrorKind, Result};
