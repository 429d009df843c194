//! Convenient re-exports for common use.

pub use crate::annotate::{
    AnnotateBackend, AnnotateImageResponse, AnnotateOutcome, AnnotateRequest, AnnotationGateway,
    BoxedBackend, Capability,
};
pub use crate::auth::{Authenticator, BoxedAuthenticator};
pub use crate::encode::{Base64Encoder, BoxedEncoder, ImageEncoder};
pub use crate::error::{BoxedError, Error, ErrorKind, Result};

// Mock collaborators (test-utils feature)
#[cfg(feature = "test-utils")]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub use crate::mock::{MockAuthenticator, MockBackend, MockConfig, MockEncoder};
