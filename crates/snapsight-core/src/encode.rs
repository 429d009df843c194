//! Image encoding seam.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Type alias for a shared image encoder.
pub type BoxedEncoder = Arc<dyn ImageEncoder>;

/// Encodes raw image bytes into the textual form the wire expects.
pub trait ImageEncoder: Send + Sync {
    /// Encodes the image bytes.
    fn encode(&self, image: &[u8]) -> String;
}

/// Standard-alphabet base64 encoder.
///
/// Produces a single unwrapped line, which is the form the annotation
/// endpoint expects inside `image.content`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Base64Encoder;

impl ImageEncoder for Base64Encoder {
    fn encode(&self, image: &[u8]) -> String {
        STANDARD.encode(image)
    }
}
