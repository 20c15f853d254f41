//! Link/QR collaborator boundary.
//!
//! The engine supplies a fully-qualified survey-taking URL and stores
//! whatever bytes the encoder returns — it never interprets them. QR
//! generation is a best-effort side effect of survey creation, performed
//! outside the creation write.

use crate::Result;

/// Encodes a URL into image bytes (PNG, SVG, or anything the host's
/// presentation layer can serve).
pub trait LinkEncoder: Send + Sync {
    /// Encode the given URL into image bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails; callers treat this as
    /// non-fatal.
    fn encode(&self, url: &str) -> Result<Vec<u8>>;
}

/// Encoder that produces no image. Useful for hosts that render QR codes
/// on the fly rather than storing them.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEncoder;

impl LinkEncoder for NoopEncoder {
    fn encode(&self, _url: &str) -> Result<Vec<u8>> {
        Ok(Vec::new())
    }
}
