//! Transfer encoding for transaction envelopes.
//!
//! A partially signed envelope crosses the process boundary inside a
//! JSON response, so it is carried as standard-alphabet base64. The
//! encoding must round-trip byte-identically, signatures included;
//! a single flipped byte invalidates the embedded signature.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as b64;

/// Encodes raw envelope bytes into the transport string.
#[must_use]
pub fn encode(bytes: &[u8]) -> String {
    b64.encode(bytes)
}

/// Decodes a transport string back into raw envelope bytes.
///
/// # Errors
///
/// Returns [`base64::DecodeError`] if the input is not valid
/// standard-alphabet base64.
pub fn decode(text: &str) -> Result<Vec<u8>, base64::DecodeError> {
    b64.decode(text)
}
