//! Versioned payload wire format.
//!
//! Encrypted records are persisted as `version:base64url(nonce):base64url(ciphertext)`
//! with unpadded URL-safe base64. The version segment gates parsing so the
//! format can evolve without silently misreading old records.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use crate::error::{CodecError, Result};

/// Version tag emitted for every new payload.
pub const PAYLOAD_VERSION: &str = "v1";

/// AES-GCM nonce length in bytes.
pub const NONCE_LEN: usize = 12;

/// A parsed encrypted payload: nonce plus ciphertext (tag included).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedPayload {
    pub(crate) nonce: [u8; NONCE_LEN],
    pub(crate) ciphertext: Vec<u8>,
}

impl EncryptedPayload {
    pub(crate) fn new(nonce: [u8; NONCE_LEN], ciphertext: Vec<u8>) -> Self {
        Self { nonce, ciphertext }
    }

    /// Serialize to the `v1:nonce:ciphertext` wire string.
    pub fn to_wire(&self) -> String {
        format!(
            "{PAYLOAD_VERSION}:{}:{}",
            URL_SAFE_NO_PAD.encode(self.nonce),
            URL_SAFE_NO_PAD.encode(&self.ciphertext)
        )
    }

    /// Parse a wire string.
    ///
    /// # Errors
    ///
    /// - `EmptyPayload`: the input is empty.
    /// - `MalformedPayload`: not exactly three segments, a segment is not
    ///   valid base64url, or the nonce has the wrong length.
    /// - `UnsupportedVersion`: the version segment is not `v1`.
    pub fn from_wire(payload: &str) -> Result<Self> {
        if payload.is_empty() {
            return Err(CodecError::EmptyPayload);
        }

        let segments: Vec<&str> = payload.split(':').collect();
        if segments.len() != 3 {
            return Err(CodecError::MalformedPayload(format!(
                "expected 3 segments, got {}",
                segments.len()
            )));
        }

        if segments[0] != PAYLOAD_VERSION {
            return Err(CodecError::UnsupportedVersion(segments[0].to_string()));
        }

        let nonce_bytes = URL_SAFE_NO_PAD
            .decode(segments[1])
            .map_err(|e| CodecError::MalformedPayload(format!("nonce segment: {e}")))?;
        let nonce: [u8; NONCE_LEN] = nonce_bytes.as_slice().try_into().map_err(|_| {
            CodecError::MalformedPayload(format!(
                "nonce must be {NONCE_LEN} bytes, got {}",
                nonce_bytes.len()
            ))
        })?;

        let ciphertext = URL_SAFE_NO_PAD
            .decode(segments[2])
            .map_err(|e| CodecError::MalformedPayload(format!("ciphertext segment: {e}")))?;

        Ok(Self { nonce, ciphertext })
    }
}
