//! Error types for the session codec.

use thiserror::Error;

/// Errors that can occur during payload encoding and decoding.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodecError {
    /// No identity is available to derive a key from.
    #[error("identity is required for key derivation")]
    MissingIdentity,

    /// The payload string is empty.
    #[error("payload is empty")]
    EmptyPayload,

    /// The payload does not match the `version:nonce:ciphertext` shape.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// The payload version segment is not recognized.
    #[error("unsupported payload version: {0}")]
    UnsupportedVersion(String),

    /// Encryption failed.
    #[error("encryption failed")]
    EncryptionFailure,

    /// Authentication failed during decryption. Tampered bytes and a
    /// wrong-identity key are deliberately indistinguishable here.
    #[error("decryption failed")]
    DecryptionFailure,
}

/// Result type for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;
