//! Authenticated encryption of namespace values using AES-256-GCM.

use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::{CodecError, Result};
use crate::key::derive_key;
use crate::payload::{EncryptedPayload, NONCE_LEN};

/// Encrypt a plaintext string under an identity.
///
/// Every call draws a fresh random nonce, so encoding the same input twice
/// produces two distinct payloads that both decode to the original.
///
/// # Errors
///
/// - `MissingIdentity`: the identity string is empty.
/// - `EncryptionFailure`: the AEAD rejected the operation.
pub fn encode(plaintext: &str, identity: &str) -> Result<String> {
    let key = derive_key(identity)?;
    let cipher =
        Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|_| CodecError::EncryptionFailure)?;

    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce_bytes);

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce_bytes), plaintext.as_bytes())
        .map_err(|_| CodecError::EncryptionFailure)?;

    Ok(EncryptedPayload::new(nonce_bytes, ciphertext).to_wire())
}

/// Decrypt a wire payload under an identity.
///
/// # Errors
///
/// - `EmptyPayload` / `MalformedPayload` / `UnsupportedVersion`: the payload
///   string does not parse (see [`EncryptedPayload::from_wire`]).
/// - `MissingIdentity`: the identity string is empty.
/// - `DecryptionFailure`: the authentication tag did not verify. Tampered
///   bytes and a foreign identity surface identically.
pub fn decode(payload: &str, identity: &str) -> Result<String> {
    let parsed = EncryptedPayload::from_wire(payload)?;
    let key = derive_key(identity)?;
    let cipher =
        Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|_| CodecError::DecryptionFailure)?;

    let plaintext = cipher
        .decrypt(Nonce::from_slice(&parsed.nonce), parsed.ciphertext.as_slice())
        .map_err(|_| CodecError::DecryptionFailure)?;

    String::from_utf8(plaintext).map_err(|_| CodecError::DecryptionFailure)
}
