//! Identity-bound key derivation using HKDF-SHA256.
//!
//! The encryption key for every persisted namespace is derived from the
//! signed-in user's identity string. There is no separate secret to manage:
//! a ciphertext written under one identity is undecryptable under any other,
//! which is exactly the property that keeps a predecessor's leftover records
//! unreadable on a shared machine.

use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{CodecError, Result};

/// Fixed, public salt for the derivation. It exists only to namespace this
/// use of HKDF and carries no entropy; the version suffix lets the scheme
/// evolve without old keys colliding with new ones.
const HKDF_SALT: &[u8] = b"cohort-session/hkdf-salt/v1";

/// A derived 256-bit session key.
///
/// The raw bytes are never exposed outside this crate; the key can only be
/// used through [`crate::encode`] and [`crate::decode`]. Wiped on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SessionKey([u8; 32]);

impl SessionKey {
    pub(crate) fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

/// Derive the session key for an identity.
///
/// Deterministic: the same identity always derives the same key, so a record
/// encrypted before a reload decrypts after it.
///
/// # Errors
///
/// - `MissingIdentity`: the identity string is empty.
pub fn derive_key(identity: &str) -> Result<SessionKey> {
    if identity.is_empty() {
        return Err(CodecError::MissingIdentity);
    }

    let hkdf = Hkdf::<Sha256>::new(Some(HKDF_SALT), identity.as_bytes());

    let mut key = [0u8; 32];
    let Ok(()) = hkdf.expand(&[], &mut key) else {
        unreachable!("32 bytes is a valid HKDF-SHA256 output length");
    };

    Ok(SessionKey(key))
}
