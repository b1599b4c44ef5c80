//! # Cohort Session Codec
//!
//! Identity-bound authenticated encryption for the cohort session manager.
//! Every persisted sensitive namespace is encrypted under a key derived from
//! the signed-in user's identity, so ciphertext left behind on a shared
//! machine cannot be read by the next user - it simply fails authentication.
//!
//! ## Key Types
//!
//! - [`encode`] / [`decode`] - encrypt and decrypt UTF-8 strings
//! - [`derive_key`] / [`SessionKey`] - HKDF-SHA256 identity key derivation
//! - [`EncryptedPayload`] - the versioned `v1:nonce:ciphertext` wire format
//! - [`CodecError`] - the failure taxonomy
//!
//! ## Usage
//!
//! ```rust
//! use cohort_session_codec::{decode, encode};
//!
//! let payload = encode("{\"site\":\"north\"}", "coordinator@example.org").unwrap();
//! let plaintext = decode(&payload, "coordinator@example.org").unwrap();
//! assert_eq!(plaintext, "{\"site\":\"north\"}");
//!
//! // A different identity derives a different key and cannot decrypt.
//! assert!(decode(&payload, "someone-else@example.org").is_err());
//! ```
//!
//! ## Design Notes
//!
//! - **Fresh nonce per call**: encoding the same input twice yields two
//!   distinct payloads that both decode to the original.
//! - **Indistinguishable failures**: tampered bytes and a wrong-identity key
//!   both surface as [`CodecError::DecryptionFailure`]; callers must treat
//!   the two identically.
//! - **Non-exportable keys**: [`SessionKey`] exposes no byte accessor
//!   outside this crate and is wiped on drop.

pub mod codec;
pub mod error;
pub mod key;
pub mod payload;

pub use codec::{decode, encode};
pub use error::{CodecError, Result};
pub use key::{derive_key, SessionKey};
pub use payload::{EncryptedPayload, NONCE_LEN, PAYLOAD_VERSION};
