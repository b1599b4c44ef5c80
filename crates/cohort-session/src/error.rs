//! Error types for the session manager.

use cohort_session_codec::CodecError;
use cohort_session_store::StorageError;
use thiserror::Error;

/// Errors surfaced by session manager operations.
///
/// Most failure handling is internal: hydration and recovery degrade codec
/// failures to defaults, and namespace setters log-and-continue. Only direct
/// mirror reads such as [`crate::SessionManager::cached_search_metadata`]
/// propagate errors to the caller.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Codec error.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// Storage error.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// A stored record decoded but did not parse as the expected value.
    #[error("invalid stored record for {namespace}: {reason}")]
    InvalidRecord {
        namespace: &'static str,
        reason: String,
    },
}

/// Result type for session manager operations.
pub type Result<T> = std::result::Result<T, SessionError>;
