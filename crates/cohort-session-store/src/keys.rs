//! Storage keys owned by the session namespaces.
//!
//! Each namespace owns a disjoint key; the key strings are a wire contract
//! shared with the embedding host and must not change between releases.

/// Encrypted participant recovery token.
pub const PARTICIPANT_TOKEN_KEY: &str = "participantTokenEnc";

/// Encrypted search metadata mirror.
pub const SEARCH_METADATA_KEY: &str = "searchMetadataEnc";

/// Encrypted statistics snapshot mirror.
pub const STATS_STATE_KEY: &str = "statsStateEnc";

/// Plaintext user session record. Stored in the clear because the identity
/// it carries is needed before any key can be derived.
pub const USER_SESSION_KEY: &str = "userSession";

/// Plaintext role flags mirror.
pub const ROLE_FLAGS_KEY: &str = "roleFlags";

/// Plaintext UI flags mirror.
pub const UI_FLAGS_KEY: &str = "uiFlags";

/// Every key the session manager may write, cleared in one pass on teardown.
pub const SESSION_KEYS: &[&str] = &[
    PARTICIPANT_TOKEN_KEY,
    SEARCH_METADATA_KEY,
    STATS_STATE_KEY,
    USER_SESSION_KEY,
    ROLE_FLAGS_KEY,
    UI_FLAGS_KEY,
];
