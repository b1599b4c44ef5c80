//! Injected collaborators: backend participant lookup and teardown hooks.
//!
//! The manager owns no UI and makes exactly one kind of backend call. Both
//! seams are traits so the embedding application supplies the real
//! implementations and tests supply doubles.

use async_trait::async_trait;
use cohort_session_state::Participant;
use thiserror::Error;

/// Outcome of a participant lookup by recovery token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// The token resolved to a participant.
    Found(Participant),

    /// The backend definitively does not know this token. The caller drops
    /// the persisted token so the UI stops retrying it.
    NotFound,
}

/// Transient lookup failure (network, server-side). The persisted token is
/// kept so a later attempt can retry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("participant lookup failed: {0}")]
pub struct LookupError(pub String);

/// Backend collaborator that resolves a recovery token to a participant.
///
/// This is the only backend call made from this layer; everything else the
/// dashboard fetches goes through its own clients.
#[async_trait]
pub trait ParticipantLookup: Send + Sync {
    /// Resolve `token` to a participant record.
    async fn fetch_by_token(&self, token: &str) -> Result<LookupOutcome, LookupError>;
}

/// Side effects triggered by session teardown.
///
/// Sign-out, the loading indicator, and navigation belong to the embedding
/// application; teardown only invokes them.
#[async_trait]
pub trait SessionHooks: Send + Sync {
    /// External sign-out side effect. Invoked exactly once per teardown.
    async fn sign_out(&self);

    /// Hide any active loading indicator.
    fn hide_loading_indicator(&self) {}

    /// Reset navigation to the default route.
    fn reset_navigation(&self) {}
}
