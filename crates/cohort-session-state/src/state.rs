//! The authoritative in-memory session state.
//!
//! One instance exists per process lifetime, owned by the session manager.
//! UI collaborators never mutate it directly; every change flows through a
//! named namespace setter so the persistence policy stays enforceable.

use crate::flags::{RoleFlags, UiFlags};
use crate::types::{Participant, Report, SearchMetadata, StatsSnapshot, UserSessionRecord};

/// The single source of truth for every session namespace.
///
/// `Default` is both the pre-hydration and the post-teardown state: all
/// caches empty, all flags off, no authenticated user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    /// Current participant. Transient: rebuilt from the persisted recovery
    /// token, never persisted itself.
    pub participant: Option<Participant>,

    /// Cached search results. Memory only.
    pub search_results: Option<Vec<Participant>>,

    /// Metadata describing the cached search. Mirrored encrypted.
    pub search_metadata: Option<SearchMetadata>,

    /// Role flags. Mirrored in the clear.
    pub role_flags: RoleFlags,

    /// UI flags. Mirrored in the clear.
    pub ui_flags: UiFlags,

    /// Last statistics snapshot. Mirrored encrypted together with its
    /// update time.
    pub stats: Option<StatsSnapshot>,

    /// When the statistics snapshot was produced, in ms since the epoch.
    /// `0` means "always stale".
    pub stats_updated_at: u64,

    /// Signed-in user session record. Mirrored in the clear.
    pub user: Option<UserSessionRecord>,

    /// Cached reports. Memory only.
    pub reports: Option<Vec<Report>>,

    /// Whether the UI holds edits not yet saved to the backend.
    pub unsaved_changes: bool,
}
