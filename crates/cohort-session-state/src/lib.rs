//! # Cohort Session State
//!
//! The authoritative in-memory state object for the cohort session manager,
//! together with the value types of every namespace and the two
//! normalization boundaries the namespaces rely on:
//!
//! - [`FlagInput`] - the single coercion point from loosely-typed boolean-ish
//!   values (`true`, `"true"`, `1`, ...) to strict booleans
//! - [`normalize_timestamp`] - the single coercion point from loosely-typed
//!   millisecond timestamps to `u64` (out-of-range values become `0`,
//!   "always stale")
//!
//! UI collaborators read and write session state only through the manager's
//! named setters; [`AppState`] itself is a plain data object with no I/O.

pub mod flags;
pub mod state;
pub mod timestamp;
pub mod types;

pub use flags::{
    FlagInput, RoleFlagUpdate, RoleFlags, UiFlags, WithdrawalStatusFlags, WithdrawalStatusUpdate,
};
pub use state::AppState;
pub use timestamp::{is_fresh, normalize_timestamp, now_millis, STATS_FRESHNESS_WINDOW};
pub use types::{
    Participant, PredefinedSearch, Report, SearchMetadata, StatsRecord, StatsSnapshot,
    UserSessionRecord,
};
