//! # Cohort Session
//!
//! The per-user encrypted client session-state manager for the cohort
//! administrative dashboard.
//!
//! ## Overview
//!
//! UI collaborators read and write session state only through the
//! [`SessionManager`]. The manager keeps one authoritative in-memory
//! [`AppState`] per process and mirrors each namespace into the tab-scoped
//! persistence area according to its policy:
//!
//! - **Encrypted**: participant recovery token, search metadata, statistics
//!   (participant-identifying or derivable) - encrypted under a key derived
//!   from the signed-in user's identity.
//! - **Plaintext**: user session record (needed before a key exists), role
//!   flags, UI flags (non-sensitive preferences).
//! - **None**: search results, reports, unsaved-changes flag (memory only).
//!
//! A page reload rebuilds the in-memory state through hydration; a persisted
//! encrypted record that fails to decode - tampered, or written by a
//! different user of the same machine - degrades to that namespace's default
//! and is removed. Concurrent attempts to rebuild the participant from the
//! persisted token collapse into a single backend lookup.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use cohort_session::{ParticipantLookup, SessionHooks, SessionManager};
//! use cohort_session::state::UserSessionRecord;
//! use cohort_session::store::MemoryStorage;
//!
//! async fn example(lookup: Arc<dyn ParticipantLookup>, hooks: Arc<dyn SessionHooks>) {
//!     let manager = SessionManager::new(MemoryStorage::new(), lookup, hooks);
//!
//!     manager.set_user(UserSessionRecord::new("coordinator@example.org")).await;
//!     let state = manager.initialize().await;
//!     assert!(state.user.is_some());
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `cohort_session::codec` - key derivation and the payload codec
//! - `cohort_session::store` - the persistence area and storage keys
//! - `cohort_session::state` - the state object and namespace value types

pub mod error;
pub mod flight;
pub mod hooks;
pub mod session;

// Re-export component crates
pub use cohort_session_codec as codec;
pub use cohort_session_state as state;
pub use cohort_session_store as store;

// Re-export main types for convenience
pub use error::{Result, SessionError};
pub use hooks::{LookupError, LookupOutcome, ParticipantLookup, SessionHooks};
pub use session::SessionManager;

// Re-export commonly used state types
pub use cohort_session_state::{AppState, Participant, UserSessionRecord, STATS_FRESHNESS_WINDOW};
