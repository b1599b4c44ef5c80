//! Namespace value types for the session state.
//!
//! All persisted types serialize as camelCase JSON to match the records the
//! persistence area holds.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::timestamp::is_fresh;

/// A study participant record.
///
/// The in-memory record is transient: after a reload it is rebuilt from the
/// persisted recovery token by a backend lookup. Only the token itself is
/// ever mirrored to storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    /// Recovery token used to look the participant up again after a reload.
    pub token: String,

    /// Study-assigned identifier.
    #[serde(default)]
    pub study_id: Option<String>,

    #[serde(default)]
    pub first_name: Option<String>,

    #[serde(default)]
    pub last_name: Option<String>,

    /// Recruiting site the participant belongs to.
    #[serde(default)]
    pub site: Option<String>,

    #[serde(default)]
    pub enrollment_status: Option<String>,
}

impl Participant {
    /// Create a participant carrying only a recovery token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            study_id: None,
            first_name: None,
            last_name: None,
            site: None,
            enrollment_status: None,
        }
    }

    /// A participant without a token cannot be recovered after a reload.
    pub fn has_token(&self) -> bool {
        !self.token.is_empty()
    }
}

/// The signed-in user's session record.
///
/// Stored in the clear: the email it carries is the identity every
/// encryption key derives from, so it must be readable before any key
/// exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSessionRecord {
    pub email: String,

    #[serde(default)]
    pub display_name: Option<String>,

    /// Site the user administers, if scoped to one.
    #[serde(default)]
    pub site: Option<String>,
}

impl UserSessionRecord {
    /// Create a session record for an email address.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            display_name: None,
            site: None,
        }
    }

    /// A session record is usable only if it carries a plausible email.
    pub fn is_valid(&self) -> bool {
        let email = self.email.trim();
        !email.is_empty()
            && email.contains('@')
            && email.rsplit('@').next().is_some_and(|domain| domain.contains('.'))
    }

    /// The identity string encryption keys derive from.
    pub fn identity(&self) -> &str {
        &self.email
    }
}

/// Aggregate participant statistics snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    #[serde(default)]
    pub total_participants: u64,

    #[serde(default)]
    pub active: u64,

    #[serde(default)]
    pub withdrawn: u64,

    /// Participants with verified contact information.
    #[serde(default)]
    pub verified: u64,

    /// Per-site participant counts.
    #[serde(default)]
    pub by_site: BTreeMap<String, u64>,
}

/// The persisted statistics wire value: a snapshot plus its update time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsRecord {
    pub snapshot: StatsSnapshot,

    /// Milliseconds since the Unix epoch; `0` means "always stale".
    #[serde(default)]
    pub updated_at: u64,
}

impl StatsRecord {
    /// Whether the snapshot is still usable at `now_ms` without a fresh
    /// backend fetch.
    pub fn is_fresh(&self, now_ms: u64) -> bool {
        is_fresh(self.updated_at, now_ms)
    }
}

/// Search metadata describing the query behind the cached results.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMetadata {
    /// Free-text search term.
    #[serde(default)]
    pub query: Option<String>,

    /// Site filter.
    #[serde(default)]
    pub site: Option<String>,

    /// Additional field filters (field name to value).
    #[serde(default)]
    pub filters: BTreeMap<String, String>,

    /// Named predefined searches available to the user.
    #[serde(default)]
    pub predefined: BTreeMap<String, PredefinedSearch>,
}

impl SearchMetadata {
    /// Whether any predefined searches have been installed.
    pub fn has_predefined(&self) -> bool {
        !self.predefined.is_empty()
    }
}

/// A named, canned filter set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredefinedSearch {
    /// Label shown in the search UI.
    pub label: String,

    #[serde(default)]
    pub filters: BTreeMap<String, String>,
}

impl PredefinedSearch {
    /// Create a predefined search with a label and no filters.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            filters: BTreeMap::new(),
        }
    }
}

/// A generated report entry. Cached in memory only; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: String,

    pub title: String,

    /// Milliseconds since the Unix epoch.
    #[serde(default)]
    pub generated_at: u64,

    #[serde(default)]
    pub url: Option<String>,
}
