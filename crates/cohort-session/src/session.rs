//! The session manager: namespace operations, hydration, recovery, teardown.
//!
//! The manager owns the process-wide [`AppState`] and enforces each
//! namespace's persistence policy. In-memory writes are the commit point and
//! are visible to synchronous readers immediately; the persisted mirror is a
//! best-effort cache written afterwards, so no reader ever waits on
//! encryption.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, RwLock};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use cohort_session_codec::{self as codec, CodecError};
use cohort_session_state::{
    is_fresh, normalize_timestamp, now_millis, AppState, FlagInput, Participant, PredefinedSearch,
    Report, RoleFlagUpdate, RoleFlags, SearchMetadata, StatsRecord, StatsSnapshot, UiFlags,
    UserSessionRecord, WithdrawalStatusFlags, WithdrawalStatusUpdate,
};
use cohort_session_store::{keys, StorageArea};

use crate::error::{Result, SessionError};
use crate::flight::FlightRegistry;
use crate::hooks::{LookupOutcome, ParticipantLookup, SessionHooks};

/// Operation key for participant recovery coalescing.
const RECOVER_PARTICIPANT_OP: &str = "participant-recovery";

/// Hydration progress for the current process.
#[derive(Debug, Clone, PartialEq, Eq)]
enum HydrationState {
    /// No hydration has run yet.
    Unhydrated,
    /// A hydration pass is resolving namespaces.
    Hydrating,
    /// All namespaces resolved for this identity (`None` = unauthenticated).
    HydratedFor(Option<String>),
}

/// The per-user encrypted session-state manager.
///
/// Provides a unified API for:
/// - Namespace reads and writes with policy-driven mirrors
/// - Hydration of persisted state at startup and on identity change
/// - Coalesced participant recovery from the persisted token
/// - Atomic session teardown
pub struct SessionManager<S: StorageArea> {
    /// Authoritative in-memory state. Reads are synchronous.
    state: RwLock<AppState>,
    /// The tab-scoped persistence area.
    storage: Arc<S>,
    /// Backend participant-lookup collaborator.
    lookup: Arc<dyn ParticipantLookup>,
    /// Teardown side-effect collaborator.
    hooks: Arc<dyn SessionHooks>,
    /// Last hydrated identity marker.
    hydration: Mutex<HydrationState>,
    /// Pending-operation registry for recovery coalescing.
    flights: FlightRegistry<Option<Participant>>,
}

impl<S: StorageArea> SessionManager<S> {
    /// Create a new session manager over a storage area and collaborators.
    pub fn new(storage: S, lookup: Arc<dyn ParticipantLookup>, hooks: Arc<dyn SessionHooks>) -> Self {
        Self {
            state: RwLock::new(AppState::default()),
            storage: Arc::new(storage),
            lookup,
            hooks,
            hydration: Mutex::new(HydrationState::Unhydrated),
            flights: FlightRegistry::new(),
        }
    }

    /// Get the storage area reference.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// A clone of the full authoritative state.
    pub fn snapshot(&self) -> AppState {
        self.read_state(Clone::clone)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // State access and persistence plumbing
    // ─────────────────────────────────────────────────────────────────────────

    fn read_state<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
        f(&self.state.read().unwrap())
    }

    fn write_state<R>(&self, f: impl FnOnce(&mut AppState) -> R) -> R {
        f(&mut self.state.write().unwrap())
    }

    /// The identity every encrypted mirror is keyed to: the signed-in
    /// user's email. `None` while unauthenticated.
    fn current_identity(&self) -> Option<String> {
        self.read_state(|s| {
            s.user
                .as_ref()
                .filter(|u| u.is_valid())
                .map(|u| u.identity().to_string())
        })
    }

    /// Encrypt `value` under the current identity and mirror it to storage.
    ///
    /// Failure at any step is logged and leaves the previous persisted
    /// payload in place; the in-memory value is already committed.
    async fn persist_encrypted<T: Serialize>(&self, key: &'static str, value: &T) {
        let Some(identity) = self.current_identity() else {
            debug!(key, "no authenticated identity; skipping encrypted mirror write");
            return;
        };

        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(err) => {
                warn!(key, %err, "failed to serialize namespace value");
                return;
            }
        };

        let payload = match codec::encode(&json, &identity) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(key, %err, "encode failed; keeping previous persisted payload");
                return;
            }
        };

        if let Err(err) = self.storage.write(key, &payload).await {
            warn!(key, %err, "mirror write failed; in-memory value remains authoritative");
        }
    }

    /// Mirror `value` to storage as plaintext JSON.
    async fn persist_plain<T: Serialize>(&self, key: &'static str, value: &T) {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(err) => {
                warn!(key, %err, "failed to serialize namespace value");
                return;
            }
        };

        if let Err(err) = self.storage.write(key, &json).await {
            warn!(key, %err, "mirror write failed; in-memory value remains authoritative");
        }
    }

    async fn remove_record(&self, key: &str) {
        if let Err(err) = self.storage.remove(key).await {
            warn!(key, %err, "failed to remove persisted record");
        }
    }

    /// Read and JSON-parse a plaintext mirror. A malformed record degrades
    /// to `None` and is removed.
    async fn load_plain<T: DeserializeOwned>(&self, key: &'static str) -> Option<T> {
        let raw = match self.storage.read(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                warn!(key, %err, "storage read failed");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(key, %err, "stored record is malformed; removing");
                self.remove_record(key).await;
                None
            }
        }
    }

    /// Read, decode, and JSON-parse an encrypted mirror under `identity`.
    ///
    /// Any decode failure - missing identity match, tampered bytes, foreign
    /// key - removes the record: it can never decode again, and leaving it
    /// would only cause a second failed decrypt later.
    async fn load_encrypted<T: DeserializeOwned>(
        &self,
        key: &'static str,
        identity: &str,
    ) -> Option<T> {
        let payload = match self.storage.read(key).await {
            Ok(Some(payload)) => payload,
            Ok(None) => return None,
            Err(err) => {
                warn!(key, %err, "storage read failed");
                return None;
            }
        };

        let plaintext = match codec::decode(&payload, identity) {
            Ok(plaintext) => plaintext,
            Err(err) => {
                warn!(key, %err, "persisted record failed to decode; removing");
                self.remove_record(key).await;
                return None;
            }
        };

        match serde_json::from_str(&plaintext) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(key, %err, "decoded record is malformed; removing");
                self.remove_record(key).await;
                None
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Hydration
    // ─────────────────────────────────────────────────────────────────────────

    /// Load every namespace for the current identity into memory.
    ///
    /// Called once at startup and again whenever the authenticated identity
    /// changes. Hydration is idempotent per identity: a repeat call for the
    /// identity already hydrated returns the existing state without touching
    /// the encrypted mirrors. An unauthenticated session hydrates straight
    /// to defaults without attempting any decode, leaving persisted records
    /// in place for a later sign-in.
    pub async fn initialize(&self) -> AppState {
        self.hydrate_user_session().await;
        let identity = self.current_identity();

        {
            let mut hydration = self.hydration.lock().unwrap();
            if *hydration == HydrationState::HydratedFor(identity.clone()) {
                return self.snapshot();
            }
            *hydration = HydrationState::Hydrating;
        }

        self.hydrate_plain_namespaces().await;
        self.hydrate_encrypted_namespaces(identity.as_deref()).await;

        *self.hydration.lock().unwrap() = HydrationState::HydratedFor(identity);
        self.snapshot()
    }

    /// Reset the hydration marker so the next [`initialize`] performs a full
    /// pass. Used by tests and by explicit sign-out/sign-in transitions.
    ///
    /// [`initialize`]: SessionManager::initialize
    pub fn reset_identity_tracking(&self) {
        *self.hydration.lock().unwrap() = HydrationState::Unhydrated;
    }

    /// The user session loads before anything else: the identity it carries
    /// must exist before any key can be derived.
    async fn hydrate_user_session(&self) {
        if self.has_user() {
            return;
        }

        let raw = match self.storage.read(keys::USER_SESSION_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return,
            Err(err) => {
                warn!(%err, "could not read stored user session");
                return;
            }
        };

        match serde_json::from_str::<UserSessionRecord>(&raw) {
            Ok(record) if record.is_valid() => {
                self.write_state(|s| s.user = Some(record));
            }
            Ok(_) | Err(_) => {
                warn!("stored user session is malformed; removing");
                self.remove_record(keys::USER_SESSION_KEY).await;
            }
        }
    }

    async fn hydrate_plain_namespaces(&self) {
        let role_flags = self.load_plain::<RoleFlags>(keys::ROLE_FLAGS_KEY).await;
        self.write_state(|s| s.role_flags = role_flags.unwrap_or_default());

        let ui_flags = self.load_plain::<UiFlags>(keys::UI_FLAGS_KEY).await;
        self.write_state(|s| s.ui_flags = ui_flags.unwrap_or_default());
    }

    async fn hydrate_encrypted_namespaces(&self, identity: Option<&str>) {
        // The participant object is always rebuilt on demand from the token;
        // hydration only decides whether the token record survives.
        self.write_state(|s| s.participant = None);

        let Some(identity) = identity else {
            self.write_state(|s| {
                s.search_metadata = None;
                s.search_results = None;
                s.stats = None;
                s.stats_updated_at = 0;
            });
            return;
        };

        // Participant token: validate decryptability now so a foreign or
        // tampered record is dropped during hydration rather than surfacing
        // later inside recovery.
        let _ = self
            .load_encrypted::<String>(keys::PARTICIPANT_TOKEN_KEY, identity)
            .await;

        match self
            .load_encrypted::<SearchMetadata>(keys::SEARCH_METADATA_KEY, identity)
            .await
        {
            Some(metadata) => self.write_state(|s| {
                s.search_metadata = Some(metadata);
                s.search_results = None;
            }),
            None => self.write_state(|s| {
                s.search_metadata = None;
                s.search_results = None;
            }),
        }

        match self
            .load_encrypted::<StatsRecord>(keys::STATS_STATE_KEY, identity)
            .await
        {
            Some(record) => self.write_state(|s| {
                s.stats = Some(record.snapshot);
                s.stats_updated_at = record.updated_at;
            }),
            None => self.write_state(|s| {
                s.stats = None;
                s.stats_updated_at = 0;
            }),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // User session namespace (plaintext)
    // ─────────────────────────────────────────────────────────────────────────

    /// Store the signed-in user. A record without a plausible email is
    /// logged and ignored; any previous valid session is preserved.
    pub async fn set_user(&self, record: UserSessionRecord) {
        if !record.is_valid() {
            warn!(email = %record.email, "rejecting user session without a plausible email");
            return;
        }

        self.write_state(|s| s.user = Some(record.clone()));
        self.persist_plain(keys::USER_SESSION_KEY, &record).await;
    }

    /// The signed-in user, if any.
    pub fn user(&self) -> Option<UserSessionRecord> {
        self.read_state(|s| s.user.clone())
    }

    /// The signed-in user's email.
    pub fn user_email(&self) -> Option<String> {
        self.read_state(|s| s.user.as_ref().map(|u| u.email.clone()))
    }

    /// Whether a user is signed in.
    pub fn has_user(&self) -> bool {
        self.read_state(|s| s.user.is_some())
    }

    /// Clear the user session from memory and storage.
    pub async fn clear_user(&self) {
        self.write_state(|s| s.user = None);
        self.remove_record(keys::USER_SESSION_KEY).await;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Participant namespace (encrypted token mirror)
    // ─────────────────────────────────────────────────────────────────────────

    /// Store the active participant and mirror its recovery token. A
    /// participant without a token is logged and ignored - it could never
    /// be recovered after a reload.
    pub async fn set_participant(&self, participant: Participant) {
        if !participant.has_token() {
            warn!("rejecting participant without a recovery token");
            return;
        }

        let token = participant.token.clone();
        self.write_state(|s| s.participant = Some(participant));
        self.persist_encrypted(keys::PARTICIPANT_TOKEN_KEY, &token).await;
    }

    /// The active participant, if present in memory.
    pub fn participant(&self) -> Option<Participant> {
        self.read_state(|s| s.participant.clone())
    }

    /// Whether a participant is loaded in memory.
    pub fn has_participant(&self) -> bool {
        self.read_state(|s| s.participant.is_some())
    }

    /// Clear the participant from memory and drop the persisted token.
    pub async fn clear_participant(&self) {
        self.write_state(|s| s.participant = None);
        self.remove_record(keys::PARTICIPANT_TOKEN_KEY).await;
    }

    /// Rebuild the participant from the persisted recovery token.
    ///
    /// Concurrent callers coalesce onto one backend lookup and all receive
    /// the same result. Returns `None` when no token survives decoding or
    /// the backend cannot resolve it; a transient lookup failure keeps the
    /// token in place so a later attempt can retry.
    pub async fn recover_participant(&self) -> Option<Participant> {
        if let Some(participant) = self.participant() {
            return Some(participant);
        }

        self.flights
            .run(RECOVER_PARTICIPANT_OP, || self.recover_participant_inner())
            .await
    }

    async fn recover_participant_inner(&self) -> Option<Participant> {
        let identity = self.current_identity()?;

        let payload = match self.storage.read(keys::PARTICIPANT_TOKEN_KEY).await {
            Ok(Some(payload)) => payload,
            Ok(None) => return None,
            Err(err) => {
                warn!(%err, "could not read persisted participant token");
                return None;
            }
        };

        let token_json = match codec::decode(&payload, &identity) {
            Ok(token_json) => token_json,
            Err(err) => {
                warn!(%err, "persisted participant token failed to decode; removing");
                self.remove_record(keys::PARTICIPANT_TOKEN_KEY).await;
                return None;
            }
        };

        let token: String = match serde_json::from_str(&token_json) {
            Ok(token) => token,
            Err(err) => {
                warn!(%err, "persisted participant token is malformed; removing");
                self.remove_record(keys::PARTICIPANT_TOKEN_KEY).await;
                return None;
            }
        };

        match self.lookup.fetch_by_token(&token).await {
            Ok(LookupOutcome::Found(participant)) => {
                self.write_state(|s| s.participant = Some(participant.clone()));
                Some(participant)
            }
            Ok(LookupOutcome::NotFound) => {
                // A token the backend does not know will never start
                // resolving; drop it so the UI stops retrying.
                debug!("backend does not know the persisted token; removing");
                self.remove_record(keys::PARTICIPANT_TOKEN_KEY).await;
                None
            }
            Err(err) => {
                warn!(%err, "participant lookup failed; keeping persisted token for retry");
                None
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Search namespace (encrypted metadata mirror, memory-only results)
    // ─────────────────────────────────────────────────────────────────────────

    /// Cache search results and mirror the metadata that produced them.
    pub async fn set_search_results(&self, results: Vec<Participant>, metadata: SearchMetadata) {
        self.write_state(|s| {
            s.search_results = Some(results);
            s.search_metadata = Some(metadata.clone());
        });
        self.persist_encrypted(keys::SEARCH_METADATA_KEY, &metadata).await;
    }

    /// The cached search results, if any.
    pub fn search_results(&self) -> Option<Vec<Participant>> {
        self.read_state(|s| s.search_results.clone())
    }

    /// The metadata describing the cached search.
    pub fn search_metadata(&self) -> Option<SearchMetadata> {
        self.read_state(|s| s.search_metadata.clone())
    }

    /// Whether search results are cached.
    pub fn has_search_results(&self) -> bool {
        self.read_state(|s| s.search_results.is_some())
    }

    /// Clear cached results and metadata, memory and mirror.
    pub async fn clear_search_results(&self) {
        self.write_state(|s| {
            s.search_results = None;
            s.search_metadata = None;
        });
        self.remove_record(keys::SEARCH_METADATA_KEY).await;
    }

    /// Decode the persisted metadata mirror directly.
    ///
    /// Unlike hydration, failures here surface to the caller and the
    /// persisted record is left untouched.
    pub async fn cached_search_metadata(&self) -> Result<Option<SearchMetadata>> {
        let Some(identity) = self.current_identity() else {
            return Err(CodecError::MissingIdentity.into());
        };

        let Some(payload) = self.storage.read(keys::SEARCH_METADATA_KEY).await? else {
            return Ok(None);
        };

        let plaintext = codec::decode(&payload, &identity)?;
        let metadata =
            serde_json::from_str(&plaintext).map_err(|err| SessionError::InvalidRecord {
                namespace: keys::SEARCH_METADATA_KEY,
                reason: err.to_string(),
            })?;

        Ok(Some(metadata))
    }

    /// Install predefined searches if none exist yet. A metadata record
    /// that already carries predefined entries is left untouched.
    pub async fn initialize_predefined_metadata(
        &self,
        defaults: BTreeMap<String, PredefinedSearch>,
    ) {
        let installed = self.write_state(|s| {
            let metadata = s.search_metadata.get_or_insert_with(SearchMetadata::default);
            if metadata.has_predefined() {
                None
            } else {
                metadata.predefined = defaults;
                Some(metadata.clone())
            }
        });

        match installed {
            Some(metadata) => self.persist_encrypted(keys::SEARCH_METADATA_KEY, &metadata).await,
            None => debug!("predefined searches already initialized"),
        }
    }

    /// Insert or replace one predefined search.
    pub async fn update_predefined_metadata(&self, name: impl Into<String>, entry: PredefinedSearch) {
        let metadata = self.write_state(|s| {
            let metadata = s.search_metadata.get_or_insert_with(SearchMetadata::default);
            metadata.predefined.insert(name.into(), entry);
            metadata.clone()
        });

        self.persist_encrypted(keys::SEARCH_METADATA_KEY, &metadata).await;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Statistics namespace (encrypted)
    // ─────────────────────────────────────────────────────────────────────────

    /// Store a statistics snapshot. The timestamp is normalized: anything
    /// non-finite or negative becomes `0`, which always reads as stale.
    pub async fn set_stats(&self, snapshot: StatsSnapshot, raw_updated_at_ms: f64) {
        let updated_at = normalize_timestamp(raw_updated_at_ms);

        self.write_state(|s| {
            s.stats = Some(snapshot.clone());
            s.stats_updated_at = updated_at;
        });

        let record = StatsRecord { snapshot, updated_at };
        self.persist_encrypted(keys::STATS_STATE_KEY, &record).await;
    }

    /// The statistics snapshot, if any.
    pub fn stats(&self) -> Option<StatsSnapshot> {
        self.read_state(|s| s.stats.clone())
    }

    /// When the snapshot was produced, in ms since the epoch.
    pub fn stats_updated_at(&self) -> u64 {
        self.read_state(|s| s.stats_updated_at)
    }

    /// Whether the snapshot is younger than
    /// [`cohort_session_state::STATS_FRESHNESS_WINDOW`]. A stale or absent
    /// snapshot tells the dashboard to fetch fresh numbers.
    pub fn stats_are_fresh(&self) -> bool {
        self.read_state(|s| s.stats.is_some() && is_fresh(s.stats_updated_at, now_millis()))
    }

    /// Clear the snapshot, memory and mirror.
    pub async fn clear_stats(&self) {
        self.write_state(|s| {
            s.stats = None;
            s.stats_updated_at = 0;
        });
        self.remove_record(keys::STATS_STATE_KEY).await;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Role flags namespace (plaintext)
    // ─────────────────────────────────────────────────────────────────────────

    /// Merge a partial role-flag update. Values are coerced to strict
    /// booleans; unset fields keep their current value.
    pub async fn set_role_flags(&self, update: RoleFlagUpdate) {
        let flags = self.write_state(|s| {
            s.role_flags.apply(update);
            s.role_flags
        });
        self.persist_plain(keys::ROLE_FLAGS_KEY, &flags).await;
    }

    /// The current role flags.
    pub fn role_flags(&self) -> RoleFlags {
        self.read_state(|s| s.role_flags)
    }

    /// Reset role flags, memory and mirror.
    pub async fn clear_role_flags(&self) {
        self.write_state(|s| s.role_flags = RoleFlags::default());
        self.remove_record(keys::ROLE_FLAGS_KEY).await;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // UI flags namespace (plaintext)
    // ─────────────────────────────────────────────────────────────────────────

    /// Show or hide the site filter dropdown.
    pub async fn set_site_dropdown_visible(&self, visible: impl Into<FlagInput>) {
        let flags = self.write_state(|s| {
            s.ui_flags.site_dropdown_visible = visible.into().as_bool();
            s.ui_flags.clone()
        });
        self.persist_plain(keys::UI_FLAGS_KEY, &flags).await;
    }

    /// Whether the site filter dropdown is shown.
    pub fn is_site_dropdown_visible(&self) -> bool {
        self.read_state(|s| s.ui_flags.site_dropdown_visible)
    }

    /// Merge a partial withdrawal-status update.
    pub async fn set_withdrawal_status_flags(&self, update: WithdrawalStatusUpdate) {
        let flags = self.write_state(|s| {
            s.ui_flags.withdrawal_status.apply(update);
            s.ui_flags.clone()
        });
        self.persist_plain(keys::UI_FLAGS_KEY, &flags).await;
    }

    /// The current withdrawal-status flags.
    pub fn withdrawal_status_flags(&self) -> WithdrawalStatusFlags {
        self.read_state(|s| s.ui_flags.withdrawal_status)
    }

    /// Reset the withdrawal-status flags only.
    pub async fn clear_withdrawal_status_flags(&self) {
        let flags = self.write_state(|s| {
            s.ui_flags.withdrawal_status = WithdrawalStatusFlags::default();
            s.ui_flags.clone()
        });
        self.persist_plain(keys::UI_FLAGS_KEY, &flags).await;
    }

    /// Select the column driving the results table sort.
    pub async fn set_active_column(&self, column: impl Into<String>) {
        let flags = self.write_state(|s| {
            s.ui_flags.active_column = Some(column.into());
            s.ui_flags.clone()
        });
        self.persist_plain(keys::UI_FLAGS_KEY, &flags).await;
    }

    /// The active sort column, if one is selected.
    pub fn active_column(&self) -> Option<String> {
        self.read_state(|s| s.ui_flags.active_column.clone())
    }

    /// Reset every UI flag, memory and mirror.
    pub async fn clear_ui_flags(&self) {
        self.write_state(|s| s.ui_flags = UiFlags::default());
        self.remove_record(keys::UI_FLAGS_KEY).await;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Reports namespace (memory only)
    // ─────────────────────────────────────────────────────────────────────────

    /// Cache generated reports.
    pub fn set_reports(&self, reports: Vec<Report>) {
        self.write_state(|s| s.reports = Some(reports));
    }

    /// The cached reports, if any.
    pub fn reports(&self) -> Option<Vec<Report>> {
        self.read_state(|s| s.reports.clone())
    }

    /// Drop the cached reports.
    pub fn clear_reports(&self) {
        self.write_state(|s| s.reports = None);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Unsaved-changes flag (memory only)
    // ─────────────────────────────────────────────────────────────────────────

    /// Record that the UI holds edits not yet saved.
    pub fn mark_unsaved(&self) {
        self.write_state(|s| s.unsaved_changes = true);
    }

    /// Record that all edits are saved.
    pub fn clear_unsaved(&self) {
        self.write_state(|s| s.unsaved_changes = false);
    }

    /// Whether the UI holds unsaved edits.
    pub fn has_unsaved_changes(&self) -> bool {
        self.read_state(|s| s.unsaved_changes)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Teardown
    // ─────────────────────────────────────────────────────────────────────────

    /// Tear down the session: reset every namespace to its default, remove
    /// every persisted record, and fire the sign-out side effects.
    ///
    /// Unconditional and idempotent - calling with no active session is a
    /// safe no-op beyond resetting defaults.
    pub async fn clear_session(&self) {
        self.write_state(|s| *s = AppState::default());

        for key in keys::SESSION_KEYS {
            self.remove_record(key).await;
        }

        self.reset_identity_tracking();

        self.hooks.sign_out().await;
        self.hooks.hide_loading_indicator();
        self.hooks.reset_navigation();
    }
}
