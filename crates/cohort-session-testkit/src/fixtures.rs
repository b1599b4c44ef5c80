//! Test fixtures and doubles.
//!
//! Common setup code for exercising the session manager with observable
//! collaborators: a storage area that counts operations, a scripted backend
//! lookup, and teardown hooks that record their invocations.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use cohort_session::{
    AppState, LookupError, LookupOutcome, ParticipantLookup, SessionHooks, SessionManager,
};
use cohort_session_state::{
    Participant, PredefinedSearch, SearchMetadata, StatsSnapshot, UserSessionRecord,
};
use cohort_session_store::{MemoryStorage, Result as StorageResult, StorageArea};

/// Storage area wrapper that counts operations per key.
///
/// Lets tests assert not just on stored values but on how often the manager
/// touched storage - e.g. that a repeated hydration performs no additional
/// reads of the encrypted keys.
pub struct CountingStorage {
    inner: MemoryStorage,
    reads: Mutex<HashMap<String, usize>>,
    writes: Mutex<HashMap<String, usize>>,
    removes: Mutex<HashMap<String, usize>>,
}

impl CountingStorage {
    /// Create an empty counting storage area.
    pub fn new() -> Self {
        Self {
            inner: MemoryStorage::new(),
            reads: Mutex::new(HashMap::new()),
            writes: Mutex::new(HashMap::new()),
            removes: Mutex::new(HashMap::new()),
        }
    }

    /// How many times `key` has been read.
    pub fn reads_of(&self, key: &str) -> usize {
        self.reads.lock().unwrap().get(key).copied().unwrap_or(0)
    }

    /// How many times `key` has been written.
    pub fn writes_of(&self, key: &str) -> usize {
        self.writes.lock().unwrap().get(key).copied().unwrap_or(0)
    }

    /// How many times `key` has been removed.
    pub fn removes_of(&self, key: &str) -> usize {
        self.removes.lock().unwrap().get(key).copied().unwrap_or(0)
    }

    /// The wrapped memory area, for seeding tamper scenarios and direct
    /// assertions.
    pub fn raw(&self) -> &MemoryStorage {
        &self.inner
    }

    fn bump(counter: &Mutex<HashMap<String, usize>>, key: &str) {
        *counter.lock().unwrap().entry(key.to_string()).or_insert(0) += 1;
    }
}

impl Default for CountingStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StorageArea for CountingStorage {
    async fn read(&self, key: &str) -> StorageResult<Option<String>> {
        Self::bump(&self.reads, key);
        self.inner.read(key).await
    }

    async fn write(&self, key: &str, value: &str) -> StorageResult<()> {
        Self::bump(&self.writes, key);
        self.inner.write(key, value).await
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        Self::bump(&self.removes, key);
        self.inner.remove(key).await
    }
}

/// What a [`StubLookup`] resolves to.
#[derive(Debug, Clone)]
pub enum StubOutcome {
    /// Resolve to this participant.
    Found(Participant),
    /// Resolve to "token unknown".
    NotFound,
    /// Fail with a transient error.
    Fail(String),
}

/// Scripted participant-lookup double with a call counter and an optional
/// artificial delay for concurrency tests.
pub struct StubLookup {
    outcome: Mutex<StubOutcome>,
    delay: Mutex<Option<Duration>>,
    calls: AtomicUsize,
}

impl StubLookup {
    fn with(outcome: StubOutcome) -> Arc<Self> {
        Arc::new(Self {
            outcome: Mutex::new(outcome),
            delay: Mutex::new(None),
            calls: AtomicUsize::new(0),
        })
    }

    /// A lookup that resolves to `participant`.
    pub fn found(participant: Participant) -> Arc<Self> {
        Self::with(StubOutcome::Found(participant))
    }

    /// A lookup that reports the token as unknown.
    pub fn not_found() -> Arc<Self> {
        Self::with(StubOutcome::NotFound)
    }

    /// A lookup that fails transiently.
    pub fn failing(message: impl Into<String>) -> Arc<Self> {
        Self::with(StubOutcome::Fail(message.into()))
    }

    /// Change what subsequent calls resolve to.
    pub fn set_outcome(&self, outcome: StubOutcome) {
        *self.outcome.lock().unwrap() = outcome;
    }

    /// Hold each call open for `delay` before resolving, so concurrent
    /// callers can pile up behind one in-flight lookup.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    /// How many times the lookup has been called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ParticipantLookup for StubLookup {
    async fn fetch_by_token(&self, _token: &str) -> Result<LookupOutcome, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match self.outcome.lock().unwrap().clone() {
            StubOutcome::Found(participant) => Ok(LookupOutcome::Found(participant)),
            StubOutcome::NotFound => Ok(LookupOutcome::NotFound),
            StubOutcome::Fail(message) => Err(LookupError(message)),
        }
    }
}

/// Teardown hooks that record their invocations.
#[derive(Default)]
pub struct RecordingHooks {
    sign_outs: AtomicUsize,
    loading_hidden: AtomicUsize,
    navigation_resets: AtomicUsize,
}

impl RecordingHooks {
    /// Create fresh recording hooks.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// How many times sign-out fired.
    pub fn sign_outs(&self) -> usize {
        self.sign_outs.load(Ordering::SeqCst)
    }

    /// How many times the loading indicator was hidden.
    pub fn loading_hidden(&self) -> usize {
        self.loading_hidden.load(Ordering::SeqCst)
    }

    /// How many times navigation was reset.
    pub fn navigation_resets(&self) -> usize {
        self.navigation_resets.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionHooks for RecordingHooks {
    async fn sign_out(&self) {
        self.sign_outs.fetch_add(1, Ordering::SeqCst);
    }

    fn hide_loading_indicator(&self) {
        self.loading_hidden.fetch_add(1, Ordering::SeqCst);
    }

    fn reset_navigation(&self) {
        self.navigation_resets.fetch_add(1, Ordering::SeqCst);
    }
}

/// A fully wired session manager with observable collaborators.
///
/// The storage area is shared behind an `Arc`, so [`TestFixture::reload`]
/// can stand up a fresh manager over the same persisted records the way a
/// page reload does.
pub struct TestFixture {
    pub manager: SessionManager<Arc<CountingStorage>>,
    pub storage: Arc<CountingStorage>,
    pub lookup: Arc<StubLookup>,
    pub hooks: Arc<RecordingHooks>,
}

impl TestFixture {
    /// Create a fixture whose lookup reports tokens as unknown.
    pub fn new() -> Self {
        Self::with_lookup(StubLookup::not_found())
    }

    /// Create a fixture with a specific lookup double.
    pub fn with_lookup(lookup: Arc<StubLookup>) -> Self {
        let storage = Arc::new(CountingStorage::new());
        let hooks = RecordingHooks::new();
        let manager = SessionManager::new(
            storage.clone(),
            lookup.clone() as Arc<dyn ParticipantLookup>,
            hooks.clone() as Arc<dyn SessionHooks>,
        );

        Self {
            manager,
            storage,
            lookup,
            hooks,
        }
    }

    /// Discard all in-memory state and reattach a fresh manager to the same
    /// storage, simulating a page reload.
    pub fn reload(&mut self) {
        self.manager = SessionManager::new(
            self.storage.clone(),
            self.lookup.clone() as Arc<dyn ParticipantLookup>,
            self.hooks.clone() as Arc<dyn SessionHooks>,
        );
    }

    /// Sign a sample user in and run hydration.
    pub async fn sign_in(&self, email: &str) -> AppState {
        self.manager.set_user(sample_user(email)).await;
        self.manager.initialize().await
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// A valid user session record for `email`.
pub fn sample_user(email: &str) -> UserSessionRecord {
    let mut record = UserSessionRecord::new(email);
    record.display_name = Some("Site Coordinator".to_string());
    record
}

/// A participant record carrying `token`.
pub fn sample_participant(token: &str) -> Participant {
    let mut participant = Participant::new(token);
    participant.study_id = Some("CS-0042".to_string());
    participant.first_name = Some("Alex".to_string());
    participant.last_name = Some("Rivera".to_string());
    participant.site = Some("north".to_string());
    participant.enrollment_status = Some("active".to_string());
    participant
}

/// A small statistics snapshot.
pub fn sample_stats() -> StatsSnapshot {
    StatsSnapshot {
        total_participants: 128,
        active: 100,
        withdrawn: 28,
        verified: 87,
        by_site: BTreeMap::from([("north".to_string(), 70), ("south".to_string(), 58)]),
    }
}

/// Search metadata with one filter and one predefined search.
pub fn sample_metadata() -> SearchMetadata {
    let mut metadata = SearchMetadata {
        query: Some("rivera".to_string()),
        site: Some("north".to_string()),
        ..SearchMetadata::default()
    };
    metadata
        .filters
        .insert("enrollmentStatus".to_string(), "active".to_string());
    metadata.predefined.insert(
        "recentlyVerified".to_string(),
        PredefinedSearch::new("Recently verified"),
    );
    metadata
}
