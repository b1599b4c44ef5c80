//! End-to-end lifecycle tests: hydration across reloads, identity switches,
//! tamper degradation, recovery coalescing, and teardown.

use std::collections::BTreeMap;
use std::time::Duration;

use cohort_session::state::{
    now_millis, AppState, PredefinedSearch, RoleFlagUpdate, UserSessionRecord,
    WithdrawalStatusUpdate,
};
use cohort_session::store::keys;
use cohort_session::SessionError;
use cohort_session_testkit::{
    sample_metadata, sample_participant, sample_stats, sample_user, StubLookup, StubOutcome,
    TestFixture,
};

const EMAIL: &str = "coordinator@example.org";
const MINUTE_MS: u64 = 60 * 1000;

/// Capture the manager's degradation warnings in test output.
fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

// ─────────────────────────────────────────────────────────────────────────────
// Hydration
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn reload_restores_encrypted_namespaces() {
    let mut fixture = TestFixture::new();
    fixture.sign_in(EMAIL).await;

    fixture.manager.set_stats(sample_stats(), now_millis() as f64).await;
    fixture
        .manager
        .set_search_results(vec![sample_participant("tok-1")], sample_metadata())
        .await;

    fixture.reload();
    let state = fixture.manager.initialize().await;

    assert_eq!(state.user, Some(sample_user(EMAIL)));
    assert_eq!(state.stats, Some(sample_stats()));
    assert_eq!(state.search_metadata, Some(sample_metadata()));
    // Results are memory-only; a reload keeps the query, not the rows.
    assert_eq!(state.search_results, None);
}

#[tokio::test]
async fn hydration_is_idempotent_per_identity() {
    let mut fixture = TestFixture::new();
    fixture.sign_in(EMAIL).await;
    fixture.manager.set_stats(sample_stats(), now_millis() as f64).await;

    fixture.reload();
    let first = fixture.manager.initialize().await;

    let stats_reads = fixture.storage.reads_of(keys::STATS_STATE_KEY);
    let metadata_reads = fixture.storage.reads_of(keys::SEARCH_METADATA_KEY);
    let token_reads = fixture.storage.reads_of(keys::PARTICIPANT_TOKEN_KEY);

    let second = fixture.manager.initialize().await;

    assert_eq!(first, second);
    assert_eq!(fixture.storage.reads_of(keys::STATS_STATE_KEY), stats_reads);
    assert_eq!(fixture.storage.reads_of(keys::SEARCH_METADATA_KEY), metadata_reads);
    assert_eq!(fixture.storage.reads_of(keys::PARTICIPANT_TOKEN_KEY), token_reads);
}

#[tokio::test]
async fn identity_switch_resets_encrypted_namespaces() {
    let fixture = TestFixture::new();
    fixture.sign_in("first-user@example.org").await;

    fixture.manager.set_stats(sample_stats(), now_millis() as f64).await;
    fixture
        .manager
        .set_search_results(vec![sample_participant("tok-1")], sample_metadata())
        .await;

    fixture.manager.set_user(sample_user("second-user@example.org")).await;
    let state = fixture.manager.initialize().await;

    // The first user's values must not leak into the second user's session.
    assert_eq!(state.stats, None);
    assert_eq!(state.search_metadata, None);
    assert_eq!(state.participant, None);

    // The undecryptable records are gone, not lingering for a second
    // failed decrypt later.
    assert_eq!(fixture.storage.raw().get_raw(keys::STATS_STATE_KEY), None);
    assert_eq!(fixture.storage.raw().get_raw(keys::SEARCH_METADATA_KEY), None);
}

#[tokio::test]
async fn garbage_record_hydrates_to_default_and_is_removed() {
    init_tracing();
    let mut fixture = TestFixture::new();
    fixture.sign_in(EMAIL).await;
    fixture.manager.set_stats(sample_stats(), now_millis() as f64).await;

    fixture.storage.raw().put_raw(keys::STATS_STATE_KEY, "complete garbage");

    fixture.reload();
    let state = fixture.manager.initialize().await;

    assert_eq!(state.stats, None);
    assert_eq!(
        fixture.storage.raw().get_raw(keys::STATS_STATE_KEY),
        None,
        "garbage record must be removed from storage"
    );
}

#[tokio::test]
async fn flipped_ciphertext_hydrates_to_default_and_is_removed() {
    init_tracing();
    let mut fixture = TestFixture::new();
    fixture.sign_in(EMAIL).await;
    fixture.manager.set_stats(sample_stats(), now_millis() as f64).await;

    let payload = fixture.storage.raw().get_raw(keys::STATS_STATE_KEY).unwrap();
    let mut corrupted: Vec<char> = payload.chars().collect();
    let last = corrupted.len() - 1;
    corrupted[last] = if corrupted[last] == 'A' { 'B' } else { 'A' };
    let corrupted: String = corrupted.into_iter().collect();
    fixture.storage.raw().put_raw(keys::STATS_STATE_KEY, &corrupted);

    fixture.reload();
    let state = fixture.manager.initialize().await;

    assert_eq!(state.stats, None);
    assert_eq!(fixture.storage.raw().get_raw(keys::STATS_STATE_KEY), None);
}

#[tokio::test]
async fn unauthenticated_initialize_skips_encrypted_records() {
    let fixture = TestFixture::new();

    // A record left behind by someone else's session.
    let payload = cohort_session::codec::encode("{\"snapshot\":{},\"updatedAt\":1}", "other@example.org").unwrap();
    fixture.storage.raw().put_raw(keys::STATS_STATE_KEY, &payload);

    let state = fixture.manager.initialize().await;

    assert_eq!(state.user, None);
    assert_eq!(state.stats, None);
    assert_eq!(
        fixture.storage.reads_of(keys::STATS_STATE_KEY),
        0,
        "no decode may be attempted without an identity"
    );
    assert!(
        fixture.storage.raw().get_raw(keys::STATS_STATE_KEY).is_some(),
        "the record stays for a later sign-in"
    );
}

#[tokio::test]
async fn malformed_user_session_record_is_dropped() {
    let fixture = TestFixture::new();
    fixture.storage.raw().put_raw(keys::USER_SESSION_KEY, "{not json");

    let state = fixture.manager.initialize().await;

    assert_eq!(state.user, None);
    assert_eq!(fixture.storage.raw().get_raw(keys::USER_SESSION_KEY), None);
}

// ─────────────────────────────────────────────────────────────────────────────
// Recovery coalescing
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn concurrent_recovery_coalesces_to_one_lookup() {
    let lookup = StubLookup::found(sample_participant("tok-7"));
    lookup.set_delay(Duration::from_millis(20));
    let mut fixture = TestFixture::with_lookup(lookup);

    fixture.sign_in(EMAIL).await;
    fixture.manager.set_participant(sample_participant("tok-7")).await;

    fixture.reload();
    fixture.manager.initialize().await;
    assert!(!fixture.manager.has_participant());

    let (a, b, c) = tokio::join!(
        fixture.manager.recover_participant(),
        fixture.manager.recover_participant(),
        fixture.manager.recover_participant(),
    );

    let expected = Some(sample_participant("tok-7"));
    assert_eq!(a, expected);
    assert_eq!(b, expected);
    assert_eq!(c, expected);
    assert_eq!(fixture.lookup.calls(), 1, "exactly one backend lookup");
    assert!(fixture.manager.has_participant());
}

#[tokio::test]
async fn recovery_returns_cached_participant_without_lookup() {
    let fixture = TestFixture::with_lookup(StubLookup::found(sample_participant("tok-7")));
    fixture.sign_in(EMAIL).await;
    fixture.manager.set_participant(sample_participant("tok-7")).await;

    let recovered = fixture.manager.recover_participant().await;

    assert_eq!(recovered, Some(sample_participant("tok-7")));
    assert_eq!(fixture.lookup.calls(), 0);
}

#[tokio::test]
async fn recovery_not_found_clears_the_persisted_token() {
    let mut fixture = TestFixture::with_lookup(StubLookup::not_found());
    fixture.sign_in(EMAIL).await;
    fixture.manager.set_participant(sample_participant("tok-gone")).await;

    fixture.reload();
    fixture.manager.initialize().await;

    assert_eq!(fixture.manager.recover_participant().await, None);
    assert_eq!(fixture.storage.raw().get_raw(keys::PARTICIPANT_TOKEN_KEY), None);
    assert_eq!(fixture.lookup.calls(), 1);

    // With the token gone, a later attempt does not hit the backend again.
    assert_eq!(fixture.manager.recover_participant().await, None);
    assert_eq!(fixture.lookup.calls(), 1);
}

#[tokio::test]
async fn recovery_failure_keeps_the_token_for_retry() {
    let lookup = StubLookup::failing("connection reset");
    let mut fixture = TestFixture::with_lookup(lookup);
    fixture.sign_in(EMAIL).await;
    fixture.manager.set_participant(sample_participant("tok-7")).await;

    fixture.reload();
    fixture.manager.initialize().await;

    assert_eq!(fixture.manager.recover_participant().await, None);
    assert!(
        fixture.storage.raw().get_raw(keys::PARTICIPANT_TOKEN_KEY).is_some(),
        "transient failure must not discard the token"
    );

    fixture.lookup.set_outcome(StubOutcome::Found(sample_participant("tok-7")));
    assert_eq!(
        fixture.manager.recover_participant().await,
        Some(sample_participant("tok-7"))
    );
    assert_eq!(fixture.lookup.calls(), 2);
}

#[tokio::test]
async fn recovery_without_identity_returns_none() {
    let fixture = TestFixture::with_lookup(StubLookup::found(sample_participant("tok-7")));
    fixture.manager.initialize().await;

    assert_eq!(fixture.manager.recover_participant().await, None);
    assert_eq!(fixture.lookup.calls(), 0);
}

// ─────────────────────────────────────────────────────────────────────────────
// Namespace behavior
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn role_flags_normalize_and_merge() {
    let fixture = TestFixture::new();
    fixture.sign_in(EMAIL).await;

    for update in [
        r#"{"coordinatingCenter":"1"}"#,
        r#"{"coordinatingCenter":1}"#,
        r#"{"coordinatingCenter":true}"#,
    ] {
        let update: RoleFlagUpdate = serde_json::from_str(update).unwrap();
        fixture.manager.set_role_flags(update).await;
        assert!(fixture.manager.role_flags().coordinating_center);
    }

    fixture
        .manager
        .set_role_flags(RoleFlagUpdate {
            helpdesk: Some(true.into()),
            ..RoleFlagUpdate::default()
        })
        .await;

    let flags = fixture.manager.role_flags();
    assert!(flags.coordinating_center, "partial update must preserve other flags");
    assert!(flags.helpdesk);
}

#[tokio::test]
async fn ui_flags_roundtrip_through_reload() {
    let mut fixture = TestFixture::new();
    fixture.sign_in(EMAIL).await;

    fixture.manager.set_site_dropdown_visible("true").await;
    fixture
        .manager
        .set_withdrawal_status_flags(WithdrawalStatusUpdate {
            withdrew_consent: Some(1.into()),
            ..WithdrawalStatusUpdate::default()
        })
        .await;
    fixture.manager.set_active_column("lastName").await;

    fixture.reload();
    let state = fixture.manager.initialize().await;

    assert!(state.ui_flags.site_dropdown_visible);
    assert!(state.ui_flags.withdrawal_status.withdrew_consent);
    assert_eq!(state.ui_flags.active_column.as_deref(), Some("lastName"));

    fixture.manager.clear_withdrawal_status_flags().await;
    assert!(!fixture.manager.withdrawal_status_flags().withdrew_consent);
    assert!(fixture.manager.is_site_dropdown_visible(), "other UI flags survive");
}

#[tokio::test]
async fn stats_freshness_window() {
    let fixture = TestFixture::new();
    fixture.sign_in(EMAIL).await;
    let now = now_millis();

    fixture
        .manager
        .set_stats(sample_stats(), (now - 19 * MINUTE_MS) as f64)
        .await;
    assert!(fixture.manager.stats_are_fresh());

    fixture
        .manager
        .set_stats(sample_stats(), (now - 21 * MINUTE_MS) as f64)
        .await;
    assert!(!fixture.manager.stats_are_fresh());

    for raw in [-5.0, f64::NAN, f64::INFINITY] {
        fixture.manager.set_stats(sample_stats(), raw).await;
        assert_eq!(fixture.manager.stats_updated_at(), 0);
        assert!(!fixture.manager.stats_are_fresh());
    }
}

#[tokio::test]
async fn invalid_user_session_is_a_noop() {
    let fixture = TestFixture::new();
    fixture.sign_in(EMAIL).await;

    fixture.manager.set_user(UserSessionRecord::new("not-an-email")).await;
    fixture.manager.set_user(UserSessionRecord::new("")).await;

    assert_eq!(fixture.manager.user_email().as_deref(), Some(EMAIL));
}

#[tokio::test]
async fn participant_without_token_is_rejected() {
    let fixture = TestFixture::new();
    fixture.sign_in(EMAIL).await;

    fixture.manager.set_participant(sample_participant("")).await;

    assert!(!fixture.manager.has_participant());
    assert_eq!(fixture.storage.raw().get_raw(keys::PARTICIPANT_TOKEN_KEY), None);
}

#[tokio::test]
async fn cached_search_metadata_surfaces_decode_failures() {
    let fixture = TestFixture::new();
    fixture.sign_in(EMAIL).await;
    fixture
        .manager
        .set_search_results(vec![sample_participant("tok-1")], sample_metadata())
        .await;

    assert_eq!(
        fixture.manager.cached_search_metadata().await.unwrap(),
        Some(sample_metadata())
    );

    fixture.storage.raw().put_raw(keys::SEARCH_METADATA_KEY, "v1:AAAAAAAAAAAAAAAA:AAAA");
    let err = fixture.manager.cached_search_metadata().await.unwrap_err();
    assert!(matches!(err, SessionError::Codec(_)));
    assert!(
        fixture.storage.raw().get_raw(keys::SEARCH_METADATA_KEY).is_some(),
        "a direct decode leaves the record in place"
    );
}

#[tokio::test]
async fn predefined_metadata_initializes_once_and_updates() {
    let fixture = TestFixture::new();
    fixture.sign_in(EMAIL).await;

    let defaults = BTreeMap::from([(
        "active".to_string(),
        PredefinedSearch::new("Active participants"),
    )]);
    fixture.manager.initialize_predefined_metadata(defaults).await;

    let overwrite = BTreeMap::from([(
        "everything".to_string(),
        PredefinedSearch::new("All participants"),
    )]);
    fixture.manager.initialize_predefined_metadata(overwrite).await;

    let metadata = fixture.manager.search_metadata().unwrap();
    assert!(metadata.predefined.contains_key("active"), "first install wins");
    assert!(!metadata.predefined.contains_key("everything"));

    fixture
        .manager
        .update_predefined_metadata("verified", PredefinedSearch::new("Verified only"))
        .await;
    let metadata = fixture.manager.search_metadata().unwrap();
    assert!(metadata.predefined.contains_key("active"));
    assert!(metadata.predefined.contains_key("verified"));
}

#[tokio::test]
async fn persisted_records_match_the_wire_contract() {
    let fixture = TestFixture::new();
    fixture.sign_in(EMAIL).await;
    fixture.manager.set_stats(sample_stats(), now_millis() as f64).await;

    let user_json = fixture.storage.raw().get_raw(keys::USER_SESSION_KEY).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&user_json).unwrap();
    assert_eq!(parsed["email"], EMAIL);

    let stats_payload = fixture.storage.raw().get_raw(keys::STATS_STATE_KEY).unwrap();
    assert!(stats_payload.starts_with("v1:"));
    assert_eq!(stats_payload.split(':').count(), 3);
    assert!(!stats_payload.contains("totalParticipants"), "stats must not persist in the clear");
}

// ─────────────────────────────────────────────────────────────────────────────
// Teardown
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn teardown_clears_everything_and_signs_out_once() {
    let fixture = TestFixture::with_lookup(StubLookup::found(sample_participant("tok-7")));
    fixture.sign_in(EMAIL).await;

    fixture.manager.set_participant(sample_participant("tok-7")).await;
    fixture.manager.set_stats(sample_stats(), now_millis() as f64).await;
    fixture
        .manager
        .set_search_results(vec![sample_participant("tok-7")], sample_metadata())
        .await;
    fixture
        .manager
        .set_role_flags(RoleFlagUpdate {
            coordinating_center: Some(true.into()),
            ..RoleFlagUpdate::default()
        })
        .await;
    fixture.manager.set_site_dropdown_visible(true).await;
    fixture.manager.set_reports(Vec::new());
    fixture.manager.mark_unsaved();

    fixture.manager.clear_session().await;

    assert_eq!(fixture.manager.snapshot(), AppState::default());
    for key in keys::SESSION_KEYS {
        assert_eq!(
            fixture.storage.raw().get_raw(key),
            None,
            "key {key} must be absent after teardown"
        );
    }
    assert_eq!(fixture.hooks.sign_outs(), 1);
    assert_eq!(fixture.hooks.loading_hidden(), 1);
    assert_eq!(fixture.hooks.navigation_resets(), 1);
}

#[tokio::test]
async fn teardown_with_no_session_is_safe() {
    let fixture = TestFixture::new();

    fixture.manager.clear_session().await;
    fixture.manager.clear_session().await;

    assert_eq!(fixture.manager.snapshot(), AppState::default());
    assert_eq!(fixture.hooks.sign_outs(), 2);
}

#[tokio::test]
async fn sign_out_then_sign_in_rehydrates_fresh() {
    let fixture = TestFixture::new();
    fixture.sign_in(EMAIL).await;
    fixture.manager.set_stats(sample_stats(), now_millis() as f64).await;

    fixture.manager.clear_session().await;

    let state = fixture.sign_in("next-user@example.org").await;
    assert_eq!(state.stats, None);
    assert_eq!(state.user.as_ref().map(|u| u.email.as_str()), Some("next-user@example.org"));
}
