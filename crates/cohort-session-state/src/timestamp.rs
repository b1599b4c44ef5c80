//! Timestamp normalization and the statistics freshness window.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// How long a hydrated statistics snapshot stays usable without a fresh
/// backend fetch. Caller-visible; not re-derived per namespace.
pub const STATS_FRESHNESS_WINDOW: Duration = Duration::from_secs(20 * 60);

/// Normalize a loosely-typed millisecond timestamp.
///
/// Only finite values >= 0 are accepted; negative, NaN, and infinite inputs
/// all normalize to `0`, which downstream treats as "always stale". Out of
/// range is never an error.
pub fn normalize_timestamp(raw: f64) -> u64 {
    if raw.is_finite() && raw >= 0.0 {
        raw as u64
    } else {
        0
    }
}

/// Whether a snapshot updated at `updated_at_ms` is still fresh at `now_ms`.
pub fn is_fresh(updated_at_ms: u64, now_ms: u64) -> bool {
    now_ms.saturating_sub(updated_at_ms) <= STATS_FRESHNESS_WINDOW.as_millis() as u64
}

/// Current wall-clock time in milliseconds.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_millis() as u64
}
