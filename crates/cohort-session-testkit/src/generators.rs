//! Proptest generators for property-based testing.

use proptest::prelude::*;

use cohort_session_state::UserSessionRecord;

/// Generate a plausible identity: a non-empty email-shaped string, the form
/// every session record must carry.
pub fn identity() -> impl Strategy<Value = String> {
    "[a-z0-9._-]{1,24}@[a-z0-9-]{1,16}\\.(org|edu|gov)".prop_map(String::from)
}

/// Generate an arbitrary plaintext, unicode included.
pub fn plaintext() -> impl Strategy<Value = String> {
    ".{0,256}".prop_map(String::from)
}

/// Generate a JSON-object plaintext of the shape namespace values take.
pub fn json_plaintext() -> impl Strategy<Value = String> {
    ("[a-z]{1,12}", "[a-zA-Z0-9 ]{0,32}", 0u64..=u64::MAX / 2)
        .prop_map(|(key, value, count)| format!(r#"{{"{key}":"{value}","count":{count}}}"#))
}
