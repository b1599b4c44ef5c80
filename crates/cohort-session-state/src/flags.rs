//! Plaintext flag namespaces and the boolean coercion boundary.
//!
//! Flag values arrive from loosely-typed callers as booleans, numbers, or
//! strings (`true`, `1`, `"true"`). [`FlagInput`] is the single place those
//! are coerced to strict booleans; nothing else in the workspace interprets
//! loose values. Updates are partial: fields left unset keep their current
//! value.

use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};

/// A boolean-ish flag value, normalized to a strict boolean on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagInput(bool);

impl FlagInput {
    /// The normalized boolean.
    pub fn as_bool(self) -> bool {
        self.0
    }
}

impl From<bool> for FlagInput {
    fn from(value: bool) -> Self {
        Self(value)
    }
}

impl From<i32> for FlagInput {
    fn from(value: i32) -> Self {
        Self(value != 0)
    }
}

impl From<i64> for FlagInput {
    fn from(value: i64) -> Self {
        Self(value != 0)
    }
}

impl From<&str> for FlagInput {
    fn from(value: &str) -> Self {
        Self(matches!(value, "true" | "1"))
    }
}

impl From<String> for FlagInput {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl<'de> Deserialize<'de> for FlagInput {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct FlagVisitor;

        impl Visitor<'_> for FlagVisitor {
            type Value = FlagInput;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "a boolean, 0/1, or \"true\"/\"false\"")
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
                Ok(FlagInput(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(FlagInput::from(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(FlagInput(v != 0))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(FlagInput::from(v))
            }
        }

        deserializer.deserialize_any(FlagVisitor)
    }
}

/// Role flags for the signed-in user. Persisted in the clear; these are
/// access hints for the UI, not an authorization boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoleFlags {
    /// User belongs to the coordinating center.
    pub coordinating_center: bool,

    /// User coordinates a single recruiting site.
    pub site_coordinator: bool,

    /// User handles helpdesk tickets.
    pub helpdesk: bool,
}

/// Partial role-flag update; unset fields keep their current value.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoleFlagUpdate {
    pub coordinating_center: Option<FlagInput>,
    pub site_coordinator: Option<FlagInput>,
    pub helpdesk: Option<FlagInput>,
}

impl RoleFlags {
    /// Merge a partial update, coercing each provided value.
    pub fn apply(&mut self, update: RoleFlagUpdate) {
        if let Some(value) = update.coordinating_center {
            self.coordinating_center = value.as_bool();
        }
        if let Some(value) = update.site_coordinator {
            self.site_coordinator = value.as_bool();
        }
        if let Some(value) = update.helpdesk {
            self.helpdesk = value.as_bool();
        }
    }
}

/// Display flags for a participant's withdrawal status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WithdrawalStatusFlags {
    pub refused_activities: bool,
    pub withdrew_consent: bool,
    pub revoked_hipaa: bool,
    pub deceased: bool,
    pub data_destroyed: bool,
}

/// Partial withdrawal-status update; unset fields keep their current value.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WithdrawalStatusUpdate {
    pub refused_activities: Option<FlagInput>,
    pub withdrew_consent: Option<FlagInput>,
    pub revoked_hipaa: Option<FlagInput>,
    pub deceased: Option<FlagInput>,
    pub data_destroyed: Option<FlagInput>,
}

impl WithdrawalStatusFlags {
    /// Merge a partial update, coercing each provided value.
    pub fn apply(&mut self, update: WithdrawalStatusUpdate) {
        if let Some(value) = update.refused_activities {
            self.refused_activities = value.as_bool();
        }
        if let Some(value) = update.withdrew_consent {
            self.withdrew_consent = value.as_bool();
        }
        if let Some(value) = update.revoked_hipaa {
            self.revoked_hipaa = value.as_bool();
        }
        if let Some(value) = update.deceased {
            self.deceased = value.as_bool();
        }
        if let Some(value) = update.data_destroyed {
            self.data_destroyed = value.as_bool();
        }
    }
}

/// UI display flags.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UiFlags {
    /// Whether the site filter dropdown is shown.
    pub site_dropdown_visible: bool,

    /// Withdrawal-status display flags for the active participant.
    pub withdrawal_status: WithdrawalStatusFlags,

    /// Column currently driving the results table sort.
    pub active_column: Option<String>,
}
