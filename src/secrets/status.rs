//! Lifecycle status of a secret relative to a point in time.

use std::fmt;

use serde::Serialize;

/// Seconds before expiry during which a secret counts as `Expiring` (7 days).
pub const WARNING_WINDOW_SECS: i64 = 7 * 24 * 60 * 60;

/// Lifecycle state derived from a secret's expiry timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SecretStatus {
    Active,
    Expiring,
    Expired,
}

impl SecretStatus {
    /// Lowercase name, as shown in tables and accepted by `--status`.
    pub fn as_str(self) -> &'static str {
        match self {
            SecretStatus::Active => "active",
            SecretStatus::Expiring => "expiring",
            SecretStatus::Expired => "expired",
        }
    }

    /// Parse a status name (case-insensitive).
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "active" => Some(SecretStatus::Active),
            "expiring" => Some(SecretStatus::Expiring),
            "expired" => Some(SecretStatus::Expired),
            _ => None,
        }
    }
}

impl fmt::Display for SecretStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a secret by its expiry timestamp at time `now` (both Unix seconds).
///
/// - no expiry → `Active`
/// - `expires_at - now <= 0` → `Expired`
/// - `0 < expires_at - now < WARNING_WINDOW_SECS` → `Expiring`
/// - otherwise `Active`
pub fn classify(expires_at: Option<i64>, now: i64) -> SecretStatus {
    let Some(expires_at) = expires_at else {
        return SecretStatus::Active;
    };

    let remaining = expires_at.saturating_sub(now);
    if remaining <= 0 {
        SecretStatus::Expired
    } else if remaining < WARNING_WINDOW_SECS {
        SecretStatus::Expiring
    } else {
        SecretStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;

    #[test]
    fn no_expiry_is_active() {
        assert_eq!(classify(None, NOW), SecretStatus::Active);
        assert_eq!(classify(None, 0), SecretStatus::Active);
        assert_eq!(classify(None, i64::MAX), SecretStatus::Active);
    }

    #[test]
    fn expiry_equal_to_now_is_expired() {
        assert_eq!(classify(Some(NOW), NOW), SecretStatus::Expired);
    }

    #[test]
    fn one_second_past_is_expired() {
        assert_eq!(classify(Some(NOW - 1), NOW), SecretStatus::Expired);
    }

    #[test]
    fn one_second_left_is_expiring() {
        assert_eq!(classify(Some(NOW + 1), NOW), SecretStatus::Expiring);
    }

    #[test]
    fn warning_window_upper_edge_is_exclusive() {
        assert_eq!(
            classify(Some(NOW + WARNING_WINDOW_SECS - 1), NOW),
            SecretStatus::Expiring
        );
        assert_eq!(
            classify(Some(NOW + WARNING_WINDOW_SECS), NOW),
            SecretStatus::Active
        );
    }

    #[test]
    fn extreme_values_do_not_overflow() {
        assert_eq!(classify(Some(i64::MIN), i64::MAX), SecretStatus::Expired);
        assert_eq!(classify(Some(i64::MAX), i64::MIN), SecretStatus::Active);
    }

    #[test]
    fn parse_accepts_any_case() {
        assert_eq!(SecretStatus::parse("Expiring"), Some(SecretStatus::Expiring));
        assert_eq!(SecretStatus::parse(" expired "), Some(SecretStatus::Expired));
        assert_eq!(SecretStatus::parse("ACTIVE"), Some(SecretStatus::Active));
        assert_eq!(SecretStatus::parse("stale"), None);
    }

    #[test]
    fn warning_window_is_seven_days() {
        assert_eq!(WARNING_WINDOW_SECS, 604_800);
    }
}
