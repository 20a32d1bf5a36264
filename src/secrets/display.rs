//! Projection of raw secret records into display records.

use chrono::DateTime;

use super::record::{SecretDisplayRecord, SecretRecord};
use super::status::classify;

/// Render a Unix-second timestamp as its UTC calendar date (`YYYY-MM-DD`).
///
/// Dates are always UTC so the same secret shows the same date on every
/// operator's terminal. Returns `None` for timestamps chrono cannot represent.
pub fn date_text(unix_secs: i64) -> Option<String> {
    DateTime::from_timestamp(unix_secs, 0).map(|dt| dt.format("%Y-%m-%d").to_string())
}

/// Build the display record for `record` as seen at time `now`.
pub fn project(record: &SecretRecord, now: i64) -> SecretDisplayRecord {
    SecretDisplayRecord {
        key: record.key.clone(),
        version: record.version,
        created_at: record.created_at,
        updated_at: record.updated_at,
        expires_at: record.expires_at,
        status: classify(record.expires_at, now),
        created_at_text: date_text(record.created_at),
        updated_at_text: date_text(record.updated_at),
        expires_at_text: record.expires_at.and_then(date_text),
    }
}

/// Project a whole listing.
pub fn project_all(records: &[SecretRecord], now: i64) -> Vec<SecretDisplayRecord> {
    records.iter().map(|r| project(r, now)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secrets::SecretStatus;

    fn record(key: &str, expires_at: Option<i64>) -> SecretRecord {
        SecretRecord {
            key: key.to_string(),
            version: 3,
            created_at: 1_700_000_000,
            updated_at: 1_700_086_400,
            expires_at,
        }
    }

    #[test]
    fn date_text_is_utc_date() {
        // 2023-11-14T22:13:20Z
        assert_eq!(date_text(1_700_000_000).as_deref(), Some("2023-11-14"));
        assert_eq!(date_text(0).as_deref(), Some("1970-01-01"));
    }

    #[test]
    fn date_text_one_second_before_midnight() {
        // 2024-01-01T23:59:59Z stays on the 1st regardless of local timezone.
        assert_eq!(date_text(1_704_153_599).as_deref(), Some("2024-01-01"));
        assert_eq!(date_text(1_704_153_600).as_deref(), Some("2024-01-02"));
    }

    #[test]
    fn date_text_out_of_range_is_none() {
        assert!(date_text(i64::MAX).is_none());
    }

    #[test]
    fn project_copies_pass_through_fields() {
        let r = record("db/password", Some(1_800_000_000));
        let d = project(&r, 1_700_000_000);
        assert_eq!(d.key, "db/password");
        assert_eq!(d.version, 3);
        assert_eq!(d.created_at, r.created_at);
        assert_eq!(d.updated_at, r.updated_at);
        assert_eq!(d.expires_at, r.expires_at);
        assert_eq!(d.created_at_text.as_deref(), Some("2023-11-14"));
        assert_eq!(d.updated_at_text.as_deref(), Some("2023-11-15"));
        assert!(d.expires_at_text.is_some());
    }

    #[test]
    fn project_without_expiry() {
        let d = project(&record("db-pass", None), 1_700_000_000);
        assert_eq!(d.status, SecretStatus::Active);
        assert!(d.expires_at_text.is_none());
    }

    #[test]
    fn project_is_repeatable() {
        let r = record("api-key", Some(1_700_100_000));
        assert_eq!(project(&r, 1_700_000_000), project(&r, 1_700_000_000));
    }

    #[test]
    fn project_all_preserves_order() {
        let records = vec![record("b", None), record("a", None)];
        let out = project_all(&records, 0);
        let keys: Vec<&str> = out.iter().map(|d| d.key.as_str()).collect();
        assert_eq!(keys, ["b", "a"]);
    }
}
