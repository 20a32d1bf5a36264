//! UI preferences persisted in the config store.
//!
//! Values are kept as strings in the backing [`Store`] and parsed on read,
//! so a hand-edited file with a bad value degrades to the default instead of
//! breaking every command.

use std::sync::Arc;
use std::time::Duration;

use crate::errors::{ConsoleError, Result};
use crate::secrets::SecretDisplayRecord;
use crate::store::Store;

pub const SORT: &str = "sort";
pub const HIDE_EXPIRED: &str = "hide_expired";
pub const COUNTDOWN_TICK_SECS: &str = "countdown_tick_secs";
pub const CONFIRM_DELETES: &str = "confirm_deletes";

/// Every preference key, in display order.
pub const KEYS: [&str; 4] = [SORT, HIDE_EXPIRED, COUNTDOWN_TICK_SECS, CONFIRM_DELETES];

const MAX_TICK_SECS: u64 = 3_600;

/// Ordering of the secrets table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Key,
    /// Soonest expiry first; never-expiring secrets last.
    Expiry,
    /// Most recently updated first.
    Updated,
}

impl SortOrder {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "key" => Some(SortOrder::Key),
            "expiry" => Some(SortOrder::Expiry),
            "updated" => Some(SortOrder::Updated),
            _ => None,
        }
    }

    /// Sort `records` in place. Ties fall back to key order.
    pub fn apply(self, records: &mut [SecretDisplayRecord]) {
        match self {
            SortOrder::Key => records.sort_by(|a, b| a.key.cmp(&b.key)),
            SortOrder::Expiry => records.sort_by(|a, b| {
                let ea = a.expires_at.unwrap_or(i64::MAX);
                let eb = b.expires_at.unwrap_or(i64::MAX);
                ea.cmp(&eb).then_with(|| a.key.cmp(&b.key))
            }),
            SortOrder::Updated => records.sort_by(|a, b| {
                b.updated_at
                    .cmp(&a.updated_at)
                    .then_with(|| a.key.cmp(&b.key))
            }),
        }
    }
}

/// Typed view of the preferences store.
#[derive(Clone)]
pub struct Preferences {
    store: Arc<dyn Store>,
}

impl Preferences {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub fn sort(&self) -> SortOrder {
        self.store
            .get(SORT)
            .and_then(|v| SortOrder::parse(&v))
            .unwrap_or(SortOrder::Key)
    }

    pub fn hide_expired(&self) -> bool {
        self.bool_or(HIDE_EXPIRED, false)
    }

    pub fn confirm_deletes(&self) -> bool {
        self.bool_or(CONFIRM_DELETES, true)
    }

    /// Refresh period for live countdowns.
    pub fn countdown_tick(&self) -> Duration {
        let secs = self
            .store
            .get(COUNTDOWN_TICK_SECS)
            .and_then(|v| parse_tick(&v).ok())
            .unwrap_or(60);
        Duration::from_secs(secs)
    }

    /// Current value of `key` as text (default when unset).
    pub fn get(&self, key: &str) -> Result<String> {
        let value = match key {
            SORT => match self.sort() {
                SortOrder::Key => "key".to_string(),
                SortOrder::Expiry => "expiry".to_string(),
                SortOrder::Updated => "updated".to_string(),
            },
            HIDE_EXPIRED => self.hide_expired().to_string(),
            COUNTDOWN_TICK_SECS => self.countdown_tick().as_secs().to_string(),
            CONFIRM_DELETES => self.confirm_deletes().to_string(),
            other => return Err(ConsoleError::UnknownPreference(other.to_string())),
        };
        Ok(value)
    }

    /// Validate and store `value` for `key`.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let invalid = |reason: &str| ConsoleError::InvalidPreference {
            key: key.to_string(),
            reason: reason.to_string(),
        };

        let normalized = match key {
            SORT => {
                SortOrder::parse(value).ok_or_else(|| invalid("expected key, expiry, or updated"))?;
                value.trim().to_lowercase()
            }
            HIDE_EXPIRED | CONFIRM_DELETES => parse_bool(value)
                .ok_or_else(|| invalid("expected true or false"))?
                .to_string(),
            COUNTDOWN_TICK_SECS => parse_tick(value).map_err(|r| invalid(&r))?.to_string(),
            other => return Err(ConsoleError::UnknownPreference(other.to_string())),
        };

        self.store.set(key, &normalized)
    }

    /// Every preference with its current value.
    pub fn list(&self) -> Vec<(&'static str, String)> {
        KEYS.iter()
            .filter_map(|k| self.get(k).ok().map(|v| (*k, v)))
            .collect()
    }

    /// Drop all stored values so defaults apply again.
    pub fn reset(&self) -> Result<()> {
        for key in KEYS {
            self.store.remove(key)?;
        }
        Ok(())
    }

    fn bool_or(&self, key: &str, default: bool) -> bool {
        self.store
            .get(key)
            .and_then(|v| parse_bool(&v))
            .unwrap_or(default)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

fn parse_tick(value: &str) -> std::result::Result<u64, String> {
    let secs: u64 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{value}' is not a whole number of seconds"))?;
    if (1..=MAX_TICK_SECS).contains(&secs) {
        Ok(secs)
    } else {
        Err(format!("must be between 1 and {MAX_TICK_SECS} seconds"))
    }
}
