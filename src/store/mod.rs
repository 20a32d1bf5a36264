//! Persisted key-value stores.
//!
//! The console keeps two small pieces of state between runs: the login
//! (server URL + bearer token) and UI preferences. Both live behind the
//! [`Store`] trait so nothing above this module knows whether the data sits
//! in a JSON file or in memory.

pub mod auth;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::errors::{ConsoleError, Result};

pub use auth::AuthStore;

/// Called after every mutation with the key and its new value (`None` when
/// the key was removed).
pub type Listener = Arc<dyn Fn(&str, Option<&str>) + Send + Sync>;

/// A string-to-string store with change notification.
pub trait Store: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;

    /// Register `listener`; it stays registered until the returned
    /// subscription is dropped.
    fn subscribe(&self, listener: Listener) -> Subscription;
}

// ── Listener registry ────────────────────────────────────────────────

type ListenerList = Arc<Mutex<Vec<(u64, Listener)>>>;

#[derive(Default)]
struct Listeners {
    next_id: AtomicU64,
    list: ListenerList,
}

impl Listeners {
    fn add(&self, listener: Listener) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.list
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, listener));
        Subscription {
            id,
            list: Arc::downgrade(&self.list),
        }
    }

    fn notify(&self, key: &str, value: Option<&str>) {
        // Snapshot so a listener may subscribe/unsubscribe without deadlock.
        let snapshot: Vec<Listener> = self
            .list
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();
        for listener in snapshot {
            listener(key, value);
        }
    }
}

/// Keeps a store listener registered. Dropping it unsubscribes.
pub struct Subscription {
    id: u64,
    list: std::sync::Weak<Mutex<Vec<(u64, Listener)>>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(list) = self.list.upgrade() {
            list.lock()
                .unwrap_or_else(PoisonError::into_inner)
                .retain(|(id, _)| *id != self.id);
        }
    }
}

// ── In-memory store ──────────────────────────────────────────────────

/// A store that lives only as long as the process.
#[derive(Default)]
pub struct MemoryStore {
    data: Mutex<BTreeMap<String, String>>,
    listeners: Listeners,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.data
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.data
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        self.listeners.notify(key, Some(value));
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let removed = self
            .data
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        if removed.is_some() {
            self.listeners.notify(key, None);
        }
        Ok(())
    }

    fn subscribe(&self, listener: Listener) -> Subscription {
        self.listeners.add(listener)
    }
}

// ── File-backed store ────────────────────────────────────────────────

/// A store persisted as a flat JSON object.
///
/// The whole file is rewritten on every change (temp file + rename), with
/// owner-only permissions on Unix. A missing file reads as an empty store.
/// The in-memory copy only changes once the write has succeeded.
pub struct FileStore {
    path: PathBuf,
    data: Mutex<BTreeMap<String, String>>,
    listeners: Listeners,
}

impl FileStore {
    /// Open (without creating) the store at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(path)?;
            if contents.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&contents).map_err(|e| ConsoleError::StoreError {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })?
            }
        } else {
            BTreeMap::new()
        };

        tracing::debug!(path = %path.display(), entries = data.len(), "opened file store");

        Ok(Self {
            path: path.to_path_buf(),
            data: Mutex::new(data),
            listeners: Listeners::default(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, data: &BTreeMap<String, String>) -> Result<()> {
        let store_err = |reason: String| ConsoleError::StoreError {
            path: self.path.clone(),
            reason,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(data).map_err(|e| store_err(e.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tmp, fs::Permissions::from_mode(0o600))?;
        }

        fs::rename(&tmp, &self.path).map_err(|e| store_err(format!("rename: {e}")))?;
        Ok(())
    }
}

impl Store for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.data
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        {
            let mut data = self.data.lock().unwrap_or_else(PoisonError::into_inner);
            let mut next = data.clone();
            next.insert(key.to_string(), value.to_string());
            self.persist(&next)?;
            *data = next;
        }
        self.listeners.notify(key, Some(value));
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let removed = {
            let mut data = self.data.lock().unwrap_or_else(PoisonError::into_inner);
            if data.contains_key(key) {
                let mut next = data.clone();
                next.remove(key);
                self.persist(&next)?;
                *data = next;
                true
            } else {
                false
            }
        };
        if removed {
            self.listeners.notify(key, None);
        }
        Ok(())
    }

    fn subscribe(&self, listener: Listener) -> Subscription {
        self.listeners.add(listener)
    }
}
