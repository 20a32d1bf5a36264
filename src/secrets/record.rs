//! Secret records as received from the server and their display projection.
//!
//! `SecretRecord` is the wire shape returned by `GET /v1/secrets`. It is a
//! read-only snapshot; the server owns the data. `SecretDisplayRecord` is
//! derived from it by [`project`](super::project) and is rebuilt wholesale on
//! every refresh, never patched in place.

use serde::{Deserialize, Serialize};

use super::status::SecretStatus;

/// A secret's metadata as listed by the server (no value).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretRecord {
    /// Unique key within the namespace (e.g. "db/password").
    pub key: String,

    /// Monotonically increasing version per key.
    pub version: u64,

    /// Unix seconds.
    pub created_at: i64,

    /// Unix seconds.
    pub updated_at: i64,

    /// Unix seconds; `None` means the secret never expires.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
}

/// A `SecretRecord` plus UI-ready derived fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecretDisplayRecord {
    pub key: String,
    pub version: u64,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,

    /// Lifecycle state at the time of projection.
    pub status: SecretStatus,

    /// `YYYY-MM-DD` (UTC) renderings of the timestamps above.
    pub created_at_text: Option<String>,
    pub updated_at_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at_text: Option<String>,
}

/// Aggregate counts over a set of display records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SecretStats {
    pub total: usize,
    pub expiring: usize,
    pub expired: usize,
}
