//! Audit log: SQLite-based history of console operations.
//!
//! Every state-changing command (login, create, delete, enroll, ...) is
//! recorded in `<config_dir>/audit.db` together with the server it targeted.
//! This is the operator's local trail; the server keeps its own.
//!
//! Designed for graceful degradation: if the database can't be opened or
//! written to, operations silently continue without logging.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::Connection;

use crate::errors::{ConsoleError, Result};

/// A single audit log entry.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub operation: String,
    pub server: String,
    pub key_name: Option<String>,
    pub details: Option<String>,
}

/// SQLite-backed audit log.
pub struct AuditLog {
    conn: Connection,
}

impl AuditLog {
    /// Open (or create) the audit database at `<config_dir>/audit.db`.
    ///
    /// Returns `None` if the database can't be opened; callers should
    /// treat this as "audit logging unavailable" and continue normally.
    pub fn open(config_dir: &Path) -> Option<Self> {
        fs::create_dir_all(config_dir).ok()?;
        let db_path = Self::db_path(config_dir);
        let conn = Connection::open(&db_path).ok()?;

        // Set restrictive permissions on the audit database (owner-only).
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = fs::Permissions::from_mode(0o600);
            let _ = fs::set_permissions(&db_path, perms);
        }

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS operations (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                at          INTEGER NOT NULL,
                operation   TEXT NOT NULL,
                server      TEXT NOT NULL,
                key_name    TEXT,
                details     TEXT
            );",
        )
        .ok()?;

        Some(Self { conn })
    }

    /// Record an operation. Fire-and-forget: errors are only traced.
    pub fn log(&self, operation: &str, server: &str, key_name: Option<&str>, details: Option<&str>) {
        let now = Utc::now().timestamp();
        if let Err(e) = self.conn.execute(
            "INSERT INTO operations (at, operation, server, key_name, details)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![now, operation, server, key_name, details],
        ) {
            tracing::warn!(error = %e, operation, "failed to write audit entry");
        }
    }

    /// Query recent audit entries.
    ///
    /// - `limit`: maximum number of entries to return (most recent first).
    /// - `since`: if provided, only return entries at or after this time.
    pub fn query(&self, limit: usize, since: Option<DateTime<Utc>>) -> Result<Vec<AuditEntry>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let since = since.map_or(i64::MIN, |ts| ts.timestamp());

        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, at, operation, server, key_name, details
                 FROM operations
                 WHERE at >= ?1
                 ORDER BY id DESC
                 LIMIT ?2",
            )
            .map_err(|e| ConsoleError::AuditError(format!("query prepare: {e}")))?;

        let rows = stmt
            .query_map(rusqlite::params![since, limit], |row| {
                let at: i64 = row.get(1)?;
                Ok(AuditEntry {
                    id: row.get(0)?,
                    timestamp: DateTime::from_timestamp(at, 0).unwrap_or_default(),
                    operation: row.get(2)?,
                    server: row.get(3)?,
                    key_name: row.get(4)?,
                    details: row.get(5)?,
                })
            })
            .map_err(|e| ConsoleError::AuditError(format!("query exec: {e}")))?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| ConsoleError::AuditError(format!("row parse: {e}")))
    }

    /// Path to the audit database.
    pub fn db_path(config_dir: &Path) -> PathBuf {
        config_dir.join("audit.db")
    }
}

/// Convenience helper: log an event, silently ignoring an unavailable log.
///
/// This is safe to call from any command; it never fails the parent
/// operation.
pub fn log_audit(
    config_dir: &Path,
    server: &str,
    op: &str,
    key: Option<&str>,
    details: Option<&str>,
) {
    match AuditLog::open(config_dir) {
        Some(audit) => audit.log(op, server, key, details),
        None => tracing::debug!(dir = %config_dir.display(), "audit log unavailable"),
    }
}
