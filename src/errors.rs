use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in Sealdesk.
#[derive(Debug, Error)]
pub enum ConsoleError {
    // --- Server API errors ---
    #[error("Not logged in — run `sealdesk login` or pass --token")]
    NotLoggedIn,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("{0} not found on server")]
    NotFound(String),

    #[error("Server returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid server URL '{0}' — expected http:// or https://")]
    InvalidServerUrl(String),

    // --- Input validation errors ---
    #[error("Invalid secret key '{0}' — use letters, digits, '_', '-', '.', or '/'")]
    InvalidSecretKey(String),

    #[error("Invalid duration '{0}' — use format like 7d, 24h, or 30m")]
    InvalidDuration(String),

    // --- Store errors ---
    #[error("Store error at {path}: {reason}")]
    StoreError { path: PathBuf, reason: String },

    #[error("Unknown preference '{0}'")]
    UnknownPreference(String),

    #[error("Invalid value for '{key}': {reason}")]
    InvalidPreference { key: String, reason: String },

    // --- Keyring errors ---
    #[error("Keyring error: {0}")]
    KeyringError(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("Clipboard error: {0}")]
    ClipboardError(String),

    #[error("Audit error: {0}")]
    AuditError(String),
}

impl From<serde_json::Error> for ConsoleError {
    fn from(e: serde_json::Error) -> Self {
        Self::SerializationError(e.to_string())
    }
}

/// Convenience type alias for Sealdesk results.
pub type Result<T> = std::result::Result<T, ConsoleError>;
