use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::api::ClientOptions;
use crate::errors::{ConsoleError, Result};

/// Console configuration, loaded from `<config_dir>/sealdesk.toml`.
///
/// Every field has a sensible default so Sealdesk works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Server used when neither `--server` nor a saved login names one.
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Per-request timeout in seconds (default: 10).
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Retries for read requests on 429/5xx or network errors (default: 2).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Record operations in the local audit log (default: true).
    #[serde(default = "default_audit_log")]
    pub audit_log: bool,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_server_url() -> String {
    "http://127.0.0.1:8200".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_max_retries() -> u32 {
    2
}

fn default_audit_log() -> bool {
    true
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            request_timeout_secs: default_request_timeout_secs(),
            max_retries: default_max_retries(),
            audit_log: default_audit_log(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the config directory.
    pub const FILE_NAME: &'static str = "sealdesk.toml";

    /// Load settings from `<config_dir>/sealdesk.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(config_dir: &Path) -> Result<Self> {
        let config_path = Self::path(config_dir);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            ConsoleError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        if settings.request_timeout_secs == 0 {
            return Err(ConsoleError::ConfigError(format!(
                "{}: request_timeout_secs must be at least 1",
                config_path.display()
            )));
        }

        Ok(settings)
    }

    pub fn path(config_dir: &Path) -> PathBuf {
        config_dir.join(Self::FILE_NAME)
    }

    /// Convert the transport settings into HTTP client options.
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            timeout: Duration::from_secs(self.request_timeout_secs),
            max_retries: self.max_retries,
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_settings_are_sensible() {
        let s = Settings::default();
        assert_eq!(s.server_url, "http://127.0.0.1:8200");
        assert_eq!(s.request_timeout_secs, 10);
        assert_eq!(s.max_retries, 2);
        assert!(s.audit_log);
    }

    #[test]
    fn load_returns_defaults_when_no_config_file() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.server_url, "http://127.0.0.1:8200");
    }

    #[test]
    fn load_parses_toml_file() {
        let tmp = TempDir::new().unwrap();
        let config = r#"
server_url = "https://vault.internal:8443"
request_timeout_secs = 30
max_retries = 5
audit_log = false
"#;
        fs::write(tmp.path().join("sealdesk.toml"), config).unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.server_url, "https://vault.internal:8443");
        assert_eq!(settings.request_timeout_secs, 30);
        assert_eq!(settings.max_retries, 5);
        assert!(!settings.audit_log);
    }

    #[test]
    fn load_uses_defaults_for_missing_fields() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("sealdesk.toml"), "max_retries = 0\n").unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.max_retries, 0);
        // Rest should be defaults
        assert_eq!(settings.request_timeout_secs, 10);
        assert!(settings.audit_log);
    }

    #[test]
    fn load_errors_on_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("sealdesk.toml"), "not valid {{toml").unwrap();

        let result = Settings::load(tmp.path());
        assert!(result.is_err());
    }

    #[test]
    fn load_rejects_zero_timeout() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("sealdesk.toml"),
            "request_timeout_secs = 0\n",
        )
        .unwrap();
        assert!(Settings::load(tmp.path()).is_err());
    }

    #[test]
    fn client_options_follow_settings() {
        let s = Settings {
            request_timeout_secs: 3,
            max_retries: 1,
            ..Settings::default()
        };
        let opts = s.client_options();
        assert_eq!(opts.timeout, Duration::from_secs(3));
        assert_eq!(opts.max_retries, 1);
    }
}
