//! CLI module: Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::sync::Arc;

use clap::{ArgAction, Parser};
use regex::Regex;
use zeroize::Zeroizing;

use crate::api::HttpApi;
use crate::config::{default_config_dir, Preferences, Settings};
use crate::errors::{ConsoleError, Result};
use crate::store::{AuthStore, FileStore};

/// Allowed secret keys: must start with a letter, digit, or '_'.
const SECRET_KEY_PATTERN: &str = r"^[A-Za-z0-9_][A-Za-z0-9_./-]{0,255}$";

/// Sealdesk CLI: admin console for a secrets server.
#[derive(Parser)]
#[command(
    name = "sealdesk",
    about = "Admin console for a secrets-management server",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Server URL (overrides the saved login and sealdesk.toml)
    #[arg(long, env = "SEALDESK_SERVER", global = true)]
    pub server: Option<String>,

    /// Bearer token (overrides the saved login)
    #[arg(long, env = "SEALDESK_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Config directory (default: ~/.config/sealdesk)
    #[arg(long, env = "SEALDESK_CONFIG_DIR", global = true)]
    pub config_dir: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Log in with a bearer token (verified against the server)
    Login,

    /// Forget the saved token
    Logout,

    /// Show the server and (masked) token in use
    Whoami,

    /// Show server health
    Health,

    /// List secrets with their expiry status
    List {
        /// Only show secrets whose key contains this text (case-insensitive)
        #[arg(short, long)]
        search: Option<String>,
        /// Only show secrets in this state: active, expiring, or expired
        #[arg(long)]
        status: Option<String>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print a secret's value
    Get {
        /// Secret key
        key: String,
        /// Copy the value to the clipboard instead of printing it
        #[arg(short, long)]
        copy: bool,
    },

    /// Create a secret (or a new version of an existing one)
    Create {
        /// Secret key (e.g. db/password)
        key: String,
        /// Secret value (omit for stdin or interactive prompt)
        value: Option<String>,
        /// Time to live, e.g. 30d, 12h, 45m
        #[arg(long)]
        ttl: Option<String>,
        /// Generate a random alphanumeric value of this length
        #[arg(long, conflicts_with = "value")]
        generate: Option<usize>,
    },

    /// Delete a secret
    Delete {
        /// Secret key
        key: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Show a live countdown until a secret expires
    Watch {
        /// Secret key
        key: String,
    },

    /// Count secrets by status
    Stats {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Manage enrolled clients and their permissions
    Clients {
        #[command(subcommand)]
        action: ClientAction,
    },

    /// View or change UI preferences
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// View the local audit log of console operations
    Audit {
        /// Number of entries to show (default: 50)
        #[arg(long, default_value = "50")]
        last: usize,
        /// Show entries since a duration ago (e.g. 7d, 24h, 30m)
        #[arg(long)]
        since: Option<String>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell)
        shell: String,
    },

    /// Show client and server versions
    Version,
}

/// Client-management subcommands.
#[derive(clap::Subcommand)]
pub enum ClientAction {
    /// List enrolled clients
    List,

    /// List enrollment codes
    Codes,

    /// Create an enrollment code for a new client
    Enroll {
        /// Display name for the client
        #[arg(long)]
        name: String,
        /// Optional description
        #[arg(long)]
        description: Option<String>,
    },

    /// Disable a client so it can no longer decrypt anything
    Disable {
        /// Client id
        id: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Show or change which secrets a client may decrypt
    Permissions {
        /// Client id
        id: String,
        /// Secret key to grant (repeatable)
        #[arg(long)]
        grant: Vec<String>,
        /// Secret key to revoke (repeatable)
        #[arg(long)]
        revoke: Vec<String>,
    },
}

/// Preference subcommands.
#[derive(clap::Subcommand)]
pub enum ConfigAction {
    /// Show all preferences
    List,

    /// Show one preference
    Get {
        /// Preference name
        key: String,
    },

    /// Change a preference
    Set {
        /// Preference name
        key: String,
        /// New value
        value: String,
    },

    /// Restore all preferences to their defaults
    Reset,
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Resolve the config directory from `--config-dir` or the default.
pub fn config_dir(cli: &Cli) -> Result<PathBuf> {
    match &cli.config_dir {
        Some(dir) => Ok(PathBuf::from(dir)),
        None => default_config_dir().ok_or_else(|| {
            ConsoleError::ConfigError(
                "cannot locate home directory — pass --config-dir".into(),
            )
        }),
    }
}

/// Settings, stores, and resolved connection parameters for one invocation.
pub struct Session {
    pub config_dir: PathBuf,
    pub settings: Settings,
    pub auth: AuthStore,
}

impl Session {
    /// Load settings and open the auth store from the config directory.
    pub fn load(cli: &Cli) -> Result<Self> {
        let config_dir = config_dir(cli)?;
        let settings = Settings::load(&config_dir)?;
        let store = FileStore::open(&config_dir.join("auth.json"))?;

        Ok(Self {
            config_dir,
            settings,
            auth: AuthStore::new(Arc::new(store)),
        })
    }

    /// Server URL: `--server` > saved login > `sealdesk.toml`.
    pub fn server_url(&self, cli: &Cli) -> String {
        cli.server
            .clone()
            .or_else(|| self.auth.server_url())
            .unwrap_or_else(|| self.settings.server_url.clone())
    }

    /// Token: `--token` > saved login.
    pub fn token(&self, cli: &Cli) -> Result<Option<Zeroizing<String>>> {
        match &cli.token {
            Some(t) if !t.is_empty() => Ok(Some(Zeroizing::new(t.clone()))),
            _ => self.auth.token(),
        }
    }

    /// Build an authenticated API client.
    pub fn connect(&self, cli: &Cli) -> Result<HttpApi> {
        let token = self.token(cli)?.ok_or(ConsoleError::NotLoggedIn)?;
        HttpApi::new(
            &self.server_url(cli),
            Some(token),
            &self.settings.client_options(),
        )
    }

    /// Open the preferences store.
    pub fn preferences(&self) -> Result<Preferences> {
        let store = FileStore::open(&self.config_dir.join("preferences.json"))?;
        Ok(Preferences::new(Arc::new(store)))
    }

    /// Record an operation in the local audit log. Never fails.
    pub fn audit(&self, cli: &Cli, op: &str, key: Option<&str>, details: Option<&str>) {
        if !self.settings.audit_log {
            return;
        }

        #[cfg(feature = "audit-log")]
        {
            crate::audit::log_audit(&self.config_dir, &self.server_url(cli), op, key, details);
        }

        #[cfg(not(feature = "audit-log"))]
        let _ = (cli, op, key, details);
    }
}

/// Validate a secret key before sending it to the server.
pub fn validate_secret_key(key: &str) -> Result<()> {
    let re = Regex::new(SECRET_KEY_PATTERN)
        .map_err(|e| ConsoleError::CommandFailed(format!("key pattern: {e}")))?;

    if re.is_match(key) {
        Ok(())
    } else {
        Err(ConsoleError::InvalidSecretKey(key.to_string()))
    }
}

/// Parse a human-friendly duration string like "7d", "24h", "30m" into
/// seconds.
pub fn parse_duration_secs(input: &str) -> Result<i64> {
    let trimmed = input.trim();
    let invalid = || ConsoleError::InvalidDuration(input.to_string());

    let (num_str, unit_secs) = if let Some(s) = trimmed.strip_suffix('d') {
        (s, 86_400)
    } else if let Some(s) = trimmed.strip_suffix('h') {
        (s, 3_600)
    } else if let Some(s) = trimmed.strip_suffix('m') {
        (s, 60)
    } else {
        return Err(invalid());
    };

    let num: i64 = num_str.parse().map_err(|_| invalid())?;
    if num <= 0 {
        return Err(invalid());
    }

    num.checked_mul(unit_secs).ok_or_else(invalid)
}

/// Read a secret value from, in order: the argument, piped stdin, or a
/// hidden interactive prompt.
pub fn read_secret_value(prompt: &str, value: Option<&str>) -> Result<Zeroizing<String>> {
    if let Some(v) = value {
        output::warning("Value provided on command line — it may appear in shell history.");
        return Ok(Zeroizing::new(v.to_string()));
    }

    if !io::stdin().is_terminal() {
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        let trimmed = buf.trim_end().to_string();
        return Ok(Zeroizing::new(trimmed));
    }

    let v = dialoguer::Password::new()
        .with_prompt(prompt)
        .interact()
        .map_err(|e| ConsoleError::CommandFailed(format!("input prompt: {e}")))?;
    Ok(Zeroizing::new(v))
}

/// Ask a yes/no question, defaulting to "no".
pub fn confirm(prompt: &str) -> Result<bool> {
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| ConsoleError::CommandFailed(format!("confirm prompt: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_secret_keys() {
        assert!(validate_secret_key("db-pass").is_ok());
        assert!(validate_secret_key("DATABASE_URL").is_ok());
        assert!(validate_secret_key("svc/api.key").is_ok());
        assert!(validate_secret_key("_private").is_ok());
    }

    #[test]
    fn rejects_bad_secret_keys() {
        assert!(validate_secret_key("").is_err());
        assert!(validate_secret_key("/leading-slash").is_err());
        assert!(validate_secret_key("-leading-dash").is_err());
        assert!(validate_secret_key("has space").is_err());
        assert!(validate_secret_key("semi;colon").is_err());
        assert!(validate_secret_key(&"a".repeat(257)).is_err());
    }

    #[test]
    fn parse_duration_units() {
        assert_eq!(parse_duration_secs("7d").unwrap(), 604_800);
        assert_eq!(parse_duration_secs("24h").unwrap(), 86_400);
        assert_eq!(parse_duration_secs(" 30m ").unwrap(), 1_800);
    }

    #[test]
    fn parse_duration_invalid() {
        assert!(parse_duration_secs("abc").is_err());
        assert!(parse_duration_secs("7x").is_err());
        assert!(parse_duration_secs("d").is_err());
        assert!(parse_duration_secs("0h").is_err());
        assert!(parse_duration_secs("-5m").is_err());
        assert!(parse_duration_secs("99999999999999999d").is_err());
    }

    #[cfg(not(feature = "keyring-store"))]
    #[test]
    fn server_precedence_flag_then_login_then_settings() {
        let dir = tempfile::TempDir::new().unwrap();
        let dir_str = dir.path().to_str().unwrap();

        let cli = Cli::parse_from(["sealdesk", "--config-dir", dir_str, "whoami"]);
        let session = Session::load(&cli).unwrap();
        assert_eq!(session.server_url(&cli), "http://127.0.0.1:8200");

        session
            .auth
            .login("https://saved.example.com", "tok")
            .unwrap();
        assert_eq!(session.server_url(&cli), "https://saved.example.com");

        let cli = Cli::parse_from([
            "sealdesk",
            "--config-dir",
            dir_str,
            "--server",
            "https://flag.example.com",
            "whoami",
        ]);
        assert_eq!(session.server_url(&cli), "https://flag.example.com");
    }

    #[test]
    fn connect_without_token_is_not_logged_in() {
        let dir = tempfile::TempDir::new().unwrap();
        let cli = Cli::parse_from([
            "sealdesk",
            "--config-dir",
            dir.path().to_str().unwrap(),
            "list",
        ]);
        let session = Session::load(&cli).unwrap();
        assert!(matches!(
            session.connect(&cli),
            Err(ConsoleError::NotLoggedIn)
        ));
    }
}
