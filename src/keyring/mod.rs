//! OS keyring integration for bearer tokens.
//!
//! Stores and retrieves the server token from the operating system's
//! secure credential store:
//! - macOS: Keychain
//! - Windows: Credential Manager
//! - Linux: Secret Service (GNOME Keyring / KDE Wallet)
//!
//! Entries are keyed by server URL, so logging into a second server does not
//! clobber the first one's token.

use crate::errors::{ConsoleError, Result};

/// Service name used in the OS keyring.
const SERVICE_NAME: &str = "sealdesk";

fn entry(server_url: &str) -> Result<keyring::Entry> {
    keyring::Entry::new(SERVICE_NAME, &format!("token:{server_url}"))
        .map_err(|e| ConsoleError::KeyringError(format!("failed to create keyring entry: {e}")))
}

/// Store the token for `server_url`.
pub fn store_token(server_url: &str, token: &str) -> Result<()> {
    entry(server_url)?.set_password(token).map_err(|e| {
        ConsoleError::KeyringError(format!("failed to store token in keyring: {e}"))
    })
}

/// Retrieve the token for `server_url`.
///
/// Returns `None` if no token is stored (rather than an error).
pub fn get_token(server_url: &str) -> Result<Option<String>> {
    match entry(server_url)?.get_password() {
        Ok(token) => Ok(Some(token)),
        Err(keyring::Error::NoEntry) => Ok(None),
        Err(e) => Err(ConsoleError::KeyringError(format!(
            "failed to read from keyring: {e}"
        ))),
    }
}

/// Delete the stored token for `server_url`.
pub fn delete_token(server_url: &str) -> Result<()> {
    match entry(server_url)?.delete_credential() {
        Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
        Err(e) => Err(ConsoleError::KeyringError(format!(
            "failed to delete from keyring: {e}"
        ))),
    }
}
