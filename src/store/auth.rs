//! Login state: which server we talk to and the bearer token for it.

use std::sync::Arc;

use zeroize::Zeroizing;

use super::{Listener, Store, Subscription};
use crate::errors::Result;

const SERVER_URL_KEY: &str = "server_url";
const TOKEN_KEY: &str = "token";

/// Typed view of the auth store.
///
/// With the `keyring-store` feature the token goes to the OS keyring
/// (keyed by server URL) and only the URL is written to the backing store.
#[derive(Clone)]
pub struct AuthStore {
    store: Arc<dyn Store>,
}

impl AuthStore {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Server URL saved by the last login.
    pub fn server_url(&self) -> Option<String> {
        self.store.get(SERVER_URL_KEY)
    }

    /// Bearer token saved by the last login.
    pub fn token(&self) -> Result<Option<Zeroizing<String>>> {
        #[cfg(feature = "keyring-store")]
        {
            if let Some(url) = self.server_url() {
                if let Some(token) = crate::keyring::get_token(&url)? {
                    return Ok(Some(Zeroizing::new(token)));
                }
            }
        }

        Ok(self.store.get(TOKEN_KEY).map(Zeroizing::new))
    }

    pub fn is_logged_in(&self) -> bool {
        matches!(self.token(), Ok(Some(_)))
    }

    /// Remember `server_url` and `token`, replacing any previous login.
    pub fn login(&self, server_url: &str, token: &str) -> Result<()> {
        #[cfg(feature = "keyring-store")]
        {
            crate::keyring::store_token(server_url, token)?;
            self.store.remove(TOKEN_KEY)?;
        }

        #[cfg(not(feature = "keyring-store"))]
        {
            self.store.set(TOKEN_KEY, token)?;
        }

        self.store.set(SERVER_URL_KEY, server_url)?;
        tracing::info!(server = server_url, "login saved");
        Ok(())
    }

    /// Forget the token. The server URL is kept as the default for the next
    /// login.
    pub fn logout(&self) -> Result<()> {
        #[cfg(feature = "keyring-store")]
        {
            if let Some(url) = self.server_url() {
                crate::keyring::delete_token(&url)?;
            }
        }

        self.store.remove(TOKEN_KEY)?;
        tracing::info!("login cleared");
        Ok(())
    }

    pub fn subscribe(&self, listener: Listener) -> Subscription {
        self.store.subscribe(listener)
    }
}

/// Show only the first and last few characters of a token.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}…{tail}")
}
