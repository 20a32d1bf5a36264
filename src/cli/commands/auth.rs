//! `sealdesk login`, `logout`, and `whoami`, manage the saved login.
//!
//! The token is checked against the server before it is saved, so a typo
//! never ends up in the auth store.

use std::io::{self, IsTerminal, Read};
use std::sync::Arc;

use zeroize::Zeroizing;

use crate::api::{normalize_server_url, HttpApi, SecretsApi};
use crate::cli::output;
use crate::cli::{Cli, Session};
use crate::errors::{ConsoleError, Result};
use crate::store::auth::mask_token;

/// Execute `sealdesk login`.
pub fn execute_login(cli: &Cli) -> Result<()> {
    let session = Session::load(cli)?;
    let server = normalize_server_url(&session.server_url(cli))?;

    let token = match &cli.token {
        Some(t) if !t.is_empty() => Zeroizing::new(t.clone()),
        _ => read_token()?,
    };

    let api = HttpApi::new(
        &server,
        Some(token.clone()),
        &session.settings.client_options(),
    )?;
    let visible = verify_token(&api)?;

    let _changes = session.auth.subscribe(Arc::new(|key: &str, value: Option<&str>| {
        tracing::debug!(key, present = value.is_some(), "auth store updated");
    }));
    session.auth.login(&server, &token)?;
    session.audit(cli, "login", None, None);

    output::success(&format!(
        "Logged in to {server} ({visible} secret(s) visible)"
    ));
    Ok(())
}

/// Execute `sealdesk logout`.
pub fn execute_logout(cli: &Cli) -> Result<()> {
    let session = Session::load(cli)?;

    if !session.auth.is_logged_in() {
        output::info("Not logged in.");
        return Ok(());
    }

    session.audit(cli, "logout", None, None);
    session.auth.logout()?;
    output::success("Logged out. The server URL is kept for your next login.");
    Ok(())
}

/// Execute `sealdesk whoami`.
pub fn execute_whoami(cli: &Cli) -> Result<()> {
    let session = Session::load(cli)?;
    let server = session.server_url(cli);

    match session.token(cli)? {
        Some(token) => {
            output::info(&format!("Server: {server}"));
            output::info(&format!("Token:  {}", mask_token(&token)));
        }
        None => {
            output::info(&format!("Server: {server}"));
            output::warning("Not logged in.");
            output::tip("Run `sealdesk login` to save a token.");
        }
    }
    Ok(())
}

/// Check that `api` accepts its token; returns the number of visible secrets.
pub fn verify_token(api: &dyn SecretsApi) -> Result<usize> {
    match api.list_secrets() {
        Ok(secrets) => Ok(secrets.len()),
        Err(ConsoleError::Unauthorized(msg)) => Err(ConsoleError::Unauthorized(format!(
            "server rejected the token ({msg})"
        ))),
        Err(e) => Err(e),
    }
}

/// Read a token from piped stdin or a hidden prompt.
fn read_token() -> Result<Zeroizing<String>> {
    let token = if io::stdin().is_terminal() {
        Zeroizing::new(
            dialoguer::Password::new()
                .with_prompt("Bearer token")
                .interact()
                .map_err(|e| ConsoleError::CommandFailed(format!("token prompt: {e}")))?,
        )
    } else {
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        Zeroizing::new(buf.trim().to_string())
    };

    if token.is_empty() {
        return Err(ConsoleError::CommandFailed("token cannot be empty".into()));
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeApi;

    #[test]
    fn verify_counts_visible_secrets() {
        let api = FakeApi::new()
            .with_secret("a", "1", None)
            .with_secret("b", "2", None);
        assert_eq!(verify_token(&api).unwrap(), 2);
    }

    #[test]
    fn verify_explains_rejected_token() {
        let api = FakeApi {
            reject_token: true,
            ..FakeApi::default()
        };
        let msg = verify_token(&api).unwrap_err().to_string();
        assert!(msg.contains("server rejected the token"), "{msg}");
    }

    #[test]
    fn whoami_without_login_succeeds() {
        use clap::Parser;

        let dir = tempfile::TempDir::new().unwrap();
        let cli = Cli::parse_from([
            "sealdesk",
            "--config-dir",
            dir.path().to_str().unwrap(),
            "whoami",
        ]);
        assert!(execute_whoami(&cli).is_ok());
    }

    #[test]
    fn logout_when_logged_out_is_a_no_op() {
        use clap::Parser;

        let dir = tempfile::TempDir::new().unwrap();
        let cli = Cli::parse_from([
            "sealdesk",
            "--config-dir",
            dir.path().to_str().unwrap(),
            "logout",
        ]);
        execute_logout(&cli).unwrap();
        assert!(!dir.path().join("auth.json").exists());
    }
}
