//! `sealdesk delete`: remove a secret from the server.

use crate::api::SecretsApi;
use crate::cli::output;
use crate::cli::{confirm, validate_secret_key, Cli, Session};
use crate::errors::Result;

/// Execute the `delete` command.
pub fn execute(cli: &Cli, key: &str, force: bool) -> Result<()> {
    validate_secret_key(key)?;
    let session = Session::load(cli)?;

    // Unless --force is set (or confirmations are turned off), ask first.
    let ask = !force && session.preferences()?.confirm_deletes();
    if ask && !confirm(&format!("Delete secret '{key}' (all versions)?"))? {
        output::info("Cancelled.");
        return Ok(());
    }

    let api = session.connect(cli)?;
    api.delete_secret(key)?;

    session.audit(cli, "delete", Some(key), None);
    output::success(&format!("Deleted secret '{key}'"));

    Ok(())
}
