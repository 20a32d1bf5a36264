//! `sealdesk get`: retrieve and print a single secret's value.

use zeroize::Zeroizing;

use crate::api::SecretsApi;
use crate::cli::output;
use crate::cli::{validate_secret_key, Cli, Session};
use crate::errors::{ConsoleError, Result};
use crate::secrets::{countdown_view, Clock, SystemClock};

/// Execute the `get` command.
pub fn execute(cli: &Cli, key: &str, copy: bool) -> Result<()> {
    validate_secret_key(key)?;
    let session = Session::load(cli)?;
    let api = session.connect(cli)?;

    let detail = api.get_secret(key)?;
    let value = Zeroizing::new(detail.value);

    if let Some(expires_at) = detail.record.expires_at {
        let view = countdown_view(expires_at, SystemClock.now());
        if view.expired {
            output::warning(&format!("Secret '{key}' has expired."));
        } else if view.warning {
            output::warning(&format!("Secret '{key}' expires in {}.", view.text));
        }
    }

    if copy {
        copy_to_clipboard(&value)?;
        output::success(&format!(
            "Copied '{key}' (version {}) to the clipboard",
            detail.record.version
        ));
    } else {
        // Print the bare value to stdout so it can be piped.
        println!("{}", value.as_str());
    }

    Ok(())
}

fn copy_to_clipboard(value: &str) -> Result<()> {
    let mut clipboard =
        arboard::Clipboard::new().map_err(|e| ConsoleError::ClipboardError(e.to_string()))?;
    clipboard
        .set_text(value.to_string())
        .map_err(|e| ConsoleError::ClipboardError(e.to_string()))
}
