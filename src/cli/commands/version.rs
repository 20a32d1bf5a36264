//! `sealdesk version`: display the client version and, when reachable,
//! the server's.

use console::style;

use crate::api::{HttpApi, SecretsApi};
use crate::cli::{Cli, Session};
use crate::errors::Result;

/// Execute the `version` command. Never fails because of the server.
pub fn execute(cli: &Cli) -> Result<()> {
    let current = env!("CARGO_PKG_VERSION");
    println!("sealdesk {current}");

    match server_version(cli) {
        Some((server, version)) => println!("server   {version} ({})", style(server).dim()),
        None => println!("{}", style("server   unreachable").dim()),
    }

    Ok(())
}

fn server_version(cli: &Cli) -> Option<(String, String)> {
    let session = Session::load(cli).ok()?;
    let server = session.server_url(cli);
    let api = HttpApi::new(&server, None, &session.settings.client_options()).ok()?;

    match api.health() {
        Ok(health) => Some((server, health.version.unwrap_or_else(|| "unknown".into()))),
        Err(e) => {
            tracing::debug!(error = %e, "server version unavailable");
            None
        }
    }
}
