//! `sealdesk health`: check that the server is up.

use console::style;

use crate::api::{Health, HttpApi, SecretsApi};
use crate::cli::output;
use crate::cli::{Cli, Session};
use crate::errors::{ConsoleError, Result};

/// Execute the `health` command. Works without a login.
pub fn execute(cli: &Cli) -> Result<()> {
    let session = Session::load(cli)?;
    let server = session.server_url(cli);
    let api = HttpApi::new(&server, session.token(cli)?, &session.settings.client_options())?;

    let health = run(&api)?;
    output::success(&format!("{} is {}", api.base_url(), style(&health.status).green()));
    println!("  version: {}", health.version.as_deref().unwrap_or("unknown"));
    if let Some(uptime) = health.uptime_seconds {
        println!("  uptime:  {}", uptime_text(uptime));
    }
    Ok(())
}

/// Fetch health, treating a non-ok status as an error.
pub fn run(api: &dyn SecretsApi) -> Result<Health> {
    let health = api.health()?;
    if health.is_ok() {
        Ok(health)
    } else {
        Err(ConsoleError::CommandFailed(format!(
            "server reports status '{}'",
            health.status
        )))
    }
}

/// "1d 1h 1m" style uptime.
pub fn uptime_text(secs: u64) -> String {
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let minutes = (secs % 3_600) / 60;

    match (days, hours) {
        (0, 0) => format!("{minutes}m"),
        (0, _) => format!("{hours}h {minutes}m"),
        _ => format!("{days}d {hours}h {minutes}m"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeApi;

    #[test]
    fn healthy_server() {
        let health = run(&FakeApi::new()).unwrap();
        assert_eq!(health.version.as_deref(), Some("1.4.2"));
        assert_eq!(uptime_text(health.uptime_seconds.unwrap()), "1d 1h 1m");
    }

    #[test]
    fn uptime_formats() {
        assert_eq!(uptime_text(59), "0m");
        assert_eq!(uptime_text(3_660), "1h 1m");
        assert_eq!(uptime_text(2 * 86_400), "2d 0h 0m");
    }
}
