//! `sealdesk stats`: count secrets by expiry status.

use console::style;

use crate::api::SecretsApi;
use crate::cli::{Cli, Session};
use crate::errors::Result;
use crate::secrets::{aggregate, project_all, Clock, SecretStats, SystemClock};

/// Execute the `stats` command.
pub fn execute(cli: &Cli, json: bool) -> Result<()> {
    let session = Session::load(cli)?;
    let api = session.connect(cli)?;
    let stats = run(&api, SystemClock.now())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    let active = stats.total - stats.expiring - stats.expired;
    println!("{:<10}{}", "Total", style(stats.total).bold());
    println!("{:<10}{}", "Active", style(active).green());
    println!("{:<10}{}", "Expiring", style(stats.expiring).yellow());
    println!("{:<10}{}", "Expired", style(stats.expired).red());
    Ok(())
}

/// Fetch every secret and count it as seen at `now`.
pub fn run(api: &dyn SecretsApi, now: i64) -> Result<SecretStats> {
    let records = api.list_secrets()?;
    Ok(aggregate(&project_all(&records, now)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::{FakeApi, NOW};

    #[test]
    fn counts_each_status() {
        let api = FakeApi::new()
            .with_secret("a", "1", None)
            .with_secret("b", "2", Some(NOW + 60))
            .with_secret("c", "3", Some(NOW + 30 * 86_400))
            .with_secret("d", "4", Some(NOW));

        let stats = run(&api, NOW).unwrap();
        assert_eq!(
            stats,
            SecretStats {
                total: 4,
                expiring: 1,
                expired: 1
            }
        );
    }

    #[test]
    fn empty_server() {
        let stats = run(&FakeApi::new(), NOW).unwrap();
        assert_eq!(stats.total, 0);
    }

    #[test]
    fn unauthorized_propagates() {
        let api = FakeApi {
            reject_token: true,
            ..FakeApi::default()
        };
        assert!(run(&api, NOW).is_err());
    }
}
