//! `sealdesk list`: display secrets with their expiry status.

use crate::api::SecretsApi;
use crate::cli::output;
use crate::cli::{Cli, Session};
use crate::config::Preferences;
use crate::errors::{ConsoleError, Result};
use crate::secrets::{
    aggregate, filter, project_all, Clock, SecretDisplayRecord, SecretStats, SecretStatus,
    SystemClock,
};

/// What the user asked to see.
#[derive(Debug, Default)]
pub struct ListQuery<'a> {
    pub search: Option<&'a str>,
    pub status: Option<SecretStatus>,
}

/// Execute the `list` command.
pub fn execute(cli: &Cli, search: Option<&str>, status: Option<&str>, json: bool) -> Result<()> {
    let status = status.map(parse_status).transpose()?;
    let session = Session::load(cli)?;
    let api = session.connect(cli)?;
    let prefs = session.preferences()?;
    let now = SystemClock.now();

    let (rows, stats) = run(&api, &prefs, &ListQuery { search, status }, now)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    output::info(&output::stats_line(&stats));
    output::print_secrets_table(&rows, now);

    if prefs.hide_expired() && stats.expired > 0 && status.is_none() {
        output::tip(&format!(
            "{} expired secret(s) hidden — use `--status expired` to see them",
            stats.expired
        ));
    }

    Ok(())
}

/// Fetch, project, filter, and sort. Stats cover everything fetched, before
/// any filtering, so the summary line always describes the whole server.
pub fn run(
    api: &dyn SecretsApi,
    prefs: &Preferences,
    query: &ListQuery<'_>,
    now: i64,
) -> Result<(Vec<SecretDisplayRecord>, SecretStats)> {
    let records = api.list_secrets()?;
    tracing::debug!(count = records.len(), "fetched secrets");

    let projected = project_all(&records, now);
    let stats = aggregate(&projected);

    let mut rows = filter(&projected, query.search.unwrap_or(""));
    match query.status {
        Some(wanted) => rows.retain(|r| r.status == wanted),
        None if prefs.hide_expired() => rows.retain(|r| r.status != SecretStatus::Expired),
        None => {}
    }
    prefs.sort().apply(&mut rows);

    Ok((rows, stats))
}

/// Parse the `--status` argument.
pub fn parse_status(s: &str) -> Result<SecretStatus> {
    SecretStatus::parse(s).ok_or_else(|| {
        ConsoleError::CommandFailed(format!(
            "unknown status '{s}' — use active, expiring, or expired"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::{FakeApi, NOW};
    use crate::config::preferences::{HIDE_EXPIRED, SORT};
    use crate::store::MemoryStore;
    use std::sync::Arc;

    fn prefs() -> Preferences {
        Preferences::new(Arc::new(MemoryStore::new()))
    }

    fn api() -> FakeApi {
        FakeApi::new()
            .with_secret("db-pass", "p", None)
            .with_secret("api-key", "k", Some(NOW + 3 * 86_400))
            .with_secret("old-token", "t", Some(NOW - 10))
            .with_secret("API_SECONDARY", "s", Some(NOW + 30 * 86_400))
    }

    fn keys(rows: &[SecretDisplayRecord]) -> Vec<&str> {
        rows.iter().map(|r| r.key.as_str()).collect()
    }

    #[test]
    fn lists_all_sorted_by_key_with_stats() {
        let (rows, stats) = run(&api(), &prefs(), &ListQuery::default(), NOW).unwrap();
        assert_eq!(keys(&rows), ["API_SECONDARY", "api-key", "db-pass", "old-token"]);
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
    fn scenario_statuses() {
        let (rows, _) = run(&api(), &prefs(), &ListQuery::default(), NOW).unwrap();
        let status_of = |k: &str| rows.iter().find(|r| r.key == k).unwrap().status;
        assert_eq!(status_of("db-pass"), SecretStatus::Active);
        assert_eq!(status_of("api-key"), SecretStatus::Expiring);
        assert_eq!(status_of("old-token"), SecretStatus::Expired);
    }

    #[test]
    fn search_is_case_insensitive_on_key() {
        let query = ListQuery {
            search: Some("api"),
            status: None,
        };
        let (rows, stats) = run(&api(), &prefs(), &query, NOW).unwrap();
        assert_eq!(keys(&rows), ["API_SECONDARY", "api-key"]);
        assert_eq!(stats.total, 4, "stats ignore the search filter");
    }

    #[test]
    fn status_filter() {
        let query = ListQuery {
            search: None,
            status: Some(SecretStatus::Expired),
        };
        let (rows, _) = run(&api(), &prefs(), &query, NOW).unwrap();
        assert_eq!(keys(&rows), ["old-token"]);
    }

    #[test]
    fn hide_expired_preference() {
        let p = prefs();
        p.set(HIDE_EXPIRED, "true").unwrap();
        let (rows, _) = run(&api(), &p, &ListQuery::default(), NOW).unwrap();
        assert!(!keys(&rows).contains(&"old-token"));

        // An explicit --status still wins.
        let query = ListQuery {
            search: None,
            status: Some(SecretStatus::Expired),
        };
        let (rows, _) = run(&api(), &p, &query, NOW).unwrap();
        assert_eq!(keys(&rows), ["old-token"]);
    }

    #[test]
    fn sort_preference_applies() {
        let p = prefs();
        p.set(SORT, "expiry").unwrap();
        let (rows, _) = run(&api(), &p, &ListQuery::default(), NOW).unwrap();
        assert_eq!(keys(&rows), ["old-token", "api-key", "API_SECONDARY", "db-pass"]);
    }

    #[test]
    fn parse_status_rejects_unknown() {
        assert_eq!(parse_status("Expiring").unwrap(), SecretStatus::Expiring);
        assert!(parse_status("stale").is_err());
    }
}
