//! `sealdesk audit`: display the local audit log.
//!
//! Usage:
//!   sealdesk audit               # show last 50 entries
//!   sealdesk audit --last 20     # show last 20
//!   sealdesk audit --since 7d    # entries from last 7 days

use crate::cli::Cli;
use crate::errors::Result;

/// Execute the `audit` command.
#[cfg(feature = "audit-log")]
pub fn execute(cli: &Cli, last: usize, since: Option<&str>) -> Result<()> {
    use chrono::{Duration, Utc};

    use crate::audit::AuditLog;
    use crate::cli::{config_dir, output, parse_duration_secs};
    use crate::errors::ConsoleError;

    let since_dt = match since {
        Some(s) => Some(Utc::now() - Duration::seconds(parse_duration_secs(s)?)),
        None => None,
    };

    let dir = config_dir(cli)?;
    let audit = AuditLog::open(&dir)
        .ok_or_else(|| ConsoleError::AuditError("failed to open audit database".into()))?;

    let entries = audit.query(last, since_dt)?;

    if entries.is_empty() {
        output::info("No audit entries found.");
        return Ok(());
    }

    print_audit_table(&entries);

    Ok(())
}

/// Execute the `audit` command (audit log compiled out).
#[cfg(not(feature = "audit-log"))]
pub fn execute(_cli: &Cli, _last: usize, _since: Option<&str>) -> Result<()> {
    Err(crate::errors::ConsoleError::AuditError(
        "this build has no audit log (enable the `audit-log` feature)".into(),
    ))
}

/// Print audit entries in a formatted table.
#[cfg(feature = "audit-log")]
pub fn print_audit_table(entries: &[crate::audit::AuditEntry]) {
    use comfy_table::{ContentArrangement, Table};
    use console::style;

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Time (UTC)", "Operation", "Server", "Key", "Details"]);

    for entry in entries {
        let time = entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string();
        let op = colorize_operation(&entry.operation);
        let key = entry.key_name.as_deref().unwrap_or("-");
        let details = entry.details.as_deref().unwrap_or("-");

        table.add_row(vec![
            time,
            op,
            entry.server.clone(),
            key.to_string(),
            details.to_string(),
        ]);
    }

    println!(
        "{}",
        style(format!("{} audit entries:", entries.len())).bold()
    );
    println!("{table}");
}

/// Colorize operation names for display.
#[cfg(feature = "audit-log")]
fn colorize_operation(op: &str) -> String {
    use console::style;

    match op {
        "login" | "enroll" => style(op).green().to_string(),
        "create" => style(op).blue().to_string(),
        "delete" | "disable-client" => style(op).red().to_string(),
        "permissions" => style(op).yellow().to_string(),
        "logout" => style(op).cyan().to_string(),
        _ => op.to_string(),
    }
}
