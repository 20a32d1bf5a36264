//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{Cell, Color, ContentArrangement, Table};
use console::style;

use crate::api::{ClientKey, ClientStatus, EnrollmentCode};
use crate::secrets::{countdown_view, date_text, SecretDisplayRecord, SecretStats, SecretStatus};

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

fn status_color(status: SecretStatus) -> Color {
    match status {
        SecretStatus::Active => Color::Green,
        SecretStatus::Expiring => Color::Yellow,
        SecretStatus::Expired => Color::Red,
    }
}

/// Build the secrets table (Key, Version, Status, Created, Updated,
/// Expires, Remaining) as seen at `now`.
pub fn secrets_table(records: &[SecretDisplayRecord], now: i64) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Key",
        "Version",
        "Status",
        "Created",
        "Updated",
        "Expires",
        "Remaining",
    ]);

    for r in records {
        let remaining = r
            .expires_at
            .map_or_else(|| "-".to_string(), |t| countdown_view(t, now).text);

        table.add_row(vec![
            Cell::new(&r.key),
            Cell::new(r.version),
            Cell::new(r.status).fg(status_color(r.status)),
            Cell::new(r.created_at_text.as_deref().unwrap_or("-")),
            Cell::new(r.updated_at_text.as_deref().unwrap_or("-")),
            Cell::new(r.expires_at_text.as_deref().unwrap_or("never")),
            Cell::new(remaining),
        ]);
    }

    table
}

/// Print the secrets table, or a hint when there is nothing to show.
pub fn print_secrets_table(records: &[SecretDisplayRecord], now: i64) {
    if records.is_empty() {
        info("No secrets to show.");
        tip("Run `sealdesk create <KEY>` to add a secret.");
        return;
    }

    println!("{}", secrets_table(records, now));
}

/// One-line summary of secret counts.
pub fn stats_line(stats: &SecretStats) -> String {
    format!(
        "{} secret(s): {} expiring, {} expired",
        stats.total, stats.expiring, stats.expired
    )
}

fn client_status_cell(status: ClientStatus) -> Cell {
    let color = match status {
        ClientStatus::Active => Color::Green,
        ClientStatus::Retired => Color::DarkGrey,
        ClientStatus::Disabled => Color::Red,
    };
    Cell::new(status).fg(color)
}

/// Build the client keys table.
pub fn clients_table(clients: &[ClientKey]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "ID",
        "Name",
        "Status",
        "Fingerprint",
        "Enrolled",
        "Last seen",
    ]);

    for c in clients {
        let fingerprint = c
            .public_key
            .as_deref()
            .and_then(crate::cli::commands::clients::fingerprint)
            .unwrap_or_else(|| "-".to_string());

        table.add_row(vec![
            Cell::new(&c.id),
            Cell::new(&c.name),
            client_status_cell(c.status),
            Cell::new(fingerprint),
            Cell::new(date_text(c.created_at).unwrap_or_else(|| "-".into())),
            Cell::new(
                c.last_seen_at
                    .and_then(date_text)
                    .unwrap_or_else(|| "never".into()),
            ),
        ]);
    }

    table
}

/// Build the enrollment codes table.
pub fn enrollments_table(codes: &[EnrollmentCode]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["ID", "Name", "Description", "Status", "Created", "Expires"]);

    for e in codes {
        table.add_row(vec![
            Cell::new(&e.id),
            Cell::new(&e.name),
            Cell::new(e.description.as_deref().unwrap_or("-")),
            client_status_cell(e.status),
            Cell::new(date_text(e.created_at).unwrap_or_else(|| "-".into())),
            Cell::new(
                e.expires_at
                    .and_then(date_text)
                    .unwrap_or_else(|| "never".into()),
            ),
        ]);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secrets::{project, SecretRecord};

    const NOW: i64 = 1_700_000_000;

    #[test]
    fn secrets_table_shows_status_and_remaining() {
        let records = vec![
            project(
                &SecretRecord {
                    key: "api-key".into(),
                    version: 2,
                    created_at: NOW,
                    updated_at: NOW,
                    expires_at: Some(NOW + 3 * 86_400),
                },
                NOW,
            ),
            project(
                &SecretRecord {
                    key: "db-pass".into(),
                    version: 1,
                    created_at: NOW,
                    updated_at: NOW,
                    expires_at: None,
                },
                NOW,
            ),
        ];

        let rendered = secrets_table(&records, NOW).to_string();
        assert!(rendered.contains("api-key"));
        assert!(rendered.contains("expiring"));
        assert!(rendered.contains("3 days"));
        assert!(rendered.contains("never"));
    }

    #[test]
    fn stats_line_text() {
        let stats = SecretStats {
            total: 5,
            expiring: 2,
            expired: 1,
        };
        assert_eq!(stats_line(&stats), "5 secret(s): 2 expiring, 1 expired");
    }

    #[test]
    fn clients_table_shows_fingerprint_placeholder() {
        let clients = vec![ClientKey {
            id: "c1".into(),
            name: "laptop".into(),
            description: None,
            status: ClientStatus::Retired,
            public_key: None,
            created_at: NOW,
            last_seen_at: None,
        }];
        let rendered = clients_table(&clients).to_string();
        assert!(rendered.contains("laptop"));
        assert!(rendered.contains("Retired"));
        assert!(rendered.contains("never"));
    }
}
