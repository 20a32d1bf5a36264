//! `sealdesk config`: view and change UI preferences.
//!
//! Connection settings live in `sealdesk.toml` and are edited by hand;
//! this command only touches the preferences store.

use comfy_table::{ContentArrangement, Table};

use crate::cli::output;
use crate::cli::{Cli, ConfigAction, Session};
use crate::config::Preferences;
use crate::config::Settings;
use crate::errors::Result;

/// Execute a `config` subcommand.
pub fn execute(cli: &Cli, action: &ConfigAction) -> Result<()> {
    let session = Session::load(cli)?;
    let prefs = session.preferences()?;

    match action {
        ConfigAction::List => {
            println!("{}", preferences_table(&prefs));
            output::tip(&format!(
                "Connection settings: {}",
                Settings::path(&session.config_dir).display()
            ));
        }
        ConfigAction::Get { key } => println!("{}", prefs.get(key)?),
        ConfigAction::Set { key, value } => {
            prefs.set(key, value)?;
            output::success(&format!("{key} = {}", prefs.get(key)?));
        }
        ConfigAction::Reset => {
            prefs.reset()?;
            output::success("Preferences restored to defaults.");
        }
    }

    Ok(())
}

fn preferences_table(prefs: &Preferences) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Preference", "Value"]);
    for (key, value) in prefs.list() {
        table.add_row(vec![key.to_string(), value]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::sync::Arc;

    #[test]
    fn table_lists_every_preference() {
        let prefs = Preferences::new(Arc::new(MemoryStore::new()));
        prefs.set("sort", "expiry").unwrap();
        let rendered = preferences_table(&prefs).to_string();
        assert!(rendered.contains("countdown_tick_secs"));
        assert!(rendered.contains("expiry"));
        assert!(rendered.contains("confirm_deletes"));
    }
}
