//! Configuration: static settings (`sealdesk.toml`) and UI preferences.

pub mod preferences;
pub mod settings;

use std::path::PathBuf;

pub use preferences::{Preferences, SortOrder};
pub use settings::Settings;

/// Default config directory: `$HOME/.config/sealdesk` on all platforms.
///
/// Returns `None` when neither `HOME` nor `USERPROFILE` is set.
pub fn default_config_dir() -> Option<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .ok()?;
    Some(PathBuf::from(home).join(".config").join("sealdesk"))
}
