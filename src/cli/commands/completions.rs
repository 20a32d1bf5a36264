//! `sealdesk completions`: generate shell completion scripts.
//!
//! Usage:
//!   sealdesk completions bash > ~/.bash_completion.d/sealdesk
//!   sealdesk completions zsh
//!   sealdesk completions fish
//!   sealdesk completions powershell

use std::io;

use clap::CommandFactory;
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::errors::{ConsoleError, Result};

/// Execute the `completions` command.
pub fn execute(shell: &str) -> Result<()> {
    let shell = parse_shell(shell)?;
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "sealdesk", &mut io::stdout());
    Ok(())
}

/// Map a shell name (any case; `ps` for PowerShell) to a clap_complete shell.
fn parse_shell(name: &str) -> Result<Shell> {
    match name.to_lowercase().as_str() {
        "bash" => Ok(Shell::Bash),
        "zsh" => Ok(Shell::Zsh),
        "fish" => Ok(Shell::Fish),
        "powershell" | "ps" => Ok(Shell::PowerShell),
        "elvish" => Ok(Shell::Elvish),
        other => Err(ConsoleError::CommandFailed(format!(
            "unknown shell '{other}' — supported: bash, zsh, fish, powershell, elvish"
        ))),
    }
}
