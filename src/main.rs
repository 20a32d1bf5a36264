use clap::Parser;
use sealdesk::cli::commands;
use sealdesk::cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Login => commands::auth::execute_login(&cli),
        Commands::Logout => commands::auth::execute_logout(&cli),
        Commands::Whoami => commands::auth::execute_whoami(&cli),
        Commands::Health => commands::health::execute(&cli),
        Commands::List {
            ref search,
            ref status,
            json,
        } => commands::list::execute(&cli, search.as_deref(), status.as_deref(), json),
        Commands::Get { ref key, copy } => commands::get::execute(&cli, key, copy),
        Commands::Create {
            ref key,
            ref value,
            ref ttl,
            generate,
        } => commands::create::execute(&cli, key, value.as_deref(), ttl.as_deref(), generate),
        Commands::Delete { ref key, force } => commands::delete::execute(&cli, key, force),
        Commands::Watch { ref key } => commands::watch::execute(&cli, key),
        Commands::Stats { json } => commands::stats::execute(&cli, json),
        Commands::Clients { ref action } => commands::clients::execute(&cli, action),
        Commands::Config { ref action } => commands::config_cmd::execute(&cli, action),
        Commands::Audit { last, ref since } => {
            commands::audit_cmd::execute(&cli, last, since.as_deref())
        }
        Commands::Completions { ref shell } => commands::completions::execute(shell),
        Commands::Version => commands::version::execute(&cli),
    };

    if let Err(e) = result {
        tracing::debug!(error = ?e, "command failed");
        sealdesk::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}

/// Logs go to stderr. `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
