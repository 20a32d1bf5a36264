//! `sealdesk watch`: live countdown until a secret expires.
//!
//! Prints a line every time the remaining-time text changes and exits once
//! the secret has expired (or immediately if it never expires).

use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use console::style;

use crate::api::SecretsApi;
use crate::cli::output;
use crate::cli::{validate_secret_key, Cli, Session};
use crate::errors::Result;
use crate::secrets::{Clock, Countdown, CountdownView, Scheduler, SystemClock, ThreadScheduler};

/// Execute the `watch` command.
pub fn execute(cli: &Cli, key: &str) -> Result<()> {
    validate_secret_key(key)?;
    let session = Session::load(cli)?;
    let api = session.connect(cli)?;
    let tick = session.preferences()?.countdown_tick();

    run(
        &api,
        key,
        Arc::new(SystemClock),
        &ThreadScheduler,
        tick,
        print_view,
    )
}

/// Watch `key` until it expires, handing every new view to `show`.
///
/// Returns `Ok(())` straight away for secrets without an expiry.
pub fn run(
    api: &dyn SecretsApi,
    key: &str,
    clock: Arc<dyn Clock>,
    scheduler: &dyn Scheduler,
    tick: Duration,
    mut show: impl FnMut(&CountdownView),
) -> Result<()> {
    let detail = api.get_secret(key)?;
    let Some(expires_at) = detail.record.expires_at else {
        output::info(&format!("Secret '{key}' never expires."));
        return Ok(());
    };

    let (tx, rx) = mpsc::channel::<CountdownView>();
    let countdown = Countdown::start(expires_at, clock, scheduler, tick, move |view| {
        let _ = tx.send(view.clone());
    })?;

    for view in rx.iter() {
        show(&view);
        if view.expired {
            break;
        }
    }

    countdown.stop();
    Ok(())
}

fn print_view(view: &CountdownView) {
    let text = if view.expired {
        style(&view.text).red().bold().to_string()
    } else if view.warning {
        style(&view.text).yellow().to_string()
    } else {
        style(&view.text).green().to_string()
    };
    println!("{} {text}", style("\u{23f1}").dim());
}
