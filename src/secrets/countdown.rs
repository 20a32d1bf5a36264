//! Live "time remaining" text for a single expiry timestamp.
//!
//! A [`Countdown`] computes its view immediately on start and then again on
//! every scheduler tick. Between ticks the text can lag real time by up to one
//! period (e.g. "2 minutes" may still show for 59 s after it became
//! "1 minute"). Dropping the countdown cancels its tick.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde::Serialize;

use super::schedule::{Clock, Scheduler, TaskHandle};
use super::status::WARNING_WINDOW_SECS;
use crate::errors::Result;

/// Default refresh period.
pub const DEFAULT_TICK: Duration = Duration::from_secs(60);

/// Text shown once the expiry time has passed.
pub const EXPIRED_TEXT: &str = "expired";

/// Text shown when less than a minute remains.
pub const UNDER_A_MINUTE_TEXT: &str = "less than a minute";

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;

/// What a countdown currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountdownView {
    pub text: String,
    /// Seven days or less remain. Presentation only.
    pub warning: bool,
    pub expired: bool,
}

/// Derive the view for `expires_at` as seen at `now`.
pub fn countdown_view(expires_at: i64, now: i64) -> CountdownView {
    let remaining = expires_at.saturating_sub(now);
    if remaining <= 0 {
        return CountdownView {
            text: EXPIRED_TEXT.to_string(),
            warning: true,
            expired: true,
        };
    }

    CountdownView {
        text: remaining_text(remaining),
        warning: remaining <= WARNING_WINDOW_SECS,
        expired: false,
    }
}

/// Render a positive number of seconds using the coarsest nonzero unit.
pub fn remaining_text(secs: i64) -> String {
    let (n, unit) = if secs >= DAY {
        (secs / DAY, "day")
    } else if secs >= HOUR {
        (secs / HOUR, "hour")
    } else if secs >= MINUTE {
        (secs / MINUTE, "minute")
    } else {
        return UNDER_A_MINUTE_TEXT.to_string();
    };

    if n == 1 {
        format!("1 {unit}")
    } else {
        format!("{n} {unit}s")
    }
}

/// A self-refreshing countdown bound to one scheduler registration.
pub struct Countdown {
    view: Arc<Mutex<CountdownView>>,
    _tick: TaskHandle,
}

impl Countdown {
    /// Compute the view now and keep recomputing it every `tick`.
    ///
    /// `on_change` runs with the initial view and then whenever a tick
    /// produces a different one.
    pub fn start<F>(
        expires_at: i64,
        clock: Arc<dyn Clock>,
        scheduler: &dyn Scheduler,
        tick: Duration,
        on_change: F,
    ) -> Result<Self>
    where
        F: Fn(&CountdownView) + Send + 'static,
    {
        let initial = countdown_view(expires_at, clock.now());
        on_change(&initial);
        let view = Arc::new(Mutex::new(initial));

        let shared = Arc::clone(&view);
        let tick = scheduler.schedule_repeating(
            tick,
            Box::new(move || {
                let next = countdown_view(expires_at, clock.now());
                let changed = {
                    let mut current = shared.lock().unwrap_or_else(PoisonError::into_inner);
                    if *current == next {
                        false
                    } else {
                        *current = next.clone();
                        true
                    }
                };
                if changed {
                    tracing::trace!(text = %next.text, "countdown changed");
                    on_change(&next);
                }
            }),
        )?;

        Ok(Self { view, _tick: tick })
    }

    /// The most recently computed view.
    pub fn view(&self) -> CountdownView {
        self.view
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn text(&self) -> String {
        self.view().text
    }

    /// Stop refreshing. Same as dropping.
    pub fn stop(self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coarsest_unit_wins() {
        assert_eq!(remaining_text(3 * DAY + 5 * HOUR), "3 days");
        assert_eq!(remaining_text(DAY), "1 day");
        assert_eq!(remaining_text(23 * HOUR + 59 * MINUTE), "23 hours");
        assert_eq!(remaining_text(HOUR), "1 hour");
        assert_eq!(remaining_text(59 * MINUTE + 59), "59 minutes");
        assert_eq!(remaining_text(MINUTE), "1 minute");
        assert_eq!(remaining_text(59), UNDER_A_MINUTE_TEXT);
        assert_eq!(remaining_text(1), UNDER_A_MINUTE_TEXT);
    }

    #[test]
    fn zero_remaining_is_expired() {
        let v = countdown_view(1_000, 1_000);
        assert!(v.expired);
        assert_eq!(v.text, EXPIRED_TEXT);
    }

    #[test]
    fn expired_view_is_stable() {
        assert_eq!(countdown_view(1_000, 1_001), countdown_view(1_000, 9_999));
    }

    #[test]
    fn warning_includes_exactly_seven_days() {
        assert!(countdown_view(WARNING_WINDOW_SECS, 0).warning);
        assert!(!countdown_view(WARNING_WINDOW_SECS + 1, 0).warning);
        assert!(countdown_view(1, 0).warning);
    }

    #[test]
    fn far_future_has_no_warning() {
        let v = countdown_view(30 * DAY, 0);
        assert_eq!(v.text, "30 days");
        assert!(!v.warning);
        assert!(!v.expired);
    }
}
