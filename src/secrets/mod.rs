//! Secret status and filtering pipeline.
//!
//! This module provides:
//! - `SecretRecord`, `SecretDisplayRecord`, `SecretStats` (`record`)
//! - Expiry classification (`status`)
//! - Record → display projection (`display`)
//! - Key search (`filter`) and status counts (`stats`)
//! - Self-refreshing remaining-time text (`countdown`)
//! - Clocks and schedulers the countdown runs on (`schedule`)
//!
//! Everything except `Countdown` is a pure function of its inputs. Callers
//! re-run the functions on every refresh instead of caching derived state.

pub mod countdown;
pub mod display;
pub mod filter;
pub mod record;
pub mod schedule;
pub mod stats;
pub mod status;

// Re-export the most commonly used items.
pub use countdown::{countdown_view, Countdown, CountdownView};
pub use display::{date_text, project, project_all};
pub use filter::filter;
pub use record::{SecretDisplayRecord, SecretRecord, SecretStats};
pub use schedule::{
    Clock, ManualClock, ManualScheduler, Scheduler, SystemClock, TaskHandle, ThreadScheduler,
};
pub use stats::aggregate;
pub use status::{classify, SecretStatus, WARNING_WINDOW_SECS};
