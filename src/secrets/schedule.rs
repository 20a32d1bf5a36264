//! Time sources and repeating-task schedulers.
//!
//! Anything that needs "now" or a periodic callback takes a [`Clock`] or a
//! [`Scheduler`] instead of reaching for the system clock or spawning its own
//! timer. Production code uses [`SystemClock`] and [`ThreadScheduler`]; tests
//! drive [`ManualClock`] and [`ManualScheduler`] without real delays.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use crate::errors::{ConsoleError, Result};

/// Shortest period either scheduler will honour.
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// A callback run on every tick.
pub type Task = Box<dyn FnMut() + Send>;

/// Source of the current time in Unix seconds.
pub trait Clock: Send + Sync {
    fn now(&self) -> i64;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicI64>,
}

impl ManualClock {
    pub fn new(start: i64) -> Self {
        Self {
            now: Arc::new(AtomicI64::new(start)),
        }
    }

    pub fn set(&self, now: i64) {
        self.now.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, secs: i64) {
        self.now.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Cancels a scheduled task when dropped (or when [`cancel`](Self::cancel)
/// is called explicitly).
pub struct TaskHandle {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl TaskHandle {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Stop the task now.
    pub fn cancel(mut self) {
        self.run_cancel();
    }

    fn run_cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        self.run_cancel();
    }
}

/// Runs a callback every `period` until the returned handle is dropped.
pub trait Scheduler: Send + Sync {
    fn schedule_repeating(&self, period: Duration, task: Task) -> Result<TaskHandle>;
}

/// One OS thread per scheduled task.
///
/// Cancelling joins the thread, so no tick runs after `cancel` returns
/// unless the cancel comes from inside the task itself, in which case the
/// current tick finishes and the thread exits right after.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadScheduler;

impl Scheduler for ThreadScheduler {
    fn schedule_repeating(&self, period: Duration, mut task: Task) -> Result<TaskHandle> {
        let period = period.max(MIN_PERIOD);
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let worker = thread::Builder::new()
            .name("sealdesk-tick".into())
            .spawn(move || loop {
                match stop_rx.recv_timeout(period) {
                    Err(RecvTimeoutError::Timeout) => task(),
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            })
            .map_err(|e| ConsoleError::CommandFailed(format!("spawn timer thread: {e}")))?;

        tracing::debug!(?period, "scheduled repeating task");

        Ok(TaskHandle::new(move || {
            drop(stop_tx);
            if worker.thread().id() != thread::current().id() {
                let _ = worker.join();
            }
            tracing::debug!("repeating task cancelled");
        }))
    }
}

struct ManualTask {
    id: u64,
    period: Duration,
    next_due: Duration,
    task: Arc<Mutex<Task>>,
}

#[derive(Default)]
struct ManualState {
    next_id: u64,
    elapsed: Duration,
    tasks: Vec<ManualTask>,
}

/// A virtual-time scheduler: tasks fire only inside [`advance`](Self::advance).
///
/// When built with [`with_clock`](Self::with_clock), the clock is moved to the
/// virtual time of each tick before the task runs.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    state: Arc<Mutex<ManualState>>,
    clock: Option<(ManualClock, i64)>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep `clock` in step with virtual time, starting from its current value.
    pub fn with_clock(clock: ManualClock) -> Self {
        let base = clock.now();
        Self {
            state: Arc::default(),
            clock: Some((clock, base)),
        }
    }

    /// Number of tasks still registered.
    pub fn active_tasks(&self) -> usize {
        self.lock().tasks.len()
    }

    /// Move virtual time forward by `by`, firing every tick that falls due.
    pub fn advance(&self, by: Duration) {
        let target = self.lock().elapsed + by;

        loop {
            let due = {
                let mut state = self.lock();
                let due = state
                    .tasks
                    .iter_mut()
                    .filter(|t| t.next_due <= target)
                    .min_by_key(|t| (t.next_due, t.id))
                    .map(|t| {
                        let at = t.next_due;
                        t.next_due += t.period;
                        (at, Arc::clone(&t.task))
                    });
                if let Some((at, _)) = due {
                    state.elapsed = at;
                }
                due
            };

            let Some((at, task)) = due else { break };
            self.sync_clock(at);
            let mut run = task.lock().unwrap_or_else(PoisonError::into_inner);
            (*run)();
        }

        self.lock().elapsed = target;
        self.sync_clock(target);
    }

    fn sync_clock(&self, at: Duration) {
        if let Some((clock, base)) = &self.clock {
            let secs = i64::try_from(at.as_secs()).unwrap_or(i64::MAX);
            clock.set(base.saturating_add(secs));
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ManualState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_repeating(&self, period: Duration, task: Task) -> Result<TaskHandle> {
        let period = period.max(MIN_PERIOD);
        let id = {
            let mut state = self.lock();
            let id = state.next_id;
            state.next_id += 1;
            let next_due = state.elapsed + period;
            state.tasks.push(ManualTask {
                id,
                period,
                next_due,
                task: Arc::new(Mutex::new(task)),
            });
            id
        };

        let state = Arc::clone(&self.state);
        Ok(TaskHandle::new(move || {
            state
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .tasks
                .retain(|t| t.id != id);
        }))
    }
}
