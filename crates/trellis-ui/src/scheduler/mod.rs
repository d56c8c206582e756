//! Deferred work: one-shot and repeating timers.
//!
//! Callbacks receive the handle of the timer that fired them so a component
//! can compare it with the handle it stored and ignore a stale firing.
//! Callbacks are never run inline from `schedule_*`; a component may hold
//! its own lock while scheduling and storing the returned handle.

mod manual;
mod runtime;

pub use self::manual::ManualScheduler;
pub use self::runtime::TokioScheduler;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Identity of a scheduled timer. Never reused by one scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(pub(crate) u64);

impl fmt::Display for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer-{}", self.0)
    }
}

/// Returned by a repeating callback to keep or stop its timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerControl {
    Continue,
    Break,
}

pub type OnceCallback = Box<dyn FnOnce(TimerHandle) + Send>;
pub type RepeatingCallback = Box<dyn FnMut(TimerHandle) -> TimerControl + Send>;

/// Shared handle to a scheduler.
pub type SharedScheduler = Arc<dyn Scheduler>;

pub trait Scheduler: Send + Sync {
    /// Run `callback` once after `delay`.
    fn schedule_once(&self, delay: Duration, callback: OnceCallback) -> TimerHandle;

    /// Run `callback` every `interval` until it returns
    /// [`TimerControl::Break`] or the timer is cancelled.
    fn schedule_repeating(&self, interval: Duration, callback: RepeatingCallback) -> TimerHandle;

    /// Cancel a pending timer. Returns `false` if it already fired or was
    /// cancelled before.
    fn cancel(&self, handle: TimerHandle) -> bool;
}
