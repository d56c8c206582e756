use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::AbortHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::trace;

use super::{OnceCallback, RepeatingCallback, Scheduler, TimerControl, TimerHandle};

#[derive(Default)]
struct Timers {
    next_id: u64,
    tasks: HashMap<u64, AbortHandle>,
}

/// Scheduler backed by tokio tasks on a runtime handle.
///
/// Each timer is a spawned task; cancelling aborts it. A task removes its
/// own entry before invoking a one-shot callback, so `cancel` racing with a
/// firing timer reports `false` and the component's handle check decides.
#[derive(Clone)]
pub struct TokioScheduler {
    runtime: Handle,
    timers: Arc<Mutex<Timers>>,
}

impl TokioScheduler {
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            timers: Arc::new(Mutex::new(Timers::default())),
        }
    }

    /// Scheduler on the runtime the caller is running in, if any.
    pub fn from_current() -> Option<Self> {
        Handle::try_current().ok().map(Self::new)
    }

    /// Number of timers still scheduled.
    pub fn pending(&self) -> usize {
        lock(&self.timers).tasks.len()
    }

    fn spawn<F>(&self, task: impl FnOnce(TimerHandle, Arc<Mutex<Timers>>) -> F) -> TimerHandle
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        // Held across spawn so the task cannot look up its entry before it exists.
        let mut timers = lock(&self.timers);
        timers.next_id += 1;
        let handle = TimerHandle(timers.next_id);
        let join = self.runtime.spawn(task(handle, Arc::clone(&self.timers)));
        timers.tasks.insert(handle.0, join.abort_handle());
        handle
    }
}

fn lock(timers: &Mutex<Timers>) -> MutexGuard<'_, Timers> {
    timers.lock().unwrap_or_else(|e| e.into_inner())
}

impl Scheduler for TokioScheduler {
    fn schedule_once(&self, delay: Duration, callback: OnceCallback) -> TimerHandle {
        self.spawn(move |handle, timers| async move {
            time::sleep(delay).await;
            if lock(&timers).tasks.remove(&handle.0).is_none() {
                return;
            }
            trace!(%handle, "timer fired");
            callback(handle);
        })
    }

    fn schedule_repeating(&self, interval: Duration, mut callback: RepeatingCallback) -> TimerHandle {
        let interval = interval.max(Duration::from_millis(1));
        self.spawn(move |handle, timers| async move {
            let mut ticker = time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if !lock(&timers).tasks.contains_key(&handle.0) {
                    return;
                }
                if callback(handle) == TimerControl::Break {
                    lock(&timers).tasks.remove(&handle.0);
                    return;
                }
            }
        })
    }

    fn cancel(&self, handle: TimerHandle) -> bool {
        match lock(&self.timers).tasks.remove(&handle.0) {
            Some(task) => {
                task.abort();
                true
            }
            None => false,
        }
    }
}
