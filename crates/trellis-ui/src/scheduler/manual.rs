use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use super::{OnceCallback, RepeatingCallback, Scheduler, TimerControl, TimerHandle};

/// Shortest repeating interval; keeps `advance` from spinning forever.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

enum Job {
    Once(OnceCallback),
    Repeating {
        interval: Duration,
        // `None` while the callback is running.
        callback: Option<RepeatingCallback>,
    },
}

struct Timer {
    due: Duration,
    job: Job,
}

#[derive(Default)]
struct ManualState {
    now: Duration,
    next_id: u64,
    timers: BTreeMap<u64, Timer>,
}

/// Deterministic scheduler driven by a virtual clock.
///
/// Nothing fires until [`advance`](Self::advance) is called. Timers fire in
/// due order (ties in scheduling order) and the internal lock is released
/// while a callback runs, so callbacks may schedule or cancel freely.
#[derive(Default)]
pub struct ManualScheduler {
    state: Mutex<ManualState>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, ManualState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.state().now
    }

    /// Number of timers that have not fired or been cancelled.
    pub fn pending(&self) -> usize {
        self.state().timers.len()
    }

    /// Move the clock forward by `by`, firing every timer that falls due.
    /// Returns the number of callbacks run.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.state().now + by;
        let mut fired = 0;

        loop {
            let next = {
                let mut state = self.state();
                let due = state
                    .timers
                    .iter()
                    .filter(|(_, t)| t.due <= target && Self::is_ready(t))
                    .min_by_key(|(id, t)| (t.due, **id))
                    .map(|(id, t)| (*id, t.due));
                match due {
                    Some((id, due)) => {
                        state.now = due;
                        Self::take_job(&mut state, id).map(|job| (id, job))
                    }
                    None => {
                        state.now = target;
                        None
                    }
                }
            };

            let Some((id, job)) = next else {
                break;
            };
            fired += 1;
            let handle = TimerHandle(id);

            match job {
                Taken::Once(callback) => callback(handle),
                Taken::Repeating(mut callback) => {
                    let keep = callback(handle) == TimerControl::Continue;
                    let mut state = self.state();
                    let now = state.now;
                    // Absent when cancelled while running.
                    if let Some(timer) = state.timers.get_mut(&id) {
                        if keep {
                            if let Job::Repeating {
                                interval,
                                callback: slot,
                            } = &mut timer.job
                            {
                                timer.due = now + *interval;
                                *slot = Some(callback);
                            }
                        } else {
                            state.timers.remove(&id);
                        }
                    }
                }
            }
        }

        fired
    }

    fn is_ready(timer: &Timer) -> bool {
        match &timer.job {
            Job::Once(_) => true,
            Job::Repeating { callback, .. } => callback.is_some(),
        }
    }

    fn take_job(state: &mut ManualState, id: u64) -> Option<Taken> {
        let is_once = matches!(state.timers.get(&id)?.job, Job::Once(_));
        if is_once {
            match state.timers.remove(&id)?.job {
                Job::Once(callback) => Some(Taken::Once(callback)),
                Job::Repeating { .. } => None,
            }
        } else {
            match &mut state.timers.get_mut(&id)?.job {
                Job::Repeating { callback, .. } => callback.take().map(Taken::Repeating),
                Job::Once(_) => None,
            }
        }
    }

    fn insert(&self, delay: Duration, job: Job) -> TimerHandle {
        let mut state = self.state();
        state.next_id += 1;
        let id = state.next_id;
        let due = state.now + delay;
        state.timers.insert(id, Timer { due, job });
        TimerHandle(id)
    }
}

enum Taken {
    Once(OnceCallback),
    Repeating(RepeatingCallback),
}

impl Scheduler for ManualScheduler {
    fn schedule_once(&self, delay: Duration, callback: OnceCallback) -> TimerHandle {
        self.insert(delay, Job::Once(callback))
    }

    fn schedule_repeating(&self, interval: Duration, callback: RepeatingCallback) -> TimerHandle {
        let interval = interval.max(MIN_INTERVAL);
        self.insert(
            interval,
            Job::Repeating {
                interval,
                callback: Some(callback),
            },
        )
    }

    fn cancel(&self, handle: TimerHandle) -> bool {
        self.state().timers.remove(&handle.0).is_some()
    }
}
