//! Debounced pointer-enter handling for focus-follows-mouse.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tracing::debug;
use trellis_common::PaneId;
use trellis_ui::{SharedScheduler, TimerHandle};

use crate::PaneCallback;

#[derive(Default)]
struct HoverState {
    timer: Option<TimerHandle>,
    on_enter: Option<PaneCallback>,
    detached: bool,
}

struct Shared {
    pane_id: PaneId,
    scheduler: SharedScheduler,
    state: Mutex<HoverState>,
}

impl Shared {
    fn state(&self) -> MutexGuard<'_, HoverState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn fire(&self, handle: TimerHandle) {
        let callback = {
            let mut state = self.state();
            if state.timer != Some(handle) || state.detached {
                return;
            }
            state.timer = None;
            state.on_enter.clone()
        };
        if let Some(callback) = callback {
            callback(self.pane_id);
        }
    }

    fn cancel_locked(&self, state: &mut HoverState) {
        if let Some(handle) = state.timer.take() {
            self.scheduler.cancel(handle);
        }
    }
}

/// Fires its enter callback once the pointer has rested on a pane for the
/// debounce delay. Leaving earlier cancels the pending fire.
pub struct HoverHandler {
    shared: Arc<Shared>,
    delay: Duration,
}

impl HoverHandler {
    pub fn new(pane_id: PaneId, scheduler: SharedScheduler, delay: Duration) -> Self {
        debug!(%pane_id, "creating hover handler");
        Self {
            shared: Arc::new(Shared {
                pane_id,
                scheduler,
                state: Mutex::new(HoverState::default()),
            }),
            delay,
        }
    }

    pub fn set_on_enter(&self, callback: PaneCallback) {
        let mut state = self.shared.state();
        if !state.detached {
            state.on_enter = Some(callback);
        }
    }

    /// Pointer entered: (re)start the debounce timer.
    pub fn enter(&self) {
        let shared = &self.shared;
        let mut state = shared.state();
        if state.detached {
            return;
        }
        shared.cancel_locked(&mut state);
        let weak = Arc::downgrade(shared);
        let handle = shared.scheduler.schedule_once(
            self.delay,
            Box::new(move |handle| {
                if let Some(shared) = weak.upgrade() {
                    shared.fire(handle);
                }
            }),
        );
        state.timer = Some(handle);
    }

    pub fn leave(&self) {
        self.cancel_pending();
    }

    pub fn cancel_pending(&self) {
        let mut state = self.shared.state();
        self.shared.cancel_locked(&mut state);
    }

    pub fn is_pending(&self) -> bool {
        self.shared.state().timer.is_some()
    }

    /// Cancel and drop the callback. The handler stays inert afterwards.
    pub fn detach(&self) {
        let mut state = self.shared.state();
        self.shared.cancel_locked(&mut state);
        state.on_enter = None;
        state.detached = true;
    }
}
