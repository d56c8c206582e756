//! Page-load progress bar with stepwise animation toward a target value.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tracing::trace;
use trellis_config::schema::ProgressConfig;
use trellis_ui::{
    Align, ProgressBarWidget, SharedFactory, SharedScheduler, TimerControl, TimerHandle, Widget,
    WidgetRef,
};

#[derive(Default)]
struct ProgressState {
    visible: bool,
    current: f64,
    target: f64,
    tick: Option<TimerHandle>,
}

struct Shared {
    bar: Arc<dyn ProgressBarWidget>,
    scheduler: SharedScheduler,
    step: f64,
    snap_threshold: f64,
    state: Mutex<ProgressState>,
}

impl Shared {
    fn state(&self) -> MutexGuard<'_, ProgressState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn tick(&self, handle: TimerHandle) -> TimerControl {
        let mut state = self.state();
        if state.tick != Some(handle) {
            return TimerControl::Break;
        }
        if state.current < state.target {
            state.current = (state.current + self.step).min(state.target);
            self.bar.set_fraction(state.current);
        }
        if state.current < state.target {
            TimerControl::Continue
        } else {
            state.tick = None;
            TimerControl::Break
        }
    }

    fn stop_tick(&self, state: &mut ProgressState) {
        if let Some(handle) = state.tick.take() {
            self.scheduler.cancel(handle);
        }
    }
}

/// Slim load-progress bar anchored to the bottom of a pane.
///
/// `current` walks toward `target` by `step` on every tick. Jumps larger
/// than the snap threshold, moves backwards, and completion are applied
/// immediately.
pub struct ProgressIndicator {
    shared: Arc<Shared>,
    interval: Duration,
}

impl ProgressIndicator {
    pub fn new(factory: &SharedFactory, scheduler: SharedScheduler, config: &ProgressConfig) -> Self {
        let bar = factory.new_progress_bar();
        bar.add_css_class("osd");
        bar.set_valign(Align::End);
        bar.set_halign(Align::Fill);
        bar.set_can_target(false);
        bar.set_can_focus(false);
        bar.set_visible(false);

        Self {
            shared: Arc::new(Shared {
                bar,
                scheduler,
                step: config.step,
                snap_threshold: config.snap_threshold,
                state: Mutex::new(ProgressState::default()),
            }),
            interval: config.interval(),
        }
    }

    pub fn widget(&self) -> WidgetRef {
        self.shared.bar.clone().as_widget()
    }

    /// Set the target value, clamped to `[0, 1]`. NaN is ignored.
    pub fn set_value(&self, value: f64) {
        if value.is_nan() {
            return;
        }
        let value = value.clamp(0.0, 1.0);
        let shared = &self.shared;
        let mut state = shared.state();
        state.target = value;

        let jump = value - state.current;
        if jump > shared.snap_threshold || jump < 0.0 || value >= 1.0 {
            shared.stop_tick(&mut state);
            state.current = value;
            shared.bar.set_fraction(value);
            trace!(value, "progress snapped");
            return;
        }

        if state.tick.is_none() && state.current < state.target {
            let weak = Arc::downgrade(shared);
            let handle = shared.scheduler.schedule_repeating(
                self.interval,
                Box::new(move |handle| match weak.upgrade() {
                    Some(shared) => shared.tick(handle),
                    None => TimerControl::Break,
                }),
            );
            state.tick = Some(handle);
        }
    }

    pub fn show(&self) {
        let mut state = self.shared.state();
        if !state.visible {
            state.visible = true;
            self.shared.bar.set_visible(true);
        }
    }

    /// Hide the bar, stop animating, and reset both values to zero.
    pub fn hide(&self) {
        let shared = &self.shared;
        let mut state = shared.state();
        shared.stop_tick(&mut state);
        state.current = 0.0;
        state.target = 0.0;
        shared.bar.set_fraction(0.0);
        if state.visible {
            state.visible = false;
            shared.bar.set_visible(false);
        }
    }

    pub fn is_visible(&self) -> bool {
        self.shared.state().visible
    }

    pub fn current_value(&self) -> f64 {
        self.shared.state().current
    }

    pub fn target_value(&self) -> f64 {
        self.shared.state().target
    }

    pub fn is_animating(&self) -> bool {
        self.shared.state().tick.is_some()
    }
}
