use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tracing::trace;
use trellis_common::Orientation;
use trellis_config::schema::LinkStatusConfig;
use trellis_ui::{
    Align, BoxWidget, LabelWidget, SharedFactory, SharedScheduler, TimerHandle, Widget, WidgetRef,
};

const VISIBLE_CLASS: &str = "visible";
const ELLIPSIS: char = '\u{2026}';

/// Shorten `text` to at most `max_chars` characters by replacing its middle
/// with an ellipsis. URIs keep both their host and their last path segment.
pub fn truncate_middle(text: &str, max_chars: usize) -> String {
    let count = text.chars().count();
    if count <= max_chars {
        return text.to_string();
    }
    if max_chars == 0 {
        return String::new();
    }
    let keep = max_chars - 1;
    let head = keep.div_ceil(2);
    let tail = keep / 2;
    let mut out: String = text.chars().take(head).collect();
    out.push(ELLIPSIS);
    out.extend(text.chars().skip(count - tail));
    out
}

#[derive(Default)]
struct LinkStatusState {
    pending: Option<String>,
    show_timer: Option<TimerHandle>,
    visible: bool,
    closed: bool,
}

struct Shared {
    container: Arc<dyn BoxWidget>,
    label: Arc<dyn LabelWidget>,
    scheduler: SharedScheduler,
    state: Mutex<LinkStatusState>,
}

impl Shared {
    fn state(&self) -> MutexGuard<'_, LinkStatusState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn reveal(&self, handle: TimerHandle) {
        let mut state = self.state();
        if state.show_timer != Some(handle) {
            return;
        }
        state.show_timer = None;
        if let Some(text) = state.pending.clone() {
            self.label.set_text(&text);
            if !state.visible {
                state.visible = true;
                self.container.add_css_class(VISIBLE_CLASS);
            }
        }
    }

    fn hide_locked(&self, state: &mut LinkStatusState) {
        if let Some(handle) = state.show_timer.take() {
            self.scheduler.cancel(handle);
        }
        state.pending = None;
        if state.visible {
            state.visible = false;
            self.container.remove_css_class(VISIBLE_CLASS);
        }
    }
}

/// Destination of the hovered link, shown in the pane's bottom-left corner
/// after a short delay so fast pointer sweeps do not flicker.
pub struct LinkStatusOverlay {
    shared: Arc<Shared>,
    delay: Duration,
    max_chars: usize,
}

impl LinkStatusOverlay {
    pub fn new(factory: &SharedFactory, scheduler: SharedScheduler, config: &LinkStatusConfig) -> Self {
        let container = factory.new_box(Orientation::Horizontal, 0);
        container.add_css_class("link-status");
        container.set_halign(Align::Start);
        container.set_valign(Align::End);
        container.set_expand(false);
        container.set_can_target(false);
        container.set_can_focus(false);

        let label = factory.new_label("");
        label.set_can_target(false);
        label.set_can_focus(false);
        container.append(label.clone().as_widget());

        Self {
            shared: Arc::new(Shared {
                container,
                label,
                scheduler,
                state: Mutex::new(LinkStatusState::default()),
            }),
            delay: config.show_delay(),
            max_chars: config.max_chars as usize,
        }
    }

    pub fn widget(&self) -> WidgetRef {
        self.shared.container.clone().as_widget()
    }

    /// Show `uri` after the configured delay. An empty uri hides.
    pub fn show(&self, uri: &str) {
        let shared = &self.shared;
        let mut state = shared.state();
        if state.closed {
            return;
        }
        if let Some(handle) = state.show_timer.take() {
            shared.scheduler.cancel(handle);
        }
        if uri.is_empty() {
            shared.hide_locked(&mut state);
            return;
        }

        state.pending = Some(truncate_middle(uri, self.max_chars));
        let weak = Arc::downgrade(shared);
        let handle = shared.scheduler.schedule_once(
            self.delay,
            Box::new(move |handle| {
                if let Some(shared) = weak.upgrade() {
                    shared.reveal(handle);
                }
            }),
        );
        state.show_timer = Some(handle);
        trace!(%handle, "link status scheduled");
    }

    pub fn hide(&self) {
        let mut state = self.shared.state();
        self.shared.hide_locked(&mut state);
    }

    pub fn is_visible(&self) -> bool {
        self.shared.state().visible
    }

    /// Text currently displayed.
    pub fn text(&self) -> String {
        self.shared.label.text()
    }

    /// Hide, cancel the pending show, and refuse further shows.
    pub fn cleanup(&self) {
        let mut state = self.shared.state();
        self.shared.hide_locked(&mut state);
        state.closed = true;
    }
}
