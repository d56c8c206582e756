//! Native command bar shell (address and command entry).
//!
//! The bar only holds the query text and its visibility. Completion and
//! navigation live in the application; the workspace coordinator decides
//! which pane hosts the single bar instance.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;
use trellis_common::Orientation;
use trellis_ui::{Align, BoxWidget, EntryWidget, SharedFactory, Widget, WidgetRef};

use crate::toaster::ToastLevel;

/// Receives toasts raised by a bar; routed to the pane hosting it.
pub type ToastSink = Arc<dyn Fn(&str, ToastLevel) + Send + Sync>;

#[derive(Default)]
struct CommandBarState {
    visible: bool,
    on_toast: Option<ToastSink>,
}

pub struct CommandBar {
    container: Arc<dyn BoxWidget>,
    entry: Arc<dyn EntryWidget>,
    state: Mutex<CommandBarState>,
}

impl CommandBar {
    pub fn new(factory: &SharedFactory) -> Self {
        let container = factory.new_box(Orientation::Vertical, 0);
        container.add_css_class("command-bar");
        container.set_halign(Align::Center);
        container.set_valign(Align::Start);
        container.set_visible(false);

        let entry = factory.new_entry();
        entry.add_css_class("command-bar-entry");
        entry.set_placeholder("Search or enter address");
        container.append(entry.clone().as_widget());

        Self {
            container,
            entry,
            state: Mutex::new(CommandBarState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, CommandBarState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn widget(&self) -> WidgetRef {
        self.container.clone().as_widget()
    }

    /// Show with `query` seeded into the entry and focus it.
    pub fn show(&self, query: &str) {
        let mut state = self.state();
        self.entry.set_text(query);
        if !state.visible {
            state.visible = true;
            self.container.set_visible(true);
        }
        self.entry.grab_focus();
        debug!(query, "command bar shown");
    }

    pub fn hide(&self) {
        let mut state = self.state();
        if state.visible {
            state.visible = false;
            self.container.set_visible(false);
        }
    }

    pub fn is_visible(&self) -> bool {
        self.state().visible
    }

    pub fn query(&self) -> String {
        self.entry.text()
    }

    pub fn set_on_toast(&self, sink: Option<ToastSink>) {
        self.state().on_toast = sink;
    }

    /// Raise a toast on behalf of the bar (for example "Copied URL").
    pub fn notify(&self, message: &str, level: ToastLevel) {
        let sink = self.state().on_toast.clone();
        match sink {
            Some(sink) => sink(message, level),
            None => debug!(message, "command bar toast dropped, no sink"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::test_support::Harness;

    #[test]
    fn show_seeds_query_and_focuses() {
        let h = Harness::new();
        let bar = CommandBar::new(&h.factory);
        assert!(!bar.is_visible());

        bar.show("rust lang");
        assert!(bar.is_visible());
        assert_eq!(bar.query(), "rust lang");
        assert_eq!(h.headless.focused(), Some(bar.entry.id()));

        bar.show("docs.rs");
        assert_eq!(bar.query(), "docs.rs");

        bar.hide();
        assert!(!bar.is_visible());
        assert!(!bar.widget().is_visible());
    }

    #[test]
    fn notify_routes_to_sink() {
        let h = Harness::new();
        let bar = CommandBar::new(&h.factory);
        bar.notify("nobody listening", ToastLevel::Info);

        let hits = Arc::new(AtomicUsize::new(0));
        let seen = hits.clone();
        bar.set_on_toast(Some(Arc::new(move |msg: &str, level: ToastLevel| {
            assert_eq!(msg, "copied");
            assert_eq!(level, ToastLevel::Success);
            seen.fetch_add(1, Ordering::SeqCst);
        })));
        bar.notify("copied", ToastLevel::Success);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
