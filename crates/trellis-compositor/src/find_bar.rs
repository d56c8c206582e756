//! Native find-in-page bar shell.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;
use trellis_common::{Orientation, PaneId};
use trellis_ui::{Align, BoxWidget, EntryWidget, SharedFactory, Widget, WidgetRef};

/// Searches one pane's content. Supplied by the content-view layer.
pub trait FindController: Send + Sync {
    fn search(&self, query: &str);
    fn find_next(&self);
    fn find_previous(&self);
    /// Clear highlights when the bar closes.
    fn finish(&self);
}

/// Resolves the controller for the pane a find bar is created on.
pub type FindControllerProvider =
    Arc<dyn Fn(PaneId) -> Option<Arc<dyn FindController>> + Send + Sync>;

type CloseCallback = Arc<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct FindBarState {
    visible: bool,
    controller: Option<Arc<dyn FindController>>,
    on_close: Option<CloseCallback>,
}

pub struct FindBar {
    container: Arc<dyn BoxWidget>,
    entry: Arc<dyn EntryWidget>,
    state: Mutex<FindBarState>,
}

impl FindBar {
    pub fn new(factory: &SharedFactory) -> Self {
        let container = factory.new_box(Orientation::Horizontal, 4);
        container.add_css_class("find-bar");
        container.set_halign(Align::End);
        container.set_valign(Align::Start);
        container.set_visible(false);

        let entry = factory.new_entry();
        entry.add_css_class("find-bar-entry");
        entry.set_placeholder("Find in page");
        container.append(entry.clone().as_widget());

        Self {
            container,
            entry,
            state: Mutex::new(FindBarState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, FindBarState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn controller(&self) -> Option<Arc<dyn FindController>> {
        self.state().controller.clone()
    }

    pub fn widget(&self) -> WidgetRef {
        self.container.clone().as_widget()
    }

    pub fn set_find_controller(&self, controller: Option<Arc<dyn FindController>>) {
        self.state().controller = controller;
    }

    pub fn has_find_controller(&self) -> bool {
        self.state().controller.is_some()
    }

    pub fn set_on_close(&self, callback: Option<CloseCallback>) {
        self.state().on_close = callback;
    }

    pub fn show(&self) {
        let mut state = self.state();
        if !state.visible {
            state.visible = true;
            self.container.set_visible(true);
        }
        self.entry.grab_focus();
    }

    /// Hide and clear the controller's highlights.
    pub fn hide(&self) {
        let controller = {
            let mut state = self.state();
            if !state.visible {
                return;
            }
            state.visible = false;
            self.container.set_visible(false);
            state.controller.clone()
        };
        if let Some(controller) = controller {
            controller.finish();
        }
    }

    /// Close as if the user dismissed the bar; notifies the owner.
    pub fn close(&self) {
        self.hide();
        let callback = self.state().on_close.clone();
        if let Some(callback) = callback {
            callback();
        }
    }

    pub fn is_visible(&self) -> bool {
        self.state().visible
    }

    pub fn query(&self) -> String {
        self.entry.text()
    }

    /// Replace the query and search for it.
    pub fn set_query(&self, query: &str) {
        self.entry.set_text(query);
        match self.controller() {
            Some(controller) => controller.search(query),
            None => debug!(query, "find query set without a controller"),
        }
    }

    pub fn find_next(&self) {
        if let Some(controller) = self.controller() {
            controller.find_next();
        }
    }

    pub fn find_previous(&self) {
        if let Some(controller) = self.controller() {
            controller.find_previous();
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    use crate::test_support::Harness;

    /// Records every call it receives.
    #[derive(Default)]
    pub(crate) struct RecordingController {
        pub calls: Mutex<Vec<String>>,
    }

    impl RecordingController {
        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }
    }

    impl FindController for RecordingController {
        fn search(&self, query: &str) {
            self.record(format!("search:{query}"));
        }

        fn find_next(&self) {
            self.record("next".into());
        }

        fn find_previous(&self) {
            self.record("previous".into());
        }

        fn finish(&self) {
            self.record("finish".into());
        }
    }

    #[test]
    fn delegates_to_controller() {
        let h = Harness::new();
        let bar = FindBar::new(&h.factory);
        let controller = Arc::new(RecordingController::default());
        bar.set_find_controller(Some(controller.clone()));

        bar.show();
        bar.set_query("needle");
        bar.find_next();
        bar.find_previous();
        bar.hide();
        bar.hide();

        assert_eq!(
            controller.calls(),
            vec!["search:needle", "next", "previous", "finish"]
        );
        assert_eq!(bar.query(), "needle");
    }

    #[test]
    fn navigation_without_controller_is_noop() {
        let h = Harness::new();
        let bar = FindBar::new(&h.factory);
        bar.show();
        bar.set_query("x");
        bar.find_next();
        assert!(bar.is_visible());
        assert!(!bar.has_find_controller());
    }

    #[test]
    fn close_notifies_owner() {
        let h = Harness::new();
        let bar = FindBar::new(&h.factory);
        let closed = Arc::new(Mutex::new(false));
        let flag = closed.clone();
        bar.set_on_close(Some(Arc::new(move || *flag.lock().unwrap() = true)));
        bar.show();
        bar.close();
        assert!(!bar.is_visible());
        assert!(*closed.lock().unwrap());
    }
}
