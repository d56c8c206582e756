use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;
use trellis_common::{LayoutError, Orientation, PaneId};
use trellis_ui::{BoxWidget, LabelWidget, SharedFactory, Widget, WidgetRef};

use super::{ActivateCallback, StackedGroup};
use crate::pane::UNTITLED;
use crate::stack::PaneStack;

struct Entry {
    title: String,
    frame: Arc<dyn BoxWidget>,
    title_bar: Arc<dyn LabelWidget>,
    slot: Arc<dyn BoxWidget>,
    content: WidgetRef,
}

struct StackedState {
    stack: PaneStack,
    entries: Vec<Entry>,
}

/// Title bar plus content slot per entry, laid out vertically. Every title
/// bar stays visible; only the active entry's content slot is shown.
pub struct StackedView {
    factory: SharedFactory,
    container: Arc<dyn BoxWidget>,
    state: Mutex<StackedState>,
    on_activate: Mutex<Option<ActivateCallback>>,
}

impl StackedView {
    pub fn new(
        factory: SharedFactory,
        pane_id: PaneId,
        title: &str,
        content: WidgetRef,
    ) -> Result<Self, LayoutError> {
        let container = factory.new_box(Orientation::Vertical, 0);
        container.add_css_class("stacked-pane");
        container.set_expand(true);

        let entry = Self::make_entry(&factory, pane_id, title, content)?;
        container.append(entry.frame.clone().as_widget());

        let view = Self {
            factory,
            container,
            state: Mutex::new(StackedState {
                stack: PaneStack::new(pane_id),
                entries: vec![entry],
            }),
            on_activate: Mutex::new(None),
        };
        view.refresh(&view.state());
        Ok(view)
    }

    fn state(&self) -> MutexGuard<'_, StackedState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn make_entry(
        factory: &SharedFactory,
        pane_id: PaneId,
        title: &str,
        content: WidgetRef,
    ) -> Result<Entry, LayoutError> {
        if content.parent().is_some() {
            return Err(LayoutError::Build {
                node: pane_id.to_string(),
                reason: "content widget is still attached elsewhere".into(),
            });
        }
        let title = if title.trim().is_empty() {
            UNTITLED.to_string()
        } else {
            title.to_string()
        };

        let frame = factory.new_box(Orientation::Vertical, 0);
        frame.add_css_class("stacked-entry");
        let title_bar = factory.new_label(&title);
        title_bar.add_css_class("stacked-title");
        let slot = factory.new_box(Orientation::Vertical, 0);
        slot.set_expand(true);

        slot.append(content.clone());
        frame.append(title_bar.clone().as_widget());
        frame.append(slot.clone().as_widget());

        Ok(Entry {
            title,
            frame,
            title_bar,
            slot,
            content,
        })
    }

    fn refresh(&self, state: &StackedState) {
        let active = state.stack.active_index();
        for (i, entry) in state.entries.iter().enumerate() {
            let is_active = i == active;
            entry.slot.set_visible(is_active);
            entry.frame.set_expand(is_active);
            if is_active {
                entry.title_bar.add_css_class("active");
            } else {
                entry.title_bar.remove_css_class("active");
            }
        }
    }

    pub fn pane_ids(&self) -> Vec<PaneId> {
        self.state().stack.pane_ids().to_vec()
    }

    pub fn title_at(&self, index: usize) -> Option<String> {
        self.state().entries.get(index).map(|e| e.title.clone())
    }

    pub fn set_title(&self, pane_id: PaneId, title: &str) -> bool {
        let mut state = self.state();
        let Some(idx) = state.stack.position(pane_id) else {
            return false;
        };
        let entry = &mut state.entries[idx];
        entry.title = title.to_string();
        entry.title_bar.set_text(title);
        true
    }

    /// Activate an entry as if its title bar was clicked.
    pub fn activate_title(&self, index: usize) -> Result<(), LayoutError> {
        self.set_active(index)?;
        let callback = self
            .on_activate
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        if let Some(callback) = callback {
            callback(index);
        }
        Ok(())
    }

    fn navigate(&self, forward: bool) -> Result<PaneId, LayoutError> {
        let mut state = self.state();
        if state.stack.is_empty() {
            return Err(LayoutError::EmptyStack);
        }
        if forward {
            state.stack.cycle_next();
        } else {
            state.stack.cycle_prev();
        }
        self.refresh(&state);
        Ok(state.stack.active())
    }
}

impl StackedGroup for StackedView {
    fn widget(&self) -> WidgetRef {
        self.container.clone().as_widget()
    }

    fn count(&self) -> usize {
        self.state().stack.len()
    }

    fn active_index(&self) -> usize {
        self.state().stack.active_index()
    }

    fn pane_at(&self, index: usize) -> Option<PaneId> {
        self.state().stack.get(index)
    }

    fn find_pane_index(&self, pane_id: PaneId) -> Option<usize> {
        self.state().stack.position(pane_id)
    }

    fn insert_pane_after(
        &self,
        index: usize,
        pane_id: PaneId,
        title: &str,
        content: WidgetRef,
    ) -> Result<usize, LayoutError> {
        let entry = Self::make_entry(&self.factory, pane_id, title, content)?;
        let mut state = self.state();
        let at = state.stack.insert_after(index, pane_id);
        self.container.insert_at(at, entry.frame.clone().as_widget());
        state.entries.insert(at, entry);
        self.refresh(&state);
        debug!(%pane_id, index = at, count = state.stack.len(), "inserted pane into stack");
        Ok(at)
    }

    fn remove_pane(&self, pane_id: PaneId) -> Result<bool, LayoutError> {
        let mut state = self.state();
        let Some(idx) = state.stack.position(pane_id) else {
            return Ok(false);
        };
        if !state.stack.remove(pane_id) {
            return Err(LayoutError::EmptyStack);
        }
        let entry = state.entries.remove(idx);
        entry.slot.remove(&entry.content);
        let frame = entry.frame.clone().as_widget();
        self.container.remove(&frame);
        self.refresh(&state);
        debug!(%pane_id, count = state.stack.len(), "removed pane from stack");
        Ok(true)
    }

    fn set_active(&self, index: usize) -> Result<(), LayoutError> {
        let mut state = self.state();
        if !state.stack.set_active_index(index) {
            return Err(LayoutError::IndexOutOfRange(index));
        }
        self.refresh(&state);
        Ok(())
    }

    fn navigate_next(&self) -> Result<PaneId, LayoutError> {
        self.navigate(true)
    }

    fn navigate_previous(&self) -> Result<PaneId, LayoutError> {
        self.navigate(false)
    }

    fn set_on_activate(&self, callback: Option<ActivateCallback>) {
        *self.on_activate.lock().unwrap_or_else(|e| e.into_inner()) = callback;
    }
}
