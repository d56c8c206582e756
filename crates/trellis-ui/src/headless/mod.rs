//! In-memory widget backend.
//!
//! Every widget created by a [`HeadlessFactory`] shares one registry that
//! resolves parent links, tracks keyboard focus, and counts parenting
//! violations (a child mounted while still attached elsewhere). Tests use
//! the violation counter to prove content views are never double-parented.

mod widget;

#[cfg(test)]
mod tests;

pub use widget::{HeadlessWidget, WidgetKind};

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Weak};

use tracing::warn;
use trellis_common::Orientation;

use crate::widget::{
    BoxWidget, EntryWidget, LabelWidget, OverlayWidget, ProgressBarWidget, SpinnerWidget,
    WidgetFactory, WidgetId,
};

pub(crate) struct Registry {
    next_id: AtomicU64,
    widgets: Mutex<HashMap<WidgetId, Weak<HeadlessWidget>>>,
    focused: Mutex<Option<WidgetId>>,
    violations: AtomicUsize,
}

impl Registry {
    fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            widgets: Mutex::new(HashMap::new()),
            focused: Mutex::new(None),
            violations: AtomicUsize::new(0),
        }
    }

    pub(crate) fn lookup(&self, id: WidgetId) -> Option<Arc<HeadlessWidget>> {
        let widgets = self.widgets.lock().unwrap_or_else(|e| e.into_inner());
        widgets.get(&id).and_then(Weak::upgrade)
    }

    pub(crate) fn focused(&self) -> Option<WidgetId> {
        *self.focused.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub(crate) fn set_focused(&self, id: Option<WidgetId>) {
        *self.focused.lock().unwrap_or_else(|e| e.into_inner()) = id;
    }

    pub(crate) fn record_violation(&self, parent: WidgetId, child: WidgetId, reason: &str) {
        warn!(%parent, %child, reason, "widget parenting violation");
        self.violations.fetch_add(1, Ordering::Relaxed);
    }
}

/// Factory for headless widgets. Cloning shares the registry.
#[derive(Clone)]
pub struct HeadlessFactory {
    registry: Arc<Registry>,
}

impl Default for HeadlessFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessFactory {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Registry::new()),
        }
    }

    fn create(&self, kind: WidgetKind) -> Arc<HeadlessWidget> {
        let id = WidgetId(self.registry.next_id.fetch_add(1, Ordering::Relaxed));
        let widget = Arc::new(HeadlessWidget::new(id, kind, Arc::clone(&self.registry)));
        let mut widgets = self
            .registry
            .widgets
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        widgets.insert(id, Arc::downgrade(&widget));
        widget
    }

    /// Create an opaque content view, the stand-in for an embedded browser
    /// view. Content views are focusable and expand to fill their slot.
    pub fn new_content_view(&self) -> Arc<HeadlessWidget> {
        let widget = self.create(WidgetKind::Content);
        crate::widget::Widget::set_expand(widget.as_ref(), true);
        widget
    }

    /// Resolve a live widget by id.
    pub fn lookup(&self, id: WidgetId) -> Option<Arc<HeadlessWidget>> {
        self.registry.lookup(id)
    }

    /// Widget currently holding keyboard focus.
    pub fn focused(&self) -> Option<WidgetId> {
        self.registry.focused()
    }

    /// Number of refused mounts since the factory was created.
    pub fn parenting_violations(&self) -> usize {
        self.registry.violations.load(Ordering::Relaxed)
    }

    /// Number of widgets still referenced somewhere.
    pub fn live_widgets(&self) -> usize {
        let widgets = self
            .registry
            .widgets
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        widgets.values().filter(|w| w.strong_count() > 0).count()
    }
}

impl WidgetFactory for HeadlessFactory {
    fn new_overlay(&self) -> Arc<dyn OverlayWidget> {
        self.create(WidgetKind::Overlay)
    }

    fn new_box(&self, orientation: Orientation, _spacing: i32) -> Arc<dyn BoxWidget> {
        self.create(WidgetKind::Box(orientation))
    }

    fn new_label(&self, text: &str) -> Arc<dyn LabelWidget> {
        let label = self.create(WidgetKind::Label);
        LabelWidget::set_text(label.as_ref(), text);
        label
    }

    fn new_entry(&self) -> Arc<dyn EntryWidget> {
        self.create(WidgetKind::Entry)
    }

    fn new_progress_bar(&self) -> Arc<dyn ProgressBarWidget> {
        self.create(WidgetKind::ProgressBar)
    }

    fn new_spinner(&self) -> Arc<dyn SpinnerWidget> {
        self.create(WidgetKind::Spinner)
    }
}
