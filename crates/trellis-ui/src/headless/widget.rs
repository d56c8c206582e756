use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::warn;
use trellis_common::Orientation;

use super::Registry;
use crate::widget::{
    Align, BoxWidget, EntryWidget, LabelWidget, OverlayWidget, ProgressBarWidget, SpinnerWidget,
    Widget, WidgetId, WidgetRef,
};

/// What a headless widget stands in for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetKind {
    Overlay,
    Box(Orientation),
    Label,
    Entry,
    ProgressBar,
    Spinner,
    /// Opaque stand-in for an embedded content view.
    Content,
}

struct MountedOverlay {
    widget: WidgetRef,
    clip: bool,
    measure: bool,
}

struct WidgetState {
    visible: bool,
    css: BTreeSet<String>,
    halign: Align,
    valign: Align,
    expand: bool,
    can_focus: bool,
    can_target: bool,
    parent: Option<WidgetId>,
    child: Option<WidgetRef>,
    overlays: Vec<MountedOverlay>,
    children: Vec<WidgetRef>,
    text: String,
    placeholder: String,
    fraction: f64,
    spinning: bool,
}

impl Default for WidgetState {
    fn default() -> Self {
        Self {
            visible: true,
            css: BTreeSet::new(),
            halign: Align::Fill,
            valign: Align::Fill,
            expand: false,
            can_focus: true,
            can_target: true,
            parent: None,
            child: None,
            overlays: Vec::new(),
            children: Vec::new(),
            text: String::new(),
            placeholder: String::new(),
            fraction: 0.0,
            spinning: false,
        }
    }
}

/// In-memory widget implementing every contract in [`crate::widget`].
///
/// Parent links are kept by id and resolved through the shared registry,
/// so a widget never holds a strong reference to its parent.
pub struct HeadlessWidget {
    id: WidgetId,
    kind: WidgetKind,
    registry: Arc<Registry>,
    state: Mutex<WidgetState>,
}

impl HeadlessWidget {
    pub(super) fn new(id: WidgetId, kind: WidgetKind, registry: Arc<Registry>) -> Self {
        Self {
            id,
            kind,
            registry,
            state: Mutex::new(WidgetState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, WidgetState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn kind(&self) -> WidgetKind {
        self.kind
    }

    pub fn css_classes(&self) -> Vec<String> {
        self.state().css.iter().cloned().collect()
    }

    pub fn halign(&self) -> Align {
        self.state().halign
    }

    pub fn valign(&self) -> Align {
        self.state().valign
    }

    pub fn expands(&self) -> bool {
        self.state().expand
    }

    pub fn can_focus(&self) -> bool {
        self.state().can_focus
    }

    pub fn can_target(&self) -> bool {
        self.state().can_target
    }

    /// Ids of every direct child: main child, overlays, then box children.
    pub fn child_ids(&self) -> Vec<WidgetId> {
        let state = self.state();
        state
            .child
            .iter()
            .map(|c| c.id())
            .chain(state.overlays.iter().map(|o| o.widget.id()))
            .chain(state.children.iter().map(|c| c.id()))
            .collect()
    }

    /// `(clip, measure)` flags of a mounted overlay.
    pub fn overlay_flags(&self, overlay: WidgetId) -> Option<(bool, bool)> {
        self.state()
            .overlays
            .iter()
            .find(|o| o.widget.id() == overlay)
            .map(|o| (o.clip, o.measure))
    }

    pub fn placeholder(&self) -> String {
        self.state().placeholder.clone()
    }

    /// Record `self` as the parent of `child`. Refuses (and counts a
    /// violation) when the child is still attached elsewhere.
    fn claim(&self, child: &WidgetRef) -> bool {
        let child_id = child.id();
        if child_id == self.id {
            self.registry.record_violation(self.id, child_id, "self-parenting");
            return false;
        }
        let Some(node) = self.registry.lookup(child_id) else {
            self.registry.record_violation(self.id, child_id, "foreign widget");
            return false;
        };
        let mut child_state = node.state();
        if let Some(existing) = child_state.parent {
            drop(child_state);
            warn!(
                parent = %self.id,
                child = %child_id,
                existing = %existing,
                "refusing to parent a widget that already has a parent"
            );
            self.registry.record_violation(self.id, child_id, "double parent");
            return false;
        }
        child_state.parent = Some(self.id);
        true
    }

    fn release(&self, child_id: WidgetId) {
        if let Some(node) = self.registry.lookup(child_id) {
            let mut child_state = node.state();
            if child_state.parent == Some(self.id) {
                child_state.parent = None;
            }
        }
    }

    /// Remove `child_id` from whichever slot holds it.
    pub(super) fn detach_child(&self, child_id: WidgetId) -> bool {
        let removed = {
            let mut state = self.state();
            let mut removed = false;
            if state.child.as_ref().is_some_and(|c| c.id() == child_id) {
                state.child = None;
                removed = true;
            }
            let before = state.overlays.len();
            state.overlays.retain(|o| o.widget.id() != child_id);
            removed |= state.overlays.len() != before;
            let before = state.children.len();
            state.children.retain(|c| c.id() != child_id);
            removed |= state.children.len() != before;
            removed
        };
        if removed {
            self.release(child_id);
        }
        removed
    }
}

impl Widget for HeadlessWidget {
    fn id(&self) -> WidgetId {
        self.id
    }

    fn as_widget(self: Arc<Self>) -> WidgetRef {
        self
    }

    fn set_visible(&self, visible: bool) {
        self.state().visible = visible;
    }

    fn is_visible(&self) -> bool {
        self.state().visible
    }

    fn add_css_class(&self, class: &str) {
        self.state().css.insert(class.to_string());
    }

    fn remove_css_class(&self, class: &str) {
        self.state().css.remove(class);
    }

    fn has_css_class(&self, class: &str) -> bool {
        self.state().css.contains(class)
    }

    fn set_halign(&self, align: Align) {
        self.state().halign = align;
    }

    fn set_valign(&self, align: Align) {
        self.state().valign = align;
    }

    fn set_expand(&self, expand: bool) {
        self.state().expand = expand;
    }

    fn set_can_focus(&self, can_focus: bool) {
        self.state().can_focus = can_focus;
    }

    fn set_can_target(&self, can_target: bool) {
        self.state().can_target = can_target;
    }

    fn grab_focus(&self) -> bool {
        {
            let state = self.state();
            if !state.can_focus || !state.visible {
                return false;
            }
        }
        self.registry.set_focused(Some(self.id));
        true
    }

    fn has_focus(&self) -> bool {
        self.registry.focused() == Some(self.id)
    }

    fn parent(&self) -> Option<WidgetId> {
        self.state().parent
    }

    fn unparent(&self) {
        let parent = self.state().parent;
        let Some(parent_id) = parent else {
            return;
        };
        if let Some(parent) = self.registry.lookup(parent_id) {
            parent.detach_child(self.id);
        }
        let mut state = self.state();
        if state.parent == Some(parent_id) {
            state.parent = None;
        }
    }
}

impl OverlayWidget for HeadlessWidget {
    fn set_child(&self, child: Option<WidgetRef>) {
        let current = self.state().child.as_ref().map(|c| c.id());
        if current.is_some() && current == child.as_ref().map(|c| c.id()) {
            return;
        }
        if let Some(old) = current {
            self.detach_child(old);
        }
        if let Some(child) = child {
            if self.claim(&child) {
                self.state().child = Some(child);
            }
        }
    }

    fn child(&self) -> Option<WidgetRef> {
        self.state().child.clone()
    }

    fn add_overlay(&self, overlay: WidgetRef) {
        if self.claim(&overlay) {
            self.state().overlays.push(MountedOverlay {
                widget: overlay,
                clip: true,
                measure: false,
            });
        }
    }

    fn remove_overlay(&self, overlay: &WidgetRef) -> bool {
        let id = overlay.id();
        let removed = {
            let mut state = self.state();
            let before = state.overlays.len();
            state.overlays.retain(|o| o.widget.id() != id);
            state.overlays.len() != before
        };
        if removed {
            self.release(id);
        }
        removed
    }

    fn overlays(&self) -> Vec<WidgetRef> {
        self.state()
            .overlays
            .iter()
            .map(|o| o.widget.clone())
            .collect()
    }

    fn set_clip_overlay(&self, overlay: &WidgetRef, clip: bool) {
        let id = overlay.id();
        if let Some(o) = self.state().overlays.iter_mut().find(|o| o.widget.id() == id) {
            o.clip = clip;
        }
    }

    fn set_measure_overlay(&self, overlay: &WidgetRef, measure: bool) {
        let id = overlay.id();
        if let Some(o) = self.state().overlays.iter_mut().find(|o| o.widget.id() == id) {
            o.measure = measure;
        }
    }
}

impl BoxWidget for HeadlessWidget {
    fn append(&self, child: WidgetRef) {
        if self.claim(&child) {
            self.state().children.push(child);
        }
    }

    fn insert_at(&self, index: usize, child: WidgetRef) {
        if self.claim(&child) {
            let mut state = self.state();
            let index = index.min(state.children.len());
            state.children.insert(index, child);
        }
    }

    fn remove(&self, child: &WidgetRef) -> bool {
        let id = child.id();
        let removed = {
            let mut state = self.state();
            let before = state.children.len();
            state.children.retain(|c| c.id() != id);
            state.children.len() != before
        };
        if removed {
            self.release(id);
        }
        removed
    }

    fn children(&self) -> Vec<WidgetRef> {
        self.state().children.clone()
    }

    fn orientation(&self) -> Orientation {
        match self.kind {
            WidgetKind::Box(orientation) => orientation,
            _ => Orientation::Horizontal,
        }
    }
}

impl LabelWidget for HeadlessWidget {
    fn set_text(&self, text: &str) {
        self.state().text = text.to_string();
    }

    fn text(&self) -> String {
        self.state().text.clone()
    }
}

impl EntryWidget for HeadlessWidget {
    fn set_text(&self, text: &str) {
        self.state().text = text.to_string();
    }

    fn text(&self) -> String {
        self.state().text.clone()
    }

    fn set_placeholder(&self, text: &str) {
        self.state().placeholder = text.to_string();
    }
}

impl ProgressBarWidget for HeadlessWidget {
    fn set_fraction(&self, fraction: f64) {
        self.state().fraction = fraction.clamp(0.0, 1.0);
    }

    fn fraction(&self) -> f64 {
        self.state().fraction
    }
}

impl SpinnerWidget for HeadlessWidget {
    fn start(&self) {
        self.state().spinning = true;
    }

    fn stop(&self) {
        self.state().spinning = false;
    }

    fn is_spinning(&self) -> bool {
        self.state().spinning
    }
}

impl Drop for HeadlessWidget {
    fn drop(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(|e| e.into_inner());
        let orphans: Vec<WidgetId> = state
            .child
            .iter()
            .map(|c| c.id())
            .chain(state.overlays.iter().map(|o| o.widget.id()))
            .chain(state.children.iter().map(|c| c.id()))
            .collect();
        for id in orphans {
            self.release(id);
        }
    }
}
