//! Toolkit-neutral widget contracts.
//!
//! These mirror the small subset of a retained-mode toolkit the compositor
//! needs: visibility, CSS classes, alignment, focus, and single-parent
//! containment. A widget has at most one parent at any time; containers
//! refuse a child that is still attached elsewhere, so callers unparent
//! first.

use std::fmt;
use std::sync::Arc;

use trellis_common::Orientation;

/// Identity of a widget within its backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(pub u64);

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "widget-{}", self.0)
    }
}

/// Shared handle to any widget.
pub type WidgetRef = Arc<dyn Widget>;

/// Shared handle to a widget factory.
pub type SharedFactory = Arc<dyn WidgetFactory>;

/// Alignment of a widget inside the space its parent gives it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Fill,
    Start,
    End,
    Center,
}

pub trait Widget: Send + Sync {
    fn id(&self) -> WidgetId;

    /// Erase the concrete contract, e.g. to mount an overlay as a child.
    fn as_widget(self: Arc<Self>) -> WidgetRef;

    fn set_visible(&self, visible: bool);
    fn is_visible(&self) -> bool;

    fn add_css_class(&self, class: &str);
    fn remove_css_class(&self, class: &str);
    fn has_css_class(&self, class: &str) -> bool;

    fn set_halign(&self, align: Align);
    fn set_valign(&self, align: Align);
    fn set_expand(&self, expand: bool);

    /// Whether the widget can take keyboard focus.
    fn set_can_focus(&self, can_focus: bool);
    /// Whether the widget receives pointer events.
    fn set_can_target(&self, can_target: bool);

    /// Request keyboard focus. Returns `false` when the widget refuses it.
    fn grab_focus(&self) -> bool;
    fn has_focus(&self) -> bool;

    fn parent(&self) -> Option<WidgetId>;

    /// Detach from the current parent, if any.
    fn unparent(&self);
}

/// A container with one main child and any number of stacked overlays.
pub trait OverlayWidget: Widget {
    /// Replace the main child. The previous child is detached.
    fn set_child(&self, child: Option<WidgetRef>);
    fn child(&self) -> Option<WidgetRef>;

    fn add_overlay(&self, overlay: WidgetRef);
    /// Remove an overlay. Returns `false` if it was not mounted here.
    fn remove_overlay(&self, overlay: &WidgetRef) -> bool;
    fn overlays(&self) -> Vec<WidgetRef>;

    /// Whether the overlay is clipped to the main child's allocation.
    fn set_clip_overlay(&self, overlay: &WidgetRef, clip: bool);
    /// Whether the overlay contributes to the container's size request.
    fn set_measure_overlay(&self, overlay: &WidgetRef, measure: bool);
}

/// A linear container.
pub trait BoxWidget: Widget {
    fn append(&self, child: WidgetRef);
    /// Insert at `index`, clamped to the current child count.
    fn insert_at(&self, index: usize, child: WidgetRef);
    fn remove(&self, child: &WidgetRef) -> bool;
    fn children(&self) -> Vec<WidgetRef>;
    fn orientation(&self) -> Orientation;
}

pub trait LabelWidget: Widget {
    fn set_text(&self, text: &str);
    fn text(&self) -> String;
}

pub trait EntryWidget: Widget {
    fn set_text(&self, text: &str);
    fn text(&self) -> String;
    fn set_placeholder(&self, text: &str);
}

pub trait ProgressBarWidget: Widget {
    /// Set the displayed fraction, clamped to `[0, 1]`.
    fn set_fraction(&self, fraction: f64);
    fn fraction(&self) -> f64;
}

pub trait SpinnerWidget: Widget {
    fn start(&self);
    fn stop(&self);
    fn is_spinning(&self) -> bool;
}

/// Creates widgets for one backend.
pub trait WidgetFactory: Send + Sync {
    fn new_overlay(&self) -> Arc<dyn OverlayWidget>;
    fn new_box(&self, orientation: Orientation, spacing: i32) -> Arc<dyn BoxWidget>;
    fn new_label(&self, text: &str) -> Arc<dyn LabelWidget>;
    fn new_entry(&self) -> Arc<dyn EntryWidget>;
    fn new_progress_bar(&self) -> Arc<dyn ProgressBarWidget>;
    fn new_spinner(&self) -> Arc<dyn SpinnerWidget>;
}

/// Compare two widget handles by identity.
pub fn same_widget(a: &WidgetRef, b: &WidgetRef) -> bool {
    a.id() == b.id()
}
