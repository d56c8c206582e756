//! One pane's container: the content view plus the overlays layered on it.
//!
//! The container owns its overlay widgets exclusively. The content view is
//! borrowed from the application: the container only parents it in its
//! display slot and lets go of it on [`PaneView::cleanup`].


use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

use tracing::{debug, trace};
use trellis_common::{Orientation, PaneId};
use trellis_ui::{
    same_widget, BoxWidget, OverlayWidget, SharedFactory, SharedScheduler, Widget, WidgetRef,
};

use crate::hover::HoverHandler;
use crate::link_status::LinkStatusOverlay;
use crate::loading::LoadingPlaceholder;
use crate::progress::ProgressIndicator;
use crate::slot::LazySlot;
use crate::toaster::{ToastLevel, ToastOverrides, Toaster};
use crate::{PaneCallback, SharedConfig};

const ACTIVE_CLASS: &str = "pane-active";

/// Subscriptions registered by the coordinator. Cleared on cleanup.
#[derive(Default)]
struct PaneCallbacks {
    focus_in: Option<PaneCallback>,
    focus_out: Option<PaneCallback>,
    hover: Option<PaneCallback>,
}

#[derive(Default)]
struct PaneState {
    content: Option<WidgetRef>,
    active: bool,
    callbacks: PaneCallbacks,
    hover: Option<Arc<HoverHandler>>,
    cleaned_up: bool,
}

pub struct PaneView {
    pane_id: PaneId,
    factory: SharedFactory,
    scheduler: SharedScheduler,
    config: SharedConfig,
    overlay: Arc<dyn OverlayWidget>,
    border: Arc<dyn BoxWidget>,
    state: RwLock<PaneState>,
    progress: LazySlot<ProgressIndicator>,
    toaster: LazySlot<Toaster>,
    link_status: LazySlot<LinkStatusOverlay>,
    loading: LazySlot<LoadingPlaceholder>,
}

impl PaneView {
    pub fn new(
        factory: SharedFactory,
        scheduler: SharedScheduler,
        config: SharedConfig,
        pane_id: PaneId,
        content: Option<WidgetRef>,
    ) -> Arc<Self> {
        let overlay = factory.new_overlay();
        overlay.add_css_class("pane-overlay");
        overlay.set_expand(true);
        overlay.set_visible(true);

        let border = factory.new_box(Orientation::Vertical, 0);
        border.add_css_class("pane-border");
        border.set_can_focus(false);
        border.set_can_target(false);
        border.set_expand(true);

        let view = Arc::new(Self {
            pane_id,
            factory,
            scheduler,
            config,
            overlay,
            border,
            state: RwLock::new(PaneState::default()),
            progress: LazySlot::new(),
            toaster: LazySlot::new(),
            link_status: LazySlot::new(),
            loading: LazySlot::new(),
        });
        view.mount_overlay(view.border.clone().as_widget());
        if content.is_some() {
            view.set_content_view(content);
        }
        debug!(pane_id = %pane_id, "pane view created");
        view
    }

    fn read(&self) -> RwLockReadGuard<'_, PaneState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, PaneState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Overlays never clip to the content and never take part in sizing.
    fn mount_overlay(&self, widget: WidgetRef) {
        self.overlay.add_overlay(widget.clone());
        self.overlay.set_clip_overlay(&widget, false);
        self.overlay.set_measure_overlay(&widget, false);
    }

    pub fn pane_id(&self) -> PaneId {
        self.pane_id
    }

    /// The widget to embed in the surrounding layout.
    pub fn widget(&self) -> WidgetRef {
        self.overlay.clone().as_widget()
    }

    pub fn overlay(&self) -> Arc<dyn OverlayWidget> {
        self.overlay.clone()
    }

    pub fn border(&self) -> WidgetRef {
        self.border.clone().as_widget()
    }

    pub fn is_cleaned_up(&self) -> bool {
        self.read().cleaned_up
    }

    pub fn set_active(&self, active: bool) {
        let mut state = self.write();
        if state.cleaned_up || state.active == active {
            return;
        }
        state.active = active;
        if active {
            self.border.add_css_class(ACTIVE_CLASS);
        } else {
            self.border.remove_css_class(ACTIVE_CLASS);
        }
        trace!(pane_id = %self.pane_id, active, "pane activation changed");
    }

    pub fn is_active(&self) -> bool {
        self.read().active
    }

    /// The mounted content view. A view that was reparented elsewhere no
    /// longer counts as this pane's content.
    pub fn content_view(&self) -> Option<WidgetRef> {
        self.read()
            .content
            .clone()
            .filter(|content| self.displays(content))
    }

    fn displays(&self, content: &WidgetRef) -> bool {
        content.parent() == Some(self.overlay.id())
    }

    /// Mount `content` in the display slot, releasing the previous view.
    /// `None` leaves the pane blank.
    pub fn set_content_view(&self, content: Option<WidgetRef>) {
        let mut state = self.write();
        if state.cleaned_up {
            return;
        }
        if let (Some(old), Some(new)) = (&state.content, &content) {
            if same_widget(old, new) && self.displays(old) {
                return;
            }
        }
        if state.content.take().is_some() {
            self.overlay.set_child(None);
        }
        if let Some(widget) = content {
            if widget.parent().is_some() {
                widget.unparent();
            }
            widget.set_visible(true);
            self.overlay.set_child(Some(widget.clone()));
            state.content = Some(widget);
        }
    }

    /// Release the content view without replacing it. A stale record of a
    /// view now shown elsewhere is dropped and `None` returned.
    pub fn take_content_view(&self) -> Option<WidgetRef> {
        let mut state = self.write();
        let content = state.content.take()?;
        if !self.displays(&content) {
            debug!(pane_id = %self.pane_id, "dropped stale content record");
            return None;
        }
        self.overlay.set_child(None);
        Some(content)
    }

    /// Give up `content` if this pane holds it. Returns true when released.
    pub fn release_content_view(&self, content: &WidgetRef) -> bool {
        let mut state = self.write();
        match &state.content {
            Some(current) if same_widget(current, content) => {
                let displayed = self.displays(current);
                state.content = None;
                if displayed {
                    self.overlay.set_child(None);
                }
                true
            }
            _ => false,
        }
    }

    pub fn grab_focus(&self) -> bool {
        match self.content_view() {
            Some(content) => content.grab_focus(),
            None => false,
        }
    }

    pub fn has_focus(&self) -> bool {
        self.content_view().is_some_and(|content| content.has_focus())
    }

    pub fn set_on_focus_in(&self, callback: impl Fn(PaneId) + Send + Sync + 'static) {
        let mut state = self.write();
        if !state.cleaned_up {
            state.callbacks.focus_in = Some(Arc::new(callback));
        }
    }

    pub fn set_on_focus_out(&self, callback: impl Fn(PaneId) + Send + Sync + 'static) {
        let mut state = self.write();
        if !state.cleaned_up {
            state.callbacks.focus_out = Some(Arc::new(callback));
        }
    }

    pub fn set_on_hover(&self, callback: impl Fn(PaneId) + Send + Sync + 'static) {
        let mut state = self.write();
        if !state.cleaned_up {
            state.callbacks.hover = Some(Arc::new(callback));
        }
    }

    pub fn notify_focus_in(&self) {
        let callback = self.read().callbacks.focus_in.clone();
        if let Some(callback) = callback {
            callback(self.pane_id);
        }
    }

    pub fn notify_focus_out(&self) {
        let callback = self.read().callbacks.focus_out.clone();
        if let Some(callback) = callback {
            callback(self.pane_id);
        }
    }

    fn fire_hover(&self) {
        let callback = self.read().callbacks.hover.clone();
        if let Some(callback) = callback {
            callback(self.pane_id);
        }
    }

    /// Wire a debounced hover handler whose enter fires the hover callback.
    pub fn attach_hover_handler(self: &Arc<Self>) {
        let handler = Arc::new(HoverHandler::new(
            self.pane_id,
            self.scheduler.clone(),
            self.config.hover.delay(),
        ));
        let weak: Weak<Self> = Arc::downgrade(self);
        handler.set_on_enter(Arc::new(move |_: PaneId| {
            if let Some(view) = weak.upgrade() {
                view.fire_hover();
            }
        }));

        let previous = {
            let mut state = self.write();
            if state.cleaned_up {
                handler.detach();
                return;
            }
            state.hover.replace(handler)
        };
        if let Some(previous) = previous {
            previous.detach();
        }
    }

    pub fn has_hover_handler(&self) -> bool {
        self.read().hover.is_some()
    }

    fn hover_handler(&self) -> Option<Arc<HoverHandler>> {
        self.read().hover.clone()
    }

    /// Pointer entered the pane. Without a handler nothing is debounced
    /// and nothing fires.
    pub fn notify_hover_enter(&self) {
        if let Some(handler) = self.hover_handler() {
            handler.enter();
        }
    }

    pub fn notify_hover_leave(&self) {
        if let Some(handler) = self.hover_handler() {
            handler.leave();
        }
    }

    pub fn cancel_pending_hover(&self) {
        if let Some(handler) = self.hover_handler() {
            handler.cancel_pending();
        }
    }

    pub fn is_hover_pending(&self) -> bool {
        self.hover_handler().is_some_and(|h| h.is_pending())
    }

    pub fn ensure_progress(&self) -> Option<Arc<ProgressIndicator>> {
        self.progress.get_or_init(|| {
            let progress = Arc::new(ProgressIndicator::new(
                &self.factory,
                self.scheduler.clone(),
                &self.config.progress,
            ));
            self.mount_overlay(progress.widget());
            progress
        })
    }

    pub fn ensure_toaster(&self) -> Option<Arc<Toaster>> {
        self.toaster.get_or_init(|| {
            let toaster = Arc::new(Toaster::new(
                &self.factory,
                self.scheduler.clone(),
                &self.config.toast,
            ));
            self.mount_overlay(toaster.widget());
            toaster
        })
    }

    pub fn ensure_link_status(&self) -> Option<Arc<LinkStatusOverlay>> {
        self.link_status.get_or_init(|| {
            let status = Arc::new(LinkStatusOverlay::new(
                &self.factory,
                self.scheduler.clone(),
                &self.config.link_status,
            ));
            self.mount_overlay(status.widget());
            status
        })
    }

    pub fn ensure_loading(&self) -> Option<Arc<LoadingPlaceholder>> {
        self.loading.get_or_init(|| {
            let loading = Arc::new(LoadingPlaceholder::new(&self.factory, &self.config.loading));
            self.mount_overlay(loading.widget());
            loading
        })
    }

    pub fn progress(&self) -> Option<Arc<ProgressIndicator>> {
        self.progress.get()
    }

    pub fn toaster(&self) -> Option<Arc<Toaster>> {
        self.toaster.get()
    }

    pub fn link_status(&self) -> Option<Arc<LinkStatusOverlay>> {
        self.link_status.get()
    }

    pub fn loading(&self) -> Option<Arc<LoadingPlaceholder>> {
        self.loading.get()
    }

    pub fn set_load_progress(&self, value: f64) {
        if let Some(progress) = self.ensure_progress() {
            progress.set_value(value);
        }
    }

    /// Show or hide the load progress bar.
    pub fn set_loading(&self, loading: bool) {
        if let Some(progress) = self.ensure_progress() {
            if loading {
                progress.show();
            } else {
                progress.hide();
            }
        }
    }

    pub fn show_toast(&self, message: &str, level: ToastLevel) {
        if let Some(toaster) = self.ensure_toaster() {
            toaster.show(message, level);
        }
    }

    pub fn show_toast_with(&self, message: &str, level: ToastLevel, overrides: ToastOverrides) {
        if let Some(toaster) = self.ensure_toaster() {
            toaster.show_with(message, level, overrides);
        }
    }

    pub fn show_zoom_toast(&self, percent: i32) {
        if let Some(toaster) = self.ensure_toaster() {
            toaster.show_zoom(percent);
        }
    }

    pub fn show_link_status(&self, uri: &str) {
        if let Some(status) = self.ensure_link_status() {
            status.show(uri);
        }
    }

    pub fn hide_link_status(&self) {
        if let Some(status) = self.link_status.get() {
            status.hide();
        }
    }

    /// Show the skeleton until the first paint. Disabled by configuration
    /// leaves the pane untouched.
    pub fn show_loading_placeholder(&self) {
        if !self.config.loading.enabled {
            return;
        }
        if let Some(loading) = self.ensure_loading() {
            loading.set_visible(true);
        }
    }

    pub fn hide_loading_placeholder(&self) {
        if let Some(loading) = self.loading.get() {
            loading.set_visible(false);
        }
    }

    /// Mount an external overlay such as the command bar.
    pub fn add_overlay_widget(&self, widget: WidgetRef) {
        if self.is_cleaned_up() {
            return;
        }
        self.mount_overlay(widget);
    }

    pub fn remove_overlay_widget(&self, widget: &WidgetRef) -> bool {
        self.overlay.remove_overlay(widget)
    }

    /// Whether `widget` is currently mounted on this pane's overlay.
    pub fn owns_overlay(&self, widget: &WidgetRef) -> bool {
        widget.parent() == Some(self.overlay.id())
    }

    /// Release everything this pane holds. Irreversible and idempotent.
    pub fn cleanup(&self) {
        let (content, hover) = {
            let mut state = self.write();
            if state.cleaned_up {
                return;
            }
            state.cleaned_up = true;
            state.active = false;
            state.callbacks = PaneCallbacks::default();
            (state.content.take(), state.hover.take())
        };

        if let Some(hover) = hover {
            hover.detach();
        }
        if content.is_some() {
            self.overlay.set_child(None);
        }
        self.border.remove_css_class(ACTIVE_CLASS);

        if let Some(progress) = self.progress.close() {
            progress.hide();
            self.overlay.remove_overlay(&progress.widget());
        }
        if let Some(toaster) = self.toaster.close() {
            toaster.hide();
            self.overlay.remove_overlay(&toaster.widget());
        }
        if let Some(status) = self.link_status.close() {
            status.cleanup();
            self.overlay.remove_overlay(&status.widget());
        }
        if let Some(loading) = self.loading.close() {
            loading.set_visible(false);
            self.overlay.remove_overlay(&loading.widget());
        }
        debug!(pane_id = %self.pane_id, "pane view cleaned up");
    }
}
