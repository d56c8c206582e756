//! Workspace coordinator: pane identity to container mapping, the single
//! active pane, and the per-workspace command and find bars.

#[cfg(test)]
mod tests;

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};
use trellis_common::{LayoutError, Orientation, PaneId, WorkspaceError};
use trellis_layout::{LayoutTreeRenderer, Pane, SharedWorkspace, TreeRenderer};
use trellis_ui::{BoxWidget, OverlayWidget, SharedFactory, SharedScheduler, Widget, WidgetRef};

use crate::command_bar::CommandBar;
use crate::find_bar::{FindBar, FindControllerProvider};
use crate::pane_view::PaneView;
use crate::toaster::ToastLevel;
use crate::{PaneCallback, SharedConfig};

const SINGLE_PANE_CLASS: &str = "single-pane";

/// A bar mounted on one pane's overlay.
struct BarSlot<T> {
    bar: Arc<T>,
    owner: PaneId,
    host: Weak<PaneView>,
}

impl<T> BarSlot<T> {
    /// Remove `widget` from the overlay that owns it. A widget reparented
    /// elsewhere in the meantime is only unparented.
    fn unmount(&self, widget: &WidgetRef) {
        match self.host.upgrade() {
            Some(host) if host.owns_overlay(widget) => {
                host.remove_overlay_widget(widget);
            }
            _ if widget.parent().is_some() => widget.unparent(),
            _ => {}
        }
    }
}

#[derive(Default)]
struct WorkspaceState {
    workspace: Option<SharedWorkspace>,
    panes: HashMap<PaneId, Arc<PaneView>>,
    active: Option<PaneId>,
    root: Option<WidgetRef>,
    command_bar: Option<BarSlot<CommandBar>>,
    find_bar: Option<BarSlot<FindBar>>,
    on_pane_focused: Option<PaneCallback>,
    find_provider: Option<FindControllerProvider>,
    hover_suppressed_until: Option<Instant>,
    mode_border: Option<WidgetRef>,
}

impl WorkspaceState {
    fn take_bars_not_owned_by(&mut self, pane_id: Option<PaneId>, retired: &mut Retired) {
        if self.command_bar.as_ref().is_some_and(|s| Some(s.owner) != pane_id) {
            retired.command_bar = self.command_bar.take();
        }
        if self.find_bar.as_ref().is_some_and(|s| Some(s.owner) != pane_id) {
            retired.find_bar = self.find_bar.take();
        }
    }

    fn take_bars_owned_by(&mut self, pane_id: PaneId, retired: &mut Retired) {
        if self.command_bar.as_ref().is_some_and(|s| s.owner == pane_id) {
            retired.command_bar = self.command_bar.take();
        }
        if self.find_bar.as_ref().is_some_and(|s| s.owner == pane_id) {
            retired.find_bar = self.find_bar.take();
        }
    }

    fn hover_suppressed(&self) -> bool {
        self.hover_suppressed_until
            .is_some_and(|until| Instant::now() < until)
    }
}

/// Work detached under the coordinator lock and finished after releasing
/// it, since bar teardown and pane cleanup may call back into user code.
#[derive(Default)]
struct Retired {
    command_bar: Option<BarSlot<CommandBar>>,
    find_bar: Option<BarSlot<FindBar>>,
    views: Vec<Arc<PaneView>>,
}

impl Retired {
    fn finish(self) {
        if let Some(slot) = self.command_bar {
            slot.bar.hide();
            slot.bar.set_on_toast(None);
            slot.unmount(&slot.bar.widget());
            debug!(owner = %slot.owner, "command bar destroyed");
        }
        if let Some(slot) = self.find_bar {
            slot.bar.set_on_close(None);
            slot.bar.hide();
            slot.unmount(&slot.bar.widget());
            debug!(owner = %slot.owner, "find bar destroyed");
        }
        for view in self.views {
            view.cleanup();
        }
    }
}

/// Projects a [`trellis_layout::Workspace`] into widgets and keeps at most
/// one pane active.
///
/// Structural changes flow down (workspace, tree renderer, pane views);
/// focus and hover events flow up through callbacks that hold only a weak
/// reference to the coordinator.
pub struct WorkspaceView {
    me: Weak<Self>,
    factory: SharedFactory,
    scheduler: SharedScheduler,
    config: SharedConfig,
    renderer: Arc<dyn TreeRenderer>,
    container: Arc<dyn BoxWidget>,
    overlay: Arc<dyn OverlayWidget>,
    state: RwLock<WorkspaceState>,
}

impl WorkspaceView {
    pub fn new(
        factory: SharedFactory,
        scheduler: SharedScheduler,
        config: SharedConfig,
        renderer: Arc<dyn TreeRenderer>,
    ) -> Arc<Self> {
        let container = factory.new_box(Orientation::Vertical, 0);
        container.add_css_class("workspace-container");
        container.set_expand(true);

        let overlay = factory.new_overlay();
        overlay.add_css_class("workspace-overlay");
        overlay.set_expand(true);
        overlay.set_child(Some(container.clone().as_widget()));

        Arc::new_cyclic(|me| Self {
            me: me.clone(),
            factory,
            scheduler,
            config,
            renderer,
            container,
            overlay,
            state: RwLock::new(WorkspaceState::default()),
        })
    }

    /// Coordinator backed by the stock [`LayoutTreeRenderer`].
    pub fn with_layout_renderer(
        factory: SharedFactory,
        scheduler: SharedScheduler,
        config: SharedConfig,
    ) -> Arc<Self> {
        let renderer = Arc::new(LayoutTreeRenderer::new(factory.clone()));
        Self::new(factory, scheduler, config, renderer)
    }

    fn read(&self) -> RwLockReadGuard<'_, WorkspaceState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, WorkspaceState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Top-level widget: the pane container plus workspace-wide overlays.
    pub fn widget(&self) -> WidgetRef {
        self.overlay.clone().as_widget()
    }

    pub fn container(&self) -> Arc<dyn BoxWidget> {
        self.container.clone()
    }

    pub fn renderer(&self) -> Arc<dyn TreeRenderer> {
        self.renderer.clone()
    }

    pub fn factory(&self) -> SharedFactory {
        self.factory.clone()
    }

    pub fn scheduler(&self) -> SharedScheduler {
        self.scheduler.clone()
    }

    pub fn config(&self) -> SharedConfig {
        self.config.clone()
    }

    pub fn workspace(&self) -> Option<SharedWorkspace> {
        self.read().workspace.clone()
    }

    // --- active pane ---

    fn activate_locked(
        &self,
        state: &mut WorkspaceState,
        pane_id: PaneId,
        retired: &mut Retired,
    ) -> Result<(), WorkspaceError> {
        let target = state
            .panes
            .get(&pane_id)
            .cloned()
            .ok_or(WorkspaceError::PaneNotFound(pane_id))?;

        state.take_bars_not_owned_by(Some(pane_id), retired);
        if let Some(previous) = state.active.filter(|id| *id != pane_id) {
            if let Some(view) = state.panes.get(&previous) {
                view.set_active(false);
            }
        }
        target.set_active(true);
        state.active = Some(pane_id);

        if let Some(workspace) = &state.workspace {
            workspace
                .write()
                .unwrap_or_else(|e| e.into_inner())
                .active_pane_id = Some(pane_id);
        }
        Ok(())
    }

    /// Make `pane_id` the single active pane. Unknown ids leave the state
    /// untouched.
    pub fn set_active_pane_id(&self, pane_id: PaneId) -> Result<(), WorkspaceError> {
        let mut retired = Retired::default();
        let result = {
            let mut state = self.write();
            self.activate_locked(&mut state, pane_id, &mut retired)
        };
        retired.finish();
        if result.is_ok() {
            debug!(pane_id = %pane_id, "active pane changed");
        }
        result
    }

    pub fn active_pane_id(&self) -> Option<PaneId> {
        self.read().active
    }

    pub fn active_pane_view(&self) -> Option<Arc<PaneView>> {
        let state = self.read();
        state.active.and_then(|id| state.panes.get(&id).cloned())
    }

    pub fn pane_view(&self, pane_id: PaneId) -> Option<Arc<PaneView>> {
        self.read().panes.get(&pane_id).cloned()
    }

    /// Registered pane ids in ascending order.
    pub fn pane_ids(&self) -> Vec<PaneId> {
        let mut ids: Vec<_> = self.read().panes.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn pane_count(&self) -> usize {
        self.read().panes.len()
    }

    /// Give keyboard focus to the pane's content view.
    pub fn focus_pane(&self, pane_id: PaneId) -> bool {
        match self.pane_view(pane_id) {
            Some(view) => view.grab_focus(),
            None => false,
        }
    }

    pub fn set_on_pane_focused(&self, callback: Option<PaneCallback>) {
        self.write().on_pane_focused = callback;
    }

    fn pane_focused(&self, pane_id: PaneId) {
        let callback = self.read().on_pane_focused.clone();
        if let Some(callback) = callback {
            callback(pane_id);
        }
    }

    fn update_single_pane_class(&self, state: &WorkspaceState) {
        if state.panes.len() <= 1 {
            self.container.add_css_class(SINGLE_PANE_CLASS);
        } else {
            self.container.remove_css_class(SINGLE_PANE_CLASS);
        }
    }

    // --- structure ---

    /// A pane view wired back to this coordinator but not registered.
    pub fn create_pane_view(&self, pane_id: PaneId, content: Option<WidgetRef>) -> Arc<PaneView> {
        let view = PaneView::new(
            self.factory.clone(),
            self.scheduler.clone(),
            self.config.clone(),
            pane_id,
            content,
        );

        let me = self.me.clone();
        view.set_on_focus_in(move |id| {
            if let Some(workspace) = me.upgrade() {
                workspace.pane_focused(id);
            }
        });
        let me = self.me.clone();
        view.set_on_hover(move |id| {
            if let Some(workspace) = me.upgrade() {
                workspace.hover_focus(id);
            }
        });
        if self.config.hover.focus_follows_mouse {
            view.attach_hover_handler();
        }
        view
    }

    /// Install `workspace`, rebuilding the whole widget tree.
    ///
    /// The tree is built without holding the coordinator lock. A failed
    /// build leaves the previous tree and pane map in place.
    pub fn set_workspace(&self, workspace: Option<SharedWorkspace>) -> Result<(), WorkspaceError> {
        let workspace = workspace.ok_or(WorkspaceError::NilWorkspace)?;
        let (root, active) = {
            let domain = workspace.read().unwrap_or_else(|e| e.into_inner());
            (domain.root.clone(), domain.active_pane_id)
        };

        let mut staged: HashMap<PaneId, Arc<PaneView>> = HashMap::new();
        let built = match &root {
            Some(root) => {
                let mut make = |pane: &Pane| -> Result<WidgetRef, LayoutError> {
                    let view = self.create_pane_view(pane.id, None);
                    let widget = view.widget();
                    if let Some(duplicate) = staged.insert(pane.id, view) {
                        duplicate.cleanup();
                    }
                    Ok(widget)
                };
                match self.renderer.build(root, &mut make) {
                    Ok(widget) => Some(widget),
                    Err(e) => {
                        for view in staged.into_values() {
                            view.cleanup();
                        }
                        return Err(e.into());
                    }
                }
            }
            None => None,
        };

        let mut retired = Retired::default();
        let result = {
            let mut state = self.write();
            state.take_bars_not_owned_by(None, &mut retired);

            if let Some(old_root) = state.root.take() {
                self.container.remove(&old_root);
            }
            if let Some(new_root) = &built {
                new_root.set_visible(true);
                self.container.append(new_root.clone());
            }
            state.root = built;

            let previous = std::mem::replace(&mut state.panes, staged);
            retired.views = previous.into_values().collect();
            state.active = None;
            state.workspace = Some(workspace);
            self.update_single_pane_class(&state);

            match active {
                Some(pane_id) => self.activate_locked(&mut state, pane_id, &mut retired),
                None => Ok(()),
            }
        };

        // Content views belong to the application; carry them over to the
        // new containers before the old ones are cleaned up.
        for old in &retired.views {
            if let Some(content) = old.take_content_view() {
                match self.pane_view(old.pane_id()) {
                    Some(view) => view.set_content_view(Some(content)),
                    None => debug!(pane_id = %old.pane_id(), "content view released with its pane"),
                }
            }
        }
        let count = self.pane_count();
        retired.finish();
        info!(panes = count, "workspace installed");
        result
    }

    /// Rebuild from the workspace that was last installed.
    pub fn rebuild(&self) -> Result<(), WorkspaceError> {
        let workspace = self.workspace().ok_or(WorkspaceError::NilWorkspace)?;
        self.set_workspace(Some(workspace))
    }

    /// Content-view provider entry point.
    pub fn set_content_view(
        &self,
        pane_id: PaneId,
        content: Option<WidgetRef>,
    ) -> Result<(), WorkspaceError> {
        let (view, others) = {
            let state = self.read();
            let view = state
                .panes
                .get(&pane_id)
                .cloned()
                .ok_or(WorkspaceError::PaneNotFound(pane_id))?;
            let others: Vec<Arc<PaneView>> = state
                .panes
                .iter()
                .filter(|(id, _)| **id != pane_id)
                .map(|(_, view)| view.clone())
                .collect();
            (view, others)
        };
        if let Some(widget) = &content {
            for other in others {
                if other.release_content_view(widget) {
                    debug!(from = %other.pane_id(), to = %pane_id, "moved content view");
                }
            }
        }
        view.set_content_view(content);
        Ok(())
    }

    /// Register a view created outside a full build, for example a pane
    /// stacked onto an existing group. A view it replaces is cleaned up.
    pub fn register_pane_view(&self, pane_id: PaneId, view: Arc<PaneView>) {
        let replaced = {
            let mut state = self.write();
            let replaced = state.panes.insert(pane_id, view.clone());
            self.update_single_pane_class(&state);
            replaced
        };
        if let Some(old) = replaced.filter(|old| !Arc::ptr_eq(old, &view)) {
            old.cleanup();
        }
        debug!(pane_id = %pane_id, "pane view registered");
    }

    /// Remove and clean up a pane view. Returns false for unknown ids.
    pub fn unregister_pane_view(&self, pane_id: PaneId) -> bool {
        let mut retired = Retired::default();
        {
            let mut state = self.write();
            let Some(view) = state.panes.remove(&pane_id) else {
                return false;
            };
            if state.active == Some(pane_id) {
                state.active = None;
            }
            state.take_bars_owned_by(pane_id, &mut retired);
            retired.views.push(view);
            self.update_single_pane_class(&state);
        }
        self.renderer.unregister_pane(pane_id);
        retired.finish();
        debug!(pane_id = %pane_id, "pane view unregistered");
        true
    }

    pub fn root_widget(&self) -> Option<WidgetRef> {
        self.read().root.clone()
    }

    /// Swap the root widget without rebuilding the tree.
    pub fn set_root_widget_direct(&self, widget: Option<WidgetRef>) {
        let mut state = self.write();
        if let Some(old) = state.root.take() {
            self.container.remove(&old);
        }
        if let Some(widget) = &widget {
            if widget.parent().is_some() {
                widget.unparent();
            }
            widget.set_visible(true);
            self.container.append(widget.clone());
        }
        state.root = widget;
    }

    /// Forget the root widget without touching the container, for a root
    /// that was already detached by other means.
    pub fn clear_root_widget_ref(&self) {
        self.write().root = None;
    }

    /// Swap the workspace-wide mode border overlay.
    pub fn set_mode_border_overlay(&self, widget: Option<WidgetRef>) {
        let mut state = self.write();
        if let Some(old) = state.mode_border.take() {
            self.overlay.remove_overlay(&old);
        }
        if let Some(widget) = &widget {
            self.overlay.add_overlay(widget.clone());
            self.overlay.set_clip_overlay(widget, false);
            self.overlay.set_measure_overlay(widget, false);
        }
        state.mode_border = widget;
    }

    // --- command bar ---

    /// Show the command bar on the active pane, seeded with `query`.
    pub fn show_command_bar(&self, query: &str) {
        let mut retired = Retired::default();
        let bar = {
            let mut state = self.write();
            let Some(active) = state.active else {
                warn!("cannot show command bar: no active pane");
                return;
            };
            let Some(host) = state.panes.get(&active).cloned() else {
                warn!(pane_id = %active, "cannot show command bar: active pane not found");
                return;
            };
            let reusable = state
                .command_bar
                .as_ref()
                .filter(|slot| slot.owner == active)
                .map(|slot| slot.bar.clone());
            match reusable {
                Some(bar) => bar,
                None => {
                    if state.command_bar.is_some() {
                        debug!(pane_id = %active, "command bar moved, recreating");
                    }
                    retired.command_bar = state.command_bar.take();

                    let bar = Arc::new(CommandBar::new(&self.factory));
                    let toast_host = Arc::downgrade(&host);
                    bar.set_on_toast(Some(Arc::new(
                        move |message: &str, level: ToastLevel| {
                            if let Some(pane) = toast_host.upgrade() {
                                pane.show_toast(message, level);
                            }
                        },
                    )));
                    host.add_overlay_widget(bar.widget());
                    state.command_bar = Some(BarSlot {
                        bar: bar.clone(),
                        owner: active,
                        host: Arc::downgrade(&host),
                    });
                    bar
                }
            }
        };
        retired.finish();
        bar.show(query);
    }

    /// Hide and destroy the command bar.
    pub fn hide_command_bar(&self) {
        let retired = Retired {
            command_bar: self.write().command_bar.take(),
            ..Retired::default()
        };
        retired.finish();
    }

    pub fn is_command_bar_visible(&self) -> bool {
        self.read()
            .command_bar
            .as_ref()
            .is_some_and(|slot| slot.bar.is_visible())
    }

    pub fn command_bar_owner(&self) -> Option<PaneId> {
        self.read().command_bar.as_ref().map(|slot| slot.owner)
    }

    pub fn command_bar(&self) -> Option<Arc<CommandBar>> {
        self.read().command_bar.as_ref().map(|slot| slot.bar.clone())
    }

    // --- find bar ---

    pub fn set_find_controller_provider(&self, provider: Option<FindControllerProvider>) {
        self.write().find_provider = provider;
    }

    /// Show the find bar on the active pane, creating it if needed.
    pub fn show_find_bar(&self) {
        let (bar, owner, provider) = {
            let mut state = self.write();
            if let Some(slot) = &state.find_bar {
                (slot.bar.clone(), slot.owner, None)
            } else {
                let Some(active) = state.active else {
                    warn!("cannot show find bar: no active pane");
                    return;
                };
                let Some(host) = state.panes.get(&active).cloned() else {
                    warn!(pane_id = %active, "cannot show find bar: active pane not found");
                    return;
                };
                let bar = Arc::new(FindBar::new(&self.factory));
                let me = self.me.clone();
                bar.set_on_close(Some(Arc::new(move || {
                    if let Some(workspace) = me.upgrade() {
                        workspace.hide_find_bar();
                    }
                })));
                host.add_overlay_widget(bar.widget());
                state.find_bar = Some(BarSlot {
                    bar: bar.clone(),
                    owner: active,
                    host: Arc::downgrade(&host),
                });
                (bar, active, state.find_provider.clone())
            }
        };

        if let Some(provider) = provider {
            bar.set_find_controller(provider(owner));
        }
        bar.show();
        debug!(pane_id = %owner, "find bar shown");
    }

    /// Hide and destroy the find bar.
    pub fn hide_find_bar(&self) {
        let retired = Retired {
            find_bar: self.write().find_bar.take(),
            ..Retired::default()
        };
        retired.finish();
    }

    fn find_bar(&self) -> Option<Arc<FindBar>> {
        self.read().find_bar.as_ref().map(|slot| slot.bar.clone())
    }

    pub fn find_next(&self) {
        if let Some(bar) = self.find_bar() {
            bar.find_next();
        }
    }

    pub fn find_previous(&self) {
        if let Some(bar) = self.find_bar() {
            bar.find_previous();
        }
    }

    pub fn is_find_bar_visible(&self) -> bool {
        self.find_bar().is_some_and(|bar| bar.is_visible())
    }

    pub fn find_bar_owner(&self) -> Option<PaneId> {
        self.read().find_bar.as_ref().map(|slot| slot.owner)
    }

    // --- hover arbitration ---

    /// Focus-follows-mouse entry point, fired by a pane's debounced hover.
    fn hover_focus(&self, pane_id: PaneId) {
        {
            let state = self.read();
            if state.hover_suppressed() {
                debug!(pane_id = %pane_id, "hover ignored while suppressed");
                return;
            }
            if state.active == Some(pane_id) {
                return;
            }
        }
        if let Err(e) = self.set_active_pane_id(pane_id) {
            debug!(pane_id = %pane_id, error = %e, "hover target vanished");
            return;
        }
        self.focus_pane(pane_id);
    }

    /// Ignore hover-driven focus changes for `duration`.
    pub fn suppress_hover(&self, duration: Duration) {
        self.write().hover_suppressed_until = Some(Instant::now() + duration);
    }

    pub fn is_hover_suppressed(&self) -> bool {
        self.read().hover_suppressed()
    }

    pub fn cancel_all_pending_hovers(&self) {
        let views: Vec<_> = self.read().panes.values().cloned().collect();
        for view in views {
            view.cancel_pending_hover();
        }
    }

    /// Keyboard navigation happened: keep the pointer from stealing focus
    /// back for the configured window.
    pub fn keyboard_navigated(&self) {
        self.suppress_hover(self.config.hover.keyboard_suppress());
        self.cancel_all_pending_hovers();
    }
}
