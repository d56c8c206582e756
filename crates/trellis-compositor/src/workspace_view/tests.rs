use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock, Weak};
use std::time::Duration;

use trellis_common::{LayoutError, PaneId, WorkspaceError};
use trellis_config::TrellisConfig;
use trellis_layout::{
    LayoutTreeRenderer, Pane, PaneNode, PaneViewFactory, SharedWorkspace, StackedGroup,
    TreeRenderer, Workspace,
};
use trellis_ui::{OverlayWidget, Widget, WidgetFactory, WidgetRef};

use super::WorkspaceView;
use crate::find_bar::tests::RecordingController;
use crate::find_bar::FindController;
use crate::test_support::Harness;
use crate::toaster::ToastLevel;

fn pane(n: u64) -> Pane {
    Pane::with_id(PaneId(n), format!("pane {n}"), "about:blank")
}

fn two_panes() -> SharedWorkspace {
    Workspace::new(PaneNode::split_h(PaneNode::leaf(pane(1)), PaneNode::leaf(pane(2)))).into_shared()
}

fn coordinator(h: &Harness) -> Arc<WorkspaceView> {
    WorkspaceView::with_layout_renderer(h.factory.clone(), h.scheduler.clone(), h.config.clone())
}

fn installed(h: &Harness) -> (Arc<WorkspaceView>, SharedWorkspace) {
    let view = coordinator(h);
    let ws = two_panes();
    view.set_workspace(Some(ws.clone())).unwrap();
    (view, ws)
}

fn active_count(view: &WorkspaceView) -> usize {
    view.pane_ids()
        .into_iter()
        .filter(|id| view.pane_view(*id).is_some_and(|p| p.is_active()))
        .count()
}

#[test]
fn nil_workspace_is_rejected() {
    let h = Harness::new();
    let (view, _) = installed(&h);
    let root = view.root_widget().unwrap().id();

    assert_eq!(view.set_workspace(None), Err(WorkspaceError::NilWorkspace));
    assert_eq!(view.pane_ids(), vec![PaneId(1), PaneId(2)]);
    assert_eq!(view.root_widget().unwrap().id(), root);
    assert_eq!(view.active_pane_id(), Some(PaneId(1)));
}

#[test]
fn rebuild_without_workspace_fails() {
    let h = Harness::new();
    let view = coordinator(&h);
    assert_eq!(view.rebuild(), Err(WorkspaceError::NilWorkspace));
}

#[test]
fn install_registers_panes_and_activates() {
    let h = Harness::new();
    let (view, _) = installed(&h);

    assert_eq!(view.pane_count(), 2);
    assert_eq!(view.active_pane_id(), Some(PaneId(1)));
    assert!(view.active_pane_view().unwrap().is_active());
    assert_eq!(active_count(&view), 1);

    let container = h.headless.lookup(view.container().id()).unwrap();
    assert_eq!(container.child_ids(), vec![view.root_widget().unwrap().id()]);
    assert!(!container.has_css_class("single-pane"));
}

#[test]
fn single_pane_class_tracks_count() {
    let h = Harness::new();
    let view = coordinator(&h);
    let ws = Workspace::new(PaneNode::leaf(pane(1))).into_shared();
    view.set_workspace(Some(ws)).unwrap();
    assert!(view.container().has_css_class("single-pane"));

    view.set_workspace(Some(two_panes())).unwrap();
    assert!(!view.container().has_css_class("single-pane"));
}

#[test]
fn unknown_pane_leaves_active_unchanged() {
    let h = Harness::new();
    let (view, _) = installed(&h);

    assert_eq!(
        view.set_active_pane_id(PaneId(99)),
        Err(WorkspaceError::PaneNotFound(PaneId(99)))
    );
    assert_eq!(view.active_pane_id(), Some(PaneId(1)));
    assert_eq!(active_count(&view), 1);
}

#[test]
fn at_most_one_pane_is_active() {
    let h = Harness::new();
    let (view, ws) = installed(&h);

    for id in [2, 1, 2, 2, 99, 1] {
        let _ = view.set_active_pane_id(PaneId(id));
        assert_eq!(active_count(&view), 1);
    }
    assert_eq!(view.active_pane_id(), Some(PaneId(1)));
    assert!(!view.pane_view(PaneId(2)).unwrap().is_active());

    view.set_active_pane_id(PaneId(2)).unwrap();
    assert_eq!(ws.read().unwrap().active_pane_id, Some(PaneId(2)));
}

#[test]
fn stale_active_id_is_reported_after_install() {
    let h = Harness::new();
    let view = coordinator(&h);
    let mut workspace = Workspace::new(PaneNode::leaf(pane(1)));
    workspace.active_pane_id = Some(PaneId(42));

    let result = view.set_workspace(Some(workspace.into_shared()));
    assert_eq!(result, Err(WorkspaceError::PaneNotFound(PaneId(42))));
    assert_eq!(view.pane_ids(), vec![PaneId(1)]);
    assert_eq!(view.active_pane_id(), None);
}

#[test]
fn failed_build_keeps_previous_tree() {
    let h = Harness::new();
    let (view, _) = installed(&h);
    let root = view.root_widget().unwrap().id();
    let first = view.pane_view(PaneId(1)).unwrap();

    let broken = Workspace::new(PaneNode::split_v(
        PaneNode::leaf(pane(3)),
        PaneNode::Stacked {
            panes: vec![],
            active: 0,
        },
    ))
    .into_shared();
    let result = view.set_workspace(Some(broken));

    assert_eq!(result, Err(WorkspaceError::Build(LayoutError::EmptyStack)));
    assert_eq!(view.pane_ids(), vec![PaneId(1), PaneId(2)]);
    assert_eq!(view.root_widget().unwrap().id(), root);
    assert!(Arc::ptr_eq(&first, &view.pane_view(PaneId(1)).unwrap()));
    assert!(!first.is_cleaned_up());
    assert!(view.renderer().stacked_view_for_pane(PaneId(3)).is_none());
}

#[test]
fn rebuild_carries_content_and_cleans_old_views() {
    let h = Harness::new();
    let (view, _) = installed(&h);
    let web: WidgetRef = h.headless.new_content_view();
    view.set_content_view(PaneId(1), Some(web.clone())).unwrap();
    let old = view.pane_view(PaneId(1)).unwrap();
    old.show_toast("before rebuild", ToastLevel::Info);

    view.rebuild().unwrap();

    let new = view.pane_view(PaneId(1)).unwrap();
    assert!(!Arc::ptr_eq(&old, &new));
    assert!(old.is_cleaned_up());
    assert_eq!(new.content_view().map(|c| c.id()), Some(web.id()));
    assert_eq!(web.parent(), Some(new.widget().id()));
    assert_eq!(h.headless.parenting_violations(), 0);
    assert_eq!(h.clock.pending(), 0);
    assert_eq!(view.active_pane_id(), Some(PaneId(1)));
}

#[test]
fn moving_content_between_panes_keeps_one_owner() {
    let h = Harness::new();
    let (view, _) = installed(&h);
    let web: WidgetRef = h.headless.new_content_view();

    view.set_content_view(PaneId(1), Some(web.clone())).unwrap();
    view.set_content_view(PaneId(2), Some(web.clone())).unwrap();
    assert!(view.pane_view(PaneId(1)).unwrap().content_view().is_none());
    assert!(!view.pane_view(PaneId(1)).unwrap().grab_focus());

    for _ in 0..20 {
        view.rebuild().unwrap();
        let owners: Vec<PaneId> = view
            .pane_ids()
            .into_iter()
            .filter(|id| {
                view.pane_view(*id)
                    .and_then(|p| p.content_view())
                    .is_some_and(|c| c.id() == web.id())
            })
            .collect();
        assert_eq!(owners, vec![PaneId(2)]);
        assert_eq!(
            web.parent(),
            Some(view.pane_view(PaneId(2)).unwrap().widget().id())
        );
    }
    assert_eq!(h.headless.parenting_violations(), 0);
}

#[test]
fn set_content_view_requires_known_pane() {
    let h = Harness::new();
    let (view, _) = installed(&h);
    assert_eq!(
        view.set_content_view(PaneId(9), None),
        Err(WorkspaceError::PaneNotFound(PaneId(9)))
    );
}

/// Renderer that reads the coordinator mid-build; a held lock would
/// deadlock here.
struct ProbeRenderer {
    inner: LayoutTreeRenderer,
    coordinator: OnceLock<Weak<WorkspaceView>>,
    seen: AtomicUsize,
}

impl TreeRenderer for ProbeRenderer {
    fn build(
        &self,
        root: &PaneNode,
        panes: &mut dyn PaneViewFactory,
    ) -> Result<WidgetRef, LayoutError> {
        if let Some(view) = self.coordinator.get().and_then(Weak::upgrade) {
            self.seen.store(view.pane_count(), Ordering::SeqCst);
        }
        self.inner.build(root, panes)
    }

    fn stacked_view_for_pane(&self, pane_id: PaneId) -> Option<Arc<dyn StackedGroup>> {
        self.inner.stacked_view_for_pane(pane_id)
    }

    fn register_pane_in_stack(&self, pane_id: PaneId, group: Arc<dyn StackedGroup>) {
        self.inner.register_pane_in_stack(pane_id, group);
    }

    fn unregister_pane(&self, pane_id: PaneId) {
        self.inner.unregister_pane(pane_id);
    }
}

#[test]
fn build_runs_without_coordinator_lock() {
    let h = Harness::new();
    let probe = Arc::new(ProbeRenderer {
        inner: LayoutTreeRenderer::new(h.factory.clone()),
        coordinator: OnceLock::new(),
        seen: AtomicUsize::new(usize::MAX),
    });
    let view = WorkspaceView::new(
        h.factory.clone(),
        h.scheduler.clone(),
        h.config.clone(),
        probe.clone(),
    );
    let _ = probe.coordinator.set(Arc::downgrade(&view));

    view.set_workspace(Some(two_panes())).unwrap();
    assert_eq!(probe.seen.load(Ordering::SeqCst), 0);
    view.rebuild().unwrap();
    assert_eq!(probe.seen.load(Ordering::SeqCst), 2);
}

#[test]
fn command_bar_follows_active_pane() {
    let h = Harness::new();
    let (view, _) = installed(&h);

    view.show_command_bar("rust");
    assert!(view.is_command_bar_visible());
    assert_eq!(view.command_bar_owner(), Some(PaneId(1)));
    let bar = view.command_bar().unwrap();
    let host = view.pane_view(PaneId(1)).unwrap();
    assert!(host.owns_overlay(&bar.widget()));

    view.show_command_bar("docs");
    assert!(Arc::ptr_eq(&bar, &view.command_bar().unwrap()));
    assert_eq!(bar.query(), "docs");

    view.set_active_pane_id(PaneId(2)).unwrap();
    assert!(!view.is_command_bar_visible());
    assert_eq!(view.command_bar_owner(), None);
    assert_eq!(bar.widget().parent(), None);

    view.show_command_bar("");
    assert_eq!(view.command_bar_owner(), Some(PaneId(2)));
    assert!(!Arc::ptr_eq(&bar, &view.command_bar().unwrap()));

    view.hide_command_bar();
    assert!(view.command_bar().is_none());
}

#[test]
fn command_bar_needs_active_pane() {
    let h = Harness::new();
    let view = coordinator(&h);
    view.show_command_bar("nothing");
    assert!(view.command_bar().is_none());
}

#[test]
fn command_bar_toasts_reach_owner() {
    let h = Harness::new();
    let (view, _) = installed(&h);
    view.show_command_bar("");
    view.command_bar().unwrap().notify("Copied URL", ToastLevel::Success);

    let owner = view.pane_view(PaneId(1)).unwrap();
    assert_eq!(owner.toaster().unwrap().message(), "Copied URL");
    assert!(view.pane_view(PaneId(2)).unwrap().toaster().is_none());
}

#[test]
fn reparented_bar_is_only_unparented() {
    let h = Harness::new();
    let (view, _) = installed(&h);
    view.show_command_bar("");
    let bar = view.command_bar().unwrap().widget();

    let elsewhere = h.factory.new_overlay();
    bar.unparent();
    elsewhere.add_overlay(bar.clone());

    view.hide_command_bar();
    assert_eq!(bar.parent(), None);
    assert!(elsewhere.overlays().is_empty());
}

#[test]
fn find_bar_resolves_controller_for_owner() {
    let h = Harness::new();
    let (view, _) = installed(&h);
    let controller = Arc::new(RecordingController::default());
    let asked = Arc::new(Mutex::new(Vec::new()));

    let provided = controller.clone();
    let log = asked.clone();
    view.set_find_controller_provider(Some(Arc::new(move |pane_id: PaneId| {
        log.lock().unwrap().push(pane_id);
        Some(provided.clone() as Arc<dyn FindController>)
    })));

    view.show_find_bar();
    assert!(view.is_find_bar_visible());
    assert_eq!(view.find_bar_owner(), Some(PaneId(1)));
    assert_eq!(*asked.lock().unwrap(), vec![PaneId(1)]);

    view.find_next();
    view.find_previous();
    view.hide_find_bar();
    assert!(!view.is_find_bar_visible());
    assert_eq!(controller.calls(), vec!["next", "previous", "finish"]);
}

#[test]
fn find_bar_close_tears_down() {
    let h = Harness::new();
    let (view, _) = installed(&h);
    view.show_find_bar();
    let bar = view.find_bar().unwrap();

    bar.close();
    assert_eq!(view.find_bar_owner(), None);
    assert_eq!(bar.widget().parent(), None);
}

#[test]
fn find_bar_dropped_on_pane_switch() {
    let h = Harness::new();
    let (view, _) = installed(&h);
    view.show_find_bar();
    view.set_active_pane_id(PaneId(2)).unwrap();
    assert_eq!(view.find_bar_owner(), None);
}

#[test]
fn hover_moves_focus_after_debounce() {
    let h = Harness::new();
    let (view, ws) = installed(&h);
    let web: WidgetRef = h.headless.new_content_view();
    view.set_content_view(PaneId(2), Some(web.clone())).unwrap();

    view.pane_view(PaneId(2)).unwrap().notify_hover_enter();
    h.clock.advance(Duration::from_millis(150));

    assert_eq!(view.active_pane_id(), Some(PaneId(2)));
    assert_eq!(h.headless.focused(), Some(web.id()));
    assert_eq!(ws.read().unwrap().active_pane_id, Some(PaneId(2)));
}

#[test]
fn suppressed_hover_is_ignored() {
    let h = Harness::new();
    let (view, _) = installed(&h);

    view.suppress_hover(Duration::from_secs(60));
    assert!(view.is_hover_suppressed());
    view.pane_view(PaneId(2)).unwrap().notify_hover_enter();
    h.clock.advance(Duration::from_millis(150));
    assert_eq!(view.active_pane_id(), Some(PaneId(1)));
}

#[test]
fn keyboard_navigation_cancels_pending_hovers() {
    let h = Harness::new();
    let (view, _) = installed(&h);

    let target = view.pane_view(PaneId(2)).unwrap();
    target.notify_hover_enter();
    assert!(target.is_hover_pending());

    view.keyboard_navigated();
    assert!(view.is_hover_suppressed());
    assert!(!target.is_hover_pending());
    h.clock.advance(Duration::from_secs(1));
    assert_eq!(view.active_pane_id(), Some(PaneId(1)));
}

#[test]
fn focus_follows_mouse_can_be_disabled() {
    let mut config = TrellisConfig::default();
    config.hover.focus_follows_mouse = false;
    let h = Harness::with_config(config);
    let (view, _) = installed(&h);
    assert!(!view.pane_view(PaneId(2)).unwrap().has_hover_handler());
}

#[test]
fn focus_in_forwards_to_callback() {
    let h = Harness::new();
    let (view, _) = installed(&h);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = seen.clone();
    view.set_on_pane_focused(Some(Arc::new(move |id: PaneId| {
        log.lock().unwrap().push(id)
    })));

    view.pane_view(PaneId(2)).unwrap().notify_focus_in();
    assert_eq!(*seen.lock().unwrap(), vec![PaneId(2)]);
    assert_eq!(view.active_pane_id(), Some(PaneId(1)));
}

#[test]
fn unregister_clears_active_and_owned_bars() {
    let h = Harness::new();
    let (view, _) = installed(&h);
    view.show_command_bar("");
    let removed = view.pane_view(PaneId(1)).unwrap();

    assert!(view.unregister_pane_view(PaneId(1)));
    assert!(!view.unregister_pane_view(PaneId(1)));
    assert_eq!(view.active_pane_id(), None);
    assert_eq!(view.command_bar_owner(), None);
    assert!(removed.is_cleaned_up());
    assert!(view.renderer().stacked_view_for_pane(PaneId(1)).is_none());
    assert!(view.container().has_css_class("single-pane"));
}

#[test]
fn register_replaces_and_cleans_previous() {
    let h = Harness::new();
    let (view, _) = installed(&h);
    let old = view.pane_view(PaneId(2)).unwrap();
    let fresh = view.create_pane_view(PaneId(2), None);

    view.register_pane_view(PaneId(2), fresh.clone());
    assert!(old.is_cleaned_up());
    assert!(Arc::ptr_eq(&fresh, &view.pane_view(PaneId(2)).unwrap()));

    view.register_pane_view(PaneId(2), fresh.clone());
    assert!(!fresh.is_cleaned_up());
}

#[test]
fn root_widget_can_be_swapped_directly() {
    let h = Harness::new();
    let (view, _) = installed(&h);
    let old_root = view.root_widget().unwrap();
    let replacement: WidgetRef = h
        .factory
        .new_box(trellis_common::Orientation::Horizontal, 0)
        .as_widget();

    view.set_root_widget_direct(Some(replacement.clone()));
    assert_eq!(old_root.parent(), None);
    assert_eq!(replacement.parent(), Some(view.container().id()));

    view.clear_root_widget_ref();
    assert!(view.root_widget().is_none());
    assert_eq!(replacement.parent(), Some(view.container().id()));
}

#[test]
fn mode_border_overlay_is_swapped() {
    let h = Harness::new();
    let view = coordinator(&h);
    let first: WidgetRef = h.headless.new_content_view();
    let second: WidgetRef = h.headless.new_content_view();

    view.set_mode_border_overlay(Some(first.clone()));
    let overlay = h.headless.lookup(view.widget().id()).unwrap();
    assert_eq!(overlay.overlay_flags(first.id()), Some((false, false)));

    view.set_mode_border_overlay(Some(second.clone()));
    assert_eq!(first.parent(), None);
    assert_eq!(second.parent(), Some(view.widget().id()));

    view.set_mode_border_overlay(None);
    assert_eq!(second.parent(), None);
}
