//! A headless compositor session: one workspace coordinator driven by the
//! tokio scheduler, with stand-in content views for every pane.

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{debug, info};
use trellis_common::{PaneId, TrellisError, WorkspaceError};
use trellis_compositor::{StackNavigator, ToastLevel, WorkspaceView};
use trellis_config::TrellisConfig;
use trellis_layout::{Direction, Pane, PaneNode, SharedWorkspace, Workspace};
use trellis_ui::{HeadlessFactory, SharedScheduler, WidgetRef};

/// Layout used when no `--layout` file is given: one pane beside a stack
/// of two.
pub fn default_workspace() -> Workspace {
    Workspace::new(PaneNode::split_h(
        PaneNode::leaf(Pane::new("Start", "about:blank")),
        PaneNode::stacked(vec![
            Pane::new("Docs", "https://docs.rs"),
            Pane::new("Crates", "https://crates.io"),
        ]),
    ))
}

pub struct Session {
    headless: HeadlessFactory,
    domain: SharedWorkspace,
    view: Arc<WorkspaceView>,
    navigator: StackNavigator,
}

impl Session {
    /// Install `domain` and give every pane a content view.
    pub fn start(
        config: TrellisConfig,
        domain: SharedWorkspace,
        scheduler: SharedScheduler,
    ) -> Result<Self, TrellisError> {
        let headless = HeadlessFactory::new();
        let view = WorkspaceView::with_layout_renderer(
            Arc::new(headless.clone()),
            scheduler,
            Arc::new(config),
        );
        view.set_on_pane_focused(Some(Arc::new(|pane_id: PaneId| {
            debug!(pane_id = %pane_id, "pane focused");
        })));
        view.set_workspace(Some(domain.clone()))?;

        for pane_id in view.pane_ids() {
            let content: WidgetRef = headless.new_content_view();
            view.set_content_view(pane_id, Some(content))?;
            if let Some(pane) = view.pane_view(pane_id) {
                pane.show_loading_placeholder();
                pane.set_loading(true);
                pane.set_load_progress(0.1);
            }
        }
        if let Some(active) = view.active_pane_id() {
            view.focus_pane(active);
        }
        info!(panes = view.pane_count(), "session started");

        Ok(Self {
            headless,
            domain,
            view,
            navigator: StackNavigator::new(),
        })
    }

    pub fn workspace_view(&self) -> &Arc<WorkspaceView> {
        &self.view
    }

    /// Mark every pane as loaded and greet on the active one.
    pub fn finish_loading(&self) {
        for pane_id in self.view.pane_ids() {
            if let Some(pane) = self.view.pane_view(pane_id) {
                pane.set_load_progress(1.0);
                pane.set_loading(false);
                pane.hide_loading_placeholder();
            }
        }
        if let Some(pane) = self.view.active_pane_view() {
            pane.show_toast("Workspace ready", ToastLevel::Success);
        }
    }

    /// Cycle the active pane's stack once, if it is stacked.
    pub fn cycle_active_stack(&self) -> Result<Option<PaneId>, TrellisError> {
        let Some(active) = self.view.active_pane_id() else {
            return Ok(None);
        };
        if !self.navigator.is_stacked(&self.view, active) {
            return Ok(None);
        }
        let next = self
            .navigator
            .navigate_stack(&self.view, active, "down".parse()?)?;
        if let Some(root) = self
            .domain
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .root
            .as_mut()
        {
            root.set_stack_active(next);
        }
        self.view.set_active_pane_id(next)?;
        Ok(Some(next))
    }

    fn require_active(&self) -> Result<PaneId, TrellisError> {
        self.view
            .active_pane_id()
            .ok_or_else(|| TrellisError::Other("no active pane".into()))
    }

    /// Open a pane in the active pane's stack and make it visible.
    pub fn open_in_stack(&self, title: &str, uri: &str) -> Result<PaneId, TrellisError> {
        let active = self.require_active()?;
        let pane = Pane::new(title, uri);
        let pane_id = pane.id;

        let view = self
            .view
            .create_pane_view(pane_id, Some(self.headless.new_content_view()));
        if let Err(e) = self
            .navigator
            .add_pane_to_stack(&self.view, active, &view, title)
        {
            view.cleanup();
            return Err(e.into());
        }
        self.domain
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .root
            .as_mut()
            .and_then(|root| root.stack_onto(active, pane))
            .ok_or(WorkspaceError::StackNotFound(active))?;

        self.view.set_active_pane_id(pane_id)?;
        info!(pane_id = %pane_id, stacked_on = %active, "opened pane in stack");
        Ok(pane_id)
    }

    /// Split the active pane's region and focus the new pane.
    pub fn split_active(
        &self,
        title: &str,
        uri: &str,
        direction: Direction,
    ) -> Result<PaneId, TrellisError> {
        let active = self.require_active()?;
        let pane = Pane::new(title, uri);
        let pane_id = pane.id;
        let placed = self
            .domain
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .root
            .as_mut()
            .is_some_and(|root| root.split_at(active, pane, direction));
        if !placed {
            return Err(WorkspaceError::PaneNotFound(active).into());
        }

        self.view.rebuild()?;
        self.view
            .set_content_view(pane_id, Some(self.headless.new_content_view()))?;
        self.view.set_active_pane_id(pane_id)?;
        self.view.focus_pane(pane_id);
        Ok(pane_id)
    }

    /// Remove a pane from the layout. The last pane cannot be closed.
    pub fn close_pane(&self, pane_id: PaneId) -> Result<bool, TrellisError> {
        let removed = {
            let mut domain = self.domain.write().unwrap_or_else(|e| e.into_inner());
            let removed = domain
                .root
                .as_mut()
                .is_some_and(|root| root.remove_pane(pane_id));
            if removed && domain.active_pane_id == Some(pane_id) {
                domain.active_pane_id = domain
                    .root
                    .as_ref()
                    .and_then(PaneNode::first_pane)
                    .map(|pane| pane.id);
            }
            removed
        };
        if !removed {
            debug!(pane_id = %pane_id, "pane not closed");
            return Ok(false);
        }
        self.view.rebuild()?;
        Ok(true)
    }

    pub fn summary(&self) -> Value {
        // Coordinator locks are taken before the domain lock, never after.
        let (workspace_id, active_pane) = {
            let domain = self.domain.read().unwrap_or_else(|e| e.into_inner());
            (domain.id.as_str().to_string(), domain.active_pane_id)
        };
        let active = self.view.active_pane_id();
        let panes: Vec<Value> = self
            .view
            .pane_ids()
            .into_iter()
            .map(|id| {
                json!({
                    "id": id.0,
                    "active": active == Some(id),
                    "stacked": self.navigator.is_stacked(&self.view, id),
                })
            })
            .collect();
        json!({
            "workspace": workspace_id,
            "active_pane": active_pane.map(|id| id.0),
            "panes": panes,
            "live_widgets": self.headless.live_widgets(),
            "parenting_violations": self.headless.parenting_violations(),
        })
    }

    /// Release every pane view.
    pub fn shutdown(self) {
        self.view.hide_command_bar();
        self.view.hide_find_bar();
        for pane_id in self.view.pane_ids() {
            self.view.unregister_pane_view(pane_id);
        }
        info!("session shut down");
    }
}
