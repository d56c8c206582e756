//! Insertion into and navigation through stacked pane groups.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::{debug, info};
use trellis_common::{PaneId, WorkspaceError};
use trellis_layout::pane::UNTITLED;
use trellis_layout::stacked::ActivateCallback;
use trellis_layout::StackedGroup;
use trellis_ui::Widget;

use crate::pane_view::PaneView;
use crate::workspace_view::WorkspaceView;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackDirection {
    Up,
    Down,
}

impl FromStr for StackDirection {
    type Err = WorkspaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            other => Err(WorkspaceError::InvalidDirection(other.to_string())),
        }
    }
}

impl fmt::Display for StackDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => f.write_str("up"),
            Self::Down => f.write_str("down"),
        }
    }
}

/// Stateless helper over the coordinator's tree renderer.
#[derive(Debug, Default, Clone, Copy)]
pub struct StackNavigator;

impl StackNavigator {
    pub fn new() -> Self {
        Self
    }

    /// Insert `view` into the group holding `active_pane_id`, right after
    /// the group's visible entry. Returns the new entry's index.
    pub fn add_pane_to_stack(
        &self,
        workspace: &WorkspaceView,
        active_pane_id: PaneId,
        view: &Arc<PaneView>,
        title: &str,
    ) -> Result<usize, WorkspaceError> {
        let renderer = workspace.renderer();
        let group = renderer
            .stacked_view_for_pane(active_pane_id)
            .ok_or(WorkspaceError::StackNotFound(active_pane_id))?;

        let pane_id = view.pane_id();
        if view.is_cleaned_up() {
            return Err(WorkspaceError::MissingWidget(pane_id));
        }
        let widget = view.widget();
        if widget.parent().is_some() {
            widget.unparent();
        }
        let title = if title.trim().is_empty() { UNTITLED } else { title };

        let after = group.active_index();
        debug!(
            active_pane = %active_pane_id,
            new_pane = %pane_id,
            title,
            after,
            "inserting pane into stack"
        );
        let index = group.insert_pane_after(after, pane_id, title, widget)?;

        renderer.register_pane_in_stack(pane_id, group.clone());
        workspace.register_pane_view(pane_id, view.clone());
        info!(
            active_pane = %active_pane_id,
            new_pane = %pane_id,
            stack_size = group.count(),
            "added pane to stack"
        );
        Ok(index)
    }

    /// Move from `current` to the previous (`Up`) or next (`Down`) entry,
    /// wrapping around, and return the pane that became visible. Groups of
    /// one stay put.
    pub fn navigate_stack(
        &self,
        workspace: &WorkspaceView,
        current: PaneId,
        direction: StackDirection,
    ) -> Result<PaneId, WorkspaceError> {
        let group = self
            .stacked_view(workspace, current)
            .ok_or(WorkspaceError::StackNotFound(current))?;
        if group.count() <= 1 {
            debug!(pane_id = %current, "single pane in stack, nothing to navigate");
            return Ok(current);
        }

        let index = group
            .find_pane_index(current)
            .ok_or(WorkspaceError::StackNotFound(current))?;
        if group.active_index() != index {
            group.set_active(index)?;
        }
        let next = match direction {
            StackDirection::Up => group.navigate_previous()?,
            StackDirection::Down => group.navigate_next()?,
        };
        debug!(from = %current, to = %next, %direction, "navigated stack");
        Ok(next)
    }

    pub fn stacked_view(
        &self,
        workspace: &WorkspaceView,
        pane_id: PaneId,
    ) -> Option<Arc<dyn StackedGroup>> {
        workspace.renderer().stacked_view_for_pane(pane_id)
    }

    /// True when the pane shares its group with at least one other pane.
    pub fn is_stacked(&self, workspace: &WorkspaceView, pane_id: PaneId) -> bool {
        self.stacked_view(workspace, pane_id)
            .is_some_and(|group| group.count() > 1)
    }

    /// Route title-bar activation of the pane's group to `callback`.
    /// Returns false when the pane is not in a group.
    pub fn set_stack_active_callback(
        &self,
        workspace: &WorkspaceView,
        pane_id: PaneId,
        callback: Option<ActivateCallback>,
    ) -> bool {
        match self.stacked_view(workspace, pane_id) {
            Some(group) => {
                group.set_on_activate(callback);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use trellis_layout::{Pane, PaneNode, Workspace};

    use crate::test_support::Harness;

    fn pane(n: u64) -> Pane {
        Pane::with_id(PaneId(n), format!("pane {n}"), "about:blank")
    }

    fn coordinator(h: &Harness, root: PaneNode) -> Arc<WorkspaceView> {
        let view = WorkspaceView::with_layout_renderer(
            h.factory.clone(),
            h.scheduler.clone(),
            h.config.clone(),
        );
        view.set_workspace(Some(Workspace::new(root).into_shared()))
            .unwrap();
        view
    }

    #[test]
    fn direction_parses() {
        assert_eq!("up".parse::<StackDirection>(), Ok(StackDirection::Up));
        assert_eq!("down".parse::<StackDirection>(), Ok(StackDirection::Down));
        assert_eq!(
            "left".parse::<StackDirection>(),
            Err(WorkspaceError::InvalidDirection("left".into()))
        );
    }

    #[test]
    fn add_inserts_after_active_and_registers() {
        let h = Harness::new();
        let ws = coordinator(&h, PaneNode::leaf(pane(1)));
        let nav = StackNavigator::new();

        let second = ws.create_pane_view(PaneId(2), None);
        assert_eq!(nav.add_pane_to_stack(&ws, PaneId(1), &second, ""), Ok(1));

        let group = nav.stacked_view(&ws, PaneId(2)).unwrap();
        assert_eq!(group.count(), 2);
        assert_eq!(group.active_index(), 1);
        assert_eq!(group.pane_at(1), Some(PaneId(2)));
        assert!(nav.is_stacked(&ws, PaneId(1)));
        assert!(Arc::ptr_eq(&ws.pane_view(PaneId(2)).unwrap(), &second));
        assert!(!ws.container().has_css_class("single-pane"));

        let third = ws.create_pane_view(PaneId(3), None);
        group.set_active(0).unwrap();
        assert_eq!(nav.add_pane_to_stack(&ws, PaneId(1), &third, "docs"), Ok(1));
        assert_eq!(group.pane_at(2), Some(PaneId(2)));
    }

    #[test]
    fn add_outside_any_group_fails() {
        let h = Harness::new();
        let ws = coordinator(&h, PaneNode::leaf(pane(1)));
        let view = ws.create_pane_view(PaneId(2), None);
        let result = StackNavigator::new().add_pane_to_stack(&ws, PaneId(77), &view, "x");
        assert_eq!(result, Err(WorkspaceError::StackNotFound(PaneId(77))));
        assert!(ws.pane_view(PaneId(2)).is_none());
    }

    #[test]
    fn add_cleaned_up_view_fails() {
        let h = Harness::new();
        let ws = coordinator(&h, PaneNode::leaf(pane(1)));
        let view = ws.create_pane_view(PaneId(2), None);
        view.cleanup();
        let result = StackNavigator::new().add_pane_to_stack(&ws, PaneId(1), &view, "x");
        assert_eq!(result, Err(WorkspaceError::MissingWidget(PaneId(2))));
    }

    #[test]
    fn navigate_single_pane_is_noop() {
        let h = Harness::new();
        let ws = coordinator(&h, PaneNode::leaf(pane(1)));
        let nav = StackNavigator::new();
        assert_eq!(
            nav.navigate_stack(&ws, PaneId(1), StackDirection::Down),
            Ok(PaneId(1))
        );
        assert!(!nav.is_stacked(&ws, PaneId(1)));
        assert_eq!(
            nav.navigate_stack(&ws, PaneId(5), StackDirection::Up),
            Err(WorkspaceError::StackNotFound(PaneId(5)))
        );
    }

    #[test]
    fn navigate_wraps_and_returns_new_pane() {
        let h = Harness::new();
        let ws = coordinator(&h, PaneNode::stacked(vec![pane(1), pane(2), pane(3)]));
        let nav = StackNavigator::new();
        let group = nav.stacked_view(&ws, PaneId(1)).unwrap();
        group.set_active(0).unwrap();

        assert_eq!(
            nav.navigate_stack(&ws, PaneId(1), StackDirection::Up),
            Ok(PaneId(3))
        );
        assert_eq!(
            nav.navigate_stack(&ws, PaneId(3), StackDirection::Down),
            Ok(PaneId(1))
        );
        assert_eq!(
            nav.navigate_stack(&ws, PaneId(1), StackDirection::Down),
            Ok(PaneId(2))
        );
        assert_eq!(group.active_index(), 1);
    }

    #[test]
    fn navigate_starts_from_current_even_when_hidden() {
        let h = Harness::new();
        let ws = coordinator(&h, PaneNode::stacked(vec![pane(1), pane(2), pane(3)]));
        let nav = StackNavigator::new();
        let group = nav.stacked_view(&ws, PaneId(1)).unwrap();
        group.set_active(0).unwrap();

        assert_eq!(
            nav.navigate_stack(&ws, PaneId(3), StackDirection::Down),
            Ok(PaneId(1))
        );
        assert_eq!(group.active_index(), 0);

        assert_eq!(
            nav.navigate_stack(&ws, PaneId(2), StackDirection::Up),
            Ok(PaneId(1))
        );
        assert_eq!(
            nav.navigate_stack(&ws, PaneId(2), StackDirection::Down),
            Ok(PaneId(3))
        );
        assert_eq!(group.active_index(), 2);
    }

    #[test]
    fn active_callback_needs_a_group() {
        let h = Harness::new();
        let ws = coordinator(&h, PaneNode::stacked(vec![pane(1), pane(2)]));
        let nav = StackNavigator::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let seen = hits.clone();

        let callback: ActivateCallback = Arc::new(move |_: usize| {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        assert!(nav.set_stack_active_callback(&ws, PaneId(1), Some(callback)));
        assert!(!nav.set_stack_active_callback(&ws, PaneId(9), None));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }
}
