//! Lookups and ordered traversal over the pane tree.

use trellis_common::PaneId;

use super::PaneNode;
use crate::pane::Pane;

impl PaneNode {
    pub fn find_pane(&self, id: PaneId) -> Option<&Pane> {
        match self {
            PaneNode::Leaf(pane) => (pane.id == id).then_some(pane),
            PaneNode::Split { first, second, .. } => {
                first.find_pane(id).or_else(|| second.find_pane(id))
            }
            PaneNode::Stacked { panes, .. } => panes.iter().find(|p| p.id == id),
        }
    }

    /// First pane in visual order.
    pub fn first_pane(&self) -> Option<&Pane> {
        match self {
            PaneNode::Leaf(pane) => Some(pane),
            PaneNode::Split { first, .. } => first.first_pane(),
            PaneNode::Stacked { panes, active } => panes.get(*active).or_else(|| panes.first()),
        }
    }

    /// Get the next pane ID in order after `current_id`, wrapping around.
    pub fn next_pane(&self, current_id: PaneId) -> Option<PaneId> {
        let ids = self.collect_pane_ids();
        if ids.len() <= 1 {
            return None;
        }
        let idx = ids.iter().position(|&id| id == current_id)?;
        Some(ids[(idx + 1) % ids.len()])
    }

    /// Get the previous pane ID in order before `current_id`, wrapping around.
    pub fn prev_pane(&self, current_id: PaneId) -> Option<PaneId> {
        let ids = self.collect_pane_ids();
        if ids.len() <= 1 {
            return None;
        }
        let idx = ids.iter().position(|&id| id == current_id)?;
        Some(ids[(idx + ids.len() - 1) % ids.len()])
    }
}
