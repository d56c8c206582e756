//! Core types for the pane tree: Direction and PaneNode.

use serde::{Deserialize, Serialize};
use trellis_common::{Orientation, PaneId};

use crate::pane::Pane;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Horizontal,
    Vertical,
}

impl Direction {
    /// Orientation of the box a split in this direction is rendered as.
    pub fn orientation(self) -> Orientation {
        match self {
            Direction::Horizontal => Orientation::Horizontal,
            Direction::Vertical => Orientation::Vertical,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PaneNode {
    Leaf(Pane),
    Split {
        direction: Direction,
        ratio: f64,
        first: Box<PaneNode>,
        second: Box<PaneNode>,
    },
    /// Panes sharing one region, one visible at a time.
    Stacked { panes: Vec<Pane>, active: usize },
}

impl PaneNode {
    pub fn leaf(pane: Pane) -> Self {
        PaneNode::Leaf(pane)
    }

    pub fn split_h(first: PaneNode, second: PaneNode) -> Self {
        PaneNode::Split {
            direction: Direction::Horizontal,
            ratio: 0.5,
            first: Box::new(first),
            second: Box::new(second),
        }
    }

    pub fn split_v(first: PaneNode, second: PaneNode) -> Self {
        PaneNode::Split {
            direction: Direction::Vertical,
            ratio: 0.5,
            first: Box::new(first),
            second: Box::new(second),
        }
    }

    pub fn stacked(panes: Vec<Pane>) -> Self {
        PaneNode::Stacked { panes, active: 0 }
    }

    pub fn pane_count(&self) -> usize {
        match self {
            PaneNode::Leaf(_) => 1,
            PaneNode::Split { first, second, .. } => first.pane_count() + second.pane_count(),
            PaneNode::Stacked { panes, .. } => panes.len(),
        }
    }

    pub fn contains_pane(&self, id: PaneId) -> bool {
        self.find_pane(id).is_some()
    }

    /// Collect all pane IDs in visual (depth-first) order.
    pub fn collect_pane_ids(&self) -> Vec<PaneId> {
        let mut ids = Vec::new();
        self.collect_ids_into(&mut ids);
        ids
    }

    fn collect_ids_into(&self, out: &mut Vec<PaneId>) {
        match self {
            PaneNode::Leaf(pane) => out.push(pane.id),
            PaneNode::Split { first, second, .. } => {
                first.collect_ids_into(out);
                second.collect_ids_into(out);
            }
            PaneNode::Stacked { panes, .. } => out.extend(panes.iter().map(|p| p.id)),
        }
    }
}
