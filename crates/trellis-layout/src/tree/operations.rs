//! Mutating operations on the pane tree: split, stack, remove.

use trellis_common::PaneId;

use super::{Direction, PaneNode};
use crate::pane::Pane;

impl PaneNode {
    /// Split the pane `target_id` into two regions. The existing pane stays
    /// in the `first` position and the new pane goes in the `second` position.
    /// A pane inside a stack splits the whole stack.
    /// Returns `true` if the target was found and split.
    pub fn split_at(&mut self, target_id: PaneId, new_pane: Pane, direction: Direction) -> bool {
        match self {
            PaneNode::Leaf(pane) if pane.id == target_id => {
                self.wrap_in_split(new_pane, direction);
                true
            }
            PaneNode::Stacked { panes, .. } if panes.iter().any(|p| p.id == target_id) => {
                self.wrap_in_split(new_pane, direction);
                true
            }
            PaneNode::Leaf(_) | PaneNode::Stacked { .. } => false,
            PaneNode::Split { first, second, .. } => {
                if first.contains_pane(target_id) {
                    first.split_at(target_id, new_pane, direction)
                } else {
                    second.split_at(target_id, new_pane, direction)
                }
            }
        }
    }

    fn wrap_in_split(&mut self, new_pane: Pane, direction: Direction) {
        let existing = std::mem::replace(self, PaneNode::stacked(Vec::new()));
        *self = PaneNode::Split {
            direction,
            ratio: 0.5,
            first: Box::new(existing),
            second: Box::new(PaneNode::Leaf(new_pane)),
        };
    }

    /// Stack `new_pane` onto the region holding `target_id`. A leaf becomes a
    /// two-pane stack; an existing stack gains the pane right after its
    /// active entry. The new pane becomes the active entry.
    /// Returns the new pane's index within the stack.
    pub fn stack_onto(&mut self, target_id: PaneId, new_pane: Pane) -> Option<usize> {
        match self {
            PaneNode::Leaf(pane) if pane.id == target_id => {
                let existing = pane.clone();
                *self = PaneNode::Stacked {
                    panes: vec![existing, new_pane],
                    active: 1,
                };
                Some(1)
            }
            PaneNode::Stacked { panes, active } if panes.iter().any(|p| p.id == target_id) => {
                let index = (*active).min(panes.len().saturating_sub(1)) + 1;
                panes.insert(index, new_pane);
                *active = index;
                Some(index)
            }
            PaneNode::Leaf(_) | PaneNode::Stacked { .. } => None,
            PaneNode::Split { first, second, .. } => {
                if first.contains_pane(target_id) {
                    first.stack_onto(target_id, new_pane)
                } else {
                    second.stack_onto(target_id, new_pane)
                }
            }
        }
    }

    /// Remove a pane from the tree. The sibling of a removed region replaces
    /// the parent split; a stack left with one pane collapses to a leaf.
    /// Returns `true` if the pane was found and removed.
    /// Cannot remove the last pane.
    pub fn remove_pane(&mut self, target_id: PaneId) -> bool {
        match self {
            PaneNode::Leaf(_) => false,
            PaneNode::Stacked { panes, active } => {
                let Some(idx) = panes.iter().position(|p| p.id == target_id) else {
                    return false;
                };
                if panes.len() <= 1 {
                    return false;
                }
                panes.remove(idx);
                if *active >= panes.len() {
                    *active = panes.len() - 1;
                } else if idx < *active {
                    *active -= 1;
                }
                if panes.len() == 1 {
                    let last = panes.remove(0);
                    *self = PaneNode::Leaf(last);
                }
                true
            }
            PaneNode::Split { first, second, .. } => {
                // A direct child that is a single pane goes away entirely
                if first.is_single(target_id) {
                    *self = (**second).clone();
                    return true;
                }
                if second.is_single(target_id) {
                    *self = (**first).clone();
                    return true;
                }
                first.remove_pane(target_id) || second.remove_pane(target_id)
            }
        }
    }

    fn is_single(&self, id: PaneId) -> bool {
        match self {
            PaneNode::Leaf(pane) => pane.id == id,
            PaneNode::Stacked { panes, .. } => panes.len() == 1 && panes[0].id == id,
            PaneNode::Split { .. } => false,
        }
    }

    /// Make `target_id` the visible entry of its stack.
    /// Returns `false` if the pane is not inside a stack.
    pub fn set_stack_active(&mut self, target_id: PaneId) -> bool {
        match self {
            PaneNode::Leaf(_) => false,
            PaneNode::Stacked { panes, active } => {
                match panes.iter().position(|p| p.id == target_id) {
                    Some(idx) => {
                        *active = idx;
                        true
                    }
                    None => false,
                }
            }
            PaneNode::Split { first, second, .. } => {
                first.set_stack_active(target_id) || second.set_stack_active(target_id)
            }
        }
    }
}
