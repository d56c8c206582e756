//! Core types for pane stacking.

use serde::{Deserialize, Serialize};
use trellis_common::PaneId;

/// Ordered pane ids sharing one screen region. The active pane is shown;
/// the others are collapsed to their title bars but preserved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaneStack {
    /// Ordered list of pane IDs in this stack.
    pub(super) panes: Vec<PaneId>,
    /// Index of the currently active (visible) pane.
    pub(super) active_index: usize,
}

impl PaneStack {
    /// Create a new stack with a single pane.
    pub fn new(initial_pane_id: PaneId) -> Self {
        Self {
            panes: vec![initial_pane_id],
            active_index: 0,
        }
    }

    /// How many panes are in this stack.
    pub fn len(&self) -> usize {
        self.panes.len()
    }

    /// Whether this stack is empty (should never be in normal operation).
    pub fn is_empty(&self) -> bool {
        self.panes.is_empty()
    }

    pub fn contains(&self, pane_id: PaneId) -> bool {
        self.panes.contains(&pane_id)
    }

    pub fn position(&self, pane_id: PaneId) -> Option<usize> {
        self.panes.iter().position(|&id| id == pane_id)
    }

    pub fn get(&self, index: usize) -> Option<PaneId> {
        self.panes.get(index).copied()
    }

    /// Get all pane IDs in order.
    pub fn pane_ids(&self) -> &[PaneId] {
        &self.panes
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    /// Get the active (visible) pane ID.
    pub fn active(&self) -> PaneId {
        self.panes[self.active_index]
    }
}
