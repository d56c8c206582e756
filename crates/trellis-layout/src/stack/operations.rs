//! Mutating operations on PaneStack: insert, remove, cycle, set_active.

use trellis_common::PaneId;

use super::PaneStack;

impl PaneStack {
    /// Push a new pane onto the end of the stack and make it active.
    pub fn push(&mut self, pane_id: PaneId) {
        self.panes.push(pane_id);
        self.active_index = self.panes.len() - 1;
    }

    /// Insert a pane right after `index` (clamped to the last entry) and
    /// make it active. Returns the new pane's index.
    pub fn insert_after(&mut self, index: usize, pane_id: PaneId) -> usize {
        let at = index.min(self.panes.len().saturating_sub(1)) + 1;
        let at = at.min(self.panes.len());
        self.panes.insert(at, pane_id);
        self.active_index = at;
        at
    }

    /// Remove a pane from the stack by ID. Returns `true` if found.
    /// If the active pane is removed, the previous pane becomes active.
    /// Returns `false` if the pane is not in the stack or it's the last one.
    pub fn remove(&mut self, pane_id: PaneId) -> bool {
        if self.panes.len() <= 1 {
            return false;
        }
        if let Some(idx) = self.position(pane_id) {
            self.panes.remove(idx);
            if self.active_index >= self.panes.len() {
                self.active_index = self.panes.len() - 1;
            } else if idx < self.active_index {
                self.active_index -= 1;
            }
            true
        } else {
            false
        }
    }

    /// Cycle to the next pane, wrapping around.
    pub fn cycle_next(&mut self) {
        if self.panes.len() > 1 {
            self.active_index = (self.active_index + 1) % self.panes.len();
        }
    }

    /// Cycle to the previous pane, wrapping around.
    pub fn cycle_prev(&mut self) {
        if self.panes.len() > 1 {
            self.active_index = (self.active_index + self.panes.len() - 1) % self.panes.len();
        }
    }

    /// Set a specific pane as active by ID. Returns `true` if found.
    pub fn set_active(&mut self, pane_id: PaneId) -> bool {
        match self.position(pane_id) {
            Some(idx) => {
                self.active_index = idx;
                true
            }
            None => false,
        }
    }

    /// Set the active entry by index. Returns `false` if out of range.
    pub fn set_active_index(&mut self, index: usize) -> bool {
        if index < self.panes.len() {
            self.active_index = index;
            true
        } else {
            false
        }
    }
}
