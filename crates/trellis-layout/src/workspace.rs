//! The workspace domain model shared between the application and the
//! compositor.

use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use trellis_common::{PaneId, WorkspaceId};

use crate::tree::PaneNode;

/// Workspace handle shared with the compositor, which writes the active
/// pane id back so the domain model stays authoritative.
pub type SharedWorkspace = Arc<RwLock<Workspace>>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workspace {
    #[serde(default)]
    pub id: WorkspaceId,
    pub root: Option<PaneNode>,
    #[serde(default)]
    pub active_pane_id: Option<PaneId>,
}

impl Workspace {
    /// Workspace over `root` with its first pane active.
    pub fn new(root: PaneNode) -> Self {
        let active_pane_id = root.first_pane().map(|p| p.id);
        Self {
            id: WorkspaceId::new(),
            root: Some(root),
            active_pane_id,
        }
    }

    pub fn empty() -> Self {
        Self {
            id: WorkspaceId::new(),
            root: None,
            active_pane_id: None,
        }
    }

    pub fn into_shared(self) -> SharedWorkspace {
        Arc::new(RwLock::new(self))
    }

    pub fn pane_ids(&self) -> Vec<PaneId> {
        self.root
            .as_ref()
            .map(PaneNode::collect_pane_ids)
            .unwrap_or_default()
    }

    pub fn pane_count(&self) -> usize {
        self.root.as_ref().map_or(0, PaneNode::pane_count)
    }

    /// Parse a persisted workspace and make sure later `PaneId::next()`
    /// calls cannot collide with its ids.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let workspace: Workspace = serde_json::from_str(json)?;
        if let Some(max) = workspace.pane_ids().into_iter().max() {
            PaneId::reserve_through(max);
        }
        Ok(workspace)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
