use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::{debug, warn};
use trellis_common::{new_correlation_id, LayoutError, PaneId};
use trellis_ui::{SharedFactory, Widget, WidgetRef};

use super::{PaneViewFactory, TreeRenderer};
use crate::stacked::{StackedGroup, StackedView};
use crate::tree::PaneNode;

type StackRegistry = HashMap<PaneId, Arc<dyn StackedGroup>>;

/// Reference tree renderer.
///
/// Every leaf is wrapped in a single-entry [`StackedView`] so stacking a
/// pane later only inserts into an existing group. Splits become oriented
/// boxes. The pane-to-group registry is swapped in only after a build
/// succeeds.
pub struct LayoutTreeRenderer {
    factory: SharedFactory,
    stacks: RwLock<StackRegistry>,
}

impl LayoutTreeRenderer {
    pub fn new(factory: SharedFactory) -> Self {
        Self {
            factory,
            stacks: RwLock::new(HashMap::new()),
        }
    }

    /// Number of panes with a registered group.
    pub fn registered_panes(&self) -> usize {
        self.stacks.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn build_node(
        &self,
        node: &PaneNode,
        panes: &mut dyn PaneViewFactory,
        staged: &mut StackRegistry,
    ) -> Result<WidgetRef, LayoutError> {
        match node {
            PaneNode::Leaf(pane) => {
                let content = panes.create_pane_view(pane)?;
                let view = Arc::new(StackedView::new(
                    self.factory.clone(),
                    pane.id,
                    pane.display_title(),
                    content,
                )?);
                staged.insert(pane.id, view.clone());
                Ok(view.widget())
            }
            PaneNode::Stacked {
                panes: members,
                active,
            } => {
                let (head, rest) = members.split_first().ok_or(LayoutError::EmptyStack)?;
                let content = panes.create_pane_view(head)?;
                let view = Arc::new(StackedView::new(
                    self.factory.clone(),
                    head.id,
                    head.display_title(),
                    content,
                )?);
                for (i, pane) in rest.iter().enumerate() {
                    let content = panes.create_pane_view(pane)?;
                    view.insert_pane_after(i, pane.id, pane.display_title(), content)?;
                }
                view.set_active((*active).min(members.len() - 1))?;
                for pane in members {
                    staged.insert(pane.id, view.clone());
                }
                Ok(view.widget())
            }
            PaneNode::Split {
                direction,
                first,
                second,
                ..
            } => {
                let container = self.factory.new_box(direction.orientation(), 0);
                container.add_css_class("pane-split");
                container.set_expand(true);
                let first = self.build_node(first, panes, staged)?;
                let second = self.build_node(second, panes, staged)?;
                container.append(first);
                container.append(second);
                Ok(container.as_widget())
            }
        }
    }
}

impl TreeRenderer for LayoutTreeRenderer {
    fn build(
        &self,
        root: &PaneNode,
        panes: &mut dyn PaneViewFactory,
    ) -> Result<WidgetRef, LayoutError> {
        let correlation = new_correlation_id();
        let mut staged = StackRegistry::new();
        match self.build_node(root, panes, &mut staged) {
            Ok(widget) => {
                let count = staged.len();
                *self.stacks.write().unwrap_or_else(|e| e.into_inner()) = staged;
                debug!(%correlation, panes = count, "built pane tree");
                Ok(widget)
            }
            Err(e) => {
                warn!(%correlation, error = %e, "pane tree build failed");
                Err(e)
            }
        }
    }

    fn stacked_view_for_pane(&self, pane_id: PaneId) -> Option<Arc<dyn StackedGroup>> {
        self.stacks
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&pane_id)
            .cloned()
    }

    fn register_pane_in_stack(&self, pane_id: PaneId, group: Arc<dyn StackedGroup>) {
        self.stacks
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(pane_id, group);
    }

    fn unregister_pane(&self, pane_id: PaneId) {
        self.stacks
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&pane_id);
    }
}
