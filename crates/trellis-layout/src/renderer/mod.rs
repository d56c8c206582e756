//! Translation of the pane tree into nested widget containers.

mod layout;


pub use layout::LayoutTreeRenderer;

use std::sync::Arc;

use trellis_common::{LayoutError, PaneId};
use trellis_ui::WidgetRef;

use crate::pane::Pane;
use crate::stacked::StackedGroup;
use crate::tree::PaneNode;

/// Materializes the container widget for one leaf pane during a build.
pub trait PaneViewFactory {
    fn create_pane_view(&mut self, pane: &Pane) -> Result<WidgetRef, LayoutError>;
}

impl<F> PaneViewFactory for F
where
    F: FnMut(&Pane) -> Result<WidgetRef, LayoutError>,
{
    fn create_pane_view(&mut self, pane: &Pane) -> Result<WidgetRef, LayoutError> {
        self(pane)
    }
}

/// The tree collaborator used by the workspace coordinator.
pub trait TreeRenderer: Send + Sync {
    /// Build the widget tree for `root`. Implementations must not keep any
    /// state from a failed build.
    fn build(
        &self,
        root: &PaneNode,
        panes: &mut dyn PaneViewFactory,
    ) -> Result<WidgetRef, LayoutError>;

    /// Group currently holding `pane_id`, if any.
    fn stacked_view_for_pane(&self, pane_id: PaneId) -> Option<Arc<dyn StackedGroup>>;

    fn register_pane_in_stack(&self, pane_id: PaneId, group: Arc<dyn StackedGroup>);

    fn unregister_pane(&self, pane_id: PaneId);
}
