//! Stacked groups: several pane containers in one region, one visible.

mod view;


pub use view::StackedView;

use std::sync::Arc;

use trellis_common::{LayoutError, PaneId};
use trellis_ui::WidgetRef;

/// Called with the entry index when a title bar is activated.
pub type ActivateCallback = Arc<dyn Fn(usize) + Send + Sync>;

pub trait StackedGroup: Send + Sync {
    fn widget(&self) -> WidgetRef;
    fn count(&self) -> usize;
    fn active_index(&self) -> usize;
    fn pane_at(&self, index: usize) -> Option<PaneId>;
    fn find_pane_index(&self, pane_id: PaneId) -> Option<usize>;

    /// Insert a pane right after `index` (clamped) and make it the visible
    /// entry. `content` must be unparented. Returns the new entry's index.
    fn insert_pane_after(
        &self,
        index: usize,
        pane_id: PaneId,
        title: &str,
        content: WidgetRef,
    ) -> Result<usize, LayoutError>;

    /// Remove a pane and release its content widget. `Ok(false)` when the
    /// pane is not in this group; the last entry cannot be removed.
    fn remove_pane(&self, pane_id: PaneId) -> Result<bool, LayoutError>;

    fn set_active(&self, index: usize) -> Result<(), LayoutError>;

    /// Show the next entry (wrapping) and return its pane.
    fn navigate_next(&self) -> Result<PaneId, LayoutError>;

    /// Show the previous entry (wrapping) and return its pane.
    fn navigate_previous(&self) -> Result<PaneId, LayoutError>;

    fn set_on_activate(&self, callback: Option<ActivateCallback>);
}
