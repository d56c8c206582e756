pub mod pane;
pub mod renderer;
pub mod stack;
pub mod stacked;
pub mod tree;
pub mod workspace;

pub use pane::Pane;
pub use renderer::{LayoutTreeRenderer, PaneViewFactory, TreeRenderer};
pub use stack::PaneStack;
pub use stacked::{StackedGroup, StackedView};
pub use tree::{Direction, PaneNode};
pub use workspace::{SharedWorkspace, Workspace};
