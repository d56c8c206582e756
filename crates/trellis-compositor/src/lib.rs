//! Pane composition for the Trellis browser.
//!
//! [`WorkspaceView`] projects a workspace's pane tree into widgets and owns
//! the single-active-pane invariant. Every leaf is a [`PaneView`] that wraps
//! one content view plus its lazily created overlays (load progress, toasts,
//! link status, loading placeholder). [`StackNavigator`] inserts into and
//! cycles through stacked groups, and [`OverlayController`] drives the
//! in-page command palette through a [`ScriptRunner`].
//!
//! Lock order is `WorkspaceView` -> `PaneView` -> overlay component, and
//! `WorkspaceView` before the shared domain workspace. No lock is held while
//! user callbacks or the tree renderer run.

pub mod command_bar;
pub mod find_bar;
pub mod hover;
pub mod link_status;
pub mod loading;
pub mod overlay_controller;
pub mod pane_view;
pub mod progress;
pub mod stack_nav;
pub mod toaster;
pub mod workspace_view;

mod slot;

#[cfg(test)]
pub(crate) mod test_support;

use std::sync::Arc;

use trellis_common::PaneId;
use trellis_config::TrellisConfig;

pub use command_bar::{CommandBar, ToastSink};
pub use find_bar::{FindBar, FindController, FindControllerProvider};
pub use hover::HoverHandler;
pub use link_status::LinkStatusOverlay;
pub use loading::LoadingPlaceholder;
pub use overlay_controller::{OverlayController, OverlayState, ScriptRunner};
pub use pane_view::PaneView;
pub use progress::ProgressIndicator;
pub use stack_nav::{StackDirection, StackNavigator};
pub use toaster::{ToastLevel, ToastOptions, ToastOverrides, Toaster};
pub use workspace_view::WorkspaceView;

/// Configuration shared by every component of one compositor.
pub type SharedConfig = Arc<TrellisConfig>;

/// Callback receiving the pane an event happened on.
pub type PaneCallback = Arc<dyn Fn(PaneId) + Send + Sync>;
