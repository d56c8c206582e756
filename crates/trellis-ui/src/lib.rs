//! Widget contracts and timer scheduling for the Trellis compositor.
//!
//! The compositor never talks to a toolkit directly. It mutates widgets
//! through the traits in [`widget`] and defers work through a
//! [`Scheduler`]. The [`headless`] backend implements every widget
//! contract in memory and is what the binary and the test suites drive.

pub mod headless;
pub mod scheduler;
pub mod widget;

pub use headless::{HeadlessFactory, HeadlessWidget, WidgetKind};
pub use scheduler::{
    ManualScheduler, OnceCallback, RepeatingCallback, Scheduler, SharedScheduler, TimerControl,
    TimerHandle, TokioScheduler,
};
pub use widget::{
    same_widget, Align, BoxWidget, EntryWidget, LabelWidget, OverlayWidget, ProgressBarWidget,
    SharedFactory, SpinnerWidget, Widget, WidgetFactory, WidgetId, WidgetRef,
};
