//! Pane stacking: multiple panes occupying the same region.

mod operations;
mod types;

pub use types::*;
