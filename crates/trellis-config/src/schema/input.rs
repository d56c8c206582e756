//! Pointer input configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Hover focus-follows-mouse behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HoverConfig {
    pub focus_follows_mouse: bool,
    /// Debounce before a hovered pane takes focus (valid range: 0-5000).
    pub delay_ms: u32,
    /// Hover is ignored this long after keyboard navigation
    /// (valid range: 0-10000).
    pub keyboard_suppress_ms: u32,
}

impl Default for HoverConfig {
    fn default() -> Self {
        Self {
            focus_follows_mouse: true,
            delay_ms: 150,
            keyboard_suppress_ms: 300,
        }
    }
}

impl HoverConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(u64::from(self.delay_ms))
    }

    pub fn keyboard_suppress(&self) -> Duration {
        Duration::from_millis(u64::from(self.keyboard_suppress_ms))
    }
}
