//! Overlay configuration types: toasts, load progress, link status and
//! the loading placeholder.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Corner of the pane a toast is anchored to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ToastPosition {
    #[default]
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl ToastPosition {
    /// CSS class applied to the toast widget for this anchor.
    pub fn css_class(self) -> &'static str {
        match self {
            Self::TopLeft => "toast-top-left",
            Self::TopRight => "toast-top-right",
            Self::BottomLeft => "toast-bottom-left",
            Self::BottomRight => "toast-bottom-right",
        }
    }
}

/// Toast notification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToastConfig {
    /// Auto-dismiss delay in milliseconds. `0` keeps toasts until hidden
    /// (valid range: 0-60000).
    pub duration_ms: u32,
    pub position: ToastPosition,
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            duration_ms: 1500,
            position: ToastPosition::TopLeft,
        }
    }
}

impl ToastConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(u64::from(self.duration_ms))
    }
}

/// Page-load progress animation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressConfig {
    /// Fraction added per animation tick (valid range: 0.001-1.0).
    pub step: f64,
    /// Animation tick interval in milliseconds (valid range: 1-1000).
    pub interval_ms: u32,
    /// Jumps larger than this snap instead of animating (valid range: 0.0-1.0).
    pub snap_threshold: f64,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            step: 0.02,
            interval_ms: 16,
            snap_threshold: 0.3,
        }
    }
}

impl ProgressConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.interval_ms))
    }
}

/// Hovered-link status line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkStatusConfig {
    /// Delay before the status line appears (valid range: 0-5000).
    pub show_delay_ms: u32,
    /// Longer URIs are shortened in the middle (valid range: 8-1000).
    pub max_chars: u32,
}

impl Default for LinkStatusConfig {
    fn default() -> Self {
        Self {
            show_delay_ms: 100,
            max_chars: 80,
        }
    }
}

impl LinkStatusConfig {
    pub fn show_delay(&self) -> Duration {
        Duration::from_millis(u64::from(self.show_delay_ms))
    }
}

/// Placeholder shown in a pane before its content view is ready.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadingConfig {
    pub enabled: bool,
    pub app_name: String,
    pub version: String,
}

impl Default for LoadingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            app_name: "trellis".into(),
            version: env!("CARGO_PKG_VERSION").into(),
        }
    }
}

impl LoadingConfig {
    /// Text of the placeholder label, e.g. `trellis 0.1.0`.
    pub fn label(&self) -> String {
        if self.version.is_empty() {
            self.app_name.clone()
        } else {
            format!("{} {}", self.app_name, self.version)
        }
    }
}
