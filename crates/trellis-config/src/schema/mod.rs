//! Configuration schema types for Trellis.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod input;
mod overlays;
mod system;

pub use input::*;
pub use overlays::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration for Trellis.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TrellisConfig {
    pub toast: ToastConfig,
    pub progress: ProgressConfig,
    pub link_status: LinkStatusConfig,
    pub hover: HoverConfig,
    pub loading: LoadingConfig,
    pub logging: LoggingConfig,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn default_config_has_correct_toast() {
        let config = TrellisConfig::default();
        assert_eq!(config.toast.duration_ms, 1500);
        assert_eq!(config.toast.duration(), Duration::from_millis(1500));
        assert_eq!(config.toast.position, ToastPosition::TopLeft);
    }

    #[test]
    fn default_config_has_correct_progress() {
        let config = TrellisConfig::default();
        assert!((config.progress.step - 0.02).abs() < f64::EPSILON);
        assert_eq!(config.progress.interval(), Duration::from_millis(16));
        assert!((config.progress.snap_threshold - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn default_config_has_correct_link_status_and_hover() {
        let config = TrellisConfig::default();
        assert_eq!(config.link_status.show_delay(), Duration::from_millis(100));
        assert_eq!(config.link_status.max_chars, 80);
        assert!(config.hover.focus_follows_mouse);
        assert_eq!(config.hover.delay(), Duration::from_millis(150));
        assert_eq!(config.hover.keyboard_suppress(), Duration::from_millis(300));
    }

    #[test]
    fn default_loading_uses_crate_version() {
        let config = TrellisConfig::default();
        assert!(config.loading.enabled);
        assert_eq!(config.loading.app_name, "trellis");
        assert_eq!(config.loading.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(
            config.loading.label(),
            format!("trellis {}", env!("CARGO_PKG_VERSION"))
        );
    }

    #[test]
    fn loading_label_without_version() {
        let loading = LoadingConfig {
            version: String::new(),
            ..Default::default()
        };
        assert_eq!(loading.label(), "trellis");
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml_str = r#"
[toast]
duration_ms = 3000
position = "bottom-right"

[hover]
focus_follows_mouse = false
"#;
        let config: TrellisConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.toast.duration_ms, 3000);
        assert_eq!(config.toast.position, ToastPosition::BottomRight);
        assert!(!config.hover.focus_follows_mouse);
        // Defaults preserved
        assert_eq!(config.hover.delay_ms, 150);
        assert_eq!(config.progress.interval_ms, 16);
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn empty_toml_gives_all_defaults() {
        let config: TrellisConfig = toml::from_str("").unwrap();
        assert_eq!(config.toast.duration_ms, 1500);
        assert_eq!(config.link_status.max_chars, 80);
        assert!(config.loading.enabled);
    }

    #[test]
    fn unknown_toast_position_is_rejected() {
        let toml_str = r#"
[toast]
position = "middle"
"#;
        let result: Result<TrellisConfig, _> = toml::from_str(toml_str);
        assert!(result.is_err());
    }

    #[test]
    fn log_level_parses_lowercase() {
        let toml_str = r#"
[logging]
level = "debug"
"#;
        let config: TrellisConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.level.as_filter_str(), "debug");
    }

    #[test]
    fn toast_position_css_classes_are_distinct() {
        let classes = [
            ToastPosition::TopLeft.css_class(),
            ToastPosition::TopRight.css_class(),
            ToastPosition::BottomLeft.css_class(),
            ToastPosition::BottomRight.css_class(),
        ];
        for (i, a) in classes.iter().enumerate() {
            for b in &classes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
