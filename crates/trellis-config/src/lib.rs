//! Trellis configuration system.
//!
//! TOML-based configuration for the pane compositor: toast timing,
//! progress animation, link-status and hover debounce, and the loading
//! placeholder. Every section uses serde defaults, so a partial file (or
//! no file at all) yields a usable config.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use trellis_config::{load_config, config_to_json};
//!
//! let config = load_config().expect("failed to load config");
//! let json = config_to_json(&config);
//! println!("{json}");
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{TrellisConfig, CONFIG_SCHEMA_VERSION};

use trellis_common::ConfigError;

/// Load config from the platform default path and validate it.
///
/// Creates a commented default file if none exists.
pub fn load_config() -> Result<TrellisConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &TrellisConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_to_json_produces_valid_json() {
        let config = TrellisConfig::default();
        let json = config_to_json(&config);
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["toast"]["duration_ms"], 1500);
        assert_eq!(parsed["toast"]["position"], "top-left");
        assert_eq!(parsed["link_status"]["max_chars"], 80);
    }

    #[test]
    fn config_json_roundtrip_keeps_hover_settings() {
        let mut config = TrellisConfig::default();
        config.hover.delay_ms = 250;
        config.hover.focus_follows_mouse = false;
        let json = config_to_json(&config);
        let back: TrellisConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.hover.delay_ms, 250);
        assert!(!back.hover.focus_follows_mouse);
    }
}
