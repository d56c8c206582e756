//! Full configuration validation.
//!
//! Each section has its own check; this orchestrator runs them all and
//! collects errors into a single `ConfigError`.

mod helpers;
mod sections;


use crate::schema::TrellisConfig;
use trellis_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &TrellisConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    sections::validate_toast(&mut errors, config);
    sections::validate_progress(&mut errors, config);
    sections::validate_link_status(&mut errors, config);
    sections::validate_hover(&mut errors, config);
    sections::validate_loading(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
