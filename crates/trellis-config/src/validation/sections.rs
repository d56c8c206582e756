//! Per-section range checks.

use super::helpers::{validate_range, validate_range_f64};
use crate::schema::TrellisConfig;

pub(super) fn validate_toast(errors: &mut Vec<String>, config: &TrellisConfig) {
    validate_range(errors, "toast.duration_ms", config.toast.duration_ms, 0, 60_000);
}

pub(super) fn validate_progress(errors: &mut Vec<String>, config: &TrellisConfig) {
    let p = &config.progress;
    validate_range_f64(errors, "progress.step", p.step, 0.001, 1.0);
    validate_range(errors, "progress.interval_ms", p.interval_ms, 1, 1000);
    validate_range_f64(errors, "progress.snap_threshold", p.snap_threshold, 0.0, 1.0);
}

pub(super) fn validate_link_status(errors: &mut Vec<String>, config: &TrellisConfig) {
    let l = &config.link_status;
    validate_range(errors, "link_status.show_delay_ms", l.show_delay_ms, 0, 5000);
    validate_range(errors, "link_status.max_chars", l.max_chars, 8, 1000);
}

pub(super) fn validate_hover(errors: &mut Vec<String>, config: &TrellisConfig) {
    let h = &config.hover;
    validate_range(errors, "hover.delay_ms", h.delay_ms, 0, 5000);
    validate_range(
        errors,
        "hover.keyboard_suppress_ms",
        h.keyboard_suppress_ms,
        0,
        10_000,
    );
}

pub(super) fn validate_loading(errors: &mut Vec<String>, config: &TrellisConfig) {
    if config.loading.enabled && config.loading.app_name.trim().is_empty() {
        errors.push("loading.app_name must not be empty".into());
    }
}
