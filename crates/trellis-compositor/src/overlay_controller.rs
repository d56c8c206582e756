//! Bridge to the in-page command palette injected into content views.
//!
//! Every command is a small script run in the isolated [`SCRIPT_WORLD`].
//! Script failures are cosmetic: they are logged and reported as `false`.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::{debug, warn};
use trellis_common::{PaneId, ScriptError};

/// Isolated script world the palette scripts are injected into.
pub const SCRIPT_WORLD: &str = "trellis";

/// Mode used when `show` is called without one.
pub const DEFAULT_MODE: &str = "omnibox";

/// Executes scripts in a pane's content view.
pub trait ScriptRunner: Send + Sync {
    fn run_script(&self, pane_id: PaneId, script: &str, world: &str) -> Result<(), ScriptError>;
}

/// Last known palette state for one pane.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlayState {
    pub visible: bool,
    pub mode: Option<String>,
}

const HIDE_SCRIPT: &str = r#"(function(){try{var p=window.__trellis_palette;if(p&&typeof p.close==="function"){p.close();return;}if(typeof window.__trellis_find_close==="function"){window.__trellis_find_close();return;}if(typeof window.__trellis_toggle==="function"){window.__trellis_toggle();}}catch(e){console.error("trellis palette close failed",e);}})();"#;

const TOGGLE_SCRIPT: &str = r#"(function(){try{if(typeof window.__trellis_toggle==="function"){window.__trellis_toggle();return;}var p=window.__trellis_palette;if(p&&typeof p.toggle==="function"){p.toggle();return;}if(p&&typeof p.open==="function"){p.open("omnibox","");}}catch(e){console.error("trellis palette toggle failed",e);}})();"#;

fn encode(value: &str) -> Result<String, ScriptError> {
    serde_json::to_string(value).map_err(|e| ScriptError::Encode(e.to_string()))
}

fn open_script(mode: &str, query: &str) -> Result<String, ScriptError> {
    let mode = encode(mode)?;
    let query = encode(query)?;
    Ok(format!(
        r#"(function(){{try{{var p=window.__trellis_palette;if(p&&typeof p.open==="function"){{p.open({mode},{query});return;}}if(typeof window.__trellis_toggle==="function"){{window.__trellis_toggle();}}}}catch(e){{console.error("trellis palette open failed",e);}}}})();"#
    ))
}

fn find_script(query: &str) -> Result<String, ScriptError> {
    let query = encode(query)?;
    Ok(format!(
        r#"(function(){{try{{if(typeof window.__trellis_find_open==="function"){{window.__trellis_find_open({query});return;}}var p=window.__trellis_palette;if(p&&typeof p.open==="function"){{p.open("find",{query});}}}}catch(e){{console.error("trellis find open failed",e);}}}})();"#
    ))
}

pub struct OverlayController {
    runner: Arc<dyn ScriptRunner>,
    states: RwLock<HashMap<PaneId, OverlayState>>,
}

impl OverlayController {
    pub fn new(runner: Arc<dyn ScriptRunner>) -> Self {
        debug!("overlay controller initialized");
        Self {
            runner,
            states: RwLock::new(HashMap::new()),
        }
    }

    fn run(&self, pane_id: PaneId, action: &str, script: Result<String, ScriptError>) -> bool {
        let result = script.and_then(|script| self.runner.run_script(pane_id, &script, SCRIPT_WORLD));
        match result {
            Ok(()) => {
                debug!(pane_id = %pane_id, action, "palette script sent");
                true
            }
            Err(e) => {
                warn!(pane_id = %pane_id, action, error = %e, "palette script failed");
                false
            }
        }
    }

    fn set_state(&self, pane_id: PaneId, state: OverlayState) {
        self.states
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(pane_id, state);
    }

    /// Open the palette in `mode` (default [`DEFAULT_MODE`]) seeded with
    /// `query`.
    pub fn show(&self, pane_id: PaneId, mode: Option<&str>, query: &str) -> bool {
        let mode = mode.filter(|m| !m.is_empty()).unwrap_or(DEFAULT_MODE);
        if !self.run(pane_id, "show", open_script(mode, query)) {
            return false;
        }
        self.set_state(
            pane_id,
            OverlayState {
                visible: true,
                mode: Some(mode.to_string()),
            },
        );
        true
    }

    pub fn hide(&self, pane_id: PaneId) -> bool {
        if !self.run(pane_id, "hide", Ok(HIDE_SCRIPT.to_string())) {
            return false;
        }
        self.set_state(pane_id, OverlayState::default());
        true
    }

    /// Flip visibility. The tracked state is best effort since the page
    /// decides what toggling means.
    pub fn toggle(&self, pane_id: PaneId) -> bool {
        if !self.run(pane_id, "toggle", Ok(TOGGLE_SCRIPT.to_string())) {
            return false;
        }
        let current = self.state(pane_id);
        self.set_state(
            pane_id,
            OverlayState {
                visible: !current.visible,
                mode: current.mode,
            },
        );
        true
    }

    pub fn open_find(&self, pane_id: PaneId, query: &str) -> bool {
        if !self.run(pane_id, "open_find", find_script(query)) {
            return false;
        }
        self.set_state(
            pane_id,
            OverlayState {
                visible: true,
                mode: Some("find".to_string()),
            },
        );
        true
    }

    pub fn state(&self, pane_id: PaneId) -> OverlayState {
        self.states
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&pane_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Drop the tracked state of a closed pane.
    pub fn forget(&self, pane_id: PaneId) {
        self.states
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&pane_id);
    }
}
