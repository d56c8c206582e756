use std::sync::Arc;

use trellis_config::TrellisConfig;
use trellis_ui::{HeadlessFactory, ManualScheduler, SharedFactory, SharedScheduler};

use crate::SharedConfig;

/// Headless widgets plus a virtual clock.
pub(crate) struct Harness {
    pub headless: HeadlessFactory,
    pub factory: SharedFactory,
    pub clock: Arc<ManualScheduler>,
    pub scheduler: SharedScheduler,
    pub config: SharedConfig,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(TrellisConfig::default())
    }

    pub fn with_config(config: TrellisConfig) -> Self {
        let headless = HeadlessFactory::new();
        let clock = Arc::new(ManualScheduler::new());
        Self {
            factory: Arc::new(headless.clone()),
            scheduler: clock.clone(),
            headless,
            clock,
            config: Arc::new(config),
        }
    }
}
