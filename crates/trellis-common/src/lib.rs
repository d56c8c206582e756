pub mod errors;
pub mod id;
pub mod types;

pub use errors::{ConfigError, LayoutError, ScriptError, TrellisError, WorkspaceError};
pub use id::{new_correlation_id, new_id, WorkspaceId};
pub use types::{Orientation, PaneId};

pub type Result<T> = std::result::Result<T, TrellisError>;
