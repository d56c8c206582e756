use std::path::PathBuf;

use crate::types::PaneId;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Failures raised by the tree collaborator and stacked groups.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("failed to build node {node}: {reason}")]
    Build { node: String, reason: String },

    #[error("stack is empty")]
    EmptyStack,

    #[error("stack index {0} out of range")]
    IndexOutOfRange(usize),
}

/// Structural errors returned by the workspace coordinator and the stack
/// navigator. All of them are recoverable; the caller decides whether to
/// surface them to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkspaceError {
    #[error("workspace is nil")]
    NilWorkspace,

    #[error("pane not found: {0}")]
    PaneNotFound(PaneId),

    #[error("stacked view not found for {0}")]
    StackNotFound(PaneId),

    #[error("invalid direction: {0:?} (use 'up' or 'down')")]
    InvalidDirection(String),

    #[error("{0} has no displayable widget")]
    MissingWidget(PaneId),

    #[error(transparent)]
    Build(#[from] LayoutError),
}

/// Failure to run a script in a pane's content view. Script execution is
/// best effort, so callers log these instead of propagating them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScriptError {
    #[error("no content view for {0}")]
    NoContentView(PaneId),

    #[error("failed to encode script argument: {0}")]
    Encode(String),

    #[error("script execution failed: {0}")]
    Execution(String),
}

#[derive(Debug, thiserror::Error)]
pub enum TrellisError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}
