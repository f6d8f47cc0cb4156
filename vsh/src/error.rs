//! Error types for vsh

use thiserror::Error;
use vos_sdk::FsError;

/// Result type alias for vsh operations
pub type VshResult<T> = Result<T, VshError>;

/// Error types for vsh shell operations
#[derive(Error, Debug)]
pub enum VshError {
    /// Malformed command line
    #[error("Parse error: {0}")]
    Parse(String),

    /// Runtime error during command execution
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// IO error on the host side (terminal, history file)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Virtual filesystem error
    #[error("{0}")]
    Fs(#[from] FsError),

    /// The persisted core image could not be decoded or failed verification
    #[error("Core image error: {0}")]
    Image(String),

    /// The terminal will never produce another line
    #[error("terminal closed")]
    TerminalClosed,
}

impl From<serde_json::Error> for VshError {
    fn from(err: serde_json::Error) -> Self {
        VshError::Image(err.to_string())
    }
}
