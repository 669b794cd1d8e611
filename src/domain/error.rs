//! Domain error types

use thiserror::Error;

/// Errors that can occur while keeping the radio and the tuner in sync
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RigSyncError {
    #[error("Connect error: {0}")]
    Connect(String),

    #[error("Read error: {0}")]
    Read(String),

    #[error("Write error: {0}")]
    Write(String),

    #[error("Mode translation error: {0}")]
    Translation(String),

    #[error("Remote disconnected: {0}")]
    Disconnected(String),

    #[error("Rigctl protocol error: {0}")]
    Protocol(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for rig sync operations
pub type RigSyncResult<T> = Result<T, RigSyncError>;
