//! Error types for voicenav

use thiserror::Error;

/// Result type alias for navigator operations
pub type Result<T> = std::result::Result<T, NavigatorError>;

/// Navigator error types
#[derive(Debug, Error)]
pub enum NavigatorError {
    /// Surface daemon is not running or unreachable
    #[error("surface not running: {0}")]
    SurfaceNotRunning(String),

    /// Connection to the surface daemon failed
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Surface rejected a command
    #[error("command failed: {0}")]
    CommandFailed(String),

    /// Invalid command arguments
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// Destination could not be turned into a loadable URL
    #[error("invalid destination: {0}")]
    InvalidDestination(String),

    /// Speech recognition cannot be used in this session
    #[error("speech recognition unavailable: {0}")]
    SpeechUnavailable(String),

    /// Protocol error (malformed message)
    #[error("protocol error: {0}")]
    ProtocolError(String),

    /// IO error
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl NavigatorError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            NavigatorError::SurfaceNotRunning(_) => 2,
            NavigatorError::ConnectionFailed(_) => 3,
            NavigatorError::CommandFailed(_) => 1,
            NavigatorError::InvalidArguments(_) => 64,   // EX_USAGE
            NavigatorError::InvalidDestination(_) => 65, // EX_DATAERR
            NavigatorError::SpeechUnavailable(_) => 69,  // EX_UNAVAILABLE
            NavigatorError::ProtocolError(_) => 76,      // EX_PROTOCOL
            NavigatorError::IoError(_) => 74,            // EX_IOERR
            NavigatorError::SerializationError(_) => 65, // EX_DATAERR
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
