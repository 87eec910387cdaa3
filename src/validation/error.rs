//! Error classification for the threat map

use thiserror::Error;

/// Result type for threat map operations
pub type MapResult<T> = Result<T, MapError>;

/// Errors surfaced by curve generation, configuration and the animator
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MapError {
    /// Caller passed an argument outside the accepted domain
    #[error("invalid argument {parameter} = {value}: {reason}")]
    InvalidArgument {
        parameter: String,
        value: String,
        reason: String,
    },
    /// Configuration value rejected by validation
    #[error("invalid configuration {parameter} = {value}: {reason}")]
    InvalidConfig {
        parameter: String,
        value: String,
        reason: String,
    },
    /// Configuration file could not be read or written
    #[error("configuration I/O error: {message}")]
    ConfigIo { message: String },
    /// JSON encoding or decoding failed
    #[error("serialization error: {message}")]
    Serialization { message: String },
    /// Callback handle is not registered
    #[error("unknown callback handle {handle}")]
    UnknownCallback { handle: u32 },
}

/// Severity levels used when reporting errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Nothing renders until the caller fixes its input
    Critical,
    /// One vector or subscriber is affected, the rest keep rendering
    Low,
}

impl MapError {
    pub(crate) fn invalid_argument(
        parameter: &str,
        value: impl ToString,
        reason: &str,
    ) -> Self {
        MapError::InvalidArgument {
            parameter: parameter.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn invalid_config(parameter: &str, value: impl ToString, reason: &str) -> Self {
        MapError::InvalidConfig {
            parameter: parameter.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Severity of this error
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            MapError::InvalidArgument { .. }
            | MapError::InvalidConfig { .. }
            | MapError::ConfigIo { .. }
            | MapError::Serialization { .. } => ErrorSeverity::Critical,
            MapError::UnknownCallback { .. } => ErrorSeverity::Low,
        }
    }

    /// Whether the map can keep rendering after this error
    pub fn is_recoverable(&self) -> bool {
        self.severity() != ErrorSeverity::Critical
    }
}

impl From<serde_json::Error> for MapError {
    fn from(error: serde_json::Error) -> Self {
        MapError::Serialization {
            message: error.to_string(),
        }
    }
}

impl From<std::io::Error> for MapError {
    fn from(error: std::io::Error) -> Self {
        MapError::ConfigIo {
            message: error.to_string(),
        }
    }
}
