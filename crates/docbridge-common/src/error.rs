//! Error types for docbridge

use thiserror::Error;

/// Result type alias for docbridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Unified error type for all docbridge operations
#[derive(Error, Debug, Clone)]
pub enum BridgeError {
    /// Required process configuration is missing or invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// The database connection could not be established
    #[error("Connection error: {0}")]
    Connection(String),

    /// The request body is structurally invalid
    #[error("Validation error: {0}")]
    Validation(String),

    /// A driver call failed
    #[error("MongoDB error: {message}")]
    MongoDB {
        message: String,
        code: Option<i32>,
        code_name: Option<String>,
    },

    /// The connection was closed during shutdown
    #[error("Connection closed")]
    Closed,
}

impl BridgeError {
    /// Driver-supplied numeric error code, if any
    pub fn code(&self) -> Option<i32> {
        match self {
            BridgeError::MongoDB { code, .. } => *code,
            _ => None,
        }
    }

    /// Driver-supplied symbolic error name, if any
    pub fn code_name(&self) -> Option<&str> {
        match self {
            BridgeError::MongoDB { code_name, .. } => code_name.as_deref(),
            _ => None,
        }
    }

    /// Human-readable message without the category prefix
    pub fn message(&self) -> String {
        match self {
            BridgeError::Config(msg)
            | BridgeError::Connection(msg)
            | BridgeError::Validation(msg) => msg.clone(),
            BridgeError::MongoDB { message, .. } => message.clone(),
            BridgeError::Closed => "Connection closed".to_string(),
        }
    }

    /// Returns true if the caller sent a malformed request
    pub fn is_client_error(&self) -> bool {
        matches!(self, BridgeError::Validation(_))
    }
}

// MongoDB-specific error conversions (when mongodb-errors feature is enabled)
#[cfg(feature = "mongodb-errors")]
impl From<mongodb::error::Error> for BridgeError {
    fn from(err: mongodb::error::Error) -> Self {
        use mongodb::error::{ErrorKind, WriteFailure};

        let (code, code_name) = match err.kind.as_ref() {
            ErrorKind::Command(cmd) => (Some(cmd.code), Some(cmd.code_name.clone())),
            ErrorKind::Write(WriteFailure::WriteError(write)) => {
                (Some(write.code), write.code_name.clone())
            }
            ErrorKind::Write(WriteFailure::WriteConcernError(concern)) => {
                (Some(concern.code), Some(concern.code_name.clone()))
            }
            _ => (None, None),
        };

        BridgeError::MongoDB {
            message: err.to_string(),
            code,
            code_name: code_name.filter(|name| !name.is_empty()),
        }
    }
}

#[cfg(feature = "mongodb-errors")]
impl From<bson::extjson::de::Error> for BridgeError {
    fn from(err: bson::extjson::de::Error) -> Self {
        BridgeError::Validation(format!("Invalid extended JSON: {}", err))
    }
}
