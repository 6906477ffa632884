//! Error types for todo
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad args, bad config, unknown save file)
//! - 3: Contract violation (index outside the pending list)
//! - 4: Operation failed (I/O error, malformed save file)

use thiserror::Error;

/// Exit codes for the todo CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const CONTRACT_VIOLATION: i32 = 3;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for todo operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Save file not found: {0}")]
    SaveNotFound(String),

    // Contract violations (exit code 3)
    #[error("Task index {index} is out of range for {len} pending task(s)")]
    IndexOutOfRange { index: usize, len: usize },

    // Operation failures (exit code 4)
    #[error("Malformed save file {name}: {reason}")]
    MalformedSaveFile { name: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidArgument(_) | Error::InvalidConfig(_) | Error::SaveNotFound(_) => {
                exit_codes::USER_ERROR
            }

            Error::IndexOutOfRange { .. } => exit_codes::CONTRACT_VIOLATION,

            Error::MalformedSaveFile { .. }
            | Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::TomlSerialize(_)
            | Error::OperationFailed(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// Structured details for machine-readable error output
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::IndexOutOfRange { index, len } => Some(serde_json::json!({
                "index": index,
                "len": len,
            })),
            Error::SaveNotFound(name) => Some(serde_json::json!({ "file": name })),
            Error::MalformedSaveFile { name, reason } => Some(serde_json::json!({
                "file": name,
                "reason": reason,
            })),
            Error::InvalidConfig(message) | Error::InvalidArgument(message) => {
                Some(serde_json::json!({ "message": message }))
            }
            _ => None,
        }
    }
}

/// Result type alias for todo operations
pub type Result<T> = std::result::Result<T, Error>;

/// Wrapper for displaying errors in JSON format
#[derive(serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&Error> for JsonError {
    fn from(err: &Error) -> Self {
        JsonError {
            error: err.to_string(),
            code: err.exit_code(),
            details: err.details(),
        }
    }
}
