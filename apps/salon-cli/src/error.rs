//! # CLI Error Type
//!
//! Unified error type for commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the CLI                                │
//! │                                                                         │
//! │  Command Function                                                       │
//! │  Result<String, CliError>                                               │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Store Error? ─── StoreError::Io / Json / Csv ──────┐                   │
//! │         │                                           │                   │
//! │         ▼                                           ▼                   │
//! │  Rejected input? ─── ValidationError ─────────── CliError ──► exit 2   │
//! │         │                                           │                   │
//! │         ▼                                           └──────► exit 1    │
//! │  Success ──► stdout                                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! With `--json` the error is printed as:
//! ```json
//! {
//!   "code": "VALIDATION_ERROR",
//!   "message": "Validation error: item is required"
//! }
//! ```

use serde::Serialize;
use thiserror::Error;

use salon_core::CoreError;
use salon_store::StoreError;

/// Error returned from a command.
#[derive(Debug, Clone, Serialize, Error)]
#[serde(rename_all = "camelCase")]
#[error("[{code:?}] {message}")]
pub struct CliError {
    /// Machine-readable error code for scripts
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input rejected; nothing was written
    ValidationError,

    /// Named record does not exist
    NotFound,

    /// A data file could not be read or written
    StorageError,

    /// Anything else
    Internal,
}

pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        CliError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        CliError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::Internal, message)
    }

    /// Process exit status for this error.
    pub fn exit_code(&self) -> u8 {
        match self.code {
            ErrorCode::ValidationError => 2,
            _ => 1,
        }
    }
}

impl From<StoreError> for CliError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(e) => CliError::validation(format!("Validation error: {}", e)),
            StoreError::Core(core) => core.into(),
            StoreError::NotFound { entity, id } => CliError::not_found(&entity, &id),
            StoreError::InvalidConfig(reason) => {
                CliError::new(ErrorCode::Internal, format!("Invalid configuration: {}", reason))
            }
            other => {
                tracing::error!(error = %other, "Storage operation failed");
                CliError::new(ErrorCode::StorageError, other.to_string())
            }
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound { entity, key } => CliError::not_found(&entity, &key),
            CoreError::Validation(e) => CliError::validation(format!("Validation error: {}", e)),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::internal(format!("Could not encode output: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use salon_core::ValidationError;

    #[test]
    fn test_validation_exits_with_two() {
        let err: CliError = StoreError::from(ValidationError::required("item")).into();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.message, "Validation error: item is required");
    }

    #[test]
    fn test_not_found_exits_with_one() {
        let err: CliError = StoreError::not_found("Promotion", 7).into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.exit_code(), 1);
        assert_eq!(err.message, "Promotion not found: 7");
    }

    #[test]
    fn test_json_shape() {
        let err = CliError::validation("quantity must be positive");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["message"], "quantity must be positive");
    }
}
