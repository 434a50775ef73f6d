//! # Store Error Types
//!
//! Error types for file operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  io::Error / serde_json::Error / csv::Error / PersistError             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds the file path where it matters        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CliError (in the CLI) ← code + message for the operator               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Read paths mostly do not return these: a missing or malformed file is
//! logged and read as empty. Writes and explicit operations (recording a
//! sale, migrating the ledger, editing a catalog entry) do.

use std::path::PathBuf;
use thiserror::Error;

use salon_core::{CoreError, ValidationError};

/// File storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// File system failure.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON store could not be encoded or decoded.
    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The ledger could not be read or written.
    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The temp file could not be renamed over the target.
    #[error("Failed to replace {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input rejected before anything was written.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Core(#[from] CoreError),

    /// Index or name not present in a store.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Configuration file or environment is unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl StoreError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        StoreError::Json {
            path: path.into(),
            source,
        }
    }

    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        StoreError::Csv {
            path: path.into(),
            source,
        }
    }

    /// Creates a NotFound error for a given entity type and id.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        StoreError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// True for errors caused by operator input rather than the disk.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            StoreError::Validation(_) | StoreError::Core(CoreError::Validation(_))
        )
    }
}

impl From<toml::de::Error> for StoreError {
    fn from(err: toml::de::Error) -> Self {
        StoreError::InvalidConfig(err.to_string())
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_are_flagged() {
        let err: StoreError = ValidationError::required("item").into();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Validation error: item is required");

        let err = StoreError::not_found("Service", 4);
        assert!(!err.is_validation());
        assert_eq!(err.to_string(), "Service not found: 4");
    }
}
