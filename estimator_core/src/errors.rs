//! # Error Types
//!
//! Structured error types for estimator_core. The quantity engines only ever
//! fail on configuration validation; the remaining variants cover the
//! ambient file, config, and export paths.
//!
//! ## Example
//!
//! ```rust
//! use estimator_core::errors::{EstimateError, EstimateResult};
//!
//! fn validate_spacing(spacing_ft: f64) -> EstimateResult<()> {
//!     if spacing_ft <= 0.0 {
//!         return Err(EstimateError::invalid_configuration(
//!             "post_spacing_ft",
//!             spacing_ft.to_string(),
//!             "Post spacing must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for estimator_core operations
pub type EstimateResult<T> = Result<T, EstimateError>;

/// Structured error type for estimator operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum EstimateError {
    /// A project dimension, spacing, or option is outside its valid domain
    #[error("Invalid configuration for '{field}': {value} - {reason}")]
    InvalidConfiguration {
        field: String,
        value: String,
        reason: String,
    },

    /// Product id not present in the catalog (strict lookups only)
    #[error("Unknown product id: {id}")]
    UnknownProductId { id: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// Another writer holds the lock on this file
    #[error("File locked: '{path}' is being written by another process")]
    FileLocked { path: String },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Config schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// Report rendering failed
    #[error("Export failed: {format} - {reason}")]
    ExportFailed { format: String, reason: String },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl EstimateError {
    /// Create an InvalidConfiguration error
    pub fn invalid_configuration(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        EstimateError::InvalidConfiguration {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an UnknownProductId error
    pub fn unknown_product_id(id: impl Into<String>) -> Self {
        EstimateError::UnknownProductId { id: id.into() }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        EstimateError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(path: impl Into<String>) -> Self {
        EstimateError::FileLocked { path: path.into() }
    }

    /// Create an ExportFailed error
    pub fn export_failed(format: impl Into<String>, reason: impl Into<String>) -> Self {
        EstimateError::ExportFailed {
            format: format.into(),
            reason: reason.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            EstimateError::InvalidConfiguration { .. } => "INVALID_CONFIGURATION",
            EstimateError::UnknownProductId { .. } => "UNKNOWN_PRODUCT_ID",
            EstimateError::FileError { .. } => "FILE_ERROR",
            EstimateError::FileLocked { .. } => "FILE_LOCKED",
            EstimateError::SerializationError { .. } => "SERIALIZATION_ERROR",
            EstimateError::VersionMismatch { .. } => "VERSION_MISMATCH",
            EstimateError::ExportFailed { .. } => "EXPORT_FAILED",
            EstimateError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for EstimateError {
    fn from(e: serde_json::Error) -> Self {
        EstimateError::SerializationError {
            reason: e.to_string(),
        }
    }
}
