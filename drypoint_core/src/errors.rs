//! # Error Types
//!
//! Structured error types for drypoint_core. The estimation functions
//! themselves never fail (an incomplete job still produces a well-formed,
//! possibly all-zero result), so these errors only surface at the edges:
//! ingesting host data, and reading or writing job files.
//!
//! ## Example
//!
//! ```rust
//! use drypoint_core::errors::{EstimateError, EstimateResult};
//!
//! fn validate_drying_days(days: f64) -> EstimateResult<()> {
//!     if days < 0.0 {
//!         return Err(EstimateError::InvalidInput {
//!             field: "drying_days".to_string(),
//!             value: days.to_string(),
//!             reason: "Drying duration cannot be negative".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_drying_days(-1.0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for drypoint_core operations
pub type EstimateResult<T> = Result<T, EstimateError>;

/// Structured error type for ingestion and file operations.
///
/// Each variant carries enough context for a host UI or API layer to point
/// the operator at the offending field.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum EstimateError {
    /// An input value is invalid (out of range, wrong type, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Equipment group id not present in the catalog
    #[error("Unknown equipment group: {group_id}")]
    UnknownEquipmentGroup { group_id: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// File is locked by another user/process
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl EstimateError {
    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        EstimateError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        EstimateError::MissingField {
            field: field.into(),
        }
    }

    /// Create an UnknownEquipmentGroup error
    pub fn unknown_group(group_id: impl Into<String>) -> Self {
        EstimateError::UnknownEquipmentGroup {
            group_id: group_id.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(
        operation: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        EstimateError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(
        path: impl Into<String>,
        locked_by: impl Into<String>,
        locked_at: impl Into<String>,
    ) -> Self {
        EstimateError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Create a SerializationError from any displayable cause
    pub fn serialization(reason: impl std::fmt::Display) -> Self {
        EstimateError::SerializationError {
            reason: reason.to_string(),
        }
    }

    /// Check if this is a recoverable error (e.g., can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, EstimateError::FileLocked { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            EstimateError::InvalidInput { .. } => "INVALID_INPUT",
            EstimateError::MissingField { .. } => "MISSING_FIELD",
            EstimateError::UnknownEquipmentGroup { .. } => "UNKNOWN_EQUIPMENT_GROUP",
            EstimateError::FileError { .. } => "FILE_ERROR",
            EstimateError::FileLocked { .. } => "FILE_LOCKED",
            EstimateError::SerializationError { .. } => "SERIALIZATION_ERROR",
            EstimateError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = EstimateError::invalid_input("water_class", "7", "Water class must be 1-4");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"InvalidInput\""));
        let roundtrip: EstimateError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(EstimateError::missing_field("claim_number").error_code(), "MISSING_FIELD");
        assert_eq!(EstimateError::unknown_group("lgr-999").error_code(), "UNKNOWN_EQUIPMENT_GROUP");
    }

    #[test]
    fn test_only_locks_are_recoverable() {
        assert!(EstimateError::file_locked("job.dpj", "tech", "now").is_recoverable());
        assert!(!EstimateError::serialization("bad json").is_recoverable());
    }
}
