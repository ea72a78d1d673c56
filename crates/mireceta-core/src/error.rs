//! Error types for the MiReceta workspace.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire MiReceta workspace.
///
/// Lookups of missing entities are not errors at the store level (they return
/// `Option`/`bool`); this type covers validation, storage and configuration
/// failures, plus the "not found" case for flows that must report it, such as
/// submitting a wizard whose recipe was deleted meanwhile.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MiRecetaError {
    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// A form field failed validation
    #[error("Validation failed for '{field}': {message}")]
    Validation { field: String, message: String },

    /// Durable storage is absent or refused the operation
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON"
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),

    /// Multiple errors
    #[error("Multiple errors occurred ({} total)", .0.len())]
    Multiple(Vec<MiRecetaError>),
}

impl MiRecetaError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a Validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates a StorageUnavailable error
    pub fn storage_unavailable(message: impl Into<String>) -> Self {
        Self::StorageUnavailable(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Collapses a list of errors: `None` when empty, the error itself when
    /// there is exactly one, `Multiple` otherwise.
    pub fn collect(mut errors: Vec<MiRecetaError>) -> Option<Self> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(Self::Multiple(errors)),
        }
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error, or a group made only of them
    pub fn is_validation(&self) -> bool {
        match self {
            Self::Validation { .. } => true,
            Self::Multiple(errors) => {
                !errors.is_empty() && errors.iter().all(MiRecetaError::is_validation)
            }
            _ => false,
        }
    }

    /// Check if this is a storage availability error
    pub fn is_storage_unavailable(&self) -> bool {
        matches!(self, Self::StorageUnavailable(_))
    }

    /// Check if this is a serialization error
    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }

    /// Names of the fields that failed validation, in report order.
    pub fn invalid_fields(&self) -> Vec<&str> {
        match self {
            Self::Validation { field, .. } => vec![field.as_str()],
            Self::Multiple(errors) => errors.iter().flat_map(|e| e.invalid_fields()).collect(),
            _ => Vec::new(),
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for MiRecetaError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for MiRecetaError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for MiRecetaError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for MiRecetaError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, MiRecetaError>`.
pub type Result<T> = std::result::Result<T, MiRecetaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_flattens_single_error() {
        assert!(MiRecetaError::collect(Vec::new()).is_none());

        let single = MiRecetaError::collect(vec![MiRecetaError::validation("name", "required")]);
        assert_eq!(
            single,
            Some(MiRecetaError::validation("name", "required"))
        );

        let many = MiRecetaError::collect(vec![
            MiRecetaError::validation("name", "required"),
            MiRecetaError::validation("description", "required"),
        ])
        .unwrap();
        assert!(many.is_validation());
        assert_eq!(many.invalid_fields(), vec!["name", "description"]);
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: MiRecetaError = io.into();
        assert!(matches!(err, MiRecetaError::Io { .. }));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_not_found_display() {
        let err = MiRecetaError::not_found("recipe", "42");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Entity not found: recipe '42'");
    }
}
