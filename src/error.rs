//! Error types for the carprice crate

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for carprice operations
pub type Result<T> = std::result::Result<T, PricingError>;

/// Main error type for the carprice crate
#[derive(Error, Debug)]
pub enum PricingError {
    #[error("Artifact error ({path}): {reason}")]
    ArtifactError { path: PathBuf, reason: String },

    #[error("Invalid input: {field} = {value}, {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unknown location: {0}")]
    UnknownLocation(String),

    #[error("Feature names mismatch: expected {expected}, got {actual}")]
    SchemaMismatch { expected: String, actual: String },

    #[error("Model error: {0}")]
    ModelError(String),

    #[error("Inference error: {0}")]
    InferenceError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl PricingError {
    pub(crate) fn invalid_input(
        field: &str,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        PricingError::InvalidInput {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether the error was caused by the caller's input rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PricingError::InvalidInput { .. } | PricingError::UnknownLocation(_)
        )
    }
}

impl From<serde_json::Error> for PricingError {
    fn from(err: serde_json::Error) -> Self {
        PricingError::SerializationError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for PricingError {
    fn from(err: ndarray::ShapeError) -> Self {
        PricingError::InferenceError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PricingError::UnknownLocation("Atlantis".to_string());
        assert_eq!(err.to_string(), "Unknown location: Atlantis");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: PricingError = io_err.into();
        assert!(matches!(err, PricingError::IoError(_)));
    }

    #[test]
    fn test_client_errors() {
        assert!(PricingError::invalid_input("kilometrage", -1, "must be >= 0").is_client_error());
        assert!(!PricingError::ModelError("boom".into()).is_client_error());
    }
}
