//! Error types for the car price prediction service.
//!
//! The taxonomy follows the three failure classes the API can surface:
//! validation errors (the caller's input was wrong, never retried),
//! model-unavailable errors (the artifact has not finished loading, try
//! again later), and prediction errors (the predictor itself raised).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single failed field in a validation error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    /// Name of the offending field
    pub field: String,
    /// Why the field was rejected
    pub reason: String,
}

impl FieldIssue {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Main error type for service operations
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Malformed or out-of-range input; carries every offending field
    #[error("validation failed for {} field(s)", .0.len())]
    Validation(Vec<FieldIssue>),

    /// The model artifact failed to load or has not finished loading
    #[error("model not available: {0}")]
    ModelUnavailable(String),

    /// The predictor raised during inference
    #[error("prediction failed: {0}")]
    Prediction(String),

    /// The model artifact is missing or incompatible
    #[error("model artifact error: {0}")]
    Artifact(String),

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(String),
}

impl ServiceError {
    /// Shorthand for a single-field validation error
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ServiceError::Validation(vec![FieldIssue::new(field, reason)])
    }

    /// HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::Validation(_) => 422,
            ServiceError::ModelUnavailable(_) => 503,
            ServiceError::Prediction(_) => 500,
            ServiceError::Artifact(_) => 500,
            ServiceError::Config(_) => 500,
        }
    }

    /// Whether a caller could succeed by retrying later without changing
    /// the request
    pub fn is_retryable(&self) -> bool {
        matches!(self, ServiceError::ModelUnavailable(_))
    }
}

/// Convenient result type for service operations
pub type Result<T> = std::result::Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ServiceError::validation("engine_size", "must be > 0").status_code(),
            422
        );
        assert_eq!(
            ServiceError::ModelUnavailable("loading".into()).status_code(),
            503
        );
        assert_eq!(
            ServiceError::Prediction("shape mismatch".into()).status_code(),
            500
        );
    }

    #[test]
    fn test_retryable() {
        assert!(ServiceError::ModelUnavailable("loading".into()).is_retryable());
        assert!(!ServiceError::validation("year", "too old").is_retryable());
        assert!(!ServiceError::Prediction("boom".into()).is_retryable());
    }

    #[test]
    fn test_validation_message_counts_fields() {
        let err = ServiceError::Validation(vec![
            FieldIssue::new("year_of_manufacture", "missing required field"),
            FieldIssue::new("mileage", "must not be negative"),
        ]);
        assert_eq!(err.to_string(), "validation failed for 2 field(s)");
    }
}
