//! Response contracts for the prediction API

use crate::error::FieldIssue;
use crate::schema::FieldSpec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Successful prediction response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResponse {
    /// Predicted sale price in GBP, rounded to pennies
    pub predicted_price_gbp: f64,
}

impl PredictionResponse {
    /// Wrap a raw model output into the response contract
    pub fn from_price(raw: f64) -> Self {
        Self {
            predicted_price_gbp: (raw * 100.0).round() / 100.0,
        }
    }
}

/// Error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error summary
    pub error: String,
    /// Per-field failures for validation errors
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldIssue>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_fields(mut self, fields: Vec<FieldIssue>) -> Self {
        self.fields = fields;
        self
    }
}

/// Liveness response (static)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// Readiness response: whether the artifact finished loading
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ReadinessResponse {
    pub fn ready() -> Self {
        Self {
            ready: true,
            reason: None,
        }
    }

    pub fn not_ready(reason: impl Into<String>) -> Self {
        Self {
            ready: false,
            reason: Some(reason.into()),
        }
    }
}

/// Metadata response describing the model and the accepted feature schema
#[derive(Debug, Clone, Serialize)]
pub struct MetadataResponse {
    /// Model name
    pub model: String,
    /// Model version
    pub version: String,
    /// Total feature vector length the model expects
    pub feature_count: usize,
    /// Accepted request fields with types, bounds and allowed values
    pub features: Vec<FieldSpec>,
    /// Which models belong to which manufacturer
    pub models_by_manufacturer: BTreeMap<&'static str, Vec<&'static str>>,
    /// Suggested engine size values
    pub engine_size_options: Vec<f64>,
    /// Suggested mileage values
    pub mileage_options: Vec<u32>,
    /// Accepted years, newest first
    pub years: Vec<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_rounded_to_pennies() {
        let response = PredictionResponse::from_price(15234.5678);
        assert_eq!(response.predicted_price_gbp, 15234.57);
    }

    #[test]
    fn test_prediction_response_shape() {
        let json = serde_json::to_value(PredictionResponse::from_price(9_999.0)).unwrap();
        assert_eq!(json["predicted_price_gbp"], 9999.0);
        assert_eq!(json.as_object().unwrap().len(), 1);
    }

    #[test]
    fn test_error_response_omits_empty_fields() {
        let json = serde_json::to_string(&ErrorResponse::new("prediction failed")).unwrap();
        assert!(!json.contains("fields"));
    }

    #[test]
    fn test_readiness_response() {
        let ready = ReadinessResponse::ready();
        assert!(ready.ready);
        assert!(ready.reason.is_none());

        let not_ready = ReadinessResponse::not_ready("model not loaded");
        assert!(!not_ready.ready);
        assert_eq!(not_ready.reason.as_deref(), Some("model not loaded"));
    }
}
