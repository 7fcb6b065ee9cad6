//! Request validation against the fixed feature schema.
//!
//! Rejects malformed requests before they reach the predictor. The check is
//! pure: given a raw request it either returns a normalized [`CarFeatures`]
//! or the full list of failing fields with reasons.

use crate::error::FieldIssue;
use crate::schema;
use crate::types::request::{CarFeatures, RawPredictionRequest};

const MISSING: &str = "missing required field";

/// Validates raw prediction requests.
///
/// The upper year bound is the configured reference year, so the validator
/// is built from configuration rather than shared statically.
#[derive(Debug, Clone)]
pub struct RequestValidator {
    reference_year: i32,
}

impl RequestValidator {
    pub fn new(reference_year: i32) -> Self {
        Self { reference_year }
    }

    /// Validate a raw request.
    ///
    /// Collects every failure rather than stopping at the first, so a caller
    /// can fix a whole request in one round trip.
    pub fn validate(&self, raw: &RawPredictionRequest) -> Result<CarFeatures, Vec<FieldIssue>> {
        let mut issues = Vec::new();

        let manufacturer = self.validate_manufacturer(raw, &mut issues);
        let model = self.validate_model(raw, manufacturer.as_deref(), &mut issues);
        let fuel_type = self.validate_fuel_type(raw, &mut issues);
        let engine_size = self.validate_engine_size(raw, &mut issues);
        let year = self.validate_year(raw, &mut issues);
        let mileage = self.validate_mileage(raw, &mut issues);

        if !issues.is_empty() {
            return Err(issues);
        }

        // All Options are Some once no issues were recorded.
        Ok(CarFeatures {
            manufacturer: manufacturer.unwrap_or_default(),
            model: model.unwrap_or_default(),
            fuel_type: fuel_type.unwrap_or_default(),
            engine_size: engine_size.unwrap_or_default(),
            year_of_manufacture: year.unwrap_or_default(),
            mileage: mileage.unwrap_or_default(),
        })
    }

    fn validate_manufacturer(
        &self,
        raw: &RawPredictionRequest,
        issues: &mut Vec<FieldIssue>,
    ) -> Option<String> {
        let Some(value) = raw.manufacturer.as_deref().map(str::trim) else {
            issues.push(FieldIssue::new("manufacturer", MISSING));
            return None;
        };
        if !schema::is_known_manufacturer(value) {
            issues.push(FieldIssue::new(
                "manufacturer",
                format!(
                    "unknown manufacturer \"{}\"; expected one of {}",
                    value,
                    schema::MANUFACTURERS.join(", ")
                ),
            ));
            return None;
        }
        Some(value.to_string())
    }

    fn validate_model(
        &self,
        raw: &RawPredictionRequest,
        manufacturer: Option<&str>,
        issues: &mut Vec<FieldIssue>,
    ) -> Option<String> {
        let Some(value) = raw.model.as_deref().map(str::trim) else {
            issues.push(FieldIssue::new("model", MISSING));
            return None;
        };
        if !schema::is_known_model(value) {
            issues.push(FieldIssue::new(
                "model",
                format!("unknown model \"{value}\""),
            ));
            return None;
        }
        // Cross-field check: the model must belong to the manufacturer.
        if let Some(manufacturer) = manufacturer {
            match schema::models_for(manufacturer) {
                Some(models) if !models.contains(&value) => {
                    issues.push(FieldIssue::new(
                        "model",
                        format!(
                            "\"{}\" is not a {} model; expected one of {}",
                            value,
                            manufacturer,
                            models.join(", ")
                        ),
                    ));
                    return None;
                }
                _ => {}
            }
        }
        Some(value.to_string())
    }

    fn validate_fuel_type(
        &self,
        raw: &RawPredictionRequest,
        issues: &mut Vec<FieldIssue>,
    ) -> Option<String> {
        let Some(value) = raw.fuel_type.as_deref().map(str::trim) else {
            issues.push(FieldIssue::new("fuel_type", MISSING));
            return None;
        };
        if !schema::is_known_fuel_type(value) {
            issues.push(FieldIssue::new(
                "fuel_type",
                format!(
                    "unknown fuel type \"{}\"; expected one of {}",
                    value,
                    schema::FUEL_TYPES.join(", ")
                ),
            ));
            return None;
        }
        Some(value.to_string())
    }

    fn validate_engine_size(
        &self,
        raw: &RawPredictionRequest,
        issues: &mut Vec<FieldIssue>,
    ) -> Option<f64> {
        let Some(value) = raw.engine_size else {
            issues.push(FieldIssue::new("engine_size", MISSING));
            return None;
        };
        if !value.is_finite() || value <= 0.0 {
            issues.push(FieldIssue::new(
                "engine_size",
                format!("must be greater than 0, got {value}"),
            ));
            return None;
        }
        if value > schema::MAX_ENGINE_SIZE {
            issues.push(FieldIssue::new(
                "engine_size",
                format!(
                    "must be at most {} litres, got {value}",
                    schema::MAX_ENGINE_SIZE
                ),
            ));
            return None;
        }
        Some(value)
    }

    fn validate_year(
        &self,
        raw: &RawPredictionRequest,
        issues: &mut Vec<FieldIssue>,
    ) -> Option<i32> {
        let Some(value) = raw.year_of_manufacture else {
            issues.push(FieldIssue::new("year_of_manufacture", MISSING));
            return None;
        };
        if value < schema::MIN_YEAR || value > self.reference_year {
            issues.push(FieldIssue::new(
                "year_of_manufacture",
                format!(
                    "must be between {} and {}, got {value}",
                    schema::MIN_YEAR,
                    self.reference_year
                ),
            ));
            return None;
        }
        Some(value)
    }

    fn validate_mileage(
        &self,
        raw: &RawPredictionRequest,
        issues: &mut Vec<FieldIssue>,
    ) -> Option<f64> {
        let Some(value) = raw.mileage else {
            issues.push(FieldIssue::new("mileage", MISSING));
            return None;
        };
        if !value.is_finite() || value < 0.0 {
            issues.push(FieldIssue::new(
                "mileage",
                format!("must not be negative, got {value}"),
            ));
            return None;
        }
        if value > schema::MAX_MILEAGE {
            issues.push(FieldIssue::new(
                "mileage",
                format!("must be at most {}, got {value}", schema::MAX_MILEAGE),
            ));
            return None;
        }
        Some(value)
    }
}
