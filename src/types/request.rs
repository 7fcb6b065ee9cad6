//! Prediction request structures

use serde::{Deserialize, Serialize};

/// A prediction request exactly as received, before validation.
///
/// Every field is optional so that the validator can name each missing
/// field instead of surfacing a single opaque deserialization error.
/// The training-data column names ("Engine size", "Year of manufacture", ...)
/// are accepted as aliases.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawPredictionRequest {
    #[serde(default, alias = "Manufacturer")]
    pub manufacturer: Option<String>,

    #[serde(default, alias = "Model")]
    pub model: Option<String>,

    #[serde(default, alias = "Fuel type", alias = "Fuel_type")]
    pub fuel_type: Option<String>,

    #[serde(default, alias = "Engine size", alias = "Engine_size")]
    pub engine_size: Option<f64>,

    #[serde(default, alias = "Year of manufacture", alias = "Year_of_manufacture")]
    pub year_of_manufacture: Option<i32>,

    #[serde(default, alias = "Mileage")]
    pub mileage: Option<f64>,
}

/// A validated, normalized prediction request.
///
/// Strings are trimmed and guaranteed to be known categories; numerics are
/// guaranteed in range. Request-scoped: built, encoded, then discarded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarFeatures {
    pub manufacturer: String,
    pub model: String,
    pub fuel_type: String,
    pub engine_size: f64,
    pub year_of_manufacture: i32,
    pub mileage: f64,
}

impl CarFeatures {
    pub fn new(
        manufacturer: impl Into<String>,
        model: impl Into<String>,
        fuel_type: impl Into<String>,
        engine_size: f64,
        year_of_manufacture: i32,
        mileage: f64,
    ) -> Self {
        Self {
            manufacturer: manufacturer.into(),
            model: model.into(),
            fuel_type: fuel_type.into(),
            engine_size,
            year_of_manufacture,
            mileage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_snake_case() {
        let raw: RawPredictionRequest = serde_json::from_str(
            r#"{
                "manufacturer": "Toyota",
                "model": "RAV4",
                "fuel_type": "Hybrid",
                "engine_size": 2.5,
                "year_of_manufacture": 2020,
                "mileage": 30000
            }"#,
        )
        .unwrap();

        assert_eq!(raw.manufacturer.as_deref(), Some("Toyota"));
        assert_eq!(raw.engine_size, Some(2.5));
        assert_eq!(raw.year_of_manufacture, Some(2020));
    }

    #[test]
    fn test_deserialize_training_column_aliases() {
        let raw: RawPredictionRequest = serde_json::from_str(
            r#"{
                "Manufacturer": "Ford",
                "Model": "Fiesta",
                "Fuel type": "Petrol",
                "Engine size": 1.0,
                "Year of manufacture": 2015,
                "Mileage": 62000.0
            }"#,
        )
        .unwrap();

        assert_eq!(raw.manufacturer.as_deref(), Some("Ford"));
        assert_eq!(raw.fuel_type.as_deref(), Some("Petrol"));
        assert_eq!(raw.engine_size, Some(1.0));
        assert_eq!(raw.mileage, Some(62000.0));
    }

    #[test]
    fn test_missing_fields_deserialize_to_none() {
        let raw: RawPredictionRequest =
            serde_json::from_str(r#"{"manufacturer": "BMW"}"#).unwrap();
        assert_eq!(raw.manufacturer.as_deref(), Some("BMW"));
        assert!(raw.model.is_none());
        assert!(raw.mileage.is_none());
    }
}
