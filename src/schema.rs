//! Fixed feature schema for the car price model.
//!
//! The categorical values and column order mirror the preprocessing the
//! artifact was trained with. One-hot categories are listed in sorted order,
//! the way the training preprocessor emitted them; changing anything here
//! without retraining the model silently corrupts predictions.

use serde::Serialize;

/// Manufacturers the model was trained on (sorted)
pub const MANUFACTURERS: [&str; 5] = ["BMW", "Ford", "Porsche", "Toyota", "VW"];

/// Car models the model was trained on (sorted across all manufacturers)
pub const MODELS: [&str; 15] = [
    "718 Cayman",
    "911",
    "Cayenne",
    "Fiesta",
    "Focus",
    "Golf",
    "M5",
    "Mondeo",
    "Passat",
    "Polo",
    "Prius",
    "RAV4",
    "X3",
    "Yaris",
    "Z4",
];

/// Fuel types the model was trained on (sorted)
pub const FUEL_TYPES: [&str; 3] = ["Diesel", "Hybrid", "Petrol"];

/// Which models belong to which manufacturer (cascading dropdown constraint)
pub const MODELS_BY_MANUFACTURER: [(&str, &[&str]); 5] = [
    ("BMW", &["M5", "X3", "Z4"]),
    ("Ford", &["Fiesta", "Focus", "Mondeo"]),
    ("Porsche", &["718 Cayman", "911", "Cayenne"]),
    ("Toyota", &["Prius", "RAV4", "Yaris"]),
    ("VW", &["Golf", "Passat", "Polo"]),
];

/// Numeric features in vector order: the raw inputs followed by the
/// derived features
pub const NUMERIC_FEATURES: [&str; 6] = [
    "engine_size",
    "year_of_manufacture",
    "mileage",
    "age",
    "mileage_per_year",
    "vintage",
];

/// Total feature vector length: numerics + one-hot manufacturer, model, fuel
pub const FEATURE_COUNT: usize =
    NUMERIC_FEATURES.len() + MANUFACTURERS.len() + MODELS.len() + FUEL_TYPES.len();

/// Earliest accepted year of manufacture
pub const MIN_YEAR: i32 = 1980;

/// Largest accepted engine size in litres
pub const MAX_ENGINE_SIZE: f64 = 10.0;

/// Largest accepted mileage
pub const MAX_MILEAGE: f64 = 1_000_000.0;

/// Engine size options suggested to clients via the metadata endpoint
pub const ENGINE_SIZE_OPTIONS: [f64; 17] = [
    0.8, 1.0, 1.2, 1.4, 1.5, 1.6, 1.8, 2.0, 2.2, 2.4, 2.5, 2.7, 3.0, 3.5, 4.0, 4.5, 5.0,
];

/// Mileage options suggested to clients via the metadata endpoint
pub const MILEAGE_OPTIONS: [u32; 22] = [
    0, 5_000, 10_000, 15_000, 20_000, 25_000, 30_000, 35_000, 40_000, 45_000, 50_000, 60_000,
    70_000, 80_000, 90_000, 100_000, 120_000, 150_000, 180_000, 200_000, 250_000, 300_000,
];

/// Models belonging to a manufacturer, if the manufacturer is known
pub fn models_for(manufacturer: &str) -> Option<&'static [&'static str]> {
    MODELS_BY_MANUFACTURER
        .iter()
        .find(|(name, _)| *name == manufacturer)
        .map(|(_, models)| *models)
}

pub fn is_known_manufacturer(manufacturer: &str) -> bool {
    MANUFACTURERS.contains(&manufacturer)
}

pub fn is_known_model(model: &str) -> bool {
    MODELS.contains(&model)
}

pub fn is_known_fuel_type(fuel_type: &str) -> bool {
    FUEL_TYPES.contains(&fuel_type)
}

/// Full feature column names in vector order
pub fn feature_columns() -> Vec<String> {
    let mut columns: Vec<String> = NUMERIC_FEATURES.iter().map(|s| s.to_string()).collect();
    columns.extend(MANUFACTURERS.iter().map(|m| format!("manufacturer={m}")));
    columns.extend(MODELS.iter().map(|m| format!("model={m}")));
    columns.extend(FUEL_TYPES.iter().map(|f| format!("fuel_type={f}")));
    columns
}

/// Description of one accepted request field, served by the metadata endpoint
#[derive(Debug, Clone, Serialize)]
pub struct FieldSpec {
    /// Field name
    pub name: &'static str,
    /// JSON type of the field
    #[serde(rename = "type")]
    pub json_type: &'static str,
    /// Allowed values for categorical fields
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<&'static str>>,
    /// Lower bound for numeric fields
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Upper bound for numeric fields (the year maximum is the configured
    /// reference year, so it is reported separately)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

/// Specs for every accepted request field
pub fn field_specs(reference_year: i32) -> Vec<FieldSpec> {
    vec![
        FieldSpec {
            name: "manufacturer",
            json_type: "string",
            allowed: Some(MANUFACTURERS.to_vec()),
            min: None,
            max: None,
        },
        FieldSpec {
            name: "model",
            json_type: "string",
            allowed: Some(MODELS.to_vec()),
            min: None,
            max: None,
        },
        FieldSpec {
            name: "fuel_type",
            json_type: "string",
            allowed: Some(FUEL_TYPES.to_vec()),
            min: None,
            max: None,
        },
        FieldSpec {
            name: "engine_size",
            json_type: "number",
            allowed: None,
            min: Some(0.0),
            max: Some(MAX_ENGINE_SIZE),
        },
        FieldSpec {
            name: "year_of_manufacture",
            json_type: "integer",
            allowed: None,
            min: Some(MIN_YEAR as f64),
            max: Some(reference_year as f64),
        },
        FieldSpec {
            name: "mileage",
            json_type: "number",
            allowed: None,
            min: Some(0.0),
            max: Some(MAX_MILEAGE),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_count() {
        assert_eq!(FEATURE_COUNT, 29);
        assert_eq!(feature_columns().len(), FEATURE_COUNT);
    }

    #[test]
    fn test_models_by_manufacturer_covers_all_models() {
        let mut from_map: Vec<&str> = MODELS_BY_MANUFACTURER
            .iter()
            .flat_map(|(_, models)| models.iter().copied())
            .collect();
        from_map.sort();
        assert_eq!(from_map, MODELS.to_vec());
    }

    #[test]
    fn test_models_for() {
        assert_eq!(models_for("Toyota"), Some(&["Prius", "RAV4", "Yaris"][..]));
        assert_eq!(models_for("Lada"), None);
    }

    #[test]
    fn test_category_lookups() {
        assert!(is_known_manufacturer("BMW"));
        assert!(!is_known_manufacturer("bmw"));
        assert!(is_known_model("718 Cayman"));
        assert!(is_known_fuel_type("Hybrid"));
        assert!(!is_known_fuel_type("Electric"));
    }

    #[test]
    fn test_categories_are_sorted() {
        let mut sorted = MODELS.to_vec();
        sorted.sort();
        assert_eq!(sorted, MODELS.to_vec());

        let mut sorted = MANUFACTURERS.to_vec();
        sorted.sort();
        assert_eq!(sorted, MANUFACTURERS.to_vec());
    }

    #[test]
    fn test_field_specs() {
        let specs = field_specs(2025);
        assert_eq!(specs.len(), 6);
        let year = specs
            .iter()
            .find(|s| s.name == "year_of_manufacture")
            .unwrap();
        assert_eq!(year.max, Some(2025.0));
    }
}
