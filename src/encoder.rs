//! Feature encoding for car price model inference.
//!
//! Converts a validated request into the exact ordered numeric vector the
//! artifact expects: raw numerics, derived features, then one-hot encoded
//! categoricals aligned to the training categories. Order matches
//! [`crate::schema::feature_columns`].

use crate::error::{Result, ServiceError};
use crate::schema;
use crate::types::request::CarFeatures;

/// Derived features computed from a validated request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedFeatures {
    /// Years since manufacture, clamped at 0
    pub age: i32,
    /// Mileage divided by age (age floored at 1 to avoid division by zero)
    pub mileage_per_year: f64,
    /// Whether the car's age reaches the vintage threshold
    pub vintage: bool,
}

/// Encoder that transforms validated requests into model input vectors.
///
/// Derived-feature thresholds come from configuration; the column order and
/// category alignment come from the fixed schema.
#[derive(Debug, Clone)]
pub struct FeatureEncoder {
    reference_year: i32,
    vintage_age_years: i32,
}

impl FeatureEncoder {
    pub fn new(reference_year: i32, vintage_age_years: i32) -> Self {
        Self {
            reference_year,
            vintage_age_years,
        }
    }

    /// Compute the derived features for a request
    pub fn derive(&self, car: &CarFeatures) -> DerivedFeatures {
        let age = (self.reference_year - car.year_of_manufacture).max(0);
        let mileage_per_year = car.mileage / f64::from(age.max(1));
        DerivedFeatures {
            age,
            mileage_per_year,
            vintage: age >= self.vintage_age_years,
        }
    }

    /// Encode a validated request into the model input vector.
    ///
    /// Returns exactly [`schema::FEATURE_COUNT`] values. A category missing
    /// from the schema is an error; encoding it as all zeros would silently
    /// corrupt the prediction.
    pub fn encode(&self, car: &CarFeatures) -> Result<Vec<f32>> {
        let derived = self.derive(car);

        let mut features = Vec::with_capacity(schema::FEATURE_COUNT);

        // Numerics, in NUMERIC_FEATURES order
        features.push(car.engine_size as f32);
        features.push(car.year_of_manufacture as f32);
        features.push(car.mileage as f32);
        features.push(derived.age as f32);
        features.push(derived.mileage_per_year as f32);
        features.push(if derived.vintage { 1.0 } else { 0.0 });

        // One-hot categoricals, aligned to the training categories
        push_one_hot(
            &mut features,
            &schema::MANUFACTURERS,
            &car.manufacturer,
            "manufacturer",
        )?;
        push_one_hot(&mut features, &schema::MODELS, &car.model, "model")?;
        push_one_hot(
            &mut features,
            &schema::FUEL_TYPES,
            &car.fuel_type,
            "fuel_type",
        )?;

        debug_assert_eq!(features.len(), schema::FEATURE_COUNT);
        Ok(features)
    }

    /// Length of the vectors this encoder produces
    pub fn feature_count(&self) -> usize {
        schema::FEATURE_COUNT
    }

    /// Reference year used for the age feature
    pub fn reference_year(&self) -> i32 {
        self.reference_year
    }
}

fn push_one_hot(
    features: &mut Vec<f32>,
    categories: &[&str],
    value: &str,
    field: &str,
) -> Result<()> {
    let Some(position) = categories.iter().position(|c| *c == value) else {
        return Err(ServiceError::validation(
            field,
            format!("value \"{value}\" is not a category the model was trained on"),
        ));
    };
    for i in 0..categories.len() {
        features.push(if i == position { 1.0 } else { 0.0 });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoder() -> FeatureEncoder {
        FeatureEncoder::new(2025, 20)
    }

    fn rav4() -> CarFeatures {
        CarFeatures::new("Toyota", "RAV4", "Hybrid", 2.5, 2020, 30_000.0)
    }

    #[test]
    fn test_vector_length() {
        let features = encoder().encode(&rav4()).unwrap();
        assert_eq!(features.len(), schema::FEATURE_COUNT);
        assert_eq!(features.len(), encoder().feature_count());
    }

    #[test]
    fn test_numeric_and_derived_values() {
        // Reference year 2025: age 5, mileage_per_year 6000, not vintage.
        let features = encoder().encode(&rav4()).unwrap();
        assert_eq!(features[0], 2.5); // engine_size
        assert_eq!(features[1], 2020.0); // year_of_manufacture
        assert_eq!(features[2], 30_000.0); // mileage
        assert_eq!(features[3], 5.0); // age
        assert_eq!(features[4], 6_000.0); // mileage_per_year
        assert_eq!(features[5], 0.0); // vintage
    }

    #[test]
    fn test_one_hot_positions() {
        let features = encoder().encode(&rav4()).unwrap();

        // Manufacturer block: Toyota is index 3 of [BMW, Ford, Porsche, Toyota, VW].
        let manufacturer = &features[6..11];
        assert_eq!(manufacturer, &[0.0, 0.0, 0.0, 1.0, 0.0]);
        assert_eq!(manufacturer.iter().sum::<f32>(), 1.0);

        // Model block: exactly one hot.
        let model = &features[11..26];
        assert_eq!(model.iter().sum::<f32>(), 1.0);
        let rav4_pos = schema::MODELS.iter().position(|m| *m == "RAV4").unwrap();
        assert_eq!(model[rav4_pos], 1.0);

        // Fuel block: Hybrid is index 1 of [Diesel, Hybrid, Petrol].
        let fuel = &features[26..29];
        assert_eq!(fuel, &[0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_age_clamped_at_zero() {
        let current_year_car = CarFeatures::new("VW", "Golf", "Petrol", 1.5, 2025, 100.0);
        let derived = encoder().derive(&current_year_car);
        assert_eq!(derived.age, 0);
        // Age floored at 1 for the ratio, so mileage_per_year == mileage.
        assert_eq!(derived.mileage_per_year, 100.0);
    }

    #[test]
    fn test_vintage_threshold() {
        let e = encoder();
        let at_threshold = CarFeatures::new("Porsche", "911", "Petrol", 3.0, 2005, 80_000.0);
        assert!(e.derive(&at_threshold).vintage);

        let just_under = CarFeatures::new("Porsche", "911", "Petrol", 3.0, 2006, 80_000.0);
        assert!(!e.derive(&just_under).vintage);
    }

    #[test]
    fn test_vintage_threshold_is_configurable() {
        let e = FeatureEncoder::new(2025, 30);
        let car = CarFeatures::new("Porsche", "911", "Petrol", 3.0, 2005, 80_000.0);
        assert!(!e.derive(&car).vintage);
    }

    #[test]
    fn test_unseen_category_rejected_not_zero_filled() {
        let car = CarFeatures::new("Tesla", "RAV4", "Hybrid", 2.5, 2020, 30_000.0);
        let err = encoder().encode(&car).unwrap_err();
        match err {
            ServiceError::Validation(issues) => {
                assert_eq!(issues[0].field, "manufacturer");
                assert!(issues[0].reason.contains("Tesla"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_column_order_matches_schema() {
        // The encoder and the published column list must agree on layout.
        let columns = schema::feature_columns();
        assert_eq!(columns[0], "engine_size");
        assert_eq!(columns[5], "vintage");
        assert_eq!(columns[6], "manufacturer=BMW");
        assert_eq!(columns[26], "fuel_type=Diesel");
        assert_eq!(columns.len(), encoder().feature_count());
    }
}
