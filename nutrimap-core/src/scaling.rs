//! Single-ingredient nutrition facts, scaled to a serving or to 100 g.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::NutritionError;
use crate::nutrients::{Nutrient, NutrientTotals};
use crate::table::NutrientTable;
use crate::types::{NutrientRecord, NutritionFacts};

/// Serving size label used for per-100g output.
pub const PER_100G_LABEL: &str = "100g";

/// Basis for single-ingredient scaling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Measurement {
    /// One stored portion of the ingredient.
    #[default]
    #[serde(rename = "serving")]
    Serving,
    #[serde(rename = "100g")]
    Per100g,
}

impl Measurement {
    pub fn as_str(&self) -> &'static str {
        match self {
            Measurement::Serving => "serving",
            Measurement::Per100g => PER_100G_LABEL,
        }
    }

    /// Multiplier applied to per-100g values.
    pub fn factor(&self, record: &NutrientRecord) -> f64 {
        match self {
            Measurement::Serving => record.portion_weight_grams / 100.0,
            Measurement::Per100g => 1.0,
        }
    }
}

impl FromStr for Measurement {
    type Err = NutritionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "serving" => Ok(Measurement::Serving),
            "100g" => Ok(Measurement::Per100g),
            other => Err(NutritionError::InvalidInput(format!(
                "measurement must be 'serving' or '100g', got '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for Measurement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Nutrition facts for one ingredient.
///
/// # Errors
///
/// Returns [`NutritionError::NotFound`] if `ingredient_id` is not in the table.
pub fn nutrition_for(
    table: &NutrientTable,
    ingredient_id: &str,
    measurement: Measurement,
) -> Result<NutritionFacts, NutritionError> {
    let record = table
        .get(ingredient_id)
        .ok_or_else(|| NutritionError::NotFound(ingredient_id.to_string()))?;
    Ok(scale_record(record, measurement))
}

/// Scale one record. Added sugars stay absent when the record lacks them.
pub fn scale_record(record: &NutrientRecord, measurement: Measurement) -> NutritionFacts {
    let factor = measurement.factor(record);
    let mut totals = NutrientTotals::default();
    for nutrient in Nutrient::ALL {
        match (nutrient, nutrient.per_100g(record)) {
            (Nutrient::AddedSugars, None) => {}
            (_, value) => totals.add(nutrient, value.unwrap_or(0.0) * factor),
        }
    }

    let serving_size = match measurement {
        Measurement::Serving => record.portion_description.clone(),
        Measurement::Per100g => PER_100G_LABEL.to_string(),
    };

    NutritionFacts {
        ingredient_name: Some(record.ingredient_name.clone()),
        totals: totals.rounded(),
        daily_values: None,
        serving_size,
    }
}
