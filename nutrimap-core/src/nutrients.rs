//! The fixed nutrient schema: which USDA columns feed which output field, and
//! the FDA daily reference values for a 2,000 calorie diet.

use serde::{Deserialize, Serialize};

use crate::types::NutrientRecord;

/// Primary sugar column. Falls back to [`SUGAR_TOTAL_KEY`] when absent or zero.
pub const SUGAR_KEY: &str = "Sugar (g)";
pub const SUGAR_TOTAL_KEY: &str = "Sugar Tot (g)";
pub const ADDED_SUGARS_KEY: &str = "Added Sugars (g)";
/// Vitamin D column. Some snapshots carry the mis-encoded `Âµg` spelling.
pub const VITAMIN_D_KEY: &str = "Vit D (µg)";
pub const VITAMIN_D_LEGACY_KEY: &str = "Vit D (Âµg)";

/// One of the fifteen nutrients reported in nutrition facts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Nutrient {
    Calories,
    Protein,
    Carbohydrates,
    Fat,
    SaturatedFat,
    TransFat,
    Cholesterol,
    Sodium,
    Fiber,
    Sugars,
    AddedSugars,
    VitaminD,
    Calcium,
    Iron,
    Potassium,
}

impl Nutrient {
    /// All nutrients, in output order.
    pub const ALL: [Nutrient; 15] = [
        Nutrient::Calories,
        Nutrient::Protein,
        Nutrient::Carbohydrates,
        Nutrient::Fat,
        Nutrient::SaturatedFat,
        Nutrient::TransFat,
        Nutrient::Cholesterol,
        Nutrient::Sodium,
        Nutrient::Fiber,
        Nutrient::Sugars,
        Nutrient::AddedSugars,
        Nutrient::VitaminD,
        Nutrient::Calcium,
        Nutrient::Iron,
        Nutrient::Potassium,
    ];

    /// Output field name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Nutrient::Calories => "calories",
            Nutrient::Protein => "protein",
            Nutrient::Carbohydrates => "carbohydrates",
            Nutrient::Fat => "fat",
            Nutrient::SaturatedFat => "saturatedFat",
            Nutrient::TransFat => "transFat",
            Nutrient::Cholesterol => "cholesterol",
            Nutrient::Sodium => "sodium",
            Nutrient::Fiber => "fiber",
            Nutrient::Sugars => "sugars",
            Nutrient::AddedSugars => "addedSugars",
            Nutrient::VitaminD => "vitaminD",
            Nutrient::Calcium => "calcium",
            Nutrient::Iron => "iron",
            Nutrient::Potassium => "potassium",
        }
    }

    /// Unit the snapshot column is expressed in.
    pub fn unit(&self) -> &'static str {
        match self {
            Nutrient::Calories => "kcal",
            Nutrient::Cholesterol
            | Nutrient::Sodium
            | Nutrient::Calcium
            | Nutrient::Iron
            | Nutrient::Potassium => "mg",
            Nutrient::VitaminD => "µg",
            _ => "g",
        }
    }

    /// Snapshot columns read for this nutrient, in lookup order.
    pub fn source_keys(&self) -> &'static [&'static str] {
        match self {
            Nutrient::Calories => &["Energ Kcal"],
            Nutrient::Protein => &["Protein (g)"],
            Nutrient::Carbohydrates => &["Carbohydrt (g)"],
            Nutrient::Fat => &["Lipid Tot (g)"],
            Nutrient::SaturatedFat => &["FA Sat (g)"],
            Nutrient::TransFat => &["FA_Trans (g)"],
            Nutrient::Cholesterol => &["Cholestrl (mg)"],
            Nutrient::Sodium => &["Sodium (mg)"],
            Nutrient::Fiber => &["Fiber TD (g)"],
            Nutrient::Sugars => &[SUGAR_KEY, SUGAR_TOTAL_KEY],
            Nutrient::AddedSugars => &[ADDED_SUGARS_KEY],
            Nutrient::VitaminD => &[VITAMIN_D_KEY, VITAMIN_D_LEGACY_KEY],
            Nutrient::Calcium => &["Calcium (mg)"],
            Nutrient::Iron => &["Iron (mg)"],
            Nutrient::Potassium => &["Potassium (mg)"],
        }
    }

    /// FDA daily reference value, if the nutrient has one.
    pub fn daily_reference(&self) -> Option<f64> {
        match self {
            Nutrient::Fat => Some(78.0),
            Nutrient::SaturatedFat => Some(20.0),
            Nutrient::Cholesterol => Some(300.0),
            Nutrient::Sodium => Some(2300.0),
            Nutrient::Carbohydrates => Some(275.0),
            Nutrient::Fiber => Some(28.0),
            Nutrient::AddedSugars => Some(50.0),
            Nutrient::Protein => Some(50.0),
            Nutrient::VitaminD => Some(20.0),
            Nutrient::Calcium => Some(1300.0),
            Nutrient::Iron => Some(18.0),
            Nutrient::Potassium => Some(4700.0),
            Nutrient::Calories | Nutrient::TransFat | Nutrient::Sugars => None,
        }
    }

    /// Per-100g amount stored in `record`, or `None` when the record has no
    /// value for it.
    pub fn per_100g(&self, record: &NutrientRecord) -> Option<f64> {
        match self {
            Nutrient::Sugars => match record.value(SUGAR_KEY) {
                Some(v) if v != 0.0 => Some(v),
                primary => record.value(SUGAR_TOTAL_KEY).or(primary),
            },
            _ => self.source_keys().iter().find_map(|key| record.value(key)),
        }
    }
}

impl std::fmt::Display for Nutrient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Round to two decimal places, ties to even.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Percent of the daily reference, rounded to two decimals.
///
/// A zero reference yields 0.0 rather than dividing by zero.
pub fn calc_daily(amount: f64, reference: f64) -> f64 {
    if reference == 0.0 {
        return 0.0;
    }
    round2(amount / reference * 100.0)
}

/// Totals for the fifteen reported nutrients.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutrientTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbohydrates: f64,
    pub fat: f64,
    pub saturated_fat: f64,
    pub trans_fat: f64,
    pub cholesterol: f64,
    pub sodium: f64,
    pub fiber: f64,
    pub sugars: f64,
    /// Absent unless some source record carried the column.
    pub added_sugars: Option<f64>,
    #[serde(rename = "vitaminD")]
    pub vitamin_d: f64,
    pub calcium: f64,
    pub iron: f64,
    pub potassium: f64,
}

impl NutrientTotals {
    /// Current total for `nutrient`. Only added sugars can be absent.
    pub fn get(&self, nutrient: Nutrient) -> Option<f64> {
        match self.slot(nutrient) {
            Some(total) => Some(*total),
            None => self.added_sugars,
        }
    }

    /// Add `amount` to the running total for `nutrient`.
    pub fn add(&mut self, nutrient: Nutrient, amount: f64) {
        match self.slot_mut(nutrient) {
            Some(total) => *total += amount,
            None => self.added_sugars = Some(self.added_sugars.unwrap_or(0.0) + amount),
        }
    }

    /// Copy with every total rounded to two decimals.
    pub fn rounded(&self) -> Self {
        let mut out = self.clone();
        for nutrient in Nutrient::ALL {
            if let Some(total) = out.slot_mut(nutrient) {
                *total = round2(*total);
            }
        }
        out.added_sugars = self.added_sugars.map(round2);
        out
    }

    fn slot(&self, nutrient: Nutrient) -> Option<&f64> {
        Some(match nutrient {
            Nutrient::Calories => &self.calories,
            Nutrient::Protein => &self.protein,
            Nutrient::Carbohydrates => &self.carbohydrates,
            Nutrient::Fat => &self.fat,
            Nutrient::SaturatedFat => &self.saturated_fat,
            Nutrient::TransFat => &self.trans_fat,
            Nutrient::Cholesterol => &self.cholesterol,
            Nutrient::Sodium => &self.sodium,
            Nutrient::Fiber => &self.fiber,
            Nutrient::Sugars => &self.sugars,
            Nutrient::VitaminD => &self.vitamin_d,
            Nutrient::Calcium => &self.calcium,
            Nutrient::Iron => &self.iron,
            Nutrient::Potassium => &self.potassium,
            Nutrient::AddedSugars => return None,
        })
    }

    fn slot_mut(&mut self, nutrient: Nutrient) -> Option<&mut f64> {
        Some(match nutrient {
            Nutrient::Calories => &mut self.calories,
            Nutrient::Protein => &mut self.protein,
            Nutrient::Carbohydrates => &mut self.carbohydrates,
            Nutrient::Fat => &mut self.fat,
            Nutrient::SaturatedFat => &mut self.saturated_fat,
            Nutrient::TransFat => &mut self.trans_fat,
            Nutrient::Cholesterol => &mut self.cholesterol,
            Nutrient::Sodium => &mut self.sodium,
            Nutrient::Fiber => &mut self.fiber,
            Nutrient::Sugars => &mut self.sugars,
            Nutrient::VitaminD => &mut self.vitamin_d,
            Nutrient::Calcium => &mut self.calcium,
            Nutrient::Iron => &mut self.iron,
            Nutrient::Potassium => &mut self.potassium,
            Nutrient::AddedSugars => return None,
        })
    }
}

/// Percent-of-daily-value figures for the twelve nutrients with a reference.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyValues {
    #[serde(rename = "fatDailyValue")]
    pub fat: f64,
    #[serde(rename = "saturatedFatDailyValue")]
    pub saturated_fat: f64,
    #[serde(rename = "cholesterolDailyValue")]
    pub cholesterol: f64,
    #[serde(rename = "sodiumDailyValue")]
    pub sodium: f64,
    #[serde(rename = "carbohydratesDailyValue")]
    pub carbohydrates: f64,
    #[serde(rename = "fiberDailyValue")]
    pub fiber: f64,
    /// Absent when the added sugars total is absent or zero.
    #[serde(rename = "addedSugarsDailyValue")]
    pub added_sugars: Option<f64>,
    #[serde(rename = "proteinDailyValue")]
    pub protein: f64,
    #[serde(rename = "vitaminDDailyValue")]
    pub vitamin_d: f64,
    #[serde(rename = "calciumDailyValue")]
    pub calcium: f64,
    #[serde(rename = "ironDailyValue")]
    pub iron: f64,
    #[serde(rename = "potassiumDailyValue")]
    pub potassium: f64,
}

impl DailyValues {
    /// Compute percentages from unrounded totals.
    pub fn from_totals(totals: &NutrientTotals) -> Self {
        let pct = |nutrient: Nutrient, amount: f64| {
            calc_daily(amount, nutrient.daily_reference().unwrap_or(0.0))
        };
        Self {
            fat: pct(Nutrient::Fat, totals.fat),
            saturated_fat: pct(Nutrient::SaturatedFat, totals.saturated_fat),
            cholesterol: pct(Nutrient::Cholesterol, totals.cholesterol),
            sodium: pct(Nutrient::Sodium, totals.sodium),
            carbohydrates: pct(Nutrient::Carbohydrates, totals.carbohydrates),
            fiber: pct(Nutrient::Fiber, totals.fiber),
            added_sugars: totals
                .added_sugars
                .filter(|v| *v != 0.0)
                .map(|v| pct(Nutrient::AddedSugars, v)),
            protein: pct(Nutrient::Protein, totals.protein),
            vitamin_d: pct(Nutrient::VitaminD, totals.vitamin_d),
            calcium: pct(Nutrient::Calcium, totals.calcium),
            iron: pct(Nutrient::Iron, totals.iron),
            potassium: pct(Nutrient::Potassium, totals.potassium),
        }
    }

    /// Percentage for one nutrient. `None` for nutrients without a daily
    /// reference, and for added sugars when absent.
    pub fn get(&self, nutrient: Nutrient) -> Option<f64> {
        match nutrient {
            Nutrient::Fat => Some(self.fat),
            Nutrient::SaturatedFat => Some(self.saturated_fat),
            Nutrient::Cholesterol => Some(self.cholesterol),
            Nutrient::Sodium => Some(self.sodium),
            Nutrient::Carbohydrates => Some(self.carbohydrates),
            Nutrient::Fiber => Some(self.fiber),
            Nutrient::AddedSugars => self.added_sugars,
            Nutrient::Protein => Some(self.protein),
            Nutrient::VitaminD => Some(self.vitamin_d),
            Nutrient::Calcium => Some(self.calcium),
            Nutrient::Iron => Some(self.iron),
            Nutrient::Potassium => Some(self.potassium),
            Nutrient::Calories | Nutrient::TransFat | Nutrient::Sugars => None,
        }
    }
}
