//! Data models shared by the mapping pipeline, the nutrition engine and the
//! HTTP surface.
//!
//! Field names on the wire follow the JSON shapes clients already consume
//! (`best_usda_name`, `ingredientId`, `amountInGrams`, ...), so most structs
//! carry serde renames.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::nutrients::{DailyValues, NutrientTotals};

/// Portion weight assumed when a snapshot record does not carry one.
pub const DEFAULT_PORTION_WEIGHT_GRAMS: f64 = 100.0;

/// Amount assumed for a recipe line item that omits `amountInGrams`.
pub const DEFAULT_AMOUNT_GRAMS: f64 = 100.0;

/// One USDA food record, with nutrient amounts stored per 100 g.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NutrientRecord {
    /// Unique key of the record. Filled from the snapshot map key on load.
    #[serde(rename = "ingredientId", default)]
    pub ingredient_id: String,
    #[serde(rename = "ingredientName", default)]
    pub ingredient_name: String,
    /// Human readable serving, e.g. "1 cup, chopped".
    #[serde(rename = "portionDescription", default)]
    pub portion_description: String,
    #[serde(rename = "portionWeight", default = "default_portion_weight")]
    pub portion_weight_grams: f64,
    /// Raw nutrient columns keyed by their USDA column name. `None` means the
    /// column exists in the snapshot but holds no value.
    #[serde(default)]
    pub nutrients: HashMap<String, Option<f64>>,
}

fn default_portion_weight() -> f64 {
    DEFAULT_PORTION_WEIGHT_GRAMS
}

impl NutrientRecord {
    pub fn new(ingredient_id: impl Into<String>, ingredient_name: impl Into<String>) -> Self {
        Self {
            ingredient_id: ingredient_id.into(),
            ingredient_name: ingredient_name.into(),
            portion_description: String::new(),
            portion_weight_grams: DEFAULT_PORTION_WEIGHT_GRAMS,
            nutrients: HashMap::new(),
        }
    }

    /// Builder: set the serving descriptor and its weight in grams.
    pub fn with_portion(mut self, description: impl Into<String>, weight_grams: f64) -> Self {
        self.portion_description = description.into();
        self.portion_weight_grams = weight_grams;
        self
    }

    /// Builder: set a raw nutrient column.
    pub fn with_nutrient(mut self, key: impl Into<String>, value: f64) -> Self {
        self.nutrients.insert(key.into(), Some(value));
        self
    }

    /// Value of a raw column, treating an explicit null as absent.
    pub fn value(&self, key: &str) -> Option<f64> {
        self.nutrients.get(key).copied().flatten()
    }
}

/// A single nearest-neighbor hit as returned by the vector index.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMatch {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
}

impl RawMatch {
    /// The `ingredientName` metadata field, if present and a string.
    pub fn ingredient_name(&self) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|m| m.get("ingredientName"))
            .and_then(|v| v.as_str())
    }
}

/// A ranked candidate mapping for one piece of input text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MappingCandidate {
    #[serde(rename = "input")]
    pub input_text: String,
    #[serde(rename = "best_usda_name")]
    pub matched_name: Option<String>,
    #[serde(rename = "score")]
    pub similarity_score: f64,
    #[serde(rename = "ingredientId")]
    pub ingredient_id: Option<String>,
}

impl MappingCandidate {
    /// Build a candidate from a raw index hit.
    pub fn from_match(input_text: &str, hit: &RawMatch) -> Self {
        Self {
            input_text: input_text.to_string(),
            matched_name: hit.ingredient_name().map(str::to_string),
            similarity_score: hit.score.unwrap_or(0.0),
            ingredient_id: hit.id.clone(),
        }
    }
}

/// Outcome of mapping one ingredient string.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MappingResult {
    pub input: String,
    pub default_mapping: Option<String>,
    /// Ordered by descending similarity, as returned by the index.
    pub candidates: Vec<MappingCandidate>,
}

impl MappingResult {
    /// Assemble a result, choosing the default mapping from the top candidate.
    ///
    /// The top candidate's id wins; when it has no (or an empty) id its
    /// matched name is used instead. No candidates means no default.
    pub fn from_candidates(input: impl Into<String>, candidates: Vec<MappingCandidate>) -> Self {
        let default_mapping = candidates.first().and_then(|top| {
            match top.ingredient_id.as_deref() {
                Some(id) if !id.is_empty() => Some(id.to_string()),
                _ => top.matched_name.clone(),
            }
        });
        Self {
            input: input.into(),
            default_mapping,
            candidates,
        }
    }
}

/// One ingredient of a recipe, as posted by clients.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecipeLineItem {
    #[serde(rename = "ingredientId", default)]
    pub ingredient_id: String,
    #[serde(rename = "amountInGrams", default = "default_amount")]
    pub amount_in_grams: f64,
}

fn default_amount() -> f64 {
    DEFAULT_AMOUNT_GRAMS
}

impl RecipeLineItem {
    pub fn new(ingredient_id: impl Into<String>, amount_in_grams: f64) -> Self {
        Self {
            ingredient_id: ingredient_id.into(),
            amount_in_grams,
        }
    }
}

/// Nutrition facts for one ingredient or a whole recipe.
///
/// Serializes flat: totals, then daily values (aggregates only), then the
/// serving size.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NutritionFacts {
    #[serde(
        rename = "ingredientName",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub ingredient_name: Option<String>,
    #[serde(flatten)]
    pub totals: NutrientTotals,
    #[serde(flatten)]
    pub daily_values: Option<DailyValues>,
    #[serde(rename = "servingSize")]
    pub serving_size: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(id: Option<&str>, name: Option<&str>, score: Option<f64>) -> RawMatch {
        let metadata = name.map(|n| {
            let mut m = serde_json::Map::new();
            m.insert("ingredientName".to_string(), serde_json::json!(n));
            m
        });
        RawMatch {
            id: id.map(str::to_string),
            score,
            metadata,
        }
    }

    #[test]
    fn test_candidate_from_match() {
        let c = MappingCandidate::from_match("apple", &hit(Some("09003"), Some("Apples, raw"), Some(0.91)));
        assert_eq!(c.input_text, "apple");
        assert_eq!(c.matched_name.as_deref(), Some("Apples, raw"));
        assert_eq!(c.ingredient_id.as_deref(), Some("09003"));
        assert_eq!(c.similarity_score, 0.91);
    }

    #[test]
    fn test_candidate_missing_fields() {
        let c = MappingCandidate::from_match("x", &hit(None, None, None));
        assert!(c.matched_name.is_none());
        assert!(c.ingredient_id.is_none());
        assert_eq!(c.similarity_score, 0.0);
    }

    #[test]
    fn test_non_string_name_is_absent() {
        let mut m = serde_json::Map::new();
        m.insert("ingredientName".to_string(), serde_json::json!(42));
        let raw = RawMatch {
            id: Some("1".into()),
            score: Some(0.5),
            metadata: Some(m),
        };
        assert!(raw.ingredient_name().is_none());
    }

    #[test]
    fn test_default_mapping_prefers_id() {
        let candidates = vec![
            MappingCandidate::from_match("egg", &hit(Some("01123"), Some("Egg, whole"), Some(0.9))),
            MappingCandidate::from_match("egg", &hit(Some("01124"), Some("Egg, white"), Some(0.8))),
        ];
        let result = MappingResult::from_candidates("egg", candidates);
        assert_eq!(result.default_mapping.as_deref(), Some("01123"));
        assert_eq!(result.candidates.len(), 2);
    }

    #[test]
    fn test_default_mapping_falls_back_to_name() {
        let candidates = vec![MappingCandidate::from_match(
            "egg",
            &hit(None, Some("Egg, whole"), Some(0.9)),
        )];
        let result = MappingResult::from_candidates("egg", candidates);
        assert_eq!(result.default_mapping.as_deref(), Some("Egg, whole"));
    }

    #[test]
    fn test_default_mapping_empty_id_falls_back() {
        let candidates = vec![MappingCandidate::from_match(
            "egg",
            &hit(Some(""), Some("Egg, whole"), Some(0.9)),
        )];
        let result = MappingResult::from_candidates("egg", candidates);
        assert_eq!(result.default_mapping.as_deref(), Some("Egg, whole"));
    }

    #[test]
    fn test_default_mapping_no_candidates() {
        let result = MappingResult::from_candidates("nothing", Vec::new());
        assert!(result.default_mapping.is_none());
        assert!(result.candidates.is_empty());
    }

    #[test]
    fn test_candidate_wire_names() {
        let c = MappingCandidate::from_match("apple", &hit(Some("09003"), Some("Apples"), Some(0.5)));
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["input"], "apple");
        assert_eq!(json["best_usda_name"], "Apples");
        assert_eq!(json["ingredientId"], "09003");
        assert_eq!(json["score"], 0.5);
    }

    #[test]
    fn test_line_item_default_amount() {
        let item: RecipeLineItem = serde_json::from_str(r#"{"ingredientId": "09003"}"#).unwrap();
        assert_eq!(item.amount_in_grams, 100.0);
    }

    #[test]
    fn test_record_null_nutrient_is_absent() {
        let record: NutrientRecord = serde_json::from_str(
            r#"{"ingredientName": "Salt", "portionDescription": "1 tsp",
                "nutrients": {"Sodium (mg)": 38758.0, "Sugar (g)": null}}"#,
        )
        .unwrap();
        assert_eq!(record.value("Sodium (mg)"), Some(38758.0));
        assert_eq!(record.value("Sugar (g)"), None);
        assert_eq!(record.portion_weight_grams, 100.0);
    }
}
