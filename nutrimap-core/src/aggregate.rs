//! Recipe-level aggregation.
//!
//! Each line item contributes `per_100g * amount / 100` to every total.
//! Unknown ingredient ids are skipped, not rejected: aggregation is best
//! effort, and the per-item [`ItemOutcome`] records what happened to each
//! line so callers and tests can see the skips.

use serde::Serialize;

use crate::error::NutritionError;
use crate::nutrients::{DailyValues, Nutrient, NutrientTotals};
use crate::table::NutrientTable;
use crate::types::{NutritionFacts, RecipeLineItem};

/// Serving size label for aggregated facts.
pub const ENTIRE_RECIPE_LABEL: &str = "Entire Recipe";

/// Why a line item did not contribute.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum SkipReason {
    UnknownIngredient(String),
}

/// What happened to one line item during aggregation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum ItemOutcome {
    Contributed { ingredient_id: String, factor: f64 },
    Skipped(SkipReason),
}

impl ItemOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self, ItemOutcome::Skipped(_))
    }
}

/// Aggregated facts plus the outcome of each line item, in input order.
#[derive(Clone, Debug, PartialEq)]
pub struct AggregateReport {
    pub facts: NutritionFacts,
    pub outcomes: Vec<ItemOutcome>,
}

impl AggregateReport {
    pub fn skipped(&self) -> impl Iterator<Item = &ItemOutcome> {
        self.outcomes.iter().filter(|o| o.is_skipped())
    }
}

/// Sum nutrition over all line items.
///
/// # Errors
///
/// Returns [`NutritionError::InvalidInput`] for an empty list or a negative
/// or non-finite amount.
pub fn aggregate(
    table: &NutrientTable,
    items: &[RecipeLineItem],
) -> Result<NutritionFacts, NutritionError> {
    aggregate_detailed(table, items).map(|report| report.facts)
}

/// Like [`aggregate`], also reporting which items were skipped.
pub fn aggregate_detailed(
    table: &NutrientTable,
    items: &[RecipeLineItem],
) -> Result<AggregateReport, NutritionError> {
    validate(items)?;

    let mut totals = NutrientTotals::default();
    let mut outcomes = Vec::with_capacity(items.len());

    for item in items {
        let factor = item.amount_in_grams / 100.0;
        let Some(record) = table.get(&item.ingredient_id) else {
            tracing::debug!("Skipping unknown ingredient {:?}", item.ingredient_id);
            outcomes.push(ItemOutcome::Skipped(SkipReason::UnknownIngredient(
                item.ingredient_id.clone(),
            )));
            continue;
        };

        for nutrient in Nutrient::ALL {
            match (nutrient, nutrient.per_100g(record)) {
                // Only records that carry the column feed added sugars.
                (Nutrient::AddedSugars, None) => {}
                (_, value) => totals.add(nutrient, value.unwrap_or(0.0) * factor),
            }
        }
        outcomes.push(ItemOutcome::Contributed {
            ingredient_id: item.ingredient_id.clone(),
            factor,
        });
    }

    // A zero added-sugars total reads the same as "never present".
    if totals.added_sugars == Some(0.0) {
        totals.added_sugars = None;
    }

    let daily_values = DailyValues::from_totals(&totals);
    Ok(AggregateReport {
        facts: NutritionFacts {
            ingredient_name: None,
            totals: totals.rounded(),
            daily_values: Some(daily_values),
            serving_size: ENTIRE_RECIPE_LABEL.to_string(),
        },
        outcomes,
    })
}

fn validate(items: &[RecipeLineItem]) -> Result<(), NutritionError> {
    if items.is_empty() {
        return Err(NutritionError::InvalidInput(
            "No ingredients provided".to_string(),
        ));
    }
    if let Some(bad) = items
        .iter()
        .find(|i| !i.amount_in_grams.is_finite() || i.amount_in_grams < 0.0)
    {
        return Err(NutritionError::InvalidInput(format!(
            "amountInGrams for {:?} must be a non-negative number, got {}",
            bad.ingredient_id, bad.amount_in_grams
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrients::{round2, ADDED_SUGARS_KEY, SUGAR_KEY};
    use crate::scaling::{nutrition_for, Measurement};
    use crate::types::NutrientRecord;
    use approx::assert_relative_eq;

    fn table() -> NutrientTable {
        NutrientTable::from_records(vec![
            NutrientRecord::new("flour", "Wheat flour, white")
                .with_portion("1 cup", 125.0)
                .with_nutrient("Energ Kcal", 364.0)
                .with_nutrient("Protein (g)", 10.33)
                .with_nutrient("Carbohydrt (g)", 76.31)
                .with_nutrient("Lipid Tot (g)", 0.98)
                .with_nutrient("Fiber TD (g)", 2.7)
                .with_nutrient(SUGAR_KEY, 0.27)
                .with_nutrient("Iron (mg)", 4.64),
            NutrientRecord::new("sugar", "Sugar, granulated")
                .with_portion("1 tsp", 4.2)
                .with_nutrient("Energ Kcal", 387.0)
                .with_nutrient("Carbohydrt (g)", 99.98)
                .with_nutrient(SUGAR_KEY, 99.8)
                .with_nutrient(ADDED_SUGARS_KEY, 99.8),
            NutrientRecord::new("butter", "Butter, salted")
                .with_portion("1 tbsp", 14.2)
                .with_nutrient("Energ Kcal", 717.0)
                .with_nutrient("Lipid Tot (g)", 81.11)
                .with_nutrient("FA Sat (g)", 51.37)
                .with_nutrient("Cholestrl (mg)", 215.0)
                .with_nutrient("Sodium (mg)", 643.0),
            NutrientRecord::new("water", "Water, tap").with_nutrient(ADDED_SUGARS_KEY, 0.0),
        ])
    }

    #[test]
    fn test_empty_is_invalid() {
        let err = aggregate(&table(), &[]).unwrap_err();
        assert!(matches!(err, NutritionError::InvalidInput(_)));
    }

    #[test]
    fn test_negative_amount_is_invalid() {
        let items = vec![RecipeLineItem::new("flour", -5.0)];
        assert!(matches!(
            aggregate(&table(), &items),
            Err(NutritionError::InvalidInput(_))
        ));
        let items = vec![RecipeLineItem::new("flour", f64::NAN)];
        assert!(aggregate(&table(), &items).is_err());
    }

    #[test]
    fn test_weighted_sum() {
        let items = vec![
            RecipeLineItem::new("flour", 250.0),
            RecipeLineItem::new("butter", 50.0),
        ];
        let facts = aggregate(&table(), &items).unwrap();
        assert_eq!(facts.totals.calories, round2(364.0 * 2.5 + 717.0 * 0.5));
        assert_eq!(facts.totals.fat, round2(0.98 * 2.5 + 81.11 * 0.5));
        assert_eq!(facts.totals.sodium, round2(643.0 * 0.5));
        assert_eq!(facts.serving_size, "Entire Recipe");
        assert!(facts.ingredient_name.is_none());

        let daily = facts.daily_values.unwrap();
        assert_eq!(daily.sodium, round2(643.0 * 0.5 / 2300.0 * 100.0));
        assert_eq!(daily.iron, round2(4.64 * 2.5 / 18.0 * 100.0));
    }

    #[test]
    fn test_unknown_ingredients_are_skipped() {
        let items = vec![RecipeLineItem::new("unknown", 100.0)];
        let report = aggregate_detailed(&table(), &items).unwrap();
        assert_eq!(report.facts.totals, NutrientTotals::default());
        assert!(report.facts.totals.added_sugars.is_none());
        assert_eq!(
            report.outcomes,
            vec![ItemOutcome::Skipped(SkipReason::UnknownIngredient(
                "unknown".to_string()
            ))]
        );
        let daily = report.facts.daily_values.unwrap();
        assert_eq!(daily.fat, 0.0);
        assert!(daily.added_sugars.is_none());
    }

    #[test]
    fn test_mixed_known_and_unknown() {
        let items = vec![
            RecipeLineItem::new("flour", 100.0),
            RecipeLineItem::new("nope", 100.0),
        ];
        let report = aggregate_detailed(&table(), &items).unwrap();
        assert_eq!(report.skipped().count(), 1);
        assert!(!report.outcomes[0].is_skipped());
        assert_eq!(report.facts.totals.calories, 364.0);
    }

    #[test]
    fn test_order_independent() {
        let items = vec![
            RecipeLineItem::new("flour", 250.0),
            RecipeLineItem::new("sugar", 120.0),
            RecipeLineItem::new("butter", 113.0),
        ];
        let mut reversed = items.clone();
        reversed.reverse();
        let a = aggregate(&table(), &items).unwrap();
        let b = aggregate(&table(), &reversed).unwrap();
        for nutrient in Nutrient::ALL {
            match (a.totals.get(nutrient), b.totals.get(nutrient)) {
                (Some(x), Some(y)) => assert_relative_eq!(x, y, epsilon = 0.011),
                (x, y) => assert_eq!(x, y),
            }
        }
    }

    #[test]
    fn test_single_item_matches_per_100g_lookup() {
        let table = table();
        for id in ["flour", "sugar", "butter"] {
            let agg = aggregate(&table, &[RecipeLineItem::new(id, 100.0)]).unwrap();
            let single = nutrition_for(&table, id, Measurement::Per100g).unwrap();
            assert_eq!(agg.totals, single.totals, "mismatch for {}", id);
            assert_eq!(agg.serving_size, "Entire Recipe");
            assert_eq!(single.serving_size, "100g");
        }
    }

    #[test]
    fn test_added_sugars_only_from_records_with_column() {
        let items = vec![
            RecipeLineItem::new("sugar", 50.0),
            RecipeLineItem::new("flour", 100.0),
        ];
        let facts = aggregate(&table(), &items).unwrap();
        assert_eq!(facts.totals.added_sugars, Some(49.9));
        assert_eq!(facts.daily_values.unwrap().added_sugars, Some(99.8));
    }

    #[test]
    fn test_zero_added_sugars_collapses_to_absent() {
        let items = vec![RecipeLineItem::new("water", 500.0)];
        let facts = aggregate(&table(), &items).unwrap();
        assert!(facts.totals.added_sugars.is_none());
        assert!(facts.daily_values.unwrap().added_sugars.is_none());
    }

    #[test]
    fn test_totals_round_half_cents_to_even() {
        let table = NutrientTable::from_records(vec![NutrientRecord::new("tallow", "Beef tallow")
            .with_nutrient("FA Sat (g)", 0.125)
            .with_nutrient("Iron (mg)", 1.625)]);
        let facts = aggregate(&table, &[RecipeLineItem::new("tallow", 100.0)]).unwrap();
        assert_eq!(facts.totals.saturated_fat, 0.12);
        assert_eq!(facts.totals.iron, 1.62);
    }

    #[test]
    fn test_wire_shape() {
        let facts = aggregate(&table(), &[RecipeLineItem::new("butter", 10.0)]).unwrap();
        let json = serde_json::to_value(&facts).unwrap();
        assert_eq!(json["servingSize"], "Entire Recipe");
        assert!(json.get("ingredientName").is_none());
        assert!(json["addedSugarsDailyValue"].is_null());
        assert!(json["saturatedFatDailyValue"].is_number());
        assert!(json["calories"].is_number());
    }
}
