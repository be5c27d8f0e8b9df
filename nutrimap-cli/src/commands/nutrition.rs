//! Nutrition command - facts for one ingredient, per serving or per 100 g.

use anyhow::Result;
use colored::Colorize;
use nutrimap_core::{nutrition_for, Measurement, Nutrient, NutritionFacts};
use std::path::PathBuf;

use super::{load_table, CommandContext};
use crate::output::{format_amount, Output, OutputConfig, TableDisplay, TableOutput};

impl TableDisplay for NutritionFacts {
    fn to_table(&self, config: &OutputConfig) -> String {
        let mut lines = Vec::new();

        let title = match &self.ingredient_name {
            Some(name) => name.clone(),
            None => "Recipe".to_string(),
        };
        lines.push(format!(
            "{} {}",
            title.bold(),
            format!("({})", self.serving_size).dimmed()
        ));

        let with_daily = self.daily_values.is_some();
        let headers: Vec<&str> = if with_daily {
            vec!["Nutrient", "Amount", "Unit", "% DV"]
        } else {
            vec!["Nutrient", "Amount", "Unit"]
        };

        let rows: Vec<Vec<String>> = Nutrient::ALL
            .iter()
            .map(|&nutrient| {
                let mut row = vec![
                    nutrient.as_str().to_string(),
                    format_amount(self.totals.get(nutrient)),
                    nutrient.unit().to_string(),
                ];
                if let Some(daily) = &self.daily_values {
                    row.push(format_amount(daily.get(nutrient)));
                }
                row
            })
            .collect();

        lines.push(TableOutput::from_rows(&headers, &rows, config));
        lines.join("\n")
    }
}

/// Run the nutrition command.
pub async fn run(
    ctx: &CommandContext,
    ingredient_id: &str,
    measurement: &str,
    data: Option<PathBuf>,
) -> Result<()> {
    let measurement: Measurement = measurement.parse()?;
    let ctx = ctx.with_data(data);

    let facts = match &ctx.data {
        Some(path) => {
            let table = load_table(path)?;
            nutrition_for(&table, ingredient_id, measurement)?
        }
        None => {
            let client = ctx.client()?;
            let path = format!("/ingredients/{}/nutrition", ingredient_id);
            client
                .get::<NutritionFacts>(&path, &[("measurement", measurement.as_str())])
                .await?
        }
    };

    Output::new(facts, ctx.format).render()
}
