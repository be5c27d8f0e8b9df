//! Recipe command - aggregate nutrition over a list of ingredients.

use anyhow::{anyhow, Context, Result};
use colored::Colorize;
use nutrimap_core::types::DEFAULT_AMOUNT_GRAMS;
use nutrimap_core::{aggregate_detailed, ItemOutcome, NutritionFacts, RecipeLineItem, SkipReason};
use std::path::{Path, PathBuf};

use super::{load_table, CommandContext};
use crate::output::{Output, OutputFormat};

/// Parse an `ID[:GRAMS]` argument. Grams default to 100.
pub fn parse_item(raw: &str) -> Result<RecipeLineItem> {
    let (id, grams) = match raw.split_once(':') {
        Some((id, grams)) => {
            let grams: f64 = grams
                .trim()
                .parse()
                .map_err(|_| anyhow!("'{}' is not a valid amount in grams", grams))?;
            (id.trim(), grams)
        }
        None => (raw.trim(), DEFAULT_AMOUNT_GRAMS),
    };
    if id.is_empty() {
        return Err(anyhow!("Missing ingredient id in '{}'", raw));
    }
    Ok(RecipeLineItem::new(id, grams))
}

/// Read line items from a JSON file shaped like the aggregate request body.
pub fn read_items_file(path: &Path) -> Result<Vec<RecipeLineItem>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse recipe items in {}", path.display()))
}

/// Run the recipe command.
pub async fn run(
    ctx: &CommandContext,
    items: &[String],
    file: Option<PathBuf>,
    data: Option<PathBuf>,
) -> Result<()> {
    let mut line_items = match &file {
        Some(path) => read_items_file(path)?,
        None => Vec::new(),
    };
    for raw in items {
        line_items.push(parse_item(raw)?);
    }

    let ctx = ctx.with_data(data);
    let facts = match &ctx.data {
        Some(path) => {
            let table = load_table(path)?;
            let report = aggregate_detailed(&table, &line_items)?;
            if ctx.format == OutputFormat::Table {
                for outcome in report.skipped() {
                    if let ItemOutcome::Skipped(SkipReason::UnknownIngredient(id)) = outcome {
                        eprintln!(
                            "{} unknown ingredient '{}' skipped",
                            "WARNING:".yellow().bold(),
                            id
                        );
                    }
                }
            }
            report.facts
        }
        None => {
            let client = ctx.client()?;
            client
                .post::<_, NutritionFacts>("/recipes/aggregate-nutrition", &line_items)
                .await?
        }
    };

    Output::new(facts, ctx.format).render()
}
