//! Map command - find USDA candidates for free-text ingredient input.

use anyhow::Result;
use colored::Colorize;
use nutrimap_core::MappingResult;
use serde::Serialize;

use super::CommandContext;
use crate::output::{Alignment, Column, Output, OutputConfig, TableDisplay, TableOutput};

#[derive(Serialize)]
struct MapRequest<'a> {
    ingredient_text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_k: Option<usize>,
}

impl TableDisplay for MappingResult {
    fn to_table(&self, config: &OutputConfig) -> String {
        let mut lines = Vec::new();

        let default = match &self.default_mapping {
            Some(id) => id.green().bold().to_string(),
            None => "none".yellow().to_string(),
        };
        lines.push(format!("{} {}", "Input:".cyan(), self.input));
        lines.push(format!("{} {}", "Default:".cyan(), default));

        let columns = vec![
            Column::new("Id", "ingredientId"),
            Column::new("USDA name", "best_usda_name").with_max_width(60),
            Column::new("Score", "score").with_alignment(Alignment::Right),
        ];
        lines.push(TableOutput::format_with_columns(
            &self.candidates,
            &columns,
            config,
        ));
        lines.join("\n")
    }
}

/// Run the map command.
pub async fn run(ctx: &CommandContext, text: &str, top_k: Option<usize>) -> Result<()> {
    let client = ctx.client()?;
    let result: MappingResult = client
        .post(
            "/map-ingredient",
            &MapRequest {
                ingredient_text: text,
                top_k,
            },
        )
        .await?;

    Output::new(result, ctx.format).render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use nutrimap_core::MappingCandidate;

    fn candidate(id: &str, name: &str, score: f64) -> MappingCandidate {
        MappingCandidate {
            input_text: "granny smith apple".to_string(),
            matched_name: Some(name.to_string()),
            similarity_score: score,
            ingredient_id: Some(id.to_string()),
        }
    }

    #[test]
    fn test_table_shows_default_and_candidates() {
        colored::control::set_override(false);
        let result = MappingResult::from_candidates(
            "granny smith apple",
            vec![
                candidate("09003", "Apples, raw, with skin", 0.91),
                candidate("09004", "Apples, raw, without skin", 0.87),
            ],
        );
        let config = OutputConfig::new(OutputFormat::Table).without_truncation();
        let output = result.to_table(&config);

        assert!(output.contains("Default: 09003"));
        assert!(output.contains("Apples, raw, without skin"));
        assert!(output.contains("0.87"));
    }

    #[test]
    fn test_table_without_candidates() {
        colored::control::set_override(false);
        let result = MappingResult::from_candidates("xyz", vec![]);
        let config = OutputConfig::new(OutputFormat::Table);
        let output = result.to_table(&config);

        assert!(output.contains("Default: none"));
        assert!(output.contains("(no results)"));
    }

    #[test]
    fn test_request_omits_missing_top_k() {
        let body = serde_json::to_value(MapRequest {
            ingredient_text: "salt",
            top_k: None,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"ingredient_text": "salt"}));
    }
}
