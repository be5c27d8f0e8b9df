//! Correct command - store or read a user's ingredient mapping override.

use anyhow::Result;
use colored::Colorize;
use serde::{Deserialize, Serialize};

use super::CommandContext;
use crate::output::{Output, OutputConfig, TableDisplay, TableOutput};

#[derive(Serialize)]
struct UpdateRequest<'a> {
    user_id: &'a str,
    ingredient_id: &'a str,
    mapped_ingredient: &'a str,
}

/// Response of `POST /update-mapping`.
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateResponse {
    pub message: String,
    pub user_id: String,
    pub ingredient_id: String,
    pub mapped_ingredient: String,
}

impl TableDisplay for UpdateResponse {
    fn to_table(&self, _config: &OutputConfig) -> String {
        format!(
            "{} {} ({} -> {} for {})",
            "SUCCESS:".green().bold(),
            self.message,
            self.ingredient_id,
            self.mapped_ingredient,
            self.user_id
        )
    }
}

/// Response of `GET /get-mapping`.
#[derive(Debug, Serialize, Deserialize)]
pub struct MappingLookup {
    pub user_id: String,
    pub ingredient_id: String,
    pub mapped_ingredient: Option<String>,
}

impl TableDisplay for MappingLookup {
    fn to_table(&self, config: &OutputConfig) -> String {
        let mapped = match &self.mapped_ingredient {
            Some(m) => m.clone(),
            None => "(no correction)".to_string(),
        };
        let pairs = [
            ("User", self.user_id.clone()),
            ("Ingredient", self.ingredient_id.clone()),
            ("Mapped to", mapped),
        ];
        TableOutput::format_key_value(&pairs, config)
    }
}

/// Run `correct set`.
pub async fn run_set(
    ctx: &CommandContext,
    user_id: &str,
    ingredient_id: &str,
    mapped_ingredient: &str,
) -> Result<()> {
    let client = ctx.client()?;
    let response: UpdateResponse = client
        .post(
            "/update-mapping",
            &UpdateRequest {
                user_id,
                ingredient_id,
                mapped_ingredient,
            },
        )
        .await?;
    Output::new(response, ctx.format).render()
}

/// Run `correct get`.
pub async fn run_get(ctx: &CommandContext, user_id: &str, ingredient_id: &str) -> Result<()> {
    let client = ctx.client()?;
    let lookup: MappingLookup = client
        .get(
            "/get-mapping",
            &[("user_id", user_id), ("ingredient_id", ingredient_id)],
        )
        .await?;
    Output::new(lookup, ctx.format).render()
}
