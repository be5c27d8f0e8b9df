//! Status command - show what a running daemon has loaded.

use anyhow::Result;
use colored::Colorize;
use serde::{Deserialize, Serialize};

use super::CommandContext;
use crate::output::{Output, OutputConfig, TableDisplay, TableOutput};

/// Response of `GET /status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonStatus {
    pub status: String,
    pub ingredient_count: usize,
    pub index: String,
    pub namespace: String,
    pub model: String,
    pub default_top_k: usize,
    pub corrections: usize,
    pub uptime_seconds: f64,
    /// Filled in locally, not sent by the daemon.
    #[serde(default)]
    pub url: String,
}

impl TableDisplay for DaemonStatus {
    fn to_table(&self, config: &OutputConfig) -> String {
        let namespace = if self.namespace.is_empty() {
            "(default)".to_string()
        } else {
            self.namespace.clone()
        };
        let pairs = [
            ("Daemon", self.url.clone()),
            ("Ingredients", self.ingredient_count.to_string()),
            ("Index", self.index.clone()),
            ("Namespace", namespace),
            ("Model", self.model.clone()),
            ("Default top_k", self.default_top_k.to_string()),
            ("Corrections", self.corrections.to_string()),
            ("Uptime", format!("{:.0}s", self.uptime_seconds)),
        ];
        format!(
            "{}\n{}",
            format!("nutrimap daemon: {}", self.status).green().bold(),
            TableOutput::format_key_value(&pairs, config)
        )
    }
}

/// Run the status command.
pub async fn run(ctx: &CommandContext) -> Result<()> {
    let client = ctx.client()?;
    let mut status: DaemonStatus = client.get("/status", &[]).await?;
    status.url = client.base_url().to_string();
    Output::new(status, ctx.format).render()
}
