//! Command implementations for the nutrimap CLI
//!
//! Each command module provides a `run` function that executes the command logic.

pub mod correct;
pub mod map;
pub mod nutrition;
pub mod recipe;
pub mod serve;
pub mod status;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use nutrimap_core::NutrientTable;

use crate::client::DaemonClient;
use crate::output::OutputFormat;

/// Settings shared by every command, resolved from flags and config.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub format: OutputFormat,
    pub daemon_url: String,
    /// Snapshot for local computation; `None` means ask the daemon.
    pub data: Option<PathBuf>,
}

impl CommandContext {
    pub fn client(&self) -> Result<DaemonClient> {
        DaemonClient::new(&self.daemon_url)
    }

    /// Use `flag` when given, else the configured snapshot.
    pub fn with_data(&self, flag: Option<PathBuf>) -> Self {
        Self {
            data: flag.or_else(|| self.data.clone()),
            ..self.clone()
        }
    }
}

/// Load a nutrient table snapshot for local computation.
pub fn load_table(path: &Path) -> Result<NutrientTable> {
    let table = NutrientTable::load(path)
        .with_context(|| format!("Failed to load nutrient table {}", path.display()))?;
    tracing::debug!("Loaded {} ingredients from {}", table.len(), path.display());
    Ok(table)
}
