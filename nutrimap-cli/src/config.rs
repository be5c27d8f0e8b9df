//! nutrimap configuration loading from `.nutrimaprc.toml`.
//!
//! Configuration is optional. Every setting has a default, and command-line
//! flags override whatever the file says.
//!
//! # Example Configuration
//!
//! ```toml
//! [daemon]
//! url = "http://localhost:5000"
//!
//! [output]
//! format = "table"
//! color = true
//!
//! [data]
//! nutrient_table = "data/nutrition_data.json"
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Name of the config file looked up in the working directory.
pub const CONFIG_FILE: &str = ".nutrimaprc.toml";

/// Daemon URL used when neither `--daemon` nor the config sets one.
pub const DEFAULT_DAEMON_URL: &str = "http://localhost:5000";

/// Root configuration structure loaded from `.nutrimaprc.toml`.
#[derive(Debug, Deserialize, Default)]
pub struct NutrimapConfig {
    /// Where the daemon lives.
    #[serde(default)]
    pub daemon: DaemonSection,

    /// Output formatting preferences.
    #[serde(default)]
    pub output: OutputSettings,

    /// Local data files.
    #[serde(default)]
    pub data: DataSection,
}

/// Daemon connection settings.
#[derive(Debug, Deserialize, Default)]
pub struct DaemonSection {
    /// Base URL of a running `nutrimap serve`.
    #[serde(default)]
    pub url: Option<String>,
}

/// Output formatting preferences.
///
/// Note: this is distinct from the runtime `OutputConfig` in the output
/// module, which handles actual rendering.
#[derive(Debug, Deserialize, Default)]
pub struct OutputSettings {
    /// Default output format: `table` or `json`.
    #[serde(default)]
    pub format: Option<String>,

    /// Whether to use colored output. Unset means auto-detect.
    #[serde(default)]
    pub color: Option<bool>,
}

/// Local data settings.
#[derive(Debug, Deserialize, Default)]
pub struct DataSection {
    /// Nutrient table snapshot used for local computation.
    ///
    /// When set, `nutrition` and `recipe` compute locally without `--data`.
    #[serde(default)]
    pub nutrient_table: Option<PathBuf>,
}

impl NutrimapConfig {
    /// Load configuration from `.nutrimaprc.toml` in the given directory.
    ///
    /// A missing file yields defaults. Read and parse errors are logged as
    /// warnings and also yield defaults.
    pub fn load(root: &Path) -> Self {
        let config_path = root.join(CONFIG_FILE);
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse {}: {}", CONFIG_FILE, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read {}: {}", CONFIG_FILE, e);
                }
            }
        }
        Self::default()
    }

    /// Daemon base URL, falling back to [`DEFAULT_DAEMON_URL`].
    pub fn daemon_url(&self) -> &str {
        self.daemon.url.as_deref().unwrap_or(DEFAULT_DAEMON_URL)
    }

    /// Get the default output format, if configured.
    pub fn default_format(&self) -> Option<&str> {
        self.output.format.as_deref()
    }

    /// Returns the configured color preference, or `None` to auto-detect.
    pub fn use_color(&self) -> Option<bool> {
        self.output.color
    }

    /// Configured nutrient table snapshot, if any.
    pub fn nutrient_table(&self) -> Option<&Path> {
        self.data.nutrient_table.as_deref()
    }
}
