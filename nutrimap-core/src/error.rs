//! Error types for nutrimap-core.

use thiserror::Error;

/// Errors raised while loading the nutrient table snapshot.
#[derive(Error, Debug)]
pub enum TableError {
    /// Snapshot file does not exist.
    #[error("Could not find {path}. Run the nutrition data preparation step to generate it.")]
    Missing { path: String },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse nutrient snapshot {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised by nutrition lookups and aggregation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NutritionError {
    /// Ingredient id is not in the nutrient table.
    #[error("Ingredient not found in nutrition_data: {0}")]
    NotFound(String),

    /// Request rejected before any computation.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
