//! Read-only nutrient table loaded from a JSON snapshot.
//!
//! The snapshot is an object keyed by ingredient id:
//!
//! ```json
//! {
//!   "09003": {
//!     "ingredientName": "Apples, raw, with skin",
//!     "portionDescription": "1 medium",
//!     "portionWeight": 182.0,
//!     "nutrients": { "Energ Kcal": 52.0, "Sugar Tot (g)": 10.39 }
//!   }
//! }
//! ```
//!
//! The table is built once at startup and shared behind an `Arc`; it is never
//! mutated afterwards, so concurrent readers need no locking.

use std::collections::HashMap;
use std::path::Path;

use crate::error::TableError;
use crate::types::NutrientRecord;

/// Immutable mapping from ingredient id to its nutrient record.
#[derive(Debug, Default, Clone)]
pub struct NutrientTable {
    records: HashMap<String, NutrientRecord>,
}

impl NutrientTable {
    /// Load a snapshot file.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Missing`] if the file does not exist, and
    /// [`TableError::Io`] / [`TableError::Parse`] if it cannot be read.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, TableError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        if !path.exists() {
            return Err(TableError::Missing { path: display });
        }
        let content = std::fs::read_to_string(path).map_err(|source| TableError::Io {
            path: display.clone(),
            source,
        })?;
        let table = Self::from_json(&content).map_err(|source| TableError::Parse {
            path: display,
            source,
        })?;
        tracing::debug!("Loaded {} nutrient records from {:?}", table.len(), path);
        Ok(table)
    }

    /// Parse a snapshot from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let raw: HashMap<String, NutrientRecord> = serde_json::from_str(json)?;
        Ok(Self::from_records(raw.into_iter().map(|(id, mut record)| {
            record.ingredient_id = id;
            record
        })))
    }

    /// Build a table from records, keyed by their `ingredient_id`.
    pub fn from_records<I: IntoIterator<Item = NutrientRecord>>(records: I) -> Self {
        Self {
            records: records
                .into_iter()
                .map(|r| (r.ingredient_id.clone(), r))
                .collect(),
        }
    }

    pub fn get(&self, ingredient_id: &str) -> Option<&NutrientRecord> {
        self.records.get(ingredient_id)
    }

    pub fn contains(&self, ingredient_id: &str) -> bool {
        self.records.contains_key(ingredient_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over all records in arbitrary order.
    pub fn records(&self) -> impl Iterator<Item = &NutrientRecord> {
        self.records.values()
    }
}
