//! nutrimap core - nutrient table, scaling and recipe aggregation.
//!
//! This crate holds everything that does not talk to the network:
//!
//! - **Nutrient table**: read-only USDA records loaded from a JSON snapshot
//! - **Nutrient schema**: source columns and FDA daily reference values
//! - **Scaling**: single-ingredient facts per serving or per 100 g
//! - **Aggregation**: recipe totals with percent-of-daily-value figures
//! - **Shared types**: mapping candidates and results used by the daemon
//!
//! # Usage
//!
//! ```rust,no_run
//! use nutrimap_core::{aggregate, nutrition_for, Measurement, NutrientTable, RecipeLineItem};
//!
//! let table = NutrientTable::load("data/nutrition_data.json")?;
//! let apple = nutrition_for(&table, "09003", Measurement::Serving)?;
//! let pie = aggregate(&table, &[RecipeLineItem::new("09003", 450.0)])?;
//! println!("{} kcal per apple, {} kcal per pie", apple.totals.calories, pie.totals.calories);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod aggregate;
pub mod error;
pub mod nutrients;
pub mod scaling;
pub mod table;
pub mod types;

pub use aggregate::{aggregate, aggregate_detailed, AggregateReport, ItemOutcome, SkipReason};
pub use error::{NutritionError, TableError};
pub use nutrients::{calc_daily, round2, DailyValues, Nutrient, NutrientTotals};
pub use scaling::{nutrition_for, scale_record, Measurement};
pub use table::NutrientTable;
pub use types::{
    MappingCandidate, MappingResult, NutrientRecord, NutritionFacts, RawMatch, RecipeLineItem,
};
