//! Shared application state for the server.

use std::sync::Arc;
use std::time::Instant;

use nutrimap_core::NutrientTable;

use crate::corrections::CorrectionStore;
use crate::mapping::MappingPipeline;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Read-only nutrient table loaded at startup
    pub table: Arc<NutrientTable>,
    /// Embedding + search pipeline
    pub mapper: MappingPipeline,
    /// User mapping corrections
    pub corrections: Arc<dyn CorrectionStore>,
    /// Name of the vector index being queried
    pub index_name: String,
    /// Server start time
    pub start_time: Instant,
}

impl AppState {
    pub fn new(
        table: Arc<NutrientTable>,
        mapper: MappingPipeline,
        corrections: Arc<dyn CorrectionStore>,
        index_name: impl Into<String>,
    ) -> Self {
        Self {
            table,
            mapper,
            corrections,
            index_name: index_name.into(),
            start_time: Instant::now(),
        }
    }

    /// Get uptime in seconds.
    pub fn uptime_seconds(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }
}
