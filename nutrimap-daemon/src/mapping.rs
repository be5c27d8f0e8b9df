//! Ingredient text -> ranked USDA candidates.
//!
//! One embedding call, one nearest-neighbor query, then the raw hits are
//! turned into candidates in the order the index returned them.

use std::sync::Arc;

use nutrimap_core::{MappingCandidate, MappingResult};
use nutrimap_embeddings::{Embedder, UpstreamError, VectorIndex};
use thiserror::Error;
use tracing::debug;

/// Largest `top_k` accepted per query.
pub const MAX_TOP_K: usize = 10_000;

/// Errors from the mapping pipeline.
#[derive(Error, Debug)]
pub enum MappingError {
    /// Request rejected before any remote call.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Embedding or search failed after retries.
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

/// Embeds ingredient text and searches the index for USDA matches.
#[derive(Clone)]
pub struct MappingPipeline {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    default_top_k: usize,
}

impl MappingPipeline {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn VectorIndex>,
        default_top_k: usize,
    ) -> Self {
        Self {
            embedder,
            index,
            default_top_k,
        }
    }

    pub fn default_top_k(&self) -> usize {
        self.default_top_k
    }

    pub fn model_name(&self) -> &str {
        self.embedder.model_name()
    }

    pub fn namespace(&self) -> &str {
        self.index.namespace()
    }

    /// Map `text` to at most `top_k` candidates (default when `None`).
    ///
    /// The default mapping is the top candidate's id, or its name when the
    /// id is missing. The input text is echoed back unchanged.
    pub async fn map(&self, text: &str, top_k: Option<usize>) -> Result<MappingResult, MappingError> {
        if text.trim().is_empty() {
            return Err(MappingError::InvalidInput(
                "ingredient_text must not be empty".to_string(),
            ));
        }
        let top_k = top_k.unwrap_or(self.default_top_k);
        if top_k == 0 || top_k > MAX_TOP_K {
            return Err(MappingError::InvalidInput(format!(
                "top_k must be between 1 and {}, got {}",
                MAX_TOP_K, top_k
            )));
        }

        let vector = self.embedder.embed(text).await?;
        let matches = self.index.query(&vector, top_k).await?;

        let candidates: Vec<MappingCandidate> = matches
            .iter()
            .map(|hit| MappingCandidate::from_match(text, hit))
            .inspect(|c| {
                debug!(
                    "Match found: {:?} (ID: {:?}) with score {}",
                    c.matched_name, c.ingredient_id, c.similarity_score
                )
            })
            .collect();

        Ok(MappingResult::from_candidates(text, candidates))
    }
}
