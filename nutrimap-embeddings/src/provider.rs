//! Traits the mapping pipeline is written against.
//!
//! The remote clients in this crate implement them; tests substitute
//! in-process fakes.

use async_trait::async_trait;
use nutrimap_core::RawMatch;

use crate::error::Result;

/// Turns text into an embedding vector.
///
/// # Example
///
/// ```ignore
/// use nutrimap_embeddings::{Embedder, Result};
///
/// struct Constant;
///
/// #[async_trait::async_trait]
/// impl Embedder for Constant {
///     async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
///         Ok(vec![0.1, 0.2, 0.3])
///     }
///
///     fn model_name(&self) -> &str {
///         "constant"
///     }
/// }
/// ```
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a single input string.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Model identifier sent to the service.
    fn model_name(&self) -> &str;

    /// Expected vector length, when known.
    fn dimension(&self) -> Option<usize> {
        None
    }
}

/// Nearest-neighbor lookup over stored ingredient vectors.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Return up to `top_k` matches with metadata, best first.
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<RawMatch>>;

    /// Namespace the queries are scoped to.
    fn namespace(&self) -> &str;
}
