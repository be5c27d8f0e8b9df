//! nutrimap embeddings - remote clients for semantic ingredient search.
//!
//! This crate wraps the two network services the mapping pipeline needs:
//!
//! - **Embedding service**: OpenAI-compatible `/embeddings` endpoint
//! - **Vector index**: Pinecone query and index bootstrap
//! - **Retry**: one bounded, fixed-interval policy shared by both clients
//!
//! Callers depend on the [`Embedder`] and [`VectorIndex`] traits so tests can
//! swap the remote clients for in-process fakes.
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use nutrimap_embeddings::{Embedder, OpenAiEmbedder, PineconeIndex, RetryPolicy, VectorIndex};
//!
//! # async fn demo() -> nutrimap_embeddings::Result<()> {
//! let embedder = OpenAiEmbedder::new(
//!     "sk-...",
//!     nutrimap_embeddings::DEFAULT_OPENAI_BASE_URL,
//!     nutrimap_embeddings::DEFAULT_MODEL,
//!     Some(nutrimap_embeddings::DEFAULT_EMBEDDING_DIM),
//!     Duration::from_secs(30),
//!     RetryPolicy::default(),
//! )?;
//! let index = PineconeIndex::new(
//!     "pc-...",
//!     "usda-foods-abc.svc.pinecone.io",
//!     "",
//!     Duration::from_secs(30),
//!     RetryPolicy::default(),
//! )?;
//!
//! let vector = embedder.embed("2 granny smith apples").await?;
//! let matches = index.query(&vector, 7).await?;
//! # let _ = matches;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
pub mod openai;
pub mod pinecone;
mod provider;
pub mod retry;

pub use error::{Result, UpstreamError};
pub use openai::OpenAiEmbedder;
pub use pinecone::{IndexDescription, PineconeControl, PineconeIndex, DEFAULT_CONTROL_URL};
pub use provider::{Embedder, VectorIndex};
pub use retry::{Backoff, RetryPolicy};

/// Embedding dimension of the default model.
pub const DEFAULT_EMBEDDING_DIM: usize = 3072;

/// Default embedding model.
pub const DEFAULT_MODEL: &str = "text-embedding-3-large";

/// Default OpenAI API base URL.
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
