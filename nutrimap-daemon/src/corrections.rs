//! User corrections of ingredient mappings.
//!
//! A correction pins `(user_id, ingredient_id)` to a chosen USDA record.
//! The in-memory store is process-local and lost on restart; the trait
//! lets a persistent store be injected instead.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

/// One stored correction.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Correction {
    pub user_id: String,
    pub ingredient_id: String,
    pub mapped_ingredient: String,
    pub updated_at: DateTime<Utc>,
}

/// Storage for user corrections.
#[async_trait]
pub trait CorrectionStore: Send + Sync {
    /// Insert or overwrite the correction for `(user_id, ingredient_id)`.
    async fn upsert(&self, user_id: &str, ingredient_id: &str, mapped_ingredient: &str)
        -> Correction;

    async fn get(&self, user_id: &str, ingredient_id: &str) -> Option<Correction>;

    async fn count(&self) -> usize;
}

/// Correction store backed by a `HashMap` behind an async `RwLock`.
#[derive(Default)]
pub struct InMemoryCorrectionStore {
    entries: RwLock<HashMap<(String, String), Correction>>,
}

impl InMemoryCorrectionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CorrectionStore for InMemoryCorrectionStore {
    async fn upsert(
        &self,
        user_id: &str,
        ingredient_id: &str,
        mapped_ingredient: &str,
    ) -> Correction {
        let correction = Correction {
            user_id: user_id.to_string(),
            ingredient_id: ingredient_id.to_string(),
            mapped_ingredient: mapped_ingredient.to_string(),
            updated_at: Utc::now(),
        };
        self.entries.write().await.insert(
            (user_id.to_string(), ingredient_id.to_string()),
            correction.clone(),
        );
        tracing::debug!("Stored correction {} / {} -> {}", user_id, ingredient_id, mapped_ingredient);
        correction
    }

    async fn get(&self, user_id: &str, ingredient_id: &str) -> Option<Correction> {
        self.entries
            .read()
            .await
            .get(&(user_id.to_string(), ingredient_id.to_string()))
            .cloned()
    }

    async fn count(&self) -> usize {
        self.entries.read().await.len()
    }
}
