//! nutrimap daemon - ingredient mapping and nutrition HTTP service.
//!
//! This library provides:
//! - Configuration (clap arguments with environment fallbacks)
//! - The mapping pipeline (embedding + nearest-neighbor search)
//! - The correction store
//! - The axum router and [`run`], which wires everything together

pub mod config;
pub mod corrections;
pub mod mapping;
pub mod server;

use std::sync::Arc;

use anyhow::{Context, Result};
use nutrimap_core::NutrientTable;
use nutrimap_embeddings::{OpenAiEmbedder, PineconeControl, PineconeIndex, RetryPolicy};
use tracing::info;

pub use config::{ConfigError, DaemonArgs, DaemonConfig};
pub use corrections::{Correction, CorrectionStore, InMemoryCorrectionStore};
pub use mapping::{MappingError, MappingPipeline};
pub use server::{create_router, AppState};

/// Build the shared state from a validated configuration.
///
/// Loads the nutrient table, resolves the index host (creating the index
/// when it does not exist yet) and builds both remote clients.
pub async fn build_state(config: &DaemonConfig) -> Result<AppState> {
    let table = NutrientTable::load(&config.nutrition_data)?;
    info!(
        "Loaded {} ingredients from {:?}",
        table.len(),
        config.nutrition_data
    );

    let host = match &config.pinecone_host {
        Some(host) => host.clone(),
        None => {
            let control = PineconeControl::new(
                &config.pinecone_api_key,
                &config.pinecone_control_url,
                config.request_timeout,
            )?;
            control
                .ensure_index(
                    &config.pinecone_index,
                    config.embed_dimensions,
                    &config.pinecone_region,
                )
                .await
                .with_context(|| format!("Failed to resolve index {}", config.pinecone_index))?
        }
    };
    info!("Pinecone index {} at {}", config.pinecone_index, host);

    let retry = RetryPolicy::fixed(config.retry_attempts, config.retry_delay);
    let embedder = OpenAiEmbedder::new(
        &config.openai_api_key,
        &config.openai_base_url,
        &config.embedding_model,
        Some(config.embed_dimensions),
        config.request_timeout,
        retry.clone(),
    )?;
    let index = PineconeIndex::new(
        &config.pinecone_api_key,
        &host,
        &config.pinecone_namespace,
        config.request_timeout,
        retry,
    )?;

    let mapper = MappingPipeline::new(Arc::new(embedder), Arc::new(index), config.default_top_k);
    Ok(AppState::new(
        Arc::new(table),
        mapper,
        Arc::new(InMemoryCorrectionStore::new()),
        config.pinecone_index.clone(),
    ))
}

/// Build state and serve HTTP until the process is stopped.
pub async fn run(config: DaemonConfig) -> Result<()> {
    info!("Starting nutrimap daemon with {:?}", config);
    let state = build_state(&config).await?;
    serve(state, &config.bind_addr()).await
}

/// Serve an already-built state on `addr`.
pub async fn serve(state: AppState, addr: &str) -> Result<()> {
    let router = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("nutrimap daemon listening on http://{}", addr);

    axum::serve(listener, router).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        daemon: DaemonArgs,
    }

    fn config(data: &std::path::Path) -> DaemonConfig {
        TestCli::parse_from([
            "nutrimap-daemon",
            "--openai-api-key",
            "sk-test",
            "--pinecone-api-key",
            "pc-test",
            "--pinecone-index",
            "usda-foods",
            "--pinecone-host",
            "usda-foods-abc123.svc.pinecone.io",
            "--nutrition-data",
            data.to_str().unwrap(),
        ])
        .daemon
        .into_config()
        .unwrap()
    }

    #[tokio::test]
    async fn test_build_state_with_known_host() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"09003": {{"ingredientName": "Apples, raw, with skin", "nutrients": {{"Energ Kcal": 52.0}}}}}}"#
        )
        .unwrap();

        let state = build_state(&config(file.path())).await.unwrap();
        assert_eq!(state.table.len(), 1);
        assert_eq!(state.index_name, "usda-foods");
        assert_eq!(state.mapper.default_top_k(), 7);
        assert_eq!(state.mapper.model_name(), "text-embedding-3-large");
    }

    #[tokio::test]
    async fn test_build_state_missing_table() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nutrition_data.json");
        let err = build_state(&config(&missing)).await.err().unwrap();
        assert!(err.to_string().contains("nutrition_data.json"));
    }
}
