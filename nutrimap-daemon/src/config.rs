//! Daemon configuration.
//!
//! Every setting is a clap argument with an environment fallback, so the
//! service can be configured from flags, the process environment or a
//! `.env` file loaded at startup.

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use thiserror::Error;

use crate::mapping::MAX_TOP_K;

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 5000;

/// Default number of candidates returned per mapping.
pub const DEFAULT_TOP_K: usize = 7;

/// Startup configuration problems. All of them abort before serving.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Missing required setting {name} (set {env} or pass --{flag})")]
    Missing {
        name: &'static str,
        env: &'static str,
        flag: &'static str,
    },

    #[error("Invalid value for {name}: {message}")]
    Invalid { name: &'static str, message: String },
}

/// Daemon arguments, shared by the `nutrimap-daemon` binary and
/// `nutrimap serve`.
#[derive(Args, Debug, Clone)]
pub struct DaemonArgs {
    /// Address to bind
    #[arg(long, env = "NUTRIMAP_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// HTTP port to listen on
    #[arg(short, long, env = "NUTRIMAP_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// OpenAI API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// Base URL of the OpenAI-compatible API
    #[arg(long, env = "OPENAI_BASE_URL", default_value = nutrimap_embeddings::DEFAULT_OPENAI_BASE_URL)]
    pub openai_base_url: String,

    /// Embedding model name
    #[arg(long, env = "EMBEDDING_MODEL", default_value = nutrimap_embeddings::DEFAULT_MODEL)]
    pub embedding_model: String,

    /// Expected embedding dimensionality
    #[arg(long, env = "EMBED_DIMENSIONS", default_value_t = nutrimap_embeddings::DEFAULT_EMBEDDING_DIM)]
    pub embed_dimensions: usize,

    /// Pinecone API key
    #[arg(long, env = "PINECONE_API_KEY", hide_env_values = true)]
    pub pinecone_api_key: Option<String>,

    /// Pinecone serverless region used when the index is created
    #[arg(long, env = "PINECONE_ENV", default_value = "us-east-1")]
    pub pinecone_env: String,

    /// Pinecone index name
    #[arg(long = "pinecone-index", env = "PINECONE_INDEX_NAME")]
    pub pinecone_index: Option<String>,

    /// Namespace inside the index
    #[arg(long, env = "PINECONE_NAMESPACE", default_value = "")]
    pub pinecone_namespace: String,

    /// Index host; skips the control plane lookup when set
    #[arg(long, env = "PINECONE_HOST")]
    pub pinecone_host: Option<String>,

    /// Pinecone control plane URL
    #[arg(long, env = "PINECONE_CONTROL_URL", default_value = nutrimap_embeddings::DEFAULT_CONTROL_URL)]
    pub pinecone_control_url: String,

    /// Path to the nutrient table snapshot (JSON)
    #[arg(long, env = "NUTRITION_DATA_PATH", default_value = "data/nutrition_data.json")]
    pub nutrition_data: PathBuf,

    /// Attempts per remote call
    #[arg(long, env = "NUTRIMAP_RETRY_ATTEMPTS", default_value_t = 5)]
    pub retry_attempts: usize,

    /// Seconds between attempts
    #[arg(long, env = "NUTRIMAP_RETRY_DELAY_SECS", default_value_t = 5)]
    pub retry_delay_secs: u64,

    /// Per-request timeout for remote calls, in seconds
    #[arg(long, env = "NUTRIMAP_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// Candidates returned when a request omits top_k
    #[arg(long, default_value_t = DEFAULT_TOP_K)]
    pub default_top_k: usize,
}

impl DaemonArgs {
    /// Resolve and validate into a [`DaemonConfig`].
    pub fn into_config(self) -> Result<DaemonConfig, ConfigError> {
        let config = DaemonConfig {
            host: self.host,
            port: self.port,
            openai_api_key: required(self.openai_api_key, "OpenAI API key", "OPENAI_API_KEY", "openai-api-key")?,
            openai_base_url: self.openai_base_url,
            embedding_model: self.embedding_model,
            embed_dimensions: self.embed_dimensions,
            pinecone_api_key: required(self.pinecone_api_key, "Pinecone API key", "PINECONE_API_KEY", "pinecone-api-key")?,
            pinecone_region: self.pinecone_env,
            pinecone_index: required(self.pinecone_index, "Pinecone index name", "PINECONE_INDEX_NAME", "pinecone-index")?,
            pinecone_namespace: self.pinecone_namespace,
            pinecone_host: self.pinecone_host.filter(|h| !h.trim().is_empty()),
            pinecone_control_url: self.pinecone_control_url,
            nutrition_data: self.nutrition_data,
            retry_attempts: self.retry_attempts,
            retry_delay: Duration::from_secs(self.retry_delay_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            default_top_k: self.default_top_k,
        };
        config.validate()?;
        Ok(config)
    }
}

fn required(
    value: Option<String>,
    name: &'static str,
    env: &'static str,
    flag: &'static str,
) -> Result<String, ConfigError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(ConfigError::Missing { name, env, flag }),
    }
}

/// Resolved daemon settings.
#[derive(Clone)]
pub struct DaemonConfig {
    pub host: String,
    pub port: u16,
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub embedding_model: String,
    pub embed_dimensions: usize,
    pub pinecone_api_key: String,
    pub pinecone_region: String,
    pub pinecone_index: String,
    pub pinecone_namespace: String,
    pub pinecone_host: Option<String>,
    pub pinecone_control_url: String,
    pub nutrition_data: PathBuf,
    pub retry_attempts: usize,
    pub retry_delay: Duration,
    pub request_timeout: Duration,
    pub default_top_k: usize,
}

// Keys stay out of logs.
impl std::fmt::Debug for DaemonConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DaemonConfig")
            .field("bind", &self.bind_addr())
            .field("embedding_model", &self.embedding_model)
            .field("embed_dimensions", &self.embed_dimensions)
            .field("pinecone_index", &self.pinecone_index)
            .field("pinecone_namespace", &self.pinecone_namespace)
            .field("pinecone_host", &self.pinecone_host)
            .field("nutrition_data", &self.nutrition_data)
            .field("retry_attempts", &self.retry_attempts)
            .field("retry_delay", &self.retry_delay)
            .field("default_top_k", &self.default_top_k)
            .finish_non_exhaustive()
    }
}

impl DaemonConfig {
    /// Check credentials and numeric bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (value, name, env, flag) in [
            (&self.openai_api_key, "OpenAI API key", "OPENAI_API_KEY", "openai-api-key"),
            (&self.pinecone_api_key, "Pinecone API key", "PINECONE_API_KEY", "pinecone-api-key"),
            (&self.pinecone_index, "Pinecone index name", "PINECONE_INDEX_NAME", "pinecone-index"),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Missing { name, env, flag });
            }
        }
        if self.embedding_model.trim().is_empty() {
            return Err(ConfigError::Invalid {
                name: "EMBEDDING_MODEL",
                message: "must not be empty".to_string(),
            });
        }
        if self.embed_dimensions == 0 {
            return Err(ConfigError::Invalid {
                name: "EMBED_DIMENSIONS",
                message: "must be greater than zero".to_string(),
            });
        }
        if self.retry_attempts == 0 {
            return Err(ConfigError::Invalid {
                name: "NUTRIMAP_RETRY_ATTEMPTS",
                message: "at least one attempt is required".to_string(),
            });
        }
        if self.default_top_k == 0 || self.default_top_k > MAX_TOP_K {
            return Err(ConfigError::Invalid {
                name: "default-top-k",
                message: format!("must be between 1 and {}, got {}", MAX_TOP_K, self.default_top_k),
            });
        }
        Ok(())
    }

    /// `host:port` to bind.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
