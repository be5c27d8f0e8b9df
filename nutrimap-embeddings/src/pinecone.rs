//! Pinecone REST clients.
//!
//! [`PineconeIndex`] runs nearest-neighbor queries against one index host
//! (data plane). [`PineconeControl`] talks to the control plane and is only
//! needed at startup to resolve, or create, the index.

use std::time::Duration;

use async_trait::async_trait;
use nutrimap_core::RawMatch;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, UpstreamError};
use crate::provider::VectorIndex;
use crate::retry::RetryPolicy;

const SERVICE: &str = "pinecone";

/// REST API version pinned in every request.
pub const PINECONE_API_VERSION: &str = "2024-07";

/// Default control plane endpoint.
pub const DEFAULT_CONTROL_URL: &str = "https://api.pinecone.io";

/// Distance metric used when the index is created.
pub const INDEX_METRIC: &str = "cosine";

/// Serverless cloud used when the index is created.
pub const INDEX_CLOUD: &str = "aws";

fn build_client(api_key: &str, timeout: Duration) -> Result<Client> {
    if api_key.trim().is_empty() {
        return Err(UpstreamError::config("missing Pinecone API key"));
    }
    let mut headers = HeaderMap::new();
    headers.insert(
        "api-key",
        HeaderValue::from_str(api_key.trim())
            .map_err(|_| UpstreamError::config("invalid Pinecone API key"))?,
    );
    headers.insert(
        "x-pinecone-api-version",
        HeaderValue::from_static(PINECONE_API_VERSION),
    );
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Client::builder()
        .timeout(timeout)
        .default_headers(headers)
        .build()
        .map_err(|e| UpstreamError::config(format!("failed to build Pinecone HTTP client: {}", e)))
}

/// Index hosts come back bare (`name-xyz.svc.pinecone.io`); tests and
/// local emulators pass a full URL.
fn host_url(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    }
}

async fn error_body(resp: reqwest::Response) -> String {
    resp.text()
        .await
        .unwrap_or_else(|_| "<body unavailable>".to_string())
}

/// Query client bound to a single index host and namespace.
#[derive(Clone)]
pub struct PineconeIndex {
    client: Client,
    query_url: String,
    namespace: String,
    retry: RetryPolicy,
}

impl PineconeIndex {
    /// Builds a query client for `host`.
    pub fn new(
        api_key: &str,
        host: &str,
        namespace: &str,
        timeout: Duration,
        retry: RetryPolicy,
    ) -> Result<Self> {
        if host.trim().is_empty() {
            return Err(UpstreamError::config("missing Pinecone index host"));
        }
        Ok(Self {
            client: build_client(api_key, timeout)?,
            query_url: format!("{}/query", host_url(host)),
            namespace: namespace.to_string(),
            retry,
        })
    }

    /// Full URL queries are posted to.
    pub fn query_url(&self) -> &str {
        &self.query_url
    }

    async fn request(&self, vector: &[f32], top_k: usize) -> Result<Vec<RawMatch>> {
        let body = QueryRequest {
            vector,
            top_k,
            namespace: &self.namespace,
            include_metadata: true,
        };
        let resp = self
            .client
            .post(&self.query_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| UpstreamError::transport(SERVICE, e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(UpstreamError::Http {
                service: SERVICE,
                status: status.as_u16(),
                body: error_body(resp).await,
            });
        }

        let parsed: QueryResponse = resp
            .json()
            .await
            .map_err(|e| UpstreamError::decode(SERVICE, e))?;
        Ok(parsed.matches)
    }
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<RawMatch>> {
        self.retry
            .run("query_index", move |_| self.request(vector, top_k))
            .await
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    namespace: &'a str,
    include_metadata: bool,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<RawMatch>,
}

/// Description of an index as reported by the control plane.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IndexDescription {
    /// Index name.
    pub name: String,
    /// Data plane host, without scheme.
    #[serde(default)]
    pub host: String,
    /// Vector dimensionality.
    #[serde(default)]
    pub dimension: Option<usize>,
    /// Distance metric.
    #[serde(default)]
    pub metric: Option<String>,
}

/// Control plane client used to resolve or create the index at startup.
#[derive(Clone)]
pub struct PineconeControl {
    client: Client,
    base_url: String,
}

impl PineconeControl {
    /// Builds a control plane client. `base_url` is normally
    /// [`DEFAULT_CONTROL_URL`].
    pub fn new(api_key: &str, base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(api_key, timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Look up an index by name. `Ok(None)` when it does not exist.
    pub async fn describe_index(&self, name: &str) -> Result<Option<IndexDescription>> {
        let url = format!("{}/indexes/{}", self.base_url, name);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| UpstreamError::transport(SERVICE, e))?;

        match resp.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => resp
                .json()
                .await
                .map(Some)
                .map_err(|e| UpstreamError::decode(SERVICE, e)),
            status => Err(UpstreamError::Http {
                service: SERVICE,
                status: status.as_u16(),
                body: error_body(resp).await,
            }),
        }
    }

    /// Create a serverless cosine index.
    pub async fn create_index(
        &self,
        name: &str,
        dimension: usize,
        region: &str,
    ) -> Result<IndexDescription> {
        let body = serde_json::json!({
            "name": name,
            "dimension": dimension,
            "metric": INDEX_METRIC,
            "spec": {
                "serverless": {
                    "cloud": INDEX_CLOUD,
                    "region": region,
                }
            }
        });
        let resp = self
            .client
            .post(format!("{}/indexes", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| UpstreamError::transport(SERVICE, e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(UpstreamError::Http {
                service: SERVICE,
                status: status.as_u16(),
                body: error_body(resp).await,
            });
        }
        resp.json()
            .await
            .map_err(|e| UpstreamError::decode(SERVICE, e))
    }

    /// Return the host of `name`, creating the index first if needed.
    pub async fn ensure_index(&self, name: &str, dimension: usize, region: &str) -> Result<String> {
        let description = match self.describe_index(name).await? {
            Some(existing) => {
                info!("Using existing Pinecone index {}", name);
                existing
            }
            None => {
                info!(
                    "Creating Pinecone index {} (dimension {}, {} {})",
                    name, dimension, INDEX_CLOUD, region
                );
                self.create_index(name, dimension, region).await?
            }
        };
        if description.host.is_empty() {
            return Err(UpstreamError::decode(
                SERVICE,
                format!("index {} has no host yet", name),
            ));
        }
        Ok(description.host)
    }
}
