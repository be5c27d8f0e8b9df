//! OpenAI-compatible embedding client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{Result, UpstreamError};
use crate::provider::Embedder;
use crate::retry::RetryPolicy;

const SERVICE: &str = "openai";

/// Embeddings client that talks to `{base_url}/embeddings`.
#[derive(Clone)]
pub struct OpenAiEmbedder {
    client: Client,
    endpoint: String,
    model: String,
    dimension: Option<usize>,
    retry: RetryPolicy,
}

impl OpenAiEmbedder {
    /// Builds a new embeddings client.
    ///
    /// `dimension`, when set, is checked against every returned vector.
    pub fn new(
        api_key: &str,
        base_url: &str,
        model: &str,
        dimension: Option<usize>,
        timeout: Duration,
        retry: RetryPolicy,
    ) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(UpstreamError::config("missing OpenAI API key"));
        }
        if model.trim().is_empty() {
            return Err(UpstreamError::config("missing embedding model name"));
        }
        let mut headers = HeaderMap::new();
        let auth = format!("Bearer {}", api_key.trim());
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth)
                .map_err(|_| UpstreamError::config("invalid OpenAI API key"))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| UpstreamError::config(format!("failed to build OpenAI HTTP client: {}", e)))?;
        Ok(Self {
            client,
            endpoint: format!("{}/embeddings", base_url.trim_end_matches('/')),
            model: model.trim().to_string(),
            dimension,
            retry,
        })
    }

    /// Full URL embeddings are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn request(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbeddingRequest {
            model: &self.model,
            input: [text],
        };
        let resp = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| UpstreamError::transport(SERVICE, e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(UpstreamError::Http {
                service: SERVICE,
                status: status.as_u16(),
                body,
            });
        }

        let parsed: EmbeddingResponse = resp
            .json()
            .await
            .map_err(|e| UpstreamError::decode(SERVICE, e))?;
        let embedding = parsed
            .data
            .into_iter()
            .min_by_key(|entry| entry.index)
            .map(|entry| entry.embedding)
            .ok_or_else(|| UpstreamError::decode(SERVICE, "response contained no embeddings"))?;

        if let Some(expected) = self.dimension {
            if embedding.len() != expected {
                return Err(UpstreamError::DimensionMismatch {
                    expected,
                    actual: embedding.len(),
                });
            }
        }
        Ok(embedding)
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.retry
            .run("get_embedding", move |_| self.request(text))
            .await
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimension(&self) -> Option<usize> {
        self.dimension
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: [&'a str; 1],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    #[serde(default)]
    index: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn embedder(server: &MockServer, dimension: Option<usize>) -> OpenAiEmbedder {
        OpenAiEmbedder::new(
            "sk-test",
            &format!("{}/v1", server.uri()),
            "text-embedding-3-large",
            dimension,
            Duration::from_secs(5),
            RetryPolicy::fixed(5, Duration::ZERO),
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_missing_key() {
        let err = OpenAiEmbedder::new(
            "  ",
            "https://api.openai.com/v1",
            "m",
            None,
            Duration::from_secs(1),
            RetryPolicy::default(),
        )
        .err()
        .unwrap();
        assert!(matches!(err, UpstreamError::Config { .. }));
    }

    #[test]
    fn test_endpoint_trims_slash() {
        let e = OpenAiEmbedder::new(
            "sk",
            "https://api.openai.com/v1/",
            "m",
            None,
            Duration::from_secs(1),
            RetryPolicy::default(),
        )
        .unwrap();
        assert_eq!(e.endpoint(), "https://api.openai.com/v1/embeddings");
    }

    #[tokio::test]
    async fn test_embed_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/embeddings"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_json(serde_json::json!({
                "model": "text-embedding-3-large",
                "input": ["green apple"]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{"embedding": [0.25, -0.5, 1.0], "index": 0}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let vector = embedder(&server, Some(3)).embed("green apple").await.unwrap();
        assert_eq!(vector, vec![0.25, -0.5, 1.0]);
    }

    #[tokio::test]
    async fn test_embed_retries_then_exhausts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/embeddings"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .expect(5)
            .mount(&server)
            .await;

        let err = embedder(&server, None).embed("salt").await.unwrap_err();
        match err {
            UpstreamError::ExhaustedRetries { attempts, .. } => assert_eq!(attempts, 5),
            other => panic!("expected ExhaustedRetries, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_embed_does_not_retry_auth_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/embeddings"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
            .expect(1)
            .mount(&server)
            .await;

        let err = embedder(&server, None).embed("salt").await.unwrap_err();
        assert!(matches!(err, UpstreamError::Http { status: 401, .. }));
    }

    #[tokio::test]
    async fn test_embed_dimension_mismatch() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/embeddings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{"embedding": [0.1, 0.2], "index": 0}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = embedder(&server, Some(3072)).embed("salt").await.unwrap_err();
        assert!(matches!(
            err,
            UpstreamError::DimensionMismatch {
                expected: 3072,
                actual: 2
            }
        ));
    }

    #[tokio::test]
    async fn test_embed_empty_data_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/embeddings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": []})))
            .mount(&server)
            .await;

        let err = embedder(&server, None).embed("salt").await.unwrap_err();
        assert!(matches!(err, UpstreamError::Decode { .. }));
    }
}
