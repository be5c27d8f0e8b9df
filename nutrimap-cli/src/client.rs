//! HTTP client for a running nutrimap daemon.

use anyhow::{anyhow, Context, Result};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Error body returned by the daemon.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

/// Thin JSON client over the daemon's REST surface.
pub struct DaemonClient {
    http: Client,
    base_url: String,
}

impl DaemonClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET `path` with optional query parameters.
    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        tracing::debug!("GET {}", self.url(path));
        let response = self
            .http
            .get(self.url(path))
            .query(query)
            .send()
            .await
            .map_err(|e| self.connection_error(e))?;
        Self::decode(response).await
    }

    /// POST a JSON body to `path`.
    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        tracing::debug!("POST {}", self.url(path));
        let response = self
            .http
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| self.connection_error(e))?;
        Self::decode(response).await
    }

    fn connection_error(&self, err: reqwest::Error) -> anyhow::Error {
        if err.is_connect() || err.is_timeout() {
            anyhow!(
                "Cannot reach nutrimap daemon at {}: {}\nStart one with `nutrimap serve` or pass --daemon <url>.",
                self.base_url,
                err
            )
        } else {
            anyhow!("Request to {} failed: {}", self.base_url, err)
        }
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return response
                .json::<T>()
                .await
                .context("Failed to decode daemon response");
        }

        let text = response.text().await.unwrap_or_default();
        Err(anyhow!(error_message(status, &text)))
    }
}

/// Human-readable message for an error response.
fn error_message(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(err) => format!("{} ({})", err.detail, status),
        Err(_) if body.trim().is_empty() => format!("Daemon returned {}", status),
        Err(_) => format!("Daemon returned {}: {}", status, body.trim()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash() {
        let client = DaemonClient::new("http://localhost:5000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(client.url("/status"), "http://localhost:5000/status");
    }

    #[test]
    fn test_error_message_uses_detail() {
        let msg = error_message(
            StatusCode::NOT_FOUND,
            r#"{"detail":"Ingredient not found in nutrition_data"}"#,
        );
        assert_eq!(msg, "Ingredient not found in nutrition_data (404 Not Found)");
    }

    #[test]
    fn test_error_message_plain_body() {
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, "upstream down\n"),
            "Daemon returned 502 Bad Gateway: upstream down"
        );
        assert_eq!(
            error_message(StatusCode::INTERNAL_SERVER_ERROR, ""),
            "Daemon returned 500 Internal Server Error"
        );
    }
}
