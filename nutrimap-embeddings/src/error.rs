//! Error types for nutrimap-embeddings.

use thiserror::Error;

/// Result type alias for remote client operations.
pub type Result<T> = std::result::Result<T, UpstreamError>;

/// Errors raised while talking to the embedding service or the vector index.
#[derive(Error, Debug)]
pub enum UpstreamError {
    /// The service answered with a non-success status.
    #[error("{service} request failed ({status}): {body}")]
    Http {
        /// Service that produced the response.
        service: &'static str,
        /// HTTP status code.
        status: u16,
        /// Response body, for diagnostics.
        body: String,
    },

    /// The request never produced a response (connect, timeout, body).
    #[error("{service} transport error: {message}")]
    Transport {
        /// Service that was being called.
        service: &'static str,
        /// Description of the transport failure.
        message: String,
        /// Whether the failure is worth another attempt.
        retryable: bool,
    },

    /// The response could not be decoded into the expected shape.
    #[error("{service} returned a malformed response: {message}")]
    Decode {
        /// Service that produced the response.
        service: &'static str,
        /// Description of the decoding failure.
        message: String,
    },

    /// The embedding length differs from the configured dimensionality.
    #[error("Embedding has {actual} dimensions, expected {expected}")]
    DimensionMismatch {
        /// Configured dimensionality.
        expected: usize,
        /// Length of the vector actually returned.
        actual: usize,
    },

    /// Every attempt allowed by the retry policy failed.
    #[error("Exceeded maximum retries ({attempts}) in {operation}: {last_error}")]
    ExhaustedRetries {
        /// Name of the retried operation.
        operation: String,
        /// Number of attempts made.
        attempts: usize,
        /// Error from the final attempt.
        last_error: Box<UpstreamError>,
    },

    /// The client could not be built from the supplied settings.
    #[error("Invalid client configuration: {message}")]
    Config {
        /// Description of the configuration problem.
        message: String,
    },
}

impl UpstreamError {
    /// Rate limits, server errors and transport failures are transient.
    pub fn is_retryable(&self) -> bool {
        match self {
            UpstreamError::Http { status, .. } => *status == 429 || (500..600).contains(status),
            UpstreamError::Transport { retryable, .. } => *retryable,
            _ => false,
        }
    }

    /// Wrap a reqwest error raised before a response was received.
    pub fn transport(service: &'static str, err: reqwest::Error) -> Self {
        let retryable = err.is_timeout() || err.is_connect() || err.is_request() || err.is_body();
        UpstreamError::Transport {
            service,
            message: err.to_string(),
            retryable,
        }
    }

    /// Build a [`UpstreamError::Decode`].
    pub fn decode(service: &'static str, message: impl ToString) -> Self {
        UpstreamError::Decode {
            service,
            message: message.to_string(),
        }
    }

    /// Build a [`UpstreamError::Config`].
    pub fn config(message: impl Into<String>) -> Self {
        UpstreamError::Config {
            message: message.into(),
        }
    }

    /// True when the retry budget ran out.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, UpstreamError::ExhaustedRetries { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http(status: u16) -> UpstreamError {
        UpstreamError::Http {
            service: "openai",
            status,
            body: String::new(),
        }
    }

    #[test]
    fn test_retryable_classification() {
        assert!(http(429).is_retryable());
        assert!(http(500).is_retryable());
        assert!(http(503).is_retryable());
        assert!(!http(400).is_retryable());
        assert!(!http(401).is_retryable());
        assert!(!UpstreamError::decode("openai", "bad json").is_retryable());
        assert!(!UpstreamError::DimensionMismatch {
            expected: 3072,
            actual: 1536
        }
        .is_retryable());
    }

    #[test]
    fn test_error_display() {
        let err = UpstreamError::ExhaustedRetries {
            operation: "get_embedding".to_string(),
            attempts: 5,
            last_error: Box::new(http(429)),
        };
        let msg = err.to_string();
        assert!(msg.contains("get_embedding"));
        assert!(msg.contains("5"));
        assert!(msg.contains("429"));
        assert!(err.is_exhausted());
    }
}
