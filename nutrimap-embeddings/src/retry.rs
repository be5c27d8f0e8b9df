//! Bounded retry for remote calls.
//!
//! Both remote clients share one policy type. The default is the fixed
//! interval the service has always used: five attempts, five seconds apart,
//! no jitter.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::{Result, UpstreamError};

/// Default number of attempts per remote call.
pub const DEFAULT_MAX_ATTEMPTS: usize = 5;

/// Default pause between attempts.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Delay schedule between attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backoff {
    /// Same pause after every failure.
    Fixed(Duration),
    /// `base * 2^(attempt - 1)`, capped at `max`.
    Exponential {
        /// Pause after the first failure.
        base: Duration,
        /// Upper bound on any single pause.
        max: Duration,
    },
}

impl Backoff {
    /// Pause after the given (1-based) failed attempt.
    pub fn delay(&self, attempt: usize) -> Duration {
        match self {
            Backoff::Fixed(delay) => *delay,
            Backoff::Exponential { base, max } => {
                let shift = attempt.saturating_sub(1).min(16) as u32;
                base.saturating_mul(1 << shift).min(*max)
            }
        }
    }
}

/// How many times to try a remote call and how long to wait in between.
///
/// Only errors for which [`UpstreamError::is_retryable`] holds (HTTP 429,
/// HTTP 5xx, transport failures) are retried. Anything else, such as a 401
/// or a dimension mismatch, is returned unchanged after the first attempt
/// and is never wrapped in [`UpstreamError::ExhaustedRetries`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: usize,
    backoff: Backoff,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::fixed(DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY)
    }
}

impl RetryPolicy {
    /// Fixed-interval policy. At least one attempt is always made.
    pub fn fixed(max_attempts: usize, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff: Backoff::Fixed(delay),
        }
    }

    /// Exponential policy. At least one attempt is always made.
    pub fn exponential(max_attempts: usize, base: Duration, max: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff: Backoff::Exponential { base, max },
        }
    }

    /// Single attempt, no retries.
    pub fn none() -> Self {
        Self::fixed(1, Duration::ZERO)
    }

    /// Maximum number of attempts.
    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Delay schedule.
    pub fn backoff(&self) -> &Backoff {
        &self.backoff
    }

    /// Run `call` until it succeeds, fails with a non-retryable error, or the
    /// attempt budget is spent.
    ///
    /// `call` receives the 1-based attempt number. Each retryable failure is
    /// logged before sleeping; there is no sleep after the final attempt.
    ///
    /// # Errors
    ///
    /// Non-retryable errors are returned as-is. When every attempt fails,
    /// returns [`UpstreamError::ExhaustedRetries`] wrapping the last error.
    pub async fn run<T, F, Fut>(&self, operation: &str, mut call: F) -> Result<T>
    where
        F: FnMut(usize) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0usize;
        loop {
            attempt += 1;
            let err = match call(attempt).await {
                Ok(value) => return Ok(value),
                Err(err) if !err.is_retryable() => return Err(err),
                Err(err) => err,
            };

            warn!(
                "Error in {} (attempt {}/{}): {}",
                operation, attempt, self.max_attempts, err
            );
            if attempt >= self.max_attempts {
                return Err(UpstreamError::ExhaustedRetries {
                    operation: operation.to_string(),
                    attempts: attempt,
                    last_error: Box::new(err),
                });
            }

            let delay = self.backoff.delay(attempt);
            tracing::debug!("Retrying {} in {:?}", operation, delay);
            tokio::time::sleep(delay).await;
        }
    }
}
