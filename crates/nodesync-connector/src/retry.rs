//! Retry policy with exponential backoff.
//!
//! Some of the remote endpoints this service talks to are flaky enough that
//! a bounded transport-level retry is required to complete a run. The policy
//! here retries transport failures and throttling/server statuses with an
//! exponentially growing, capped backoff between attempts.

use std::time::Duration;

use tracing::warn;

use crate::error::{ConnectorError, ConnectorResult};

/// Configuration for retry behavior with exponential backoff.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts after the initial request.
    pub max_retries: u32,

    /// Initial backoff delay in milliseconds.
    pub initial_backoff_ms: u64,

    /// Maximum backoff delay in milliseconds.
    pub max_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 100,
            max_backoff_ms: 30_000,
        }
    }
}

impl RetryPolicy {
    /// Create a policy with a custom retry count.
    #[must_use]
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Default::default()
        }
    }

    /// Disable retries: every request gets exactly one attempt.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// Set the initial backoff.
    #[must_use]
    pub fn with_initial_backoff(mut self, ms: u64) -> Self {
        self.initial_backoff_ms = ms;
        self
    }

    /// Set the maximum backoff.
    #[must_use]
    pub fn with_max_backoff(mut self, ms: u64) -> Self {
        self.max_backoff_ms = ms;
        self
    }

    /// Whether a response status should trigger a retry.
    #[must_use]
    pub fn retryable_status(&self, status: u16) -> bool {
        matches!(status, 429 | 500 | 502 | 503 | 504)
    }

    /// Backoff duration before the given attempt (1-indexed), doubling from
    /// the initial delay and capped at the maximum.
    #[must_use]
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(63);
        let ms = self
            .initial_backoff_ms
            .saturating_mul(1u64 << exp)
            .min(self.max_backoff_ms);
        Duration::from_millis(ms)
    }
}

/// Send a request, retrying transport failures and retryable statuses
/// according to the policy.
///
/// The request is cloned per attempt; a request whose body cannot be cloned
/// (streaming) is sent exactly once regardless of the policy.
pub async fn send_with_retry(
    request: reqwest::RequestBuilder,
    policy: &RetryPolicy,
) -> ConnectorResult<reqwest::Response> {
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;

        let Some(this_attempt) = request.try_clone() else {
            return request
                .send()
                .await
                .map_err(|e| ConnectorError::transport_with_source("request failed", e));
        };

        match this_attempt.send().await {
            Ok(response) => {
                let status = response.status();
                if policy.retryable_status(status.as_u16()) && attempt <= policy.max_retries {
                    let backoff = policy.backoff(attempt);
                    warn!(
                        url = %response.url(),
                        status = %status,
                        attempt,
                        wait_ms = backoff.as_millis() as u64,
                        "retryable status, backing off"
                    );
                    tokio::time::sleep(backoff).await;
                    continue;
                }
                return Ok(response);
            }
            Err(e) => {
                if attempt <= policy.max_retries {
                    let backoff = policy.backoff(attempt);
                    warn!(
                        error = %e,
                        attempt,
                        wait_ms = backoff.as_millis() as u64,
                        "request failed, backing off"
                    );
                    tokio::time::sleep(backoff).await;
                    continue;
                }
                return Err(ConnectorError::transport_with_source(
                    format!("request failed after {attempt} attempts"),
                    e,
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_and_caps() {
        let policy = RetryPolicy::new(10)
            .with_initial_backoff(100)
            .with_max_backoff(1_000);

        assert_eq!(policy.backoff(1), Duration::from_millis(100));
        assert_eq!(policy.backoff(2), Duration::from_millis(200));
        assert_eq!(policy.backoff(3), Duration::from_millis(400));
        assert_eq!(policy.backoff(4), Duration::from_millis(800));
        assert_eq!(policy.backoff(5), Duration::from_millis(1_000));
        assert_eq!(policy.backoff(20), Duration::from_millis(1_000));
    }

    #[test]
    fn backoff_does_not_overflow_on_large_attempts() {
        let policy = RetryPolicy::new(u32::MAX).with_max_backoff(5_000);
        assert_eq!(policy.backoff(u32::MAX), Duration::from_millis(5_000));
    }

    #[test]
    fn retryable_statuses() {
        let policy = RetryPolicy::default();
        for status in [429u16, 500, 502, 503, 504] {
            assert!(policy.retryable_status(status));
        }
        for status in [200u16, 201, 400, 401, 404] {
            assert!(!policy.retryable_status(status));
        }
    }

    #[test]
    fn disabled_policy_has_no_retries() {
        assert_eq!(RetryPolicy::disabled().max_retries, 0);
    }
}
