//! Bounded retry with exponential backoff for rate-limited requests.
//!
//! Only `TransportError::RateLimited` is retried. Connection failures,
//! timeouts and other status codes are returned on first occurrence so
//! the caller sees them without added latency.

use std::future::Future;
use std::time::Duration;

use parley_config::RetrySettings;
use tracing::warn;

use crate::TransportError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    /// `max_attempts` counts the first call; values below 1 are raised to 1.
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// Sleep before the `retry`-th retry (1-based): `base * 2^(retry - 1)`.
    pub fn delay_before_retry(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        self.base_delay.saturating_mul(factor)
    }

    /// Run `op`, retrying while it reports `RateLimited`.
    ///
    /// Returns the first non-rate-limited outcome, or `RateLimited` once
    /// `max_attempts` calls have all been rate limited.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, TransportError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, TransportError>>,
    {
        let mut attempt = 1;
        loop {
            match op().await {
                Err(TransportError::RateLimited) if attempt < self.max_attempts => {
                    let delay = self.delay_before_retry(attempt);
                    warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        "rate limited, backing off"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                outcome => return outcome,
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetrySettings::default().into()
    }
}

impl From<RetrySettings> for RetryPolicy {
    fn from(settings: RetrySettings) -> Self {
        Self::new(settings.max_attempts, settings.base_delay)
    }
}
