//! Bounded retry with exponential backoff for idempotent reads.

use std::time::Duration;
use tracing::warn;

/// Retry policy. Applies only to idempotent reads; callers decide which
/// errors are retryable via the classifier closure.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retry attempts after the initial call.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Cap on any single delay.
    pub max_delay: Duration,
    /// Exponential multiplier.
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(5),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// No retries at all; useful in tests.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    fn delay_for(&self, attempt: u32) -> Duration {
        let factor = self.backoff_multiplier.powi(attempt as i32);
        let delay = self.initial_delay.mul_f64(factor);
        delay.min(self.max_delay)
    }
}

/// Runs `operation` up to `1 + max_retries` times, sleeping with exponential
/// backoff between attempts. Non-retryable errors (per `is_retryable`)
/// surface immediately.
pub async fn with_retry<T, E, F, Fut>(
    config: &RetryConfig,
    op_name: &str,
    is_retryable: fn(&E) -> bool,
    mut operation: F,
) -> Result<T, E>
where
    E: std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
{
    let mut attempt = 0u32;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < config.max_retries && is_retryable(&err) => {
                let delay = config.delay_for(attempt);
                warn!(
                    op = op_name,
                    attempt = attempt + 1,
                    max_retries = config.max_retries,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "Retrying after transient failure"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Debug)]
    struct Transient;

    impl std::fmt::Display for Transient {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "transient")
        }
    }

    #[tokio::test]
    async fn test_retries_until_success() {
        let calls = AtomicU32::new(0);
        let config = RetryConfig {
            max_retries: 3,
            initial_delay: Duration::from_millis(1),
            ..Default::default()
        };

        let result: Result<u32, Transient> =
            with_retry(&config, "test", |_| true, || async {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                if n < 2 { Err(Transient) } else { Ok(n) }
            })
            .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhausted_retries_surface_error() {
        let calls = AtomicU32::new(0);
        let config = RetryConfig {
            max_retries: 2,
            initial_delay: Duration::from_millis(1),
            ..Default::default()
        };

        let result: Result<u32, Transient> =
            with_retry(&config, "test", |_| true, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(Transient)
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_non_retryable_fails_fast() {
        let calls = AtomicU32::new(0);
        let config = RetryConfig::default();

        let result: Result<u32, Transient> =
            with_retry(&config, "test", |_| false, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(Transient)
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_delay_is_capped() {
        let config = RetryConfig {
            max_retries: 10,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(5),
            backoff_multiplier: 10.0,
        };
        assert_eq!(config.delay_for(4), Duration::from_secs(5));
    }
}
