//! Bounded retry with exponential backoff
//!
//! Attempts run strictly one after another. Each attempt may be capped by a
//! deadline; an attempt that overruns it is dropped, which aborts the
//! in-flight request.

use std::future::Future;
use std::time::Duration;

use log::{debug, warn};

use super::ApiResult;
use crate::error::ApiError;

/// Retry schedule for a remote call
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Delay after the first failure; doubles after each further failure
    pub base_delay: Duration,
    /// Hard cap on a single attempt
    pub attempt_timeout: Option<Duration>,
}

impl RetryPolicy {
    /// Schedule used for the full-tree snapshot: 3 attempts, 1s then 2s
    /// between them, 10s per attempt.
    pub fn tree_snapshot() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
            attempt_timeout: Some(Duration::from_secs(10)),
        }
    }

    /// Delay to wait after the given (1-based) failed attempt.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.base_delay.saturating_mul(1 << exponent)
    }
}

/// Run `op` until it succeeds or the policy is exhausted.
///
/// Returns the last error when every attempt failed.
pub async fn retry<T, F, Fut>(policy: &RetryPolicy, context: &str, mut op: F) -> ApiResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ApiResult<T>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        debug!("{}: attempt {}/{}", context, attempt, max_attempts);

        let outcome = match policy.attempt_timeout {
            Some(limit) => match tokio::time::timeout(limit, op()).await {
                Ok(result) => result,
                Err(_) => Err(ApiError::Timeout(limit)),
            },
            None => op().await,
        };

        let err = match outcome {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if attempt >= max_attempts {
            warn!(
                "{}: giving up after {} attempts ({:?}): {}",
                context,
                attempt,
                err.reason(),
                err
            );
            return Err(err);
        }

        let delay = policy.delay_after(attempt);
        warn!(
            "{}: attempt {} failed ({:?}), retrying in {}ms: {}",
            context,
            attempt,
            err.reason(),
            delay.as_millis(),
            err
        );
        tokio::time::sleep(delay).await;
    }
}
