//! Bounded retry schedule for storage node calls.

use std::time::Duration;

/// Retry schedule applied to transport failures on idempotent node calls.
///
/// Only `reqwest` transport errors (connection refused, timeout) are
/// retried. An HTTP response of any status ends the schedule immediately;
/// status handling belongs to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first. Zero disables retrying.
    pub max_retries: u32,
    /// Delay before the first retry, in milliseconds. Doubles with each
    /// further retry.
    pub base_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 200,
        }
    }
}

impl RetryPolicy {
    /// A schedule that never retries: one attempt, no sleeping.
    pub const fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay_ms: 0,
        }
    }

    /// Backoff before retry number `retry` (zero-based).
    fn backoff(&self, retry: u32) -> Duration {
        // Capped shift so a misconfigured retry count cannot overflow.
        let factor = 1u64 << retry.min(16);
        Duration::from_millis(self.base_delay_ms.saturating_mul(factor))
    }

    /// Drive `f` until it yields a response or the schedule is exhausted,
    /// surfacing the last transport error.
    pub(crate) async fn run<F, Fut>(
        &self,
        op: &'static str,
        f: F,
    ) -> Result<reqwest::Response, reqwest::Error>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<reqwest::Response, reqwest::Error>>,
    {
        let mut retries = 0;
        loop {
            let err = match f().await {
                Ok(resp) => return Ok(resp),
                Err(err) => err,
            };
            if retries >= self.max_retries {
                return Err(err);
            }
            let delay = self.backoff(retries);
            retries += 1;
            tracing::warn!(
                op,
                retry = retries,
                max_retries = self.max_retries,
                ?delay,
                "storage node call failed, backing off: {err}"
            );
            tokio::time::sleep(delay).await;
        }
    }
}
