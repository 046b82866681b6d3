use std::time::Duration;

use tracing::warn;

use crate::riot::RiotApiResponse;

/// Bounded retry for transient provider failures (429/503/504).
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    max_retries: u32,
    backoff: Duration,
}

impl RetryPolicy {
    pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(120);

    /// One retry after `backoff`, unless the provider sent a `Retry-After` hint.
    pub fn new(backoff: Duration) -> Self {
        Self {
            max_retries: 1,
            backoff,
        }
    }

    pub async fn run<T, F, Fut>(&self, operation: &'static str, mut call: F) -> RiotApiResponse<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = RiotApiResponse<T>>,
    {
        let mut retries = 0;
        loop {
            match call().await {
                Err(e) if e.is_transient() && retries < self.max_retries => {
                    retries += 1;
                    let wait = e.retry_after().unwrap_or(self.backoff);
                    warn!(
                        operation,
                        retries,
                        wait_secs = wait.as_secs(),
                        error = %e,
                        "⏳ Transient Riot API error, backing off"
                    );
                    tokio::time::sleep(wait).await;
                }
                result => return result,
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BACKOFF)
    }
}
