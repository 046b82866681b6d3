use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep_until};

/// Spaces out consecutive provider calls.
#[async_trait]
pub trait Pacer: Send + Sync + Debug {
    async fn pace(&self);
}

/// Guarantees at least `interval` between the starts of two paced calls.
#[derive(Debug)]
pub struct IntervalPacer {
    interval: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl IntervalPacer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_call: Mutex::new(None),
        }
    }
}

#[async_trait]
impl Pacer for IntervalPacer {
    async fn pace(&self) {
        let mut last_call = self.last_call.lock().await;
        if let Some(previous) = *last_call {
            sleep_until(previous + self.interval).await;
        }
        *last_call = Some(Instant::now());
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoPacing;

#[async_trait]
impl Pacer for NoPacing {
    async fn pace(&self) {}
}
