use std::fmt;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{Duration, Instant};

use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use nonzero_ext::nonzero;
use reqwest::header::RETRY_AFTER;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::region::{Platform, Region};
use super::types::{RiotApiError, RiotApiResponse};

#[derive(Clone)]
pub struct RiotClient {
    http: reqwest::Client,
    limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
    api_key: String,
    /// Account-v1 and TFT-Match-v1 host.
    regional_base: String,
    /// TFT-League-v1 host.
    platform_base: String,
}

impl fmt::Debug for RiotClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RiotClient")
            .field("regional_base", &self.regional_base)
            .field("platform_base", &self.platform_base)
            .finish_non_exhaustive()
    }
}

impl RiotClient {
    pub fn new(
        api_key: String,
        region: Region,
        platform: Platform,
        requests_per_second: NonZeroU32,
    ) -> Self {
        Self::with_base_urls(
            api_key,
            region.base_url(),
            platform.base_url(),
            requests_per_second,
        )
    }

    /// Points the client at arbitrary hosts, e.g. a local mock server.
    pub fn with_base_urls(
        api_key: String,
        regional_base: String,
        platform_base: String,
        requests_per_second: NonZeroU32,
    ) -> Self {
        let quota = Quota::per_second(requests_per_second).allow_burst(nonzero!(20u32));

        Self {
            http: reqwest::Client::new(),
            limiter: Arc::new(RateLimiter::direct(quota)),
            api_key,
            regional_base: regional_base.trim_end_matches('/').to_string(),
            platform_base: platform_base.trim_end_matches('/').to_string(),
        }
    }

    pub(crate) fn regional_base(&self) -> &str {
        &self.regional_base
    }

    pub(crate) fn platform_base(&self) -> &str {
        &self.platform_base
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, url: &str) -> RiotApiResponse<T> {
        self.limiter.until_ready().await;

        let started = Instant::now();
        let res = self
            .http
            .get(url)
            .header("X-Riot-Token", &self.api_key)
            .send()
            .await?;

        let status = res.status();
        debug!(
            %url,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "🛰️ Riot API call"
        );

        if !status.is_success() {
            let retry_after = res
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs);

            let err = RiotApiError::from_status(status, retry_after);
            if err.is_transient() {
                warn!(%url, status = status.as_u16(), ?retry_after, "⏳ Riot API throttled or unavailable");
            }
            return Err(err);
        }

        let bytes = res.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
