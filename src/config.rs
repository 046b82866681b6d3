use std::env;
use std::num::NonZeroU32;
use std::time::Duration;

use crate::error::AppError;
use crate::riot::{Platform, Region};

#[derive(Debug, Clone)]
pub struct Config {
    pub riot_api_key: String,
    pub database_url: String,
    pub riot_rate_limit_per_second: NonZeroU32,
    pub riot_region: Region,
    pub riot_platform: Platform,
    pub match_fetch_delay: Duration,
    pub riot_retry_backoff: Duration,
    pub entry_conflict_max_attempts: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        const DEFAULT_RIOT_RATE_LIMIT_PER_SECOND: u32 = 20;
        const DEFAULT_MATCH_FETCH_DELAY_MS: u64 = 51;
        const DEFAULT_RIOT_RETRY_BACKOFF_SECS: u64 = 120;
        const DEFAULT_ENTRY_CONFLICT_MAX_ATTEMPTS: u32 = 5;

        let riot_api_key = env::var("RIOT_API_KEY")
            .map_err(|_| AppError::Config("RIOT_API_KEY must be set".into()))?;

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:tft-rivals.db".into());

        let riot_rate_limit_per_second = env::var("RIOT_RATE_LIMIT_PER_SECOND")
            .ok()
            .and_then(|v| v.parse().ok())
            .and_then(NonZeroU32::new)
            .unwrap_or_else(|| {
                NonZeroU32::new(DEFAULT_RIOT_RATE_LIMIT_PER_SECOND).unwrap_or(NonZeroU32::MIN)
            });

        let riot_platform = match env::var("RIOT_PLATFORM") {
            Ok(v) => v.parse()?,
            Err(_) => Platform::KR,
        };

        let requested_region = match env::var("RIOT_REGION") {
            Ok(v) => Some(v.parse()?),
            Err(_) => None,
        };
        let riot_region = routing_region(riot_platform, requested_region)?;

        let match_fetch_delay = Duration::from_millis(
            env::var("MATCH_FETCH_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MATCH_FETCH_DELAY_MS),
        );

        let riot_retry_backoff = Duration::from_secs(
            env::var("RIOT_RETRY_BACKOFF_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_RIOT_RETRY_BACKOFF_SECS),
        );

        let entry_conflict_max_attempts = env::var("ENTRY_CONFLICT_MAX_ATTEMPTS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_ENTRY_CONFLICT_MAX_ATTEMPTS);

        Ok(Self {
            riot_api_key,
            database_url,
            riot_rate_limit_per_second,
            riot_region,
            riot_platform,
            match_fetch_delay,
            riot_retry_backoff,
            entry_conflict_max_attempts,
        })
    }
}

/// Matches live in the platform's own cluster, so an explicit region must agree with it.
fn routing_region(platform: Platform, requested: Option<Region>) -> Result<Region, AppError> {
    let region = platform.region();
    match requested {
        Some(r) if r != region => Err(AppError::Config(format!(
            "RIOT_REGION={r} does not serve RIOT_PLATFORM={platform} (expected {region})"
        ))),
        _ => Ok(region),
    }
}
