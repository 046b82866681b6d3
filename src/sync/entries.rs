use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use super::RetryPolicy;
use crate::db::Repository;
use crate::db::models::LeagueEntry;
use crate::error::AppError;
use crate::riot::GameDataSource;
use crate::riot::types::LeagueEntryDto;

/// Keeps one ranked standing per queue type in sync with the provider.
#[derive(Clone, Debug)]
pub struct EntrySyncEngine {
    db: Repository,
    source: Arc<dyn GameDataSource>,
    retry: RetryPolicy,
    max_attempts: u32,
}

#[derive(Debug, Error)]
enum AttemptError {
    #[error("stale league entry snapshot")]
    Conflict,
    #[error(transparent)]
    Fatal(AppError),
}

impl From<AppError> for AttemptError {
    fn from(e: AppError) -> Self {
        match e {
            AppError::ConcurrencyConflict => Self::Conflict,
            other => Self::Fatal(other),
        }
    }
}

impl EntrySyncEngine {
    pub fn new(
        db: Repository,
        source: Arc<dyn GameDataSource>,
        retry: RetryPolicy,
        max_attempts: u32,
    ) -> Self {
        Self {
            db,
            source,
            retry,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Cached standings, or a first fetch when none are stored. No ranked games is not an error.
    #[instrument(skip(self))]
    pub async fn find_or_create(
        &self,
        account_id: i64,
        puuid: &str,
    ) -> Result<Vec<LeagueEntry>, AppError> {
        let cached = self.db.latest_entries(account_id).await?;
        if !cached.is_empty() {
            debug!(count = cached.len(), "📦 League entries served from store");
            return Ok(cached);
        }

        let fetched = self.fetch(puuid).await?;
        if fetched.is_empty() {
            debug!("📭 No ranked TFT entries for this account");
            return Ok(Vec::new());
        }

        let entries = self.db.insert_entries(account_id, &fetched).await?;
        info!(count = entries.len(), "📊 League entries stored");
        Ok(entries)
    }

    /// Refreshes every returned queue type, rerunning the whole read-fetch-write
    /// sequence whenever another writer got there first.
    #[instrument(skip(self))]
    pub async fn renew(&self, account_id: i64, puuid: &str) -> Result<Vec<LeagueEntry>, AppError> {
        for attempt in 1..=self.max_attempts {
            match self.try_renew(account_id, puuid).await {
                Ok(entries) => {
                    info!(count = entries.len(), attempt, "📊 League entries renewed");
                    return Ok(entries);
                }
                Err(AttemptError::Conflict) => {
                    warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        "🔁 League entries changed during renewal, retrying"
                    );
                }
                Err(AttemptError::Fatal(e)) => return Err(e),
            }
        }

        Err(AppError::StoreContention {
            attempts: self.max_attempts,
        })
    }

    async fn try_renew(
        &self,
        account_id: i64,
        puuid: &str,
    ) -> Result<Vec<LeagueEntry>, AttemptError> {
        let snapshot = self.db.latest_entries(account_id).await?;

        let fetched = self.fetch(puuid).await?;
        if fetched.is_empty() {
            return Err(AppError::NoRankedRecord {
                puuid: puuid.to_string(),
            }
            .into());
        }

        Ok(self
            .db
            .apply_entry_renewal(account_id, &snapshot, &fetched)
            .await?)
    }

    async fn fetch(&self, puuid: &str) -> Result<Vec<LeagueEntryDto>, AppError> {
        let source = self.source.as_ref();
        let entries = self
            .retry
            .run("league_entries", move || source.league_entries(puuid))
            .await?;
        Ok(entries)
    }
}
