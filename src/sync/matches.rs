use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use super::{Pacer, RetryPolicy};
use crate::db::Repository;
use crate::db::models::{Match, NewMatch};
use crate::error::AppError;
use crate::riot::GameDataSource;

/// Size of the per-account match cache.
pub const RECENT_MATCHES_LIMIT: u32 = 20;

#[derive(Debug, Clone)]
pub struct MatchSyncResult {
    /// The account's most recent matches after the sync, newest first.
    pub all_matches: Vec<Match>,
    /// Matches this sync inserted into the store.
    pub new_matches: Vec<Match>,
}

impl MatchSyncResult {
    pub fn has_new(&self) -> bool {
        !self.new_matches.is_empty()
    }
}

#[derive(Clone, Debug)]
pub struct MatchSyncEngine {
    db: Repository,
    source: Arc<dyn GameDataSource>,
    retry: RetryPolicy,
    pacer: Arc<dyn Pacer>,
}

impl MatchSyncEngine {
    pub fn new(
        db: Repository,
        source: Arc<dyn GameDataSource>,
        retry: RetryPolicy,
        pacer: Arc<dyn Pacer>,
    ) -> Self {
        Self {
            db,
            source,
            retry,
            pacer,
        }
    }

    /// Fetches provider matches missing from the account's cached window.
    #[instrument(skip(self))]
    pub async fn find_or_create(&self, puuid: &str) -> Result<MatchSyncResult, AppError> {
        let cached = self.cached(puuid).await?;
        let known: HashSet<&str> = cached.iter().map(|m| m.match_id.as_str()).collect();

        let provider_ids = self.recent_ids(puuid).await?;
        let new_ids = unseen(provider_ids, |id| known.contains(id));

        let new_matches = self.ingest(&new_ids).await?;
        let all_matches = if new_matches.is_empty() {
            cached
        } else {
            self.cached(puuid).await?
        };

        info!(
            cached = all_matches.len(),
            new = new_matches.len(),
            "🎮 Match history synced"
        );
        Ok(MatchSyncResult {
            all_matches,
            new_matches,
        })
    }

    /// Same as [`Self::find_or_create`] but checks ids against every stored match.
    #[instrument(skip(self))]
    pub async fn renew(&self, puuid: &str) -> Result<MatchSyncResult, AppError> {
        let provider_ids = self.recent_ids(puuid).await?;
        let existing = self.db.existing_match_ids(&provider_ids).await?;
        let new_ids = unseen(provider_ids, |id| existing.contains(id));

        let new_matches = self.ingest(&new_ids).await?;
        let all_matches = self.cached(puuid).await?;

        info!(
            cached = all_matches.len(),
            new = new_matches.len(),
            "🎮 Match history renewed"
        );
        Ok(MatchSyncResult {
            all_matches,
            new_matches,
        })
    }

    /// Stored window only, never calls the provider.
    pub async fn cached(&self, puuid: &str) -> Result<Vec<Match>, AppError> {
        self.db.recent_matches(puuid, RECENT_MATCHES_LIMIT).await
    }

    async fn recent_ids(&self, puuid: &str) -> Result<Vec<String>, AppError> {
        let source = self.source.as_ref();
        let mut ids = self
            .retry
            .run("recent_match_ids", move || source.recent_match_ids(puuid))
            .await?;
        ids.truncate(RECENT_MATCHES_LIMIT as usize);
        Ok(ids)
    }

    /// Fetches details one at a time, then writes them in a single batch.
    async fn ingest(&self, match_ids: &[String]) -> Result<Vec<Match>, AppError> {
        if match_ids.is_empty() {
            return Ok(Vec::new());
        }

        let source = self.source.as_ref();
        let mut details = Vec::with_capacity(match_ids.len());

        for match_id in match_ids {
            self.pacer.pace().await;
            let dto = self
                .retry
                .run("match_detail", move || source.match_detail(match_id))
                .await?;
            details.push(NewMatch::try_from(dto)?);
            debug!(%match_id, "📥 Match detail fetched");
        }

        self.db.insert_matches(&details).await
    }
}

/// Provider order, duplicates dropped.
fn unseen(ids: Vec<String>, is_known: impl Fn(&str) -> bool) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.into_iter()
        .filter(|id| !is_known(id.as_str()) && seen.insert(id.clone()))
        .collect()
}
