use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use crate::accounts::AccountResolver;
use crate::achievements::{AchievementEngine, BadgeType};
use crate::config::Config;
use crate::db::{self, Repository};
use crate::db::models::LeagueEntry;
use crate::error::AppError;
use crate::renewal::{RenewalOrchestrator, RenewalResult};
use crate::riot::{GameDataSource, RiotClient};
use crate::rivalry::{ParticipantSpec, RivalryAggregator, RivalryDetail};
use crate::sync::{EntrySyncEngine, IntervalPacer, MatchSyncEngine, Pacer, RetryPolicy};
use crate::views::{BadgeView, RecentMatch};

/// Entry point for every read and renewal a front end can request.
#[derive(Clone, Debug)]
pub struct Tracker {
    accounts: AccountResolver,
    entries: EntrySyncEngine,
    achievements: AchievementEngine,
    renewal: RenewalOrchestrator,
    rivalries: RivalryAggregator,
}

impl Tracker {
    pub async fn from_config(config: &Config) -> Result<Self, AppError> {
        let pool = db::connect(&config.database_url).await?;

        let client = RiotClient::new(
            config.riot_api_key.clone(),
            config.riot_region,
            config.riot_platform,
            config.riot_rate_limit_per_second,
        );
        info!(
            region = %config.riot_region,
            platform = %config.riot_platform,
            "🛰️ Riot API client ready"
        );

        Ok(Self::new(
            Repository::new(pool),
            Arc::new(client),
            Arc::new(IntervalPacer::new(config.match_fetch_delay)),
            RetryPolicy::new(config.riot_retry_backoff),
            config.entry_conflict_max_attempts,
        ))
    }

    pub fn new(
        db: Repository,
        source: Arc<dyn GameDataSource>,
        pacer: Arc<dyn Pacer>,
        retry: RetryPolicy,
        entry_conflict_max_attempts: u32,
    ) -> Self {
        let accounts = AccountResolver::new(db.clone(), source.clone(), retry);
        let entries =
            EntrySyncEngine::new(db.clone(), source.clone(), retry, entry_conflict_max_attempts);
        let matches = MatchSyncEngine::new(db.clone(), source, retry, pacer);
        let achievements = AchievementEngine::new(db.clone());

        Self {
            renewal: RenewalOrchestrator::new(
                accounts.clone(),
                entries.clone(),
                matches,
                achievements.clone(),
            ),
            rivalries: RivalryAggregator::new(db, accounts.clone()),
            accounts,
            entries,
            achievements,
        }
    }

    pub async fn renew_all(
        &self,
        game_name: &str,
        tag_line: &str,
    ) -> Result<RenewalResult, AppError> {
        self.renewal.renew_all(game_name, tag_line).await
    }

    pub async fn find_and_process_matches(
        &self,
        game_name: &str,
        tag_line: &str,
    ) -> Result<Vec<RecentMatch>, AppError> {
        self.renewal
            .find_and_process_matches(game_name, tag_line)
            .await
    }

    pub async fn create_rivalry(&self, specs: &[ParticipantSpec]) -> Result<i64, AppError> {
        self.rivalries.create(specs).await
    }

    pub async fn rivalry_detail(&self, rivalry_id: i64) -> Result<RivalryDetail, AppError> {
        self.rivalries.detail(rivalry_id).await
    }

    /// Stored badges of a known account. Unknown accounts have none.
    pub async fn badges(&self, game_name: &str, tag_line: &str) -> Result<Vec<BadgeView>, AppError> {
        let Some(account) = self.accounts.find_by_riot_id(game_name, tag_line).await? else {
            return Ok(Vec::new());
        };

        let badges = self.achievements.badges(&account).await?;
        Ok(badges.iter().map(BadgeView::from).collect())
    }

    pub async fn badge(
        &self,
        game_name: &str,
        tag_line: &str,
        badge_type: BadgeType,
    ) -> Result<Option<BadgeView>, AppError> {
        let Some(account) = self.accounts.find_by_riot_id(game_name, tag_line).await? else {
            return Ok(None);
        };

        let badge = self.achievements.badge(&account, badge_type).await?;
        Ok(badge.as_ref().map(BadgeView::from))
    }

    pub async fn badges_for_puuids(
        &self,
        puuids: &[String],
    ) -> Result<HashMap<String, Vec<BadgeView>>, AppError> {
        let badges = self.achievements.badges_for_puuids(puuids).await?;
        Ok(badges
            .into_iter()
            .map(|(puuid, badges)| (puuid, badges.iter().map(BadgeView::from).collect()))
            .collect())
    }

    pub async fn entries(&self, game_name: &str, tag_line: &str) -> Result<Vec<LeagueEntry>, AppError> {
        let account = self.accounts.find_or_register(game_name, tag_line).await?;
        self.entries.find_or_create(account.id, &account.puuid).await
    }
}
