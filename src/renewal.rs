use serde::Serialize;
use tracing::{error, info, instrument};

use crate::accounts::AccountResolver;
use crate::achievements::AchievementEngine;
use crate::db::models::{Account, LeagueEntry};
use crate::error::AppError;
use crate::sync::{EntrySyncEngine, MatchSyncEngine};
use crate::views::{BadgeView, RecentMatch};

#[derive(Debug, Clone, Serialize)]
pub struct RenewalResult {
    pub account: Account,
    pub entries: Vec<LeagueEntry>,
    pub matches: Vec<RecentMatch>,
    pub badges: Vec<BadgeView>,
    /// Unix seconds, equal to the account's `last_synced_at`.
    pub renewed_at: i64,
}

/// Drives a full refresh of one account across all sync engines.
#[derive(Clone, Debug)]
pub struct RenewalOrchestrator {
    accounts: AccountResolver,
    entries: EntrySyncEngine,
    matches: MatchSyncEngine,
    achievements: AchievementEngine,
}

impl RenewalOrchestrator {
    pub fn new(
        accounts: AccountResolver,
        entries: EntrySyncEngine,
        matches: MatchSyncEngine,
        achievements: AchievementEngine,
    ) -> Self {
        Self {
            accounts,
            entries,
            matches,
            achievements,
        }
    }

    /// Renews entries alongside matches, then badges once matches are in.
    ///
    /// A failing branch drops its sibling and surfaces as [`AppError::Renewal`].
    /// Work already committed by either branch stays.
    #[instrument(skip(self))]
    pub async fn renew_all(
        &self,
        game_name: &str,
        tag_line: &str,
    ) -> Result<RenewalResult, AppError> {
        let account = self.accounts.find_or_register(game_name, tag_line).await?;

        let outcome = self.renew_account(&account).await;
        match outcome {
            Ok(result) => {
                info!(
                    account_id = account.id,
                    entries = result.entries.len(),
                    matches = result.matches.len(),
                    "✅ Account renewed"
                );
                Ok(result)
            }
            Err(e) => {
                error!(account_id = account.id, error = %e, "❌ Account renewal failed");
                Err(AppError::Renewal {
                    game_name: account.game_name,
                    tag_line: account.tag_line,
                    source: Box::new(e),
                })
            }
        }
    }

    async fn renew_account(&self, account: &Account) -> Result<RenewalResult, AppError> {
        let entries_branch = self.entries.renew(account.id, &account.puuid);

        let matches_branch = async {
            let synced = self.matches.renew(&account.puuid).await?;
            // Covers matches stored by a sync whose achievement pass never ran.
            self.achievements.process_matches(&synced.all_matches).await?;
            let badges = self.achievements.renew_account_badges(account).await?;
            Ok::<_, AppError>((synced.all_matches, badges))
        };

        let (entries, (matches, badges)) = tokio::try_join!(entries_branch, matches_branch)?;

        let renewed_at = self.accounts.mark_synced(account).await?;
        let mut account = account.clone();
        account.last_synced_at = Some(renewed_at);

        Ok(RenewalResult {
            matches: RecentMatch::list(&account.puuid, &matches),
            badges: badges.iter().map(BadgeView::from).collect(),
            entries,
            account,
            renewed_at,
        })
    }

    /// First call syncs once inline; later calls only read the store.
    #[instrument(skip(self))]
    pub async fn find_and_process_matches(
        &self,
        game_name: &str,
        tag_line: &str,
    ) -> Result<Vec<RecentMatch>, AppError> {
        let account = self.accounts.find_or_register(game_name, tag_line).await?;

        let matches = if account.is_synced() {
            self.matches.cached(&account.puuid).await?
        } else {
            let synced = self.matches.find_or_create(&account.puuid).await?;
            self.achievements.process_matches(&synced.all_matches).await?;
            self.achievements.renew_account_badges(&account).await?;
            self.accounts.mark_synced(&account).await?;
            info!(account_id = account.id, new = synced.new_matches.len(), "🎮 First match sync done");
            synced.all_matches
        };

        Ok(RecentMatch::list(&account.puuid, &matches))
    }
}
