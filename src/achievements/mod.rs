use std::collections::HashMap;

use tracing::{debug, info, instrument};

use crate::db::Repository;
use crate::db::models::{Account, BadgeProgress, Match, NewAchievement};
use crate::error::AppError;

mod badge;
pub mod scoring;

pub use badge::{AchievementType, BadgeType};

/// Badges only count achievements from this many most recent matches.
pub const RECENT_MATCHES_WINDOW: u32 = 20;

#[derive(Clone, Debug)]
pub struct AchievementEngine {
    db: Repository,
}

impl AchievementEngine {
    pub fn new(db: Repository) -> Self {
        Self { db }
    }

    #[instrument(skip_all, fields(match_id = %m.match_id))]
    pub async fn process_match_achievements(
        &self,
        m: &Match,
    ) -> Result<Vec<NewAchievement>, AppError> {
        let records = scoring::match_achievements(m)?;
        let inserted = self.db.insert_achievements(&records).await?;

        debug!(records = records.len(), inserted, "🏅 Match achievements recorded");
        Ok(records)
    }

    pub async fn process_matches(&self, matches: &[Match]) -> Result<(), AppError> {
        for m in matches {
            self.process_match_achievements(m).await?;
        }
        Ok(())
    }

    /// Recomputes every badge of the account over its recent match window.
    #[instrument(skip_all, fields(puuid = %account.puuid))]
    pub async fn renew_account_badges(
        &self,
        account: &Account,
    ) -> Result<Vec<BadgeProgress>, AppError> {
        let mut badges = self.db.badges_for_account(account.id).await?;
        if badges.is_empty() {
            badges = BadgeType::ALL
                .iter()
                .map(|badge_type| BadgeProgress::fresh(account.id, *badge_type))
                .collect();
        }

        let counts = self
            .db
            .count_recent_achievements(&account.puuid, RECENT_MATCHES_WINDOW)
            .await?;

        for badge in &mut badges {
            let count = counts
                .get(&badge.badge_type.achievement_type())
                .copied()
                .unwrap_or(0);
            badge.update_progress(count);
        }

        let stored = self.db.upsert_badges(&badges).await?;
        info!(
            active = stored.iter().filter(|b| b.is_active).count(),
            "🎖️ Badges renewed"
        );
        Ok(stored)
    }

    /// Initializes the account's badges on first read.
    pub async fn badges(&self, account: &Account) -> Result<Vec<BadgeProgress>, AppError> {
        let badges = self.db.badges_for_account(account.id).await?;
        if badges.is_empty() {
            return self.renew_account_badges(account).await;
        }
        Ok(badges)
    }

    pub async fn badge(
        &self,
        account: &Account,
        badge_type: BadgeType,
    ) -> Result<Option<BadgeProgress>, AppError> {
        let badges = self.db.badges_for_account(account.id).await?;
        Ok(badges.into_iter().find(|b| b.badge_type == badge_type))
    }

    /// Known puuids only. An account without badges maps to an empty list.
    pub async fn badges_for_puuids(
        &self,
        puuids: &[String],
    ) -> Result<HashMap<String, Vec<BadgeProgress>>, AppError> {
        let accounts = self.db.accounts_by_puuids(puuids).await?;
        let ids: Vec<i64> = accounts.iter().map(|a| a.id).collect();

        let mut by_account: HashMap<i64, Vec<BadgeProgress>> = HashMap::new();
        for badge in self.db.badges_for_accounts(&ids).await? {
            by_account.entry(badge.account_id).or_default().push(badge);
        }

        Ok(accounts
            .into_iter()
            .map(|a| {
                let badges = by_account.remove(&a.id).unwrap_or_default();
                (a.puuid, badges)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::NewMatch;
    use crate::testing::{LOBBY, identity, sample_match};

    async fn ingest(repo: &Repository, match_id: &str, creation: i64, lobby: &[&str]) -> Match {
        let dto = sample_match(match_id, creation, lobby);
        repo.insert_matches(&[NewMatch::try_from(dto).unwrap()])
            .await
            .unwrap()
            .remove(0)
    }

    fn mvp(badges: &[BadgeProgress]) -> &BadgeProgress {
        badges
            .iter()
            .find(|b| b.badge_type == BadgeType::Mvp)
            .unwrap()
    }

    #[tokio::test]
    async fn reprocessing_a_match_adds_nothing() {
        let repo = Repository::in_memory().await;
        let engine = AchievementEngine::new(repo.clone());
        let m = ingest(&repo, "KR_1", 1, &LOBBY).await;

        engine.process_match_achievements(&m).await.unwrap();
        engine.process_match_achievements(&m).await.unwrap();

        assert_eq!(repo.achievements_for_match(m.id).await.unwrap().len(), 8);
    }

    #[tokio::test]
    async fn mvp_unlocks_at_six_first_places() {
        let repo = Repository::in_memory().await;
        let engine = AchievementEngine::new(repo.clone());
        let account = repo
            .upsert_account(&identity(LOBBY[0], "Winner", "KR1"))
            .await
            .unwrap();

        for i in 0..5 {
            let m = ingest(&repo, &format!("KR_{i}"), i, &LOBBY).await;
            engine.process_match_achievements(&m).await.unwrap();
        }
        let badges = engine.renew_account_badges(&account).await.unwrap();
        assert_eq!(badges.len(), 5);
        assert_eq!(mvp(&badges).achievement_count, 5);
        assert!(!mvp(&badges).is_active);

        let m = ingest(&repo, "KR_5", 5, &LOBBY).await;
        engine.process_match_achievements(&m).await.unwrap();
        let badges = engine.renew_account_badges(&account).await.unwrap();
        assert_eq!(mvp(&badges).achievement_count, 6);
        assert!(mvp(&badges).is_active);
    }

    #[tokio::test]
    async fn achievements_fall_out_of_the_window() {
        let repo = Repository::in_memory().await;
        let engine = AchievementEngine::new(repo.clone());
        let account = repo
            .upsert_account(&identity(LOBBY[0], "Winner", "KR1"))
            .await
            .unwrap();

        // Six early wins, then twenty games where someone else takes first.
        for i in 0..6 {
            let m = ingest(&repo, &format!("KR_W{i}"), i, &LOBBY).await;
            engine.process_match_achievements(&m).await.unwrap();
        }
        assert!(mvp(&engine.renew_account_badges(&account).await.unwrap()).is_active);

        let mut reversed = LOBBY;
        reversed.reverse();
        for i in 0..20 {
            let m = ingest(&repo, &format!("KR_L{i}"), 100 + i, &reversed).await;
            engine.process_match_achievements(&m).await.unwrap();
        }

        let badges = engine.renew_account_badges(&account).await.unwrap();
        assert_eq!(mvp(&badges).achievement_count, 0);
        assert!(!mvp(&badges).is_active);
    }

    #[tokio::test]
    async fn bulk_lookup_by_puuid() {
        let repo = Repository::in_memory().await;
        let engine = AchievementEngine::new(repo.clone());
        let with_badges = repo.upsert_account(&identity("p1", "A", "1")).await.unwrap();
        repo.upsert_account(&identity("p2", "B", "2")).await.unwrap();
        engine.renew_account_badges(&with_badges).await.unwrap();

        let lookup = engine
            .badges_for_puuids(&["p1".into(), "p2".into(), "ghost".into()])
            .await
            .unwrap();

        assert_eq!(lookup.len(), 2);
        assert_eq!(lookup["p1"].len(), 5);
        assert!(lookup["p2"].is_empty());
        assert!(engine.badge(&with_badges, BadgeType::Steady).await.unwrap().is_some());
    }
}
