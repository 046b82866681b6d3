use std::collections::HashMap;

use super::Repository;
use crate::achievements::AchievementType;
use crate::db::models::{Achievement, NewAchievement};
use crate::error::AppError;

impl Repository {
    // === Achievement operations ===

    /// Appends the records in one batch. Re-processing a match inserts nothing.
    pub async fn insert_achievements(
        &self,
        achievements: &[NewAchievement],
    ) -> Result<u64, AppError> {
        if achievements.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;

        for a in achievements {
            let result = sqlx::query(
                r#"
                INSERT INTO match_achievements (match_ref, achievement_type, participant_ref, value)
                VALUES (?, ?, ?, ?)
                ON CONFLICT(match_ref, achievement_type, participant_ref) DO NOTHING
                "#,
            )
            .bind(a.match_ref)
            .bind(a.achievement_type)
            .bind(a.participant_ref)
            .bind(a.value)
            .execute(&mut *tx)
            .await?;
            inserted += result.rows_affected();
        }

        tx.commit().await?;
        Ok(inserted)
    }

    /// Achievements earned by the player within their `window` most recent matches, per type.
    pub async fn count_recent_achievements(
        &self,
        puuid: &str,
        window: u32,
    ) -> Result<HashMap<AchievementType, i64>, AppError> {
        let rows = sqlx::query_as::<_, (AchievementType, i64)>(
            r#"
            WITH recent AS (
                SELECT m.id
                FROM matches m
                INNER JOIN match_participants p ON p.match_ref = m.id
                WHERE p.puuid = ?
                ORDER BY m.game_creation DESC, m.id DESC
                LIMIT ?
            )
            SELECT a.achievement_type, COUNT(*)
            FROM match_achievements a
            INNER JOIN match_participants p ON p.id = a.participant_ref
            WHERE p.puuid = ? AND a.match_ref IN (SELECT id FROM recent)
            GROUP BY a.achievement_type
            "#,
        )
        .bind(puuid)
        .bind(window)
        .bind(puuid)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().collect())
    }

    pub async fn achievements_for_match(&self, match_ref: i64) -> Result<Vec<Achievement>, AppError> {
        let achievements = sqlx::query_as::<_, Achievement>(
            r#"
            SELECT id, match_ref, achievement_type, participant_ref, value
            FROM match_achievements
            WHERE match_ref = ?
            ORDER BY id
            "#,
        )
        .bind(match_ref)
        .fetch_all(&self.pool)
        .await?;
        Ok(achievements)
    }
}
