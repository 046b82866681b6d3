use sqlx::{QueryBuilder, Sqlite};

use super::{BADGE_COLUMN_NAMES, Repository, columns};
use crate::db::models::BadgeProgress;
use crate::error::AppError;

impl Repository {
    // === Badge operations ===

    /// The account's badges in badge-type order.
    pub async fn badges_for_account(&self, account_id: i64) -> Result<Vec<BadgeProgress>, AppError> {
        let columns = columns(&BADGE_COLUMN_NAMES, None);
        let mut badges = sqlx::query_as::<_, BadgeProgress>(&format!(
            "SELECT {columns} FROM badge_progress WHERE account_id = ?"
        ))
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;

        badges.sort_by_key(|b| b.badge_type);
        Ok(badges)
    }

    pub async fn badges_for_accounts(
        &self,
        account_ids: &[i64],
    ) -> Result<Vec<BadgeProgress>, AppError> {
        if account_ids.is_empty() {
            return Ok(Vec::new());
        }

        let columns = columns(&BADGE_COLUMN_NAMES, None);
        let mut qb = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {columns} FROM badge_progress WHERE account_id IN ("
        ));
        let mut separated = qb.separated(", ");
        for id in account_ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let mut badges = qb
            .build_query_as::<BadgeProgress>()
            .fetch_all(&self.pool)
            .await?;

        badges.sort_by_key(|b| (b.account_id, b.badge_type));
        Ok(badges)
    }

    pub async fn upsert_badges(
        &self,
        badges: &[BadgeProgress],
    ) -> Result<Vec<BadgeProgress>, AppError> {
        let columns = columns(&BADGE_COLUMN_NAMES, None);
        let query = format!(
            r#"
            INSERT INTO badge_progress (account_id, badge_type, achievement_count, is_active)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(account_id, badge_type) DO UPDATE SET
                achievement_count = excluded.achievement_count,
                is_active = excluded.is_active,
                last_updated_at = unixepoch()
            RETURNING {columns}
            "#
        );

        let mut tx = self.pool.begin().await?;
        let mut stored = Vec::with_capacity(badges.len());

        for badge in badges {
            let row = sqlx::query_as::<_, BadgeProgress>(&query)
                .bind(badge.account_id)
                .bind(badge.badge_type)
                .bind(badge.achievement_count)
                .bind(badge.is_active)
                .fetch_one(&mut *tx)
                .await?;
            stored.push(row);
        }

        tx.commit().await?;
        stored.sort_by_key(|b| b.badge_type);
        Ok(stored)
    }
}
