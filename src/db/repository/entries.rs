use sqlx::{QueryBuilder, Sqlite};

use super::{ENTRY_COLUMN_NAMES, Repository, columns};
use crate::db::models::LeagueEntry;
use crate::error::AppError;
use crate::riot::types::LeagueEntryDto;

const INSERT_ENTRY: &str = r#"
    INSERT INTO league_entries (
        account_id, queue_type, tier, rank, league_points, wins, losses,
        hot_streak, veteran, fresh_blood, inactive,
        mini_series
    )
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

impl Repository {
    // === League entry operations ===

    /// One row per queue type, ordered by queue type.
    pub async fn latest_entries(&self, account_id: i64) -> Result<Vec<LeagueEntry>, AppError> {
        let columns = columns(&ENTRY_COLUMN_NAMES, None);
        let entries = sqlx::query_as::<_, LeagueEntry>(&format!(
            "SELECT {columns} FROM league_entries WHERE account_id = ? ORDER BY queue_type"
        ))
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    pub async fn latest_entries_for_accounts(
        &self,
        account_ids: &[i64],
    ) -> Result<Vec<LeagueEntry>, AppError> {
        if account_ids.is_empty() {
            return Ok(Vec::new());
        }

        let columns = columns(&ENTRY_COLUMN_NAMES, None);
        let mut qb = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {columns} FROM league_entries WHERE account_id IN ("
        ));
        let mut separated = qb.separated(", ");
        for id in account_ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(") ORDER BY account_id, queue_type");

        let entries = qb
            .build_query_as::<LeagueEntry>()
            .fetch_all(&self.pool)
            .await?;
        Ok(entries)
    }

    /// First-time persistence of provider entries. Queue types already stored are left alone.
    pub async fn insert_entries(
        &self,
        account_id: i64,
        fetched: &[LeagueEntryDto],
    ) -> Result<Vec<LeagueEntry>, AppError> {
        let mut tx = self.pool.begin().await?;

        for dto in fetched {
            let mini_series = serde_json::to_string(&dto.mini_series)?;
            sqlx::query(&format!(
                "{INSERT_ENTRY} ON CONFLICT(account_id, queue_type) DO NOTHING"
            ))
            .bind(account_id)
            .bind(&dto.queue_type)
            .bind(&dto.tier)
            .bind(&dto.rank)
            .bind(dto.league_points)
            .bind(dto.wins)
            .bind(dto.losses)
            .bind(dto.hot_streak)
            .bind(dto.veteran)
            .bind(dto.fresh_blood)
            .bind(dto.inactive)
            .bind(&mini_series)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        self.latest_entries(account_id).await
    }

    /// Writes a renewal against the rows read at the start of the attempt.
    ///
    /// Updates are conditional on the snapshot `version`; any stale row or a
    /// concurrent insert of the same queue type rolls the whole transaction back
    /// with [`AppError::ConcurrencyConflict`].
    pub async fn apply_entry_renewal(
        &self,
        account_id: i64,
        snapshot: &[LeagueEntry],
        fetched: &[LeagueEntryDto],
    ) -> Result<Vec<LeagueEntry>, AppError> {
        let mut tx = self.pool.begin().await?;

        for dto in fetched {
            let mini_series = serde_json::to_string(&dto.mini_series)?;

            match snapshot.iter().find(|e| e.queue_type == dto.queue_type) {
                Some(current) => {
                    let result = sqlx::query(
                        r#"
                        UPDATE league_entries SET
                            tier = ?,
                            rank = ?,
                            league_points = ?,
                            wins = ?,
                            losses = ?,
                            hot_streak = ?,
                            veteran = ?,
                            fresh_blood = ?,
                            inactive = ?,
                            mini_series = ?,
                            version = version + 1,
                            updated_at = unixepoch()
                        WHERE id = ? AND version = ?
                        "#,
                    )
                    .bind(&dto.tier)
                    .bind(&dto.rank)
                    .bind(dto.league_points)
                    .bind(dto.wins)
                    .bind(dto.losses)
                    .bind(dto.hot_streak)
                    .bind(dto.veteran)
                    .bind(dto.fresh_blood)
                    .bind(dto.inactive)
                    .bind(&mini_series)
                    .bind(current.id)
                    .bind(current.version)
                    .execute(&mut *tx)
                    .await?;

                    if result.rows_affected() == 0 {
                        return Err(AppError::ConcurrencyConflict);
                    }
                }
                None => {
                    sqlx::query(INSERT_ENTRY)
                        .bind(account_id)
                        .bind(&dto.queue_type)
                        .bind(&dto.tier)
                        .bind(&dto.rank)
                        .bind(dto.league_points)
                        .bind(dto.wins)
                        .bind(dto.losses)
                        .bind(dto.hot_streak)
                        .bind(dto.veteran)
                        .bind(dto.fresh_blood)
                        .bind(dto.inactive)
                        .bind(&mini_series)
                        .execute(&mut *tx)
                        .await
                        .map_err(AppError::from)
                        .map_err(|e| {
                            if e.is_unique_violation() {
                                AppError::ConcurrencyConflict
                            } else {
                                e
                            }
                        })?;
                }
            }
        }

        tx.commit().await?;
        self.latest_entries(account_id).await
    }
}

#[cfg(test)]
mod tests {
    use crate::db::Repository;
    use crate::error::AppError;
    use crate::riot::types::MiniSeriesDto;
    use crate::testing::{identity, league_entry};

    #[tokio::test]
    async fn insert_keeps_one_row_per_queue_with_promotion_series() {
        let repo = Repository::in_memory().await;
        let account = repo.upsert_account(&identity("p1", "A", "1")).await.unwrap();

        let mut ranked = league_entry("RANKED_TFT", "GOLD", 10);
        ranked.mini_series = Some(MiniSeriesDto {
            losses: 0,
            target: 2,
            wins: 1,
            progress: "WNN".into(),
        });
        let turbo = league_entry("RANKED_TFT_TURBO", "", 0);

        repo.insert_entries(account.id, &[turbo.clone(), ranked.clone()])
            .await
            .unwrap();
        let entries = repo
            .insert_entries(account.id, &[league_entry("RANKED_TFT", "PLATINUM", 1)])
            .await
            .unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].queue_type, "RANKED_TFT");
        assert_eq!(entries[0].tier, "GOLD");
        assert_eq!(entries[0].mini_series.as_ref().unwrap().progress, "WNN");
        assert!(entries[1].mini_series.is_none());

        let json = serde_json::to_value(&entries).unwrap();
        assert_eq!(json[0]["mini_series"]["target"], 2);
        assert!(json[1]["mini_series"].is_null());
        assert_eq!(entries[1].queue_type, "RANKED_TFT_TURBO");
    }

    #[tokio::test]
    async fn renewal_updates_and_bumps_version() {
        let repo = Repository::in_memory().await;
        let account = repo.upsert_account(&identity("p1", "A", "1")).await.unwrap();
        let snapshot = repo
            .insert_entries(account.id, &[league_entry("RANKED_TFT", "GOLD", 10)])
            .await
            .unwrap();

        let renewed = repo
            .apply_entry_renewal(
                account.id,
                &snapshot,
                &[
                    league_entry("RANKED_TFT", "PLATINUM", 0),
                    league_entry("RANKED_TFT_DOUBLE_UP", "SILVER", 40),
                ],
            )
            .await
            .unwrap();

        assert_eq!(renewed.len(), 2);
        let ranked = renewed.iter().find(|e| e.queue_type == "RANKED_TFT").unwrap();
        assert_eq!(ranked.tier, "PLATINUM");
        assert_eq!(ranked.version, snapshot[0].version + 1);
        assert_eq!(ranked.id, snapshot[0].id);
    }

    #[tokio::test]
    async fn stale_snapshot_conflicts_and_rolls_back() {
        let repo = Repository::in_memory().await;
        let account = repo.upsert_account(&identity("p1", "A", "1")).await.unwrap();
        let snapshot = repo
            .insert_entries(account.id, &[league_entry("RANKED_TFT", "GOLD", 10)])
            .await
            .unwrap();

        repo.apply_entry_renewal(
            account.id,
            &snapshot,
            &[league_entry("RANKED_TFT", "GOLD", 30)],
        )
        .await
        .unwrap();

        let err = repo
            .apply_entry_renewal(
                account.id,
                &snapshot,
                &[
                    league_entry("RANKED_TFT_TURBO", "", 0),
                    league_entry("RANKED_TFT", "DIAMOND", 0),
                ],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ConcurrencyConflict));

        let entries = repo.latest_entries(account.id).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].league_points, 30);
    }

    #[tokio::test]
    async fn racing_insert_is_a_conflict() {
        let repo = Repository::in_memory().await;
        let account = repo.upsert_account(&identity("p1", "A", "1")).await.unwrap();
        repo.insert_entries(account.id, &[league_entry("RANKED_TFT", "GOLD", 10)])
            .await
            .unwrap();

        let err = repo
            .apply_entry_renewal(account.id, &[], &[league_entry("RANKED_TFT", "GOLD", 11)])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ConcurrencyConflict));
    }
}
