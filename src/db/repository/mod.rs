use sqlx::SqlitePool;

mod accounts;
mod achievements;
mod badges;
mod entries;
mod matches;
mod rivalries;

const ACCOUNT_COLUMN_NAMES: [&str; 6] = [
    "id",
    "puuid",
    "game_name",
    "tag_line",
    "last_synced_at",
    "created_at",
];

const ENTRY_COLUMN_NAMES: [&str; 15] = [
    "id",
    "account_id",
    "queue_type",
    "tier",
    "rank",
    "league_points",
    "wins",
    "losses",
    "hot_streak",
    "veteran",
    "fresh_blood",
    "inactive",
    "mini_series",
    "version",
    "updated_at",
];

const MATCH_COLUMN_NAMES: [&str; 11] = [
    "id",
    "match_id",
    "data_version",
    "game_creation",
    "game_length",
    "game_version",
    "queue_id",
    "tft_game_type",
    "tft_set_core_name",
    "tft_set_number",
    "end_of_game_result",
];

/// `match_id` is not stored on the participant row, callers join it from `matches`.
const PARTICIPANT_COLUMN_NAMES: [&str; 15] = [
    "id",
    "match_ref",
    "puuid",
    "riot_id_game_name",
    "riot_id_tagline",
    "placement",
    "level",
    "last_round",
    "total_damage_to_players",
    "players_eliminated",
    "time_eliminated",
    "gold_left",
    "win",
    "units",
    "traits",
];

const BADGE_COLUMN_NAMES: [&str; 5] = [
    "account_id",
    "badge_type",
    "achievement_count",
    "is_active",
    "last_updated_at",
];

fn columns(names: &[&str], alias: Option<&str>) -> String {
    let prefix = alias.map(|a| format!("{a}.")).unwrap_or_default();
    names
        .iter()
        .map(|col| format!("{prefix}{col}"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Clone, Debug)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    #[cfg(test)]
    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Single-connection in-memory database with the schema applied.
    #[cfg(test)]
    pub(crate) async fn in_memory() -> Self {
        use sqlx::sqlite::SqlitePoolOptions;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .test_before_acquire(false)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        crate::db::migrations::run_migrations(&pool).await.unwrap();
        Self::new(pool)
    }
}
