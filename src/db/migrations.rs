use sqlx::SqlitePool;
use tracing::info;

use crate::error::AppError;

const SCHEMA: &str = r#"
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS accounts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    puuid TEXT UNIQUE NOT NULL,
    game_name TEXT NOT NULL,
    tag_line TEXT NOT NULL,
    last_synced_at INTEGER,
    created_at INTEGER NOT NULL DEFAULT (unixepoch())
);

CREATE TABLE IF NOT EXISTS league_entries (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    account_id INTEGER NOT NULL,
    queue_type TEXT NOT NULL,
    tier TEXT NOT NULL,
    rank TEXT NOT NULL,
    league_points INTEGER NOT NULL,
    wins INTEGER NOT NULL,
    losses INTEGER NOT NULL,
    hot_streak INTEGER NOT NULL DEFAULT 0,
    veteran INTEGER NOT NULL DEFAULT 0,
    fresh_blood INTEGER NOT NULL DEFAULT 0,
    inactive INTEGER NOT NULL DEFAULT 0,
    mini_series TEXT NOT NULL DEFAULT 'null',
    version INTEGER NOT NULL DEFAULT 0,
    updated_at INTEGER NOT NULL DEFAULT (unixepoch()),
    UNIQUE (account_id, queue_type),
    FOREIGN KEY (account_id) REFERENCES accounts(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS matches (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    match_id TEXT UNIQUE NOT NULL,
    data_version TEXT NOT NULL,
    game_creation INTEGER NOT NULL,
    game_length REAL NOT NULL,
    game_version TEXT NOT NULL,
    queue_id INTEGER NOT NULL,
    tft_game_type TEXT NOT NULL,
    tft_set_core_name TEXT NOT NULL,
    tft_set_number INTEGER NOT NULL,
    end_of_game_result TEXT NOT NULL,
    created_at INTEGER NOT NULL DEFAULT (unixepoch())
);

CREATE TABLE IF NOT EXISTS match_participants (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    match_ref INTEGER NOT NULL,
    puuid TEXT NOT NULL,
    riot_id_game_name TEXT NOT NULL,
    riot_id_tagline TEXT NOT NULL,
    placement INTEGER NOT NULL CHECK (placement BETWEEN 1 AND 8),
    level INTEGER NOT NULL,
    last_round INTEGER NOT NULL,
    total_damage_to_players INTEGER NOT NULL,
    players_eliminated INTEGER NOT NULL,
    time_eliminated REAL NOT NULL,
    gold_left INTEGER NOT NULL,
    win INTEGER NOT NULL,
    units TEXT NOT NULL,
    traits TEXT NOT NULL,
    UNIQUE (match_ref, puuid),
    FOREIGN KEY (match_ref) REFERENCES matches(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS match_achievements (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    match_ref INTEGER NOT NULL,
    achievement_type TEXT NOT NULL,
    participant_ref INTEGER NOT NULL,
    value INTEGER NOT NULL,
    created_at INTEGER NOT NULL DEFAULT (unixepoch()),
    UNIQUE (match_ref, achievement_type, participant_ref),
    FOREIGN KEY (match_ref) REFERENCES matches(id) ON DELETE CASCADE,
    FOREIGN KEY (participant_ref) REFERENCES match_participants(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS badge_progress (
    account_id INTEGER NOT NULL,
    badge_type TEXT NOT NULL,
    achievement_count INTEGER NOT NULL DEFAULT 0,
    is_active INTEGER NOT NULL DEFAULT 0,
    last_updated_at INTEGER NOT NULL DEFAULT (unixepoch()),
    PRIMARY KEY (account_id, badge_type),
    FOREIGN KEY (account_id) REFERENCES accounts(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS rivalries (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    created_at INTEGER NOT NULL DEFAULT (unixepoch())
);

CREATE TABLE IF NOT EXISTS rivalry_participants (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    rivalry_id INTEGER NOT NULL,
    account_id INTEGER NOT NULL,
    side TEXT NOT NULL CHECK (side IN ('LEFT', 'RIGHT')),
    position INTEGER NOT NULL,
    UNIQUE (rivalry_id, account_id, side),
    FOREIGN KEY (rivalry_id) REFERENCES rivalries(id) ON DELETE CASCADE,
    FOREIGN KEY (account_id) REFERENCES accounts(id)
);

CREATE INDEX IF NOT EXISTS idx_accounts_riot_id ON accounts(game_name, tag_line);
CREATE INDEX IF NOT EXISTS idx_participants_puuid ON match_participants(puuid);
CREATE INDEX IF NOT EXISTS idx_matches_creation ON matches(game_creation);
CREATE INDEX IF NOT EXISTS idx_achievements_participant ON match_achievements(participant_ref);
CREATE INDEX IF NOT EXISTS idx_rivalry_participants_rivalry ON rivalry_participants(rivalry_id);
"#;

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), AppError> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;
    info!("🗄️ Database migrations completed");
    Ok(())
}
