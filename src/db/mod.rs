use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::info;

use crate::error::AppError;

pub mod migrations;
pub mod models;
pub mod repository;

pub use repository::Repository;

/// Opens (creating if needed) the SQLite database and applies the schema.
pub async fn connect(database_url: &str) -> Result<SqlitePool, AppError> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new().connect_with(options).await?;
    info!(database_url, "🗄️ Connected to database");

    migrations::run_migrations(&pool).await?;
    Ok(pool)
}
