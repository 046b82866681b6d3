use sqlx::{QueryBuilder, Sqlite};

use super::{ACCOUNT_COLUMN_NAMES, Repository, columns};
use crate::db::models::Account;
use crate::error::AppError;
use crate::riot::AccountIdentity;

impl Repository {
    // === Account operations ===

    pub async fn account_by_riot_id(
        &self,
        game_name: &str,
        tag_line: &str,
    ) -> Result<Option<Account>, AppError> {
        let columns = columns(&ACCOUNT_COLUMN_NAMES, None);
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {columns} FROM accounts WHERE LOWER(game_name) = LOWER(?) AND LOWER(tag_line) = LOWER(?)"
        ))
        .bind(game_name)
        .bind(tag_line)
        .fetch_optional(&self.pool)
        .await?;
        Ok(account)
    }

    pub async fn account_by_puuid(&self, puuid: &str) -> Result<Option<Account>, AppError> {
        let columns = columns(&ACCOUNT_COLUMN_NAMES, None);
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {columns} FROM accounts WHERE puuid = ?"
        ))
        .bind(puuid)
        .fetch_optional(&self.pool)
        .await?;
        Ok(account)
    }

    /// Inserts the account, or refreshes the riot id of the row already holding this puuid.
    pub async fn upsert_account(&self, identity: &AccountIdentity) -> Result<Account, AppError> {
        let columns = columns(&ACCOUNT_COLUMN_NAMES, None);
        let query = format!(
            r#"
            INSERT INTO accounts (puuid, game_name, tag_line)
            VALUES (?, ?, ?)
            ON CONFLICT(puuid) DO UPDATE SET
                game_name = excluded.game_name,
                tag_line = excluded.tag_line
            RETURNING {columns}
            "#
        );

        let account = sqlx::query_as::<_, Account>(&query)
            .bind(&identity.puuid)
            .bind(&identity.game_name)
            .bind(&identity.tag_line)
            .fetch_one(&self.pool)
            .await?;
        Ok(account)
    }

    pub async fn accounts_by_ids(&self, ids: &[i64]) -> Result<Vec<Account>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let columns = columns(&ACCOUNT_COLUMN_NAMES, None);
        let mut qb =
            QueryBuilder::<Sqlite>::new(format!("SELECT {columns} FROM accounts WHERE id IN ("));
        let mut separated = qb.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(") ORDER BY id");

        let accounts = qb.build_query_as::<Account>().fetch_all(&self.pool).await?;
        Ok(accounts)
    }

    pub async fn accounts_by_puuids(&self, puuids: &[String]) -> Result<Vec<Account>, AppError> {
        if puuids.is_empty() {
            return Ok(Vec::new());
        }

        let columns = columns(&ACCOUNT_COLUMN_NAMES, None);
        let mut qb = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {columns} FROM accounts WHERE puuid IN ("
        ));
        let mut separated = qb.separated(", ");
        for puuid in puuids {
            separated.push_bind(puuid.as_str());
        }
        separated.push_unseparated(") ORDER BY id");

        let accounts = qb.build_query_as::<Account>().fetch_all(&self.pool).await?;
        Ok(accounts)
    }

    /// Stamps the account as fully synced now and returns the stored timestamp.
    pub async fn mark_synced(&self, account_id: i64) -> Result<i64, AppError> {
        let synced_at = sqlx::query_scalar::<_, i64>(
            "UPDATE accounts SET last_synced_at = unixepoch() WHERE id = ? RETURNING last_synced_at",
        )
        .bind(account_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(synced_at)
    }
}
