use super::Repository;
use crate::db::models::{Rivalry, RivalryParticipant};
use crate::error::AppError;
use crate::rivalry::RivalSide;

impl Repository {
    // === Rivalry operations ===

    /// Stores the rivalry with its participants in insertion order.
    pub async fn insert_rivalry(&self, participants: &[(i64, RivalSide)]) -> Result<i64, AppError> {
        let mut tx = self.pool.begin().await?;

        let rivalry_id =
            sqlx::query_scalar::<_, i64>("INSERT INTO rivalries DEFAULT VALUES RETURNING id")
                .fetch_one(&mut *tx)
                .await?;

        for (position, (account_id, side)) in participants.iter().enumerate() {
            sqlx::query(
                "INSERT INTO rivalry_participants (rivalry_id, account_id, side, position) VALUES (?, ?, ?, ?)",
            )
            .bind(rivalry_id)
            .bind(*account_id)
            .bind(*side)
            .bind(position as i64)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(rivalry_id)
    }

    pub async fn rivalry(&self, rivalry_id: i64) -> Result<Option<Rivalry>, AppError> {
        let Some(mut rivalry) =
            sqlx::query_as::<_, Rivalry>("SELECT id, created_at FROM rivalries WHERE id = ?")
                .bind(rivalry_id)
                .fetch_optional(&self.pool)
                .await?
        else {
            return Ok(None);
        };

        rivalry.participants = sqlx::query_as::<_, RivalryParticipant>(
            r#"
            SELECT id, rivalry_id, account_id, side, position
            FROM rivalry_participants
            WHERE rivalry_id = ?
            ORDER BY position
            "#,
        )
        .bind(rivalry_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(rivalry))
    }
}
