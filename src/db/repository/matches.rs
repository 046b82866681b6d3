use std::collections::{HashMap, HashSet};

use sqlx::{QueryBuilder, Sqlite};

use super::{MATCH_COLUMN_NAMES, PARTICIPANT_COLUMN_NAMES, Repository, columns};
use crate::db::models::{Match, MatchParticipant, NewMatch};
use crate::error::AppError;

impl Repository {
    // === Match operations ===

    /// Persists all matches in one transaction and returns the ones actually inserted.
    ///
    /// A `match_id` already in the store is skipped, so ingesting twice is a no-op.
    pub async fn insert_matches(&self, matches: &[NewMatch]) -> Result<Vec<Match>, AppError> {
        if matches.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self.pool.begin().await?;
        let mut inserted = Vec::new();

        for new_match in matches {
            let match_ref = sqlx::query_scalar::<_, i64>(
                r#"
                INSERT INTO matches (
                    match_id, data_version, game_creation, game_length, game_version,
                    queue_id, tft_game_type, tft_set_core_name, tft_set_number, end_of_game_result
                )
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                ON CONFLICT(match_id) DO NOTHING
                RETURNING id
                "#,
            )
            .bind(&new_match.match_id)
            .bind(&new_match.data_version)
            .bind(new_match.game_creation)
            .bind(new_match.game_length)
            .bind(&new_match.game_version)
            .bind(new_match.queue_id)
            .bind(&new_match.tft_game_type)
            .bind(&new_match.tft_set_core_name)
            .bind(new_match.tft_set_number)
            .bind(&new_match.end_of_game_result)
            .fetch_optional(&mut *tx)
            .await?;

            let Some(match_ref) = match_ref else {
                continue;
            };

            for p in &new_match.participants {
                sqlx::query(
                    r#"
                    INSERT INTO match_participants (
                        match_ref, puuid, riot_id_game_name, riot_id_tagline, placement, level,
                        last_round, total_damage_to_players, players_eliminated, time_eliminated,
                        gold_left, win, units, traits
                    )
                    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                    "#,
                )
                .bind(match_ref)
                .bind(&p.puuid)
                .bind(&p.riot_id_game_name)
                .bind(&p.riot_id_tagline)
                .bind(p.placement)
                .bind(p.level)
                .bind(p.last_round)
                .bind(p.total_damage_to_players)
                .bind(p.players_eliminated)
                .bind(p.time_eliminated)
                .bind(p.gold_left)
                .bind(p.win)
                .bind(serde_json::to_string(&p.units)?)
                .bind(serde_json::to_string(&p.traits)?)
                .execute(&mut *tx)
                .await?;
            }

            inserted.push(match_ref);
        }

        tx.commit().await?;
        self.matches_by_refs(&inserted).await
    }

    /// Most recent matches the player took part in, newest first.
    pub async fn recent_matches(&self, puuid: &str, limit: u32) -> Result<Vec<Match>, AppError> {
        let columns = columns(&MATCH_COLUMN_NAMES, Some("m"));
        let matches = sqlx::query_as::<_, Match>(&format!(
            r#"
            SELECT {columns}
            FROM matches m
            INNER JOIN match_participants p ON p.match_ref = m.id
            WHERE p.puuid = ?
            ORDER BY m.game_creation DESC, m.id DESC
            LIMIT ?
            "#
        ))
        .bind(puuid)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        self.attach_participants(matches).await
    }

    /// Which of the given match ids are already stored, for any player.
    pub async fn existing_match_ids(&self, match_ids: &[String]) -> Result<HashSet<String>, AppError> {
        if match_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let mut qb = QueryBuilder::<Sqlite>::new("SELECT match_id FROM matches WHERE match_id IN (");
        let mut separated = qb.separated(", ");
        for id in match_ids {
            separated.push_bind(id.as_str());
        }
        separated.push_unseparated(")");

        let existing = qb
            .build_query_scalar::<String>()
            .fetch_all(&self.pool)
            .await?;
        Ok(existing.into_iter().collect())
    }

    /// Participants in provider order, grouped by match.
    pub async fn participants_for(
        &self,
        match_refs: &[i64],
    ) -> Result<Vec<MatchParticipant>, AppError> {
        if match_refs.is_empty() {
            return Ok(Vec::new());
        }

        let columns = columns(&PARTICIPANT_COLUMN_NAMES, Some("p"));
        let mut qb = QueryBuilder::<Sqlite>::new(format!(
            r#"
            SELECT {columns}, m.match_id
            FROM match_participants p
            INNER JOIN matches m ON m.id = p.match_ref
            WHERE p.match_ref IN ("#
        ));
        let mut separated = qb.separated(", ");
        for id in match_refs {
            separated.push_bind(*id);
        }
        separated.push_unseparated(") ORDER BY p.match_ref, p.id");

        let participants = qb
            .build_query_as::<MatchParticipant>()
            .fetch_all(&self.pool)
            .await?;
        Ok(participants)
    }

    async fn matches_by_refs(&self, match_refs: &[i64]) -> Result<Vec<Match>, AppError> {
        if match_refs.is_empty() {
            return Ok(Vec::new());
        }

        let columns = columns(&MATCH_COLUMN_NAMES, None);
        let mut qb =
            QueryBuilder::<Sqlite>::new(format!("SELECT {columns} FROM matches WHERE id IN ("));
        let mut separated = qb.separated(", ");
        for id in match_refs {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let mut by_ref: HashMap<i64, Match> = qb
            .build_query_as::<Match>()
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(|m| (m.id, m))
            .collect();

        let ordered = match_refs.iter().filter_map(|id| by_ref.remove(id)).collect();
        self.attach_participants(ordered).await
    }

    async fn attach_participants(&self, mut matches: Vec<Match>) -> Result<Vec<Match>, AppError> {
        let refs: Vec<i64> = matches.iter().map(|m| m.id).collect();

        let mut grouped: HashMap<i64, Vec<MatchParticipant>> = HashMap::new();
        for participant in self.participants_for(&refs).await? {
            grouped
                .entry(participant.match_ref)
                .or_default()
                .push(participant);
        }

        for m in &mut matches {
            m.participants = grouped.remove(&m.id).unwrap_or_default();
        }
        Ok(matches)
    }
}
