use serde::Serialize;
use sqlx::FromRow;

use crate::achievements::{AchievementType, BadgeType};
use crate::error::AppError;
use crate::riot::types::{MatchDto, MiniSeriesDto, ParticipantDto, TraitDto, UnitDto};
use crate::rivalry::RivalSide;

/// Number of players in every TFT lobby.
pub const LOBBY_SIZE: usize = 8;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Account {
    pub id: i64,
    pub puuid: String,
    pub game_name: String,
    pub tag_line: String,
    pub last_synced_at: Option<i64>,
    pub created_at: i64,
}

impl Account {
    pub fn riot_id(&self) -> String {
        format!("{}#{}", self.game_name, self.tag_line)
    }

    pub fn is_synced(&self) -> bool {
        self.last_synced_at.is_some()
    }
}

impl PartialEq for Account {
    fn eq(&self, other: &Self) -> bool {
        self.puuid == other.puuid
    }
}

impl Eq for Account {}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LeagueEntry {
    pub id: i64,
    pub account_id: i64,
    pub queue_type: String,
    pub tier: String,
    pub rank: String,
    pub league_points: i32,
    pub wins: i32,
    pub losses: i32,
    pub hot_streak: bool,
    pub veteran: bool,
    pub fresh_blood: bool,
    pub inactive: bool,
    /// Promotion series in progress, if any.
    #[sqlx(json)]
    pub mini_series: Option<MiniSeriesDto>,
    pub version: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Match {
    pub id: i64,
    pub match_id: String,
    pub data_version: String,
    /// Epoch milliseconds.
    pub game_creation: i64,
    pub game_length: f64,
    pub game_version: String,
    pub queue_id: i32,
    pub tft_game_type: String,
    pub tft_set_core_name: String,
    pub tft_set_number: i32,
    pub end_of_game_result: String,
    #[sqlx(skip)]
    pub participants: Vec<MatchParticipant>,
}

impl Match {
    pub fn participant(&self, puuid: &str) -> Option<&MatchParticipant> {
        self.participants.iter().find(|p| p.puuid == puuid)
    }
}

impl PartialEq for Match {
    fn eq(&self, other: &Self) -> bool {
        self.match_id == other.match_id
    }
}

impl Eq for Match {}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MatchParticipant {
    pub id: i64,
    #[serde(skip)]
    pub match_ref: i64,
    #[serde(skip)]
    pub match_id: String,
    pub puuid: String,
    pub riot_id_game_name: String,
    pub riot_id_tagline: String,
    pub placement: i32,
    pub level: i32,
    pub last_round: i32,
    pub total_damage_to_players: i32,
    pub players_eliminated: i32,
    pub time_eliminated: f64,
    pub gold_left: i32,
    pub win: bool,
    #[sqlx(json)]
    pub units: Vec<UnitDto>,
    #[sqlx(json)]
    pub traits: Vec<TraitDto>,
}

impl PartialEq for MatchParticipant {
    fn eq(&self, other: &Self) -> bool {
        self.match_id == other.match_id && self.puuid == other.puuid
    }
}

impl Eq for MatchParticipant {}

/// A validated match detail, ready to be written.
#[derive(Debug, Clone)]
pub struct NewMatch {
    pub match_id: String,
    pub data_version: String,
    pub game_creation: i64,
    pub game_length: f64,
    pub game_version: String,
    pub queue_id: i32,
    pub tft_game_type: String,
    pub tft_set_core_name: String,
    pub tft_set_number: i32,
    pub end_of_game_result: String,
    pub participants: Vec<NewParticipant>,
}

#[derive(Debug, Clone)]
pub struct NewParticipant {
    pub puuid: String,
    pub riot_id_game_name: String,
    pub riot_id_tagline: String,
    pub placement: i32,
    pub level: i32,
    pub last_round: i32,
    pub total_damage_to_players: i32,
    pub players_eliminated: i32,
    pub time_eliminated: f64,
    pub gold_left: i32,
    pub win: bool,
    pub units: Vec<UnitDto>,
    pub traits: Vec<TraitDto>,
}

impl From<ParticipantDto> for NewParticipant {
    fn from(p: ParticipantDto) -> Self {
        Self {
            puuid: p.puuid,
            riot_id_game_name: p.riot_id_game_name,
            riot_id_tagline: p.riot_id_tagline,
            placement: p.placement,
            level: p.level,
            last_round: p.last_round,
            total_damage_to_players: p.total_damage_to_players,
            players_eliminated: p.players_eliminated,
            time_eliminated: p.time_eliminated,
            gold_left: p.gold_left,
            win: p.win,
            units: p.units,
            traits: p.traits,
        }
    }
}

impl TryFrom<MatchDto> for NewMatch {
    type Error = AppError;

    fn try_from(dto: MatchDto) -> Result<Self, Self::Error> {
        let match_id = dto.metadata.match_id;
        let invalid = |reason: String| AppError::InvalidMatch {
            match_id: match_id.clone(),
            reason,
        };

        let participants = dto.info.participants;
        if participants.len() != LOBBY_SIZE {
            return Err(invalid(format!(
                "expected {LOBBY_SIZE} participants, got {}",
                participants.len()
            )));
        }

        if let Some(p) = participants
            .iter()
            .find(|p| !(1..=LOBBY_SIZE as i32).contains(&p.placement))
        {
            return Err(invalid(format!("placement {} out of range", p.placement)));
        }

        let winners = participants.iter().filter(|p| p.placement == 1).count();
        if winners != 1 {
            return Err(invalid(format!("expected one first place, got {winners}")));
        }

        Ok(Self {
            data_version: dto.metadata.data_version,
            game_creation: dto.info.game_creation,
            game_length: dto.info.game_length,
            game_version: dto.info.game_version,
            queue_id: dto.info.queue_id,
            tft_game_type: dto.info.tft_game_type,
            tft_set_core_name: dto.info.tft_set_core_name,
            tft_set_number: dto.info.tft_set_number,
            end_of_game_result: dto.info.end_of_game_result,
            participants: participants.into_iter().map(NewParticipant::from).collect(),
            match_id,
        })
    }
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Achievement {
    pub id: i64,
    pub match_ref: i64,
    pub achievement_type: AchievementType,
    pub participant_ref: i64,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAchievement {
    pub match_ref: i64,
    pub achievement_type: AchievementType,
    pub participant_ref: i64,
    pub value: i64,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BadgeProgress {
    pub account_id: i64,
    pub badge_type: BadgeType,
    pub achievement_count: i64,
    pub is_active: bool,
    pub last_updated_at: i64,
}

impl BadgeProgress {
    pub fn fresh(account_id: i64, badge_type: BadgeType) -> Self {
        Self {
            account_id,
            badge_type,
            achievement_count: 0,
            is_active: false,
            last_updated_at: 0,
        }
    }

    pub fn update_progress(&mut self, achievement_count: i64) {
        self.achievement_count = achievement_count;
        self.is_active = self.badge_type.is_unlocked(achievement_count);
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct Rivalry {
    pub id: i64,
    pub created_at: i64,
    #[sqlx(skip)]
    pub participants: Vec<RivalryParticipant>,
}

#[derive(Debug, Clone, FromRow)]
pub struct RivalryParticipant {
    pub id: i64,
    pub rivalry_id: i64,
    pub account_id: i64,
    pub side: RivalSide,
    pub position: i64,
}
