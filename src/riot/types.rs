use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RiotApiError {
    #[error("Reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// Rate limited, unavailable or gateway timeout. Worth retrying later.
    #[error("Transient HTTP status error: {status}")]
    Transient {
        status: StatusCode,
        retry_after: Option<Duration>,
    },

    #[error("HTTP status error: {0}")]
    Status(StatusCode),

    #[error("Requested resource does not exist")]
    NotFound,

    #[error("Decoding raw response error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl RiotApiError {
    pub fn from_status(status: StatusCode, retry_after: Option<Duration>) -> Self {
        match status {
            StatusCode::TOO_MANY_REQUESTS
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT => Self::Transient {
                status,
                retry_after,
            },
            StatusCode::NOT_FOUND => Self::NotFound,
            _ => Self::Status(status),
        }
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }

    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::Transient { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

/// A call to Riot API can either result in a success with the success type or fail with a [`RiotApiError`].
pub type RiotApiResponse<T> = Result<T, RiotApiError>;

// ============================================================================
// Account-v1
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDto {
    pub puuid: String,
    pub game_name: Option<String>,
    pub tag_line: Option<String>,
}

// ============================================================================
// TFT-League-v1
// ============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueEntryDto {
    #[serde(default)]
    pub puuid: Option<String>,
    pub queue_type: String,
    /// Hyper Roll entries are rated and carry neither tier nor rank.
    #[serde(default)]
    pub tier: String,
    #[serde(default)]
    pub rank: String,
    #[serde(default)]
    pub league_points: i32,
    pub wins: i32,
    pub losses: i32,
    #[serde(default)]
    pub hot_streak: bool,
    #[serde(default)]
    pub veteran: bool,
    #[serde(default)]
    pub fresh_blood: bool,
    #[serde(default)]
    pub inactive: bool,
    pub mini_series: Option<MiniSeriesDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiniSeriesDto {
    pub losses: i32,
    pub target: i32,
    pub wins: i32,
    pub progress: String,
}

// ============================================================================
// TFT-Match-v1
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct MatchDto {
    pub metadata: MetadataDto,
    pub info: InfoDto,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetadataDto {
    pub match_id: String,
    pub data_version: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InfoDto {
    #[serde(rename = "gameCreation")]
    pub game_creation: i64,
    pub game_length: f64,
    pub game_version: String,
    pub queue_id: i32,
    #[serde(default)]
    pub tft_game_type: String,
    #[serde(default)]
    pub tft_set_core_name: String,
    pub tft_set_number: i32,
    #[serde(rename = "endOfGameResult", default)]
    pub end_of_game_result: String,
    pub participants: Vec<ParticipantDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParticipantDto {
    pub puuid: String,
    #[serde(rename = "riotIdGameName", default)]
    pub riot_id_game_name: String,
    #[serde(rename = "riotIdTagline", default)]
    pub riot_id_tagline: String,
    pub gold_left: i32,
    pub last_round: i32,
    pub level: i32,
    pub placement: i32,
    pub players_eliminated: i32,
    pub time_eliminated: f64,
    pub total_damage_to_players: i32,
    #[serde(default)]
    pub win: bool,
    #[serde(default)]
    pub traits: Vec<TraitDto>,
    #[serde(default)]
    pub units: Vec<UnitDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitDto {
    pub character_id: String,
    #[serde(rename = "itemNames", default)]
    pub item_names: Vec<String>,
    #[serde(default)]
    pub name: String,
    /// Riot's rarity code, not the shop cost: 0, 1, 2, 4 and 6 map to 1-5 gold.
    pub rarity: u8,
    /// Star level.
    pub tier: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitDto {
    pub name: String,
    pub num_units: i32,
    pub style: i32,
    pub tier_current: i32,
    pub tier_total: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_statuses_are_tagged() {
        let err = RiotApiError::from_status(
            StatusCode::TOO_MANY_REQUESTS,
            Some(Duration::from_secs(7)),
        );
        assert!(err.is_transient());
        assert_eq!(err.retry_after(), Some(Duration::from_secs(7)));

        assert!(RiotApiError::from_status(StatusCode::GATEWAY_TIMEOUT, None).is_transient());
        assert!(matches!(
            RiotApiError::from_status(StatusCode::NOT_FOUND, None),
            RiotApiError::NotFound
        ));
        assert!(!RiotApiError::from_status(StatusCode::FORBIDDEN, None).is_transient());
    }

    #[test]
    fn decodes_hyper_roll_entry_without_tier() {
        let raw = r#"{
            "puuid": "abc",
            "queueType": "RANKED_TFT_TURBO",
            "ratedTier": "ORANGE",
            "ratedRating": 4120,
            "wins": 31,
            "losses": 60
        }"#;

        let entry: LeagueEntryDto = serde_json::from_str(raw).unwrap();
        assert_eq!(entry.queue_type, "RANKED_TFT_TURBO");
        assert!(entry.tier.is_empty());
        assert!(entry.mini_series.is_none());
    }

    #[test]
    fn decodes_match_participant() {
        let raw = r#"{
            "puuid": "p1",
            "riotIdGameName": "Setsuko",
            "riotIdTagline": "KR1",
            "gold_left": 3,
            "last_round": 33,
            "level": 9,
            "placement": 1,
            "players_eliminated": 2,
            "time_eliminated": 2201.5,
            "total_damage_to_players": 154,
            "win": true,
            "traits": [{"name": "TFT13_Sniper", "num_units": 4, "style": 3, "tier_current": 2, "tier_total": 3}],
            "units": [{"character_id": "TFT13_Jinx", "itemNames": ["TFT_Item_InfinityEdge"], "name": "", "rarity": 6, "tier": 2}],
            "missions": {"PlayerScore2": 180}
        }"#;

        let participant: ParticipantDto = serde_json::from_str(raw).unwrap();
        assert_eq!(participant.placement, 1);
        assert_eq!(participant.units[0].rarity, 6);
        assert_eq!(participant.units[0].item_names.len(), 1);
        assert_eq!(participant.traits[0].tier_current, 2);
    }
}
