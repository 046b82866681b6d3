//! Read models handed to callers of [`crate::tracker::Tracker`].

use serde::Serialize;

use crate::achievements::{AchievementType, BadgeType};
use crate::db::models::{BadgeProgress, Match, MatchParticipant};
use crate::riot::types::{TraitDto, UnitDto};

/// A stored match seen from one participant's seat.
#[derive(Debug, Clone, Serialize)]
pub struct RecentMatch {
    pub match_id: String,
    pub game_creation: i64,
    pub game_length: f64,
    pub queue_id: i32,
    pub tft_game_type: String,
    pub placement: i32,
    pub level: i32,
    pub units: Vec<UnitDto>,
    pub traits: Vec<TraitDto>,
    pub participants: Vec<MatchParticipant>,
}

impl RecentMatch {
    /// `None` when `puuid` did not play in the match.
    pub fn focused_on(puuid: &str, m: &Match) -> Option<Self> {
        let me = m.participant(puuid)?;

        Some(Self {
            match_id: m.match_id.clone(),
            game_creation: m.game_creation,
            game_length: m.game_length,
            queue_id: m.queue_id,
            tft_game_type: m.tft_game_type.clone(),
            placement: me.placement,
            level: me.level,
            units: me.units.clone(),
            traits: me.traits.clone(),
            participants: m.participants.clone(),
        })
    }

    pub fn list(puuid: &str, matches: &[Match]) -> Vec<Self> {
        matches
            .iter()
            .filter_map(|m| Self::focused_on(puuid, m))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BadgeView {
    pub badge_type: BadgeType,
    pub achievement_type: AchievementType,
    pub current_count: i64,
    pub required_count: i64,
    pub is_active: bool,
}

impl From<&BadgeProgress> for BadgeView {
    fn from(progress: &BadgeProgress) -> Self {
        Self {
            badge_type: progress.badge_type,
            achievement_type: progress.badge_type.achievement_type(),
            current_count: progress.achievement_count,
            required_count: progress.badge_type.required_count(),
            is_active: progress.is_active,
        }
    }
}
