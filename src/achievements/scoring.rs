use crate::db::models::{LOBBY_SIZE, Match, MatchParticipant, NewAchievement};
use crate::error::AppError;
use crate::riot::types::UnitDto;

use super::AchievementType;

/// Shop cost for Riot's unit rarity code.
pub fn base_cost(rarity: u8) -> i64 {
    match rarity {
        0 => 1,
        1 => 2,
        2 => 3,
        4 => 4,
        6 => 5,
        _ => 0,
    }
}

/// Gold sunk into a board: a unit costs three copies of the previous star level.
pub fn squad_value(units: &[UnitDto]) -> i64 {
    units
        .iter()
        .map(|unit| match unit.tier {
            0 => 0,
            tier => base_cost(unit.rarity)
                .saturating_mul(3i64.saturating_pow(u32::from(tier) - 1)),
        })
        .fold(0, i64::saturating_add)
}

/// Earliest item holding the maximal key.
fn first_max_by_key<T, K: Ord>(items: &[T], key: impl Fn(&T) -> K) -> Option<&T> {
    items
        .iter()
        .reduce(|best, item| if key(item) > key(best) { item } else { best })
}

/// Every achievement record earned in a stored match.
pub fn match_achievements(m: &Match) -> Result<Vec<NewAchievement>, AppError> {
    let participants = &m.participants;
    if participants.len() != LOBBY_SIZE {
        return Err(AppError::InvalidMatch {
            match_id: m.match_id.clone(),
            reason: format!(
                "expected {LOBBY_SIZE} participants, got {}",
                participants.len()
            ),
        });
    }

    let record = |achievement_type, participant: &MatchParticipant, value| NewAchievement {
        match_ref: m.id,
        achievement_type,
        participant_ref: participant.id,
        value,
    };

    let mut records = Vec::with_capacity(8);

    if let Some(p) = first_max_by_key(participants, |p| squad_value(&p.units)) {
        records.push(record(
            AchievementType::MostExpensiveSquad,
            p,
            squad_value(&p.units),
        ));
    }
    if let Some(p) = first_max_by_key(participants, |p| p.total_damage_to_players) {
        records.push(record(
            AchievementType::MostDamageDealt,
            p,
            i64::from(p.total_damage_to_players),
        ));
    }
    if let Some(p) = first_max_by_key(participants, |p| p.players_eliminated) {
        records.push(record(
            AchievementType::MostEliminations,
            p,
            i64::from(p.players_eliminated),
        ));
    }

    let mut winners = participants.iter().filter(|p| p.placement == 1);
    match (winners.next(), winners.next()) {
        (Some(winner), None) => records.push(record(AchievementType::FirstPlace, winner, 1)),
        _ => {
            return Err(AppError::InvalidMatch {
                match_id: m.match_id.clone(),
                reason: "expected exactly one first place".into(),
            });
        }
    }

    records.extend(
        participants
            .iter()
            .filter(|p| p.placement <= 4)
            .map(|p| record(AchievementType::TopFour, p, i64::from(p.placement))),
    );

    Ok(records)
}
