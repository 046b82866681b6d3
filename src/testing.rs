//! Fixtures shared by the unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::db::models::{Match, MatchParticipant};
use crate::riot::types::{
    InfoDto, LeagueEntryDto, MatchDto, MetadataDto, ParticipantDto, TraitDto, UnitDto,
};
use crate::riot::{AccountIdentity, GameDataSource, RiotApiError, RiotApiResponse};

pub const LOBBY: [&str; 8] = [
    "puuid-a", "puuid-b", "puuid-c", "puuid-d", "puuid-e", "puuid-f", "puuid-g", "puuid-h",
];

pub fn identity(puuid: &str, game_name: &str, tag_line: &str) -> AccountIdentity {
    AccountIdentity {
        puuid: puuid.into(),
        game_name: game_name.into(),
        tag_line: tag_line.into(),
    }
}

pub fn unit(rarity: u8, tier: u8) -> UnitDto {
    UnitDto {
        character_id: format!("TFT12_Unit{rarity}"),
        item_names: Vec::new(),
        name: String::new(),
        rarity,
        tier,
    }
}

pub fn league_entry(queue_type: &str, tier: &str, league_points: i32) -> LeagueEntryDto {
    LeagueEntryDto {
        puuid: None,
        queue_type: queue_type.into(),
        tier: tier.into(),
        rank: if tier.is_empty() { String::new() } else { "II".into() },
        league_points,
        wins: 10,
        losses: 12,
        hot_streak: false,
        veteran: false,
        fresh_blood: false,
        inactive: false,
        mini_series: None,
    }
}

/// A complete lobby where `puuids[i]` finishes in place `i + 1` and deals the most damage
/// and eliminations the higher they place.
pub fn sample_match(match_id: &str, game_creation: i64, puuids: &[&str]) -> MatchDto {
    let participants = puuids
        .iter()
        .enumerate()
        .map(|(i, puuid)| {
            let i = i as i32;
            ParticipantDto {
                puuid: (*puuid).into(),
                riot_id_game_name: format!("Player {}", i + 1),
                riot_id_tagline: "KR1".into(),
                gold_left: 2,
                last_round: 30 - i,
                level: 8,
                placement: i + 1,
                players_eliminated: 7 - i,
                time_eliminated: 2000.0 - f64::from(i) * 60.0,
                total_damage_to_players: 100 - i * 10,
                win: i < 4,
                traits: vec![TraitDto {
                    name: "TFT12_Arcana".into(),
                    num_units: 2,
                    style: 1,
                    tier_current: 1,
                    tier_total: 4,
                }],
                units: vec![unit(0, 1)],
            }
        })
        .collect();

    MatchDto {
        metadata: MetadataDto {
            match_id: match_id.into(),
            data_version: "5".into(),
        },
        info: InfoDto {
            game_creation,
            game_length: 2100.0,
            game_version: "Version 14.20".into(),
            queue_id: 1100,
            tft_game_type: "standard".into(),
            tft_set_core_name: "TFTSet12".into(),
            tft_set_number: 12,
            end_of_game_result: "GameComplete".into(),
            participants,
        },
    }
}

/// [`sample_match`] as if read back from the store, participant ids `1..=8`.
pub fn stored_match(match_id: &str, puuids: &[&str]) -> Match {
    let dto = sample_match(match_id, 0, puuids);

    let participants = dto
        .info
        .participants
        .into_iter()
        .enumerate()
        .map(|(i, p)| MatchParticipant {
            id: i as i64 + 1,
            match_ref: 1,
            match_id: match_id.into(),
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
        })
        .collect();

    Match {
        id: 1,
        match_id: match_id.into(),
        data_version: "5".into(),
        game_creation: 0,
        game_length: dto.info.game_length,
        game_version: dto.info.game_version,
        queue_id: dto.info.queue_id,
        tft_game_type: dto.info.tft_game_type,
        tft_set_core_name: dto.info.tft_set_core_name,
        tft_set_number: dto.info.tft_set_number,
        end_of_game_result: dto.info.end_of_game_result,
        participants,
    }
}

pub const RESOLVE_ACCOUNT: &str = "resolve_account";
pub const LEAGUE_ENTRIES: &str = "league_entries";
pub const RECENT_MATCH_IDS: &str = "recent_match_ids";
pub const MATCH_DETAIL: &str = "match_detail";

/// In-memory provider with per-operation call counters and queued failures.
#[derive(Debug, Default)]
pub struct FakeSource {
    accounts: Mutex<HashMap<(String, String), AccountIdentity>>,
    entries: Mutex<HashMap<String, Vec<LeagueEntryDto>>>,
    match_ids: Mutex<HashMap<String, Vec<String>>>,
    matches: Mutex<HashMap<String, MatchDto>>,
    failures: Mutex<HashMap<&'static str, VecDeque<RiotApiError>>>,
    calls: Mutex<HashMap<&'static str, usize>>,
}

impl FakeSource {
    pub fn add_account(&self, identity: AccountIdentity) {
        let key = (
            identity.game_name.to_lowercase(),
            identity.tag_line.to_lowercase(),
        );
        self.accounts.lock().unwrap().insert(key, identity);
    }

    pub fn set_entries(&self, puuid: &str, entries: Vec<LeagueEntryDto>) {
        self.entries.lock().unwrap().insert(puuid.into(), entries);
    }

    /// Publishes matches for `puuid`, newest first in the order given.
    pub fn set_history(&self, puuid: &str, history: Vec<MatchDto>) {
        let ids = history.iter().map(|m| m.metadata.match_id.clone()).collect();
        self.match_ids.lock().unwrap().insert(puuid.into(), ids);

        let mut matches = self.matches.lock().unwrap();
        for m in history {
            matches.insert(m.metadata.match_id.clone(), m);
        }
    }

    pub fn fail_next(&self, operation: &'static str, error: RiotApiError) {
        self.failures
            .lock()
            .unwrap()
            .entry(operation)
            .or_default()
            .push_back(error);
    }

    pub fn calls(&self, operation: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .get(operation)
            .copied()
            .unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    fn record(&self, operation: &'static str) -> RiotApiResponse<()> {
        *self.calls.lock().unwrap().entry(operation).or_default() += 1;

        match self
            .failures
            .lock()
            .unwrap()
            .get_mut(operation)
            .and_then(VecDeque::pop_front)
        {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl GameDataSource for FakeSource {
    async fn resolve_account(
        &self,
        game_name: &str,
        tag_line: &str,
    ) -> RiotApiResponse<AccountIdentity> {
        self.record(RESOLVE_ACCOUNT)?;
        self.accounts
            .lock()
            .unwrap()
            .get(&(game_name.to_lowercase(), tag_line.to_lowercase()))
            .cloned()
            .ok_or(RiotApiError::NotFound)
    }

    async fn league_entries(&self, puuid: &str) -> RiotApiResponse<Vec<LeagueEntryDto>> {
        self.record(LEAGUE_ENTRIES)?;
        Ok(self
            .entries
            .lock()
            .unwrap()
            .get(puuid)
            .cloned()
            .unwrap_or_default())
    }

    async fn recent_match_ids(&self, puuid: &str) -> RiotApiResponse<Vec<String>> {
        self.record(RECENT_MATCH_IDS)?;
        Ok(self
            .match_ids
            .lock()
            .unwrap()
            .get(puuid)
            .cloned()
            .unwrap_or_default())
    }

    async fn match_detail(&self, match_id: &str) -> RiotApiResponse<MatchDto> {
        self.record(MATCH_DETAIL)?;
        self.matches
            .lock()
            .unwrap()
            .get(match_id)
            .cloned()
            .ok_or(RiotApiError::NotFound)
    }
}
