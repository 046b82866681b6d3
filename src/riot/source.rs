use std::fmt::Debug;

use async_trait::async_trait;

use super::client::RiotClient;
use super::types::{LeagueEntryDto, MatchDto, RiotApiResponse};

/// Number of match ids requested per listing. Riot returns them newest first.
pub const MATCH_IDS_PAGE: u32 = 20;

/// Identity as reported by the provider for a Riot ID lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountIdentity {
    pub puuid: String,
    pub game_name: String,
    pub tag_line: String,
}

/// Everything the sync engines need from the game-data provider.
#[async_trait]
pub trait GameDataSource: Send + Sync + Debug {
    async fn resolve_account(
        &self,
        game_name: &str,
        tag_line: &str,
    ) -> RiotApiResponse<AccountIdentity>;

    async fn league_entries(&self, puuid: &str) -> RiotApiResponse<Vec<LeagueEntryDto>>;

    async fn recent_match_ids(&self, puuid: &str) -> RiotApiResponse<Vec<String>>;

    async fn match_detail(&self, match_id: &str) -> RiotApiResponse<MatchDto>;
}

#[async_trait]
impl GameDataSource for RiotClient {
    async fn resolve_account(
        &self,
        game_name: &str,
        tag_line: &str,
    ) -> RiotApiResponse<AccountIdentity> {
        let account = self.get_account_by_riot_id(game_name, tag_line).await?;

        Ok(AccountIdentity {
            puuid: account.puuid,
            game_name: account.game_name.unwrap_or_else(|| game_name.to_string()),
            tag_line: account.tag_line.unwrap_or_else(|| tag_line.to_string()),
        })
    }

    async fn league_entries(&self, puuid: &str) -> RiotApiResponse<Vec<LeagueEntryDto>> {
        self.get_tft_league_entries(puuid).await
    }

    async fn recent_match_ids(&self, puuid: &str) -> RiotApiResponse<Vec<String>> {
        self.get_match_ids(puuid, MATCH_IDS_PAGE).await
    }

    async fn match_detail(&self, match_id: &str) -> RiotApiResponse<MatchDto> {
        self.get_match(match_id).await
    }
}
