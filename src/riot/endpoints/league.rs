use crate::riot::client::RiotClient;
use crate::riot::types::{LeagueEntryDto, RiotApiResponse};

impl RiotClient {
    /// Get TFT league entries for a player by PUUID
    /// Uses platform routing (euw1, na1, kr, etc.)
    pub async fn get_tft_league_entries(&self, puuid: &str) -> RiotApiResponse<Vec<LeagueEntryDto>> {
        let url = format!("{}/tft/league/v1/by-puuid/{}", self.platform_base(), puuid);

        self.get(&url).await
    }
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use nonzero_ext::nonzero;

    use crate::riot::RiotClient;

    #[tokio::test]
    async fn lists_entries_on_platform_host() {
        let regional = MockServer::start_async().await;
        let platform = MockServer::start_async().await;
        let mock = platform
            .mock_async(|when, then| {
                when.method(GET).path("/tft/league/v1/by-puuid/p1");
                then.status(200).json_body(serde_json::json!([{
                    "puuid": "p1",
                    "queueType": "RANKED_TFT",
                    "tier": "DIAMOND",
                    "rank": "II",
                    "leaguePoints": 57,
                    "wins": 40,
                    "losses": 98,
                    "hotStreak": true,
                    "veteran": false,
                    "freshBlood": false,
                    "inactive": false
                }]));
            })
            .await;

        let client = RiotClient::with_base_urls(
            "key".into(),
            regional.base_url(),
            platform.base_url(),
            nonzero!(100u32),
        );
        let entries = client.get_tft_league_entries("p1").await.unwrap();

        mock.assert_async().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].tier, "DIAMOND");
        assert!(entries[0].hot_streak);
    }
}
