use crate::riot::client::RiotClient;
use crate::riot::types::{MatchDto, RiotApiResponse};

impl RiotClient {
    /// Get the most recent TFT match IDs by PUUID, newest first
    /// Uses regional routing (americas, europe, asia, sea)
    pub async fn get_match_ids(&self, puuid: &str, count: u32) -> RiotApiResponse<Vec<String>> {
        let url = format!(
            "{}/tft/match/v1/matches/by-puuid/{}/ids?start=0&count={}",
            self.regional_base(),
            puuid,
            count
        );

        self.get(&url).await
    }

    /// Get TFT match details by match ID
    /// Uses regional routing (americas, europe, asia, sea)
    pub async fn get_match(&self, match_id: &str) -> RiotApiResponse<MatchDto> {
        let url = format!("{}/tft/match/v1/matches/{}", self.regional_base(), match_id);

        self.get(&url).await
    }
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use nonzero_ext::nonzero;

    use crate::riot::RiotClient;

    fn participant(puuid: &str, placement: i32) -> serde_json::Value {
        serde_json::json!({
            "puuid": puuid,
            "riotIdGameName": puuid,
            "riotIdTagline": "KR1",
            "gold_left": 0,
            "last_round": 30,
            "level": 8,
            "placement": placement,
            "players_eliminated": 0,
            "time_eliminated": 1800.0,
            "total_damage_to_players": 40,
            "win": placement <= 4,
            "traits": [],
            "units": []
        })
    }

    #[tokio::test]
    async fn requests_match_ids_with_count() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/tft/match/v1/matches/by-puuid/p1/ids")
                    .query_param("start", "0")
                    .query_param("count", "20");
                then.status(200)
                    .json_body(serde_json::json!(["KR_3", "KR_2", "KR_1"]));
            })
            .await;

        let client = RiotClient::with_base_urls(
            "key".into(),
            server.base_url(),
            server.base_url(),
            nonzero!(100u32),
        );
        let ids = client.get_match_ids("p1", 20).await.unwrap();

        mock.assert_async().await;
        assert_eq!(ids, vec!["KR_3", "KR_2", "KR_1"]);
    }

    #[tokio::test]
    async fn decodes_match_detail() {
        let server = MockServer::start_async().await;
        let participants: Vec<_> = (1..=8).map(|p| participant(&format!("p{p}"), p)).collect();
        server
            .mock_async(|when, then| {
                when.method(GET).path("/tft/match/v1/matches/KR_7");
                then.status(200).json_body(serde_json::json!({
                    "metadata": {
                        "data_version": "5",
                        "match_id": "KR_7",
                        "participants": []
                    },
                    "info": {
                        "endOfGameResult": "GameComplete",
                        "gameCreation": 1_728_000_000_000i64,
                        "game_datetime": 1_728_000_100_000i64,
                        "game_length": 2100.25,
                        "game_version": "Version 14.20",
                        "queue_id": 1100,
                        "tft_game_type": "standard",
                        "tft_set_core_name": "TFTSet12",
                        "tft_set_number": 12,
                        "participants": participants
                    }
                }));
            })
            .await;

        let client = RiotClient::with_base_urls(
            "key".into(),
            server.base_url(),
            server.base_url(),
            nonzero!(100u32),
        );
        let detail = client.get_match("KR_7").await.unwrap();

        assert_eq!(detail.metadata.match_id, "KR_7");
        assert_eq!(detail.info.queue_id, 1100);
        assert_eq!(detail.info.participants.len(), 8);
        assert_eq!(detail.info.end_of_game_result, "GameComplete");
    }
}
