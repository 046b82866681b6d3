use thiserror::Error;

use crate::riot::RiotApiError;
use crate::rivalry::RivalryError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Riot API error: {0}")]
    ExternalSource(#[from] RiotApiError),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Account not found: {game_name}#{tag_line}")]
    AccountNotFound { game_name: String, tag_line: String },

    #[error("Rivalry not found: {0}")]
    RivalryNotFound(i64),

    #[error("Invalid rivalry: {0}")]
    Rivalry(#[from] RivalryError),

    #[error("Invalid match {match_id}: {reason}")]
    InvalidMatch { match_id: String, reason: String },

    #[error("No ranked TFT record this season for {puuid}")]
    NoRankedRecord { puuid: String },

    #[error("League entries were modified concurrently")]
    ConcurrencyConflict,

    #[error("League entries still conflicting after {attempts} attempts")]
    StoreContention { attempts: u32 },

    #[error("Failed to renew TFT data for {game_name}#{tag_line}: {source}")]
    Renewal {
        game_name: String,
        tag_line: String,
        source: Box<AppError>,
    },

    #[error("Invalid region: {0}")]
    InvalidRegion(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Errors caused by the caller's input rather than by this service or the Riot API.
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::AccountNotFound { .. }
            | Self::RivalryNotFound(_)
            | Self::Rivalry(_)
            | Self::NoRankedRecord { .. } => true,
            Self::ExternalSource(e) => matches!(e, RiotApiError::NotFound),
            _ => false,
        }
    }

    pub(crate) fn is_unique_violation(&self) -> bool {
        match self {
            Self::Database(sqlx::Error::Database(e)) => e.is_unique_violation(),
            _ => false,
        }
    }
}
