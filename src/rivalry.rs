use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument};

use crate::accounts::AccountResolver;
use crate::db::Repository;
use crate::db::models::{Account, LeagueEntry};
use crate::error::AppError;

/// Queue preferred when summarizing a rival's ranked status.
const PRIMARY_QUEUE: &str = "RANKED_TFT";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RivalryError {
    #[error("a rivalry needs at least one participant")]
    Empty,
    #[error("a rivalry needs participants on both sides")]
    MissingSide,
    #[error("accounts not found: {0:?}")]
    SomeAccountsNotFound(Vec<i64>),
    #[error("account {account_id} is already on the {side} side")]
    DuplicateOnSameSide { account_id: i64, side: RivalSide },
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum RivalSide {
    Left,
    Right,
}

impl fmt::Display for RivalSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => f.write_str("LEFT"),
            Self::Right => f.write_str("RIGHT"),
        }
    }
}

impl FromStr for RivalSide {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LEFT" | "L" => Ok(Self::Left),
            "RIGHT" | "R" => Ok(Self::Right),
            _ => Err(format!("unknown side: {s}")),
        }
    }
}

/// One requested seat: `account_id:SIDE` on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParticipantSpec {
    pub account_id: i64,
    pub side: RivalSide,
}

impl FromStr for ParticipantSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, side) = s
            .split_once(':')
            .ok_or_else(|| format!("expected <account_id>:<LEFT|RIGHT>, got {s}"))?;

        Ok(Self {
            account_id: id
                .trim()
                .parse()
                .map_err(|_| format!("invalid account id: {id}"))?,
            side: side.parse()?,
        })
    }
}

/// A rivalry being assembled, not yet stored.
#[derive(Debug, Default)]
pub struct RivalryDraft {
    participants: Vec<(i64, RivalSide)>,
    seated: HashSet<(i64, RivalSide)>,
}

impl RivalryDraft {
    pub fn add_participant(&mut self, account_id: i64, side: RivalSide) -> Result<(), RivalryError> {
        if !self.seated.insert((account_id, side)) {
            return Err(RivalryError::DuplicateOnSameSide { account_id, side });
        }
        self.participants.push((account_id, side));
        Ok(())
    }

    pub fn participants(&self) -> &[(i64, RivalSide)] {
        &self.participants
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RivalryMember {
    pub participant_id: i64,
    pub account_id: i64,
    pub riot_id: String,
    pub status: Option<LeagueEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RivalryDetail {
    pub rivalry_id: i64,
    pub created_at: i64,
    pub left: Vec<RivalryMember>,
    pub right: Vec<RivalryMember>,
}

#[derive(Clone, Debug)]
pub struct RivalryAggregator {
    db: Repository,
    accounts: AccountResolver,
}

impl RivalryAggregator {
    pub fn new(db: Repository, accounts: AccountResolver) -> Self {
        Self { db, accounts }
    }

    #[instrument(skip_all, fields(participants = specs.len()))]
    pub async fn create(&self, specs: &[ParticipantSpec]) -> Result<i64, AppError> {
        if specs.is_empty() {
            return Err(RivalryError::Empty.into());
        }
        let sides: HashSet<RivalSide> = specs.iter().map(|s| s.side).collect();
        if sides.len() < 2 {
            return Err(RivalryError::MissingSide.into());
        }

        let requested: BTreeSet<i64> = specs.iter().map(|s| s.account_id).collect();
        let ids: Vec<i64> = requested.iter().copied().collect();
        let found: HashSet<i64> = self
            .accounts
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .map(|a| a.id)
            .collect();

        let missing: Vec<i64> = ids.into_iter().filter(|id| !found.contains(id)).collect();
        if !missing.is_empty() {
            return Err(RivalryError::SomeAccountsNotFound(missing).into());
        }

        let mut draft = RivalryDraft::default();
        for spec in specs {
            draft.add_participant(spec.account_id, spec.side)?;
        }

        let rivalry_id = self.db.insert_rivalry(draft.participants()).await?;
        info!(rivalry_id, "⚔️ Rivalry created");
        Ok(rivalry_id)
    }

    pub async fn detail(&self, rivalry_id: i64) -> Result<RivalryDetail, AppError> {
        let rivalry = self
            .db
            .rivalry(rivalry_id)
            .await?
            .ok_or(AppError::RivalryNotFound(rivalry_id))?;

        let ids: Vec<i64> = rivalry
            .participants
            .iter()
            .map(|p| p.account_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let accounts: HashMap<i64, Account> = self
            .accounts
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .map(|a| (a.id, a))
            .collect();

        let mut entries: HashMap<i64, Vec<LeagueEntry>> = HashMap::new();
        for entry in self.db.latest_entries_for_accounts(&ids).await? {
            entries.entry(entry.account_id).or_default().push(entry);
        }

        let mut detail = RivalryDetail {
            rivalry_id: rivalry.id,
            created_at: rivalry.created_at,
            left: Vec::new(),
            right: Vec::new(),
        };

        for participant in &rivalry.participants {
            let member = RivalryMember {
                participant_id: participant.id,
                account_id: participant.account_id,
                riot_id: accounts
                    .get(&participant.account_id)
                    .map(Account::riot_id)
                    .unwrap_or_default(),
                status: entries
                    .get(&participant.account_id)
                    .and_then(|e| ranked_status(e))
                    .cloned(),
            };

            match participant.side {
                RivalSide::Left => detail.left.push(member),
                RivalSide::Right => detail.right.push(member),
            }
        }

        Ok(detail)
    }
}

/// Entries arrive sorted by queue type, so the fallback is the first queue by name.
fn ranked_status(entries: &[LeagueEntry]) -> Option<&LeagueEntry> {
    entries
        .iter()
        .find(|e| e.queue_type == PRIMARY_QUEUE)
        .or_else(|| entries.first())
}
