pub mod entries;
pub mod matches;
pub mod pacer;
pub mod retry;

pub use entries::EntrySyncEngine;
pub use matches::{MatchSyncEngine, MatchSyncResult, RECENT_MATCHES_LIMIT};
pub use pacer::{IntervalPacer, NoPacing, Pacer};
pub use retry::RetryPolicy;
