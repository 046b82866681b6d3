//! TFT account tracker: ranked standings, match history, achievement badges and rivalries
//! kept in sync with the Riot Games API.

pub mod accounts;
pub mod achievements;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod renewal;
pub mod riot;
pub mod rivalry;
pub mod sync;
pub mod tracker;
pub mod views;

#[cfg(test)]
pub(crate) mod testing;

pub use error::AppError;
pub use tracker::Tracker;
