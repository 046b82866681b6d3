mod client;
mod endpoints;
pub mod region;
pub mod source;
pub mod types;

pub use client::RiotClient;
pub use region::{Platform, Region};
pub use source::{AccountIdentity, GameDataSource};
pub use types::{RiotApiError, RiotApiResponse};
