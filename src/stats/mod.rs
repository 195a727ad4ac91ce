pub mod aggregator;
pub mod collectors;
pub mod standings;

mod errors;
pub mod models;

pub use aggregator::{StatsAggregator, StatsAggregatorBuilder};
pub use errors::StatsError;
pub use models::*;
pub use standings::{player_profile, season_standings};

use crate::models::{Game, Player};

pub type CollectedDataBatch = Vec<CollectedData>;

/// Extracts facts from one finished game.
///
/// `roster` is every known player, participants or not, so collectors can
/// report on absentees too.
pub trait StatCollector: Send + Sync {
    fn collect(&self, game: &Game, roster: &[Player]) -> Result<CollectedDataBatch, StatsError>;

    /// Name used in logs
    fn name(&self) -> &'static str;
}
