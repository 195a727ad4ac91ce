use thiserror::Error;

use crate::scoring::ScoringError;
use crate::stats::StatsError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum LeagueError {
    #[error("{0}")]
    RankingInconsistency(String),

    #[error("No season is active")]
    NoActiveSeason,

    #[error("Season {0} is not the active season")]
    SeasonNotActive(String),

    #[error("Season {0} is closed")]
    SeasonClosed(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<ScoringError> for LeagueError {
    fn from(err: ScoringError) -> Self {
        LeagueError::RankingInconsistency(err.to_string())
    }
}

// Collectors only reject games whose ranks do not line up
impl From<StatsError> for LeagueError {
    fn from(err: StatsError) -> Self {
        LeagueError::RankingInconsistency(err.to_string())
    }
}
