use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoringError {
    #[error("Ranking inconsistency: {0}")]
    RankingInconsistency(String),
}

impl ScoringError {
    pub fn inconsistency(msg: impl Into<String>) -> Self {
        ScoringError::RankingInconsistency(msg.into())
    }
}
