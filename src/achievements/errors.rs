use thiserror::Error;

use super::AchievementId;

/// Problems evaluating a single rule. Never fatal to the enclosing operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AchievementError {
    #[error("Malformed history: {0}")]
    MalformedHistory(String),

    #[error("No catalog entry for {0}")]
    UnknownAchievement(AchievementId),
}
