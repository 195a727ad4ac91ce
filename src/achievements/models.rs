use serde::{Deserialize, Serialize};

use crate::models::{NewsItem, PlayerAchievement};

use super::{Achievement, AchievementId, AchievementType};

/// Side effects decided by one evaluation pass, applied in the same batch as
/// the event that triggered it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AchievementOutcome {
    pub grants: Vec<PlayerAchievement>,
    pub revocations: Vec<PlayerAchievement>,
    pub news: Vec<NewsItem>,
}

impl AchievementOutcome {
    pub fn is_empty(&self) -> bool {
        self.grants.is_empty() && self.revocations.is_empty() && self.news.is_empty()
    }

    pub fn extend(&mut self, other: AchievementOutcome) {
        self.grants.extend(other.grants);
        self.revocations.extend(other.revocations);
        self.news.extend(other.news);
    }

    pub fn grants_of(&self, achievement_id: AchievementId) -> Vec<&str> {
        self.grants
            .iter()
            .filter(|g| g.achievement_id == achievement_id)
            .map(|g| g.player_id.as_str())
            .collect()
    }
}

/// Catalog entry as exposed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementView {
    pub id: AchievementId,
    pub name: String,
    pub description: String,
    pub emoji: String,
    #[serde(rename = "type")]
    pub kind: AchievementType,
}

impl From<&Achievement> for AchievementView {
    fn from(achievement: &Achievement) -> Self {
        Self {
            id: achievement.id,
            name: achievement.name.to_string(),
            description: achievement.description.to_string(),
            emoji: achievement.emoji.to_string(),
            kind: achievement.kind(),
        }
    }
}
