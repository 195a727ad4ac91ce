use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::achievements::AchievementId;

/// A league member and their persisted counters.
///
/// `total_score` covers the season in progress only. Every other counter is
/// lifetime and survives season rollover.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub total_score: u64,
    #[serde(default)]
    pub total_chips_amassed: u64,
    #[serde(default)]
    pub second_place_count: u32,
    #[serde(default)]
    pub zero_chip_count: u32,
    #[serde(default)]
    pub first_blood_count: u32,
    #[serde(default)]
    pub invincible_streak: u32,
    #[serde(default)]
    pub ventre_mou_count: u32,
    #[serde(default)]
    pub season_wins: u32,
    #[serde(default)]
    pub consecutive_season_wins: u32,
    #[serde(default)]
    pub consecutive_games_streak: u32,
}

impl Player {
    /// Creates a player with a fresh id and zeroed counters
    pub fn new(name: impl Into<String>, image_url: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            image_url,
            ..Self::default()
        }
    }
}

/// A player decorated with season-scoped counts, as shown on a leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerWithStats {
    #[serde(flatten)]
    pub player: Player,
    pub games_played: u32,
    pub wins: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
}

/// One participant's line in a finished game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
    pub player_id: String,
    pub name: String,
    pub chip_count: u64,
    pub score: u64,
    pub rank: u32,
    #[serde(default)]
    pub eliminated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: String,
    pub season_id: String,
    pub date: DateTime<Utc>,
    /// Ordered by rank, winner first
    #[serde(rename = "players")]
    pub results: Vec<GameResult>,
}

impl Game {
    pub fn new(season_id: impl Into<String>, date: DateTime<Utc>, results: Vec<GameResult>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            season_id: season_id.into(),
            date,
            results,
        }
    }

    /// Number of participants, which is also the worst rank
    pub fn field_size(&self) -> u32 {
        self.results.len() as u32
    }

    pub fn result_for(&self, player_id: &str) -> Option<&GameResult> {
        self.results.iter().find(|r| r.player_id == player_id)
    }

    pub fn has_player(&self, player_id: &str) -> bool {
        self.result_for(player_id).is_some()
    }

    /// Checks that ranks form exactly the permutation 1..=N
    pub fn has_consistent_ranks(&self) -> bool {
        let mut ranks: Vec<u32> = self.results.iter().map(|r| r.rank).collect();
        ranks.sort_unstable();
        ranks.iter().enumerate().all(|(i, rank)| *rank == i as u32 + 1)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Season {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub prize: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_closed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_leaderboard: Option<Vec<PlayerWithStats>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<DateTime<Utc>>,
}

impl Season {
    pub fn new(
        name: impl Into<String>,
        image_url: Option<String>,
        end_date: DateTime<Utc>,
        prize: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            image_url,
            end_date,
            prize: prize.into(),
            is_active: false,
            is_closed: false,
            final_leaderboard: None,
            winner_id: None,
            closed_at: None,
        }
    }
}

/// Grant record tying a player to a catalog achievement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerAchievement {
    pub id: String,
    pub player_id: String,
    pub achievement_id: AchievementId,
    pub unlocked_at: DateTime<Utc>,
}

impl PlayerAchievement {
    pub fn new(
        player_id: impl Into<String>,
        achievement_id: AchievementId,
        unlocked_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            player_id: player_id.into(),
            achievement_id,
            unlocked_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl NewsItem {
    pub fn new(text: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            created_at,
        }
    }
}
