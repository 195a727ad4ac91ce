use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{PlayerAchievement, PlayerWithStats, Season};
use crate::scoring::ParticipantEntry;
use crate::stats::PlayerProfile;

/// Request payload for adding a player to the roster
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerCreateRequest {
    pub name: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Fields left out are kept as they are
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerUpdateRequest {
    pub name: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonCreateRequest {
    pub name: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub prize: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonUpdateRequest {
    pub name: Option<String>,
    pub image_url: Option<String>,
    pub end_date: Option<DateTime<Utc>>,
    pub prize: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecordRequest {
    pub season_id: String,
    pub participants: Vec<ParticipantEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameEditRequest {
    pub participants: Vec<ParticipantEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GamesQuery {
    pub season_id: Option<String>,
}

/// Active season with its current standings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardResponse {
    pub season: Option<Season>,
    pub standings: Vec<PlayerWithStats>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProfileResponse {
    #[serde(flatten)]
    pub profile: PlayerProfile,
    pub achievements: Vec<PlayerAchievement>,
}
