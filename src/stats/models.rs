use serde::{Deserialize, Serialize};

/// A single fact pulled out of a finished game by a collector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectedData {
    Placement {
        player_id: String,
        rank: u32,
        field_size: u32,
    },
    Points {
        player_id: String,
        points: u64,
    },
    Chips {
        player_id: String,
        chip_count: u64,
        eliminated: bool,
    },
    Attendance {
        player_id: String,
        present: bool,
    },
}

impl CollectedData {
    pub fn player_id(&self) -> &str {
        match self {
            CollectedData::Placement { player_id, .. } => player_id,
            CollectedData::Points { player_id, .. } => player_id,
            CollectedData::Chips { player_id, .. } => player_id,
            CollectedData::Attendance { player_id, .. } => player_id,
        }
    }
}

/// Lifetime figures derived on demand from the full game history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProfile {
    pub player_id: String,
    pub name: String,
    pub games_played: u32,
    pub wins: u32,
    /// Mean finishing rank rounded to two decimals, absent before the first game
    pub average_rank: Option<f64>,
    pub last_place_count: u32,
}
