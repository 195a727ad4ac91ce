use serde::{Deserialize, Serialize};

/// How a participant left the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum Standing {
    /// Still seated when the game ended, with this many chips (0 is allowed)
    #[serde(rename_all = "camelCase")]
    Survivor { chip_count: u64 },
    /// Knocked out; `order` is 1 for the first player out, 2 for the next...
    #[serde(rename_all = "camelCase")]
    Eliminated { order: u32 },
}

/// One line of the form submitted when a game ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantEntry {
    pub player_id: String,
    pub name: String,
    #[serde(flatten)]
    pub standing: Standing,
}

impl ParticipantEntry {
    pub fn survivor(player_id: impl Into<String>, name: impl Into<String>, chip_count: u64) -> Self {
        Self {
            player_id: player_id.into(),
            name: name.into(),
            standing: Standing::Survivor { chip_count },
        }
    }

    pub fn eliminated(player_id: impl Into<String>, name: impl Into<String>, order: u32) -> Self {
        Self {
            player_id: player_id.into(),
            name: name.into(),
            standing: Standing::Eliminated { order },
        }
    }

    pub fn is_eliminated(&self) -> bool {
        matches!(self.standing, Standing::Eliminated { .. })
    }
}
