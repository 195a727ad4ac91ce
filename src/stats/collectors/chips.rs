use crate::models::{Game, Player};

use super::super::{CollectedData, CollectedDataBatch, StatCollector, StatsError};

/// Reports the stack each participant finished with.
pub struct ChipsCollector;

impl Default for ChipsCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl ChipsCollector {
    pub fn new() -> Self {
        Self
    }
}

impl StatCollector for ChipsCollector {
    fn collect(&self, game: &Game, _roster: &[Player]) -> Result<CollectedDataBatch, StatsError> {
        let data = game
            .results
            .iter()
            .map(|result| CollectedData::Chips {
                player_id: result.player_id.clone(),
                chip_count: result.chip_count,
                eliminated: result.eliminated,
            })
            .collect();

        Ok(data)
    }

    fn name(&self) -> &'static str {
        "ChipsCollector"
    }
}
