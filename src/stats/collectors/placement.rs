use crate::models::{Game, Player};

use super::super::{CollectedData, CollectedDataBatch, StatCollector, StatsError};

/// Reports each participant's finishing rank and the points it earned.
pub struct PlacementCollector;

impl Default for PlacementCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl PlacementCollector {
    pub fn new() -> Self {
        Self
    }
}

impl StatCollector for PlacementCollector {
    fn collect(&self, game: &Game, _roster: &[Player]) -> Result<CollectedDataBatch, StatsError> {
        if game.results.is_empty() {
            return Err(StatsError::Validation(
                "PlacementCollector requires at least one participant".to_string(),
            ));
        }

        if !game.has_consistent_ranks() {
            return Err(StatsError::Validation(format!(
                "game {} ranks are not a permutation of 1..={}",
                game.id,
                game.field_size()
            )));
        }

        let field_size = game.field_size();
        let data = game
            .results
            .iter()
            .flat_map(|result| {
                [
                    CollectedData::Placement {
                        player_id: result.player_id.clone(),
                        rank: result.rank,
                        field_size,
                    },
                    CollectedData::Points {
                        player_id: result.player_id.clone(),
                        points: result.score,
                    },
                ]
            })
            .collect();

        Ok(data)
    }

    fn name(&self) -> &'static str {
        "PlacementCollector"
    }
}
