mod attendance;
mod chips;
mod placement;

pub use attendance::AttendanceCollector;
pub use chips::ChipsCollector;
pub use placement::PlacementCollector;

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::Utc;

    use crate::models::{Game, GameResult, Player};

    pub fn roster(ids: &[&str]) -> Vec<Player> {
        ids.iter()
            .map(|id| Player {
                id: id.to_string(),
                name: id.to_uppercase(),
                ..Player::default()
            })
            .collect()
    }

    /// Builds a game from `(player_id, chip_count, eliminated)` in finishing order
    pub fn game(lines: &[(&str, u64, bool)]) -> Game {
        let field_size = lines.len() as u64;
        let results = lines
            .iter()
            .enumerate()
            .map(|(index, (player_id, chip_count, eliminated))| GameResult {
                player_id: player_id.to_string(),
                name: player_id.to_uppercase(),
                chip_count: *chip_count,
                score: (field_size - index as u64 - 1) * 10,
                rank: index as u32 + 1,
                eliminated: *eliminated,
            })
            .collect();
        Game::new("season-1", Utc::now(), results)
    }
}
