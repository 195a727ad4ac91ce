use crate::models::{Game, Player};

use super::super::{CollectedData, CollectedDataBatch, StatCollector, StatsError};

/// Reports, for every rostered player, whether they sat at this game.
pub struct AttendanceCollector;

impl Default for AttendanceCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl AttendanceCollector {
    pub fn new() -> Self {
        Self
    }
}

impl StatCollector for AttendanceCollector {
    fn collect(&self, game: &Game, roster: &[Player]) -> Result<CollectedDataBatch, StatsError> {
        let data = roster
            .iter()
            .map(|player| CollectedData::Attendance {
                player_id: player.id.clone(),
                present: game.has_player(&player.id),
            })
            .collect();

        Ok(data)
    }

    fn name(&self) -> &'static str {
        "AttendanceCollector"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::collectors::test_support::{game, roster};

    #[test]
    fn marks_absent_roster_members() {
        let collector = AttendanceCollector::new();
        let game = game(&[("alice", 100, false), ("carol", 0, true)]);

        let data = collector
            .collect(&game, &roster(&["alice", "bob", "carol"]))
            .unwrap();

        assert_eq!(data.len(), 3);
        assert!(matches!(&data[0], CollectedData::Attendance { present: true, .. }));
        assert!(matches!(&data[1], CollectedData::Attendance { player_id, present: false } if player_id == "bob"));
        assert!(matches!(&data[2], CollectedData::Attendance { present: true, .. }));
    }
}
