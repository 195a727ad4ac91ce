use std::sync::Arc;

use tracing::{debug, instrument};

use crate::models::{Game, Player};

use super::{
    collectors::{AttendanceCollector, ChipsCollector, PlacementCollector},
    CollectedData, StatCollector, StatsError,
};

/// Folds the facts collected from a game into the persisted player counters.
pub struct StatsAggregator {
    collectors: Vec<Arc<dyn StatCollector>>,
}

impl Default for StatsAggregator {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl StatsAggregator {
    pub fn builder() -> StatsAggregatorBuilder {
        StatsAggregatorBuilder::new()
    }

    pub fn collectors(&self) -> Vec<Arc<dyn StatCollector>> {
        self.collectors.clone()
    }

    /// Applies one finished game to `roster` in place.
    ///
    /// On error the roster may be partially updated; callers work on a copy
    /// and only persist it once this returns `Ok`.
    #[instrument(skip(self, roster, game), fields(game_id = %game.id))]
    pub fn apply_game(&self, roster: &mut [Player], game: &Game) -> Result<(), StatsError> {
        let collected = self.collect_all(game, roster)?;

        for data in &collected {
            let Some(player) = roster.iter_mut().find(|p| p.id == data.player_id()) else {
                debug!(player_id = %data.player_id(), "Skipping fact for player missing from roster");
                continue;
            };
            Self::fold(player, data);
        }

        debug!(facts = collected.len(), "Applied game to player counters");
        Ok(())
    }

    fn fold(player: &mut Player, data: &CollectedData) {
        match data {
            CollectedData::Placement {
                rank, field_size, ..
            } => {
                if *rank == 2 {
                    player.second_place_count += 1;
                }

                if rank == field_size {
                    player.first_blood_count += 1;
                    player.invincible_streak = 0;
                } else {
                    player.invincible_streak += 1;
                }

                if field_size % 2 == 1 && *rank == field_size.div_ceil(2) {
                    player.ventre_mou_count += 1;
                }
            }
            CollectedData::Points { points, .. } => {
                player.total_score += points;
            }
            CollectedData::Chips {
                chip_count,
                eliminated,
                ..
            } => {
                player.total_chips_amassed += chip_count;
                if *chip_count == 0 && !eliminated {
                    player.zero_chip_count += 1;
                }
            }
            CollectedData::Attendance { present, .. } => {
                if *present {
                    player.consecutive_games_streak += 1;
                } else {
                    player.consecutive_games_streak = 0;
                }
            }
        }
    }

    fn collect_all(&self, game: &Game, roster: &[Player]) -> Result<Vec<CollectedData>, StatsError> {
        let mut collected = Vec::new();
        for collector in &self.collectors {
            let batch = collector.collect(game, roster).map_err(|e| {
                StatsError::Collector(format!("{} failed: {}", collector.name(), e))
            })?;
            collected.extend(batch);
        }
        Ok(collected)
    }
}

pub struct StatsAggregatorBuilder {
    collectors: Vec<Arc<dyn StatCollector>>,
}

impl StatsAggregatorBuilder {
    fn new() -> Self {
        Self {
            collectors: vec![
                Arc::new(PlacementCollector::new()),
                Arc::new(ChipsCollector::new()),
                Arc::new(AttendanceCollector::new()),
            ],
        }
    }

    pub fn with_collector(mut self, collector: Arc<dyn StatCollector>) -> Self {
        self.collectors.push(collector);
        self
    }

    pub fn build(self) -> StatsAggregator {
        StatsAggregator {
            collectors: self.collectors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::collectors::test_support::{game, roster};
    use std::sync::Mutex;

    fn player<'a>(roster: &'a [Player], id: &str) -> &'a Player {
        roster.iter().find(|p| p.id == id).unwrap()
    }

    #[test]
    fn updates_counters_for_four_player_game() {
        let aggregator = StatsAggregator::default();
        let mut players = roster(&["p1", "p2", "p3", "p4", "absent"]);
        players[4].consecutive_games_streak = 6;

        let game = game(&[
            ("p1", 5000, false),
            ("p2", 0, false),
            ("p3", 0, true),
            ("p4", 0, true),
        ]);
        aggregator.apply_game(&mut players, &game).unwrap();

        let p1 = player(&players, "p1");
        assert_eq!(p1.total_score, 30);
        assert_eq!(p1.total_chips_amassed, 5000);
        assert_eq!(p1.invincible_streak, 1);
        assert_eq!(p1.consecutive_games_streak, 1);

        let p2 = player(&players, "p2");
        assert_eq!(p2.second_place_count, 1);
        assert_eq!(p2.zero_chip_count, 1);

        let p3 = player(&players, "p3");
        assert_eq!(p3.zero_chip_count, 0, "eliminated players are not zero-chip finishes");

        let p4 = player(&players, "p4");
        assert_eq!(p4.first_blood_count, 1);
        assert_eq!(p4.invincible_streak, 0);
        assert_eq!(p4.total_score, 0);

        assert_eq!(player(&players, "absent").consecutive_games_streak, 0);
    }

    #[test]
    fn counts_median_finish_only_in_odd_fields() {
        let aggregator = StatsAggregator::default();

        let mut players = roster(&["a", "b", "c", "d", "e"]);
        let five = game(&[
            ("a", 50, false),
            ("b", 40, false),
            ("c", 30, false),
            ("d", 0, true),
            ("e", 0, true),
        ]);
        aggregator.apply_game(&mut players, &five).unwrap();
        assert_eq!(player(&players, "c").ventre_mou_count, 1);
        assert_eq!(
            players.iter().map(|p| p.ventre_mou_count).sum::<u32>(),
            1
        );

        let four = game(&[("a", 50, false), ("b", 40, false), ("c", 0, true), ("d", 0, true)]);
        aggregator.apply_game(&mut players, &four).unwrap();
        assert_eq!(
            players.iter().map(|p| p.ventre_mou_count).sum::<u32>(),
            1
        );
    }

    #[test]
    fn invincible_streak_resets_on_last_place() {
        let aggregator = StatsAggregator::default();
        let mut players = roster(&["a", "b"]);

        for _ in 0..3 {
            let g = game(&[("a", 100, false), ("b", 0, true)]);
            aggregator.apply_game(&mut players, &g).unwrap();
        }
        assert_eq!(player(&players, "a").invincible_streak, 3);
        assert_eq!(player(&players, "b").first_blood_count, 3);

        let flipped = game(&[("b", 100, false), ("a", 0, true)]);
        aggregator.apply_game(&mut players, &flipped).unwrap();
        assert_eq!(player(&players, "a").invincible_streak, 0);
        assert_eq!(player(&players, "b").invincible_streak, 1);
    }

    #[test]
    fn rejects_game_with_broken_ranks() {
        let aggregator = StatsAggregator::default();
        let mut players = roster(&["a", "b"]);
        let mut broken = game(&[("a", 100, false), ("b", 50, false)]);
        broken.results[0].rank = 2;

        let result = aggregator.apply_game(&mut players, &broken);
        assert!(matches!(result, Err(StatsError::Collector(_))));
    }

    struct RecordingCollector {
        seen: Mutex<Vec<String>>,
    }

    impl StatCollector for RecordingCollector {
        fn collect(&self, game: &Game, _roster: &[Player]) -> Result<Vec<CollectedData>, StatsError> {
            self.seen.lock().unwrap().push(game.id.clone());
            Ok(vec![])
        }

        fn name(&self) -> &'static str {
            "RecordingCollector"
        }
    }

    #[test]
    fn runs_custom_collectors() {
        let recorder = Arc::new(RecordingCollector {
            seen: Mutex::new(Vec::new()),
        });
        let aggregator = StatsAggregator::builder()
            .with_collector(recorder.clone())
            .build();
        assert_eq!(aggregator.collectors().len(), 4);

        let mut players = roster(&["a"]);
        let g = game(&[("a", 10, false)]);
        aggregator.apply_game(&mut players, &g).unwrap();

        assert_eq!(*recorder.seen.lock().unwrap(), vec![g.id.clone()]);
    }
}
