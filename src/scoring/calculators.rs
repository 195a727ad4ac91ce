use super::DEFAULT_POINTS_PER_PLACE;

/// Turns a final rank into league points.
pub trait ScoreCalculator: Send + Sync {
    fn calculate(&self, rank: u32, field_size: u32) -> u64;
}

/// Awards a fixed number of points for every player finishing below you.
///
/// With the default of 10 points the winner of an N-player game takes
/// `(N - 1) * 10` and the last place takes nothing.
#[derive(Debug, Clone, Copy)]
pub struct PositionalScoreCalculator {
    points_per_place: u64,
}

impl Default for PositionalScoreCalculator {
    fn default() -> Self {
        Self::new(DEFAULT_POINTS_PER_PLACE)
    }
}

impl PositionalScoreCalculator {
    pub fn new(points_per_place: u64) -> Self {
        Self { points_per_place }
    }
}

impl ScoreCalculator for PositionalScoreCalculator {
    fn calculate(&self, rank: u32, field_size: u32) -> u64 {
        u64::from(field_size.saturating_sub(rank)) * self.points_per_place
    }
}
