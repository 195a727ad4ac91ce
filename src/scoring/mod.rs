pub mod calculators;
pub mod models;
pub mod ranking;

mod errors;

pub use calculators::{PositionalScoreCalculator, ScoreCalculator};
pub use errors::ScoringError;
pub use models::{ParticipantEntry, Standing};
pub use ranking::rank_participants;

/// Points awarded per place beaten when nothing else is configured
pub const DEFAULT_POINTS_PER_PLACE: u64 = 10;
