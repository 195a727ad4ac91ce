pub mod catalog;
pub mod evaluator;
pub mod models;
pub mod seasonal;

mod errors;

pub use catalog::{catalog, Achievement, AchievementId, AchievementType, Criterion};
pub use errors::AchievementError;
pub use evaluator::{AchievementEvaluator, GameEvaluation, RolloverEvaluation};
pub use models::{AchievementOutcome, AchievementView};
