mod rollover;

pub use rollover::{roll_over, RolloverInput, RolloverOutcome};
