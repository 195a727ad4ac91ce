use thiserror::Error;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("Collector error: {0}")]
    Collector(String),

    #[error("Validation error: {0}")]
    Validation(String),
}
