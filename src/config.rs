use std::env;
use std::str::FromStr;

use tracing::warn;

use crate::scoring::DEFAULT_POINTS_PER_PLACE;

pub const BIND_ADDR_VAR: &str = "POKER_LEAGUE_BIND_ADDR";
pub const POINTS_PER_PLACE_VAR: &str = "POKER_LEAGUE_POINTS_PER_PLACE";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeagueConfig {
    pub bind_addr: String,
    pub points_per_place: u64,
}

impl Default for LeagueConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            points_per_place: DEFAULT_POINTS_PER_PLACE,
        }
    }
}

impl LeagueConfig {
    /// Reads the environment; missing or unparsable values keep the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: lookup(BIND_ADDR_VAR)
                .filter(|addr| !addr.trim().is_empty())
                .unwrap_or(defaults.bind_addr),
            points_per_place: parsed(&lookup, POINTS_PER_PLACE_VAR)
                .filter(|points| *points > 0)
                .unwrap_or(defaults.points_per_place),
        }
    }
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "Ignoring unparsable setting");
            None
        }
    }
}
