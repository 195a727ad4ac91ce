use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};

use crate::models::{Game, NewsItem, Player, Season};
use crate::stats::season_standings;

pub struct RolloverInput<'a> {
    pub roster: &'a [Player],
    pub outgoing: &'a Season,
    /// Games recorded in `outgoing`
    pub outgoing_games: &'a [Game],
    /// Every stored season, used to find the previous champion
    pub seasons: &'a [Season],
    pub incoming: &'a Season,
    pub now: DateTime<Utc>,
}

/// Records produced by closing one season and opening the next.
#[derive(Debug, Clone, PartialEq)]
pub struct RolloverOutcome {
    pub players: Vec<Player>,
    pub closed: Season,
    pub activated: Season,
    pub winner_id: Option<String>,
    pub champion_news: Option<NewsItem>,
}

/// Archives the outgoing season and resets per-season counters.
///
/// The leaderboard is snapshotted before any score is reset. A season without
/// games has no winner; everyone's season-win streak is broken.
#[instrument(skip_all, fields(outgoing = %input.outgoing.id, incoming = %input.incoming.id))]
pub fn roll_over(input: &RolloverInput<'_>) -> RolloverOutcome {
    let standings = season_standings(input.roster, input.outgoing_games);

    let winner = if input.outgoing_games.is_empty() {
        None
    } else {
        standings.first().map(|entry| entry.player.clone())
    };
    let winner_id = winner.as_ref().map(|p| p.id.clone());

    let previous_winner = input
        .seasons
        .iter()
        .filter(|s| s.is_closed && s.id != input.outgoing.id)
        .max_by_key(|s| s.closed_at)
        .and_then(|s| s.winner_id.as_deref());

    let players = input
        .roster
        .iter()
        .map(|player| {
            let mut player = player.clone();
            if winner_id.as_deref() == Some(player.id.as_str()) {
                player.season_wins += 1;
                player.consecutive_season_wins = if previous_winner == Some(player.id.as_str()) {
                    player.consecutive_season_wins + 1
                } else {
                    1
                };
            } else {
                player.consecutive_season_wins = 0;
            }
            player.total_score = 0;
            player.consecutive_games_streak = 0;
            player
        })
        .collect();

    let champion_news = winner.as_ref().map(|w| {
        NewsItem::new(
            format!(
                "🏆 {} wins the season \"{}\" with {} points!",
                w.name, input.outgoing.name, w.total_score
            ),
            input.now,
        )
    });

    let closed = Season {
        is_active: false,
        is_closed: true,
        final_leaderboard: Some(standings),
        winner_id: winner_id.clone(),
        closed_at: Some(input.now),
        ..input.outgoing.clone()
    };

    let activated = Season {
        is_active: true,
        ..input.incoming.clone()
    };

    match &winner {
        Some(w) => info!(winner_id = %w.id, points = w.total_score, "Season closed"),
        None => info!("Season closed without games"),
    }
    debug!(players = input.roster.len(), "Reset per-season counters");

    RolloverOutcome {
        players,
        closed,
        activated,
        winner_id,
        champion_news,
    }
}
