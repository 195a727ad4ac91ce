use crate::models::{Game, Player, PlayerWithStats};

use super::PlayerProfile;

/// Builds the leaderboard for one season.
///
/// `season_games` must only hold games of that season. Players are sorted by
/// `total_score` descending; equal scores keep roster order. Every rostered
/// player appears, including those who have not played yet.
pub fn season_standings(roster: &[Player], season_games: &[Game]) -> Vec<PlayerWithStats> {
    let mut standings: Vec<PlayerWithStats> = roster
        .iter()
        .map(|player| {
            let games_played = season_games
                .iter()
                .filter(|g| g.has_player(&player.id))
                .count() as u32;
            let wins = season_games
                .iter()
                .filter(|g| g.result_for(&player.id).is_some_and(|r| r.rank == 1))
                .count() as u32;

            PlayerWithStats {
                player: player.clone(),
                games_played,
                wins,
                rank: None,
            }
        })
        .collect();

    standings.sort_by(|a, b| b.player.total_score.cmp(&a.player.total_score));

    for (index, entry) in standings.iter_mut().enumerate() {
        entry.rank = Some(index as u32 + 1);
    }

    standings
}

/// Lifetime profile of one player across every recorded game.
pub fn player_profile(player: &Player, all_games: &[Game]) -> PlayerProfile {
    let mut games_played = 0u32;
    let mut wins = 0u32;
    let mut rank_total = 0u64;
    let mut last_place_count = 0u32;

    for game in all_games {
        let Some(result) = game.result_for(&player.id) else {
            continue;
        };

        games_played += 1;
        rank_total += u64::from(result.rank);
        if result.rank == 1 {
            wins += 1;
        }
        if result.rank == game.field_size() {
            last_place_count += 1;
        }
    }

    let average_rank = (games_played > 0)
        .then(|| (rank_total as f64 / f64::from(games_played) * 100.0).round() / 100.0);

    PlayerProfile {
        player_id: player.id.clone(),
        name: player.name.clone(),
        games_played,
        wins,
        average_rank,
        last_place_count,
    }
}
