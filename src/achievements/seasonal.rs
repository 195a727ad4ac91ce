use crate::models::{Game, Player};

use super::{catalog::SeasonStat, AchievementError};

/// Tallies `stat` for every rostered player over the season's games.
///
/// The result follows roster order; players outside the roster are ignored.
pub fn season_tally(
    stat: SeasonStat,
    roster: &[Player],
    season_games: &[Game],
) -> Result<Vec<(String, u32)>, AchievementError> {
    for game in season_games {
        if !game.has_consistent_ranks() {
            return Err(AchievementError::MalformedHistory(format!(
                "game {} has ranks that are not a permutation of 1..={}",
                game.id,
                game.field_size()
            )));
        }
    }

    let tally = roster
        .iter()
        .map(|player| {
            let value = match stat {
                SeasonStat::AppearanceStreak => current_streak(&player.id, season_games),
                _ => season_games
                    .iter()
                    .filter(|game| counts_toward(stat, &player.id, game))
                    .count() as u32,
            };
            (player.id.clone(), value)
        })
        .collect();

    Ok(tally)
}

/// Players sharing the highest non-zero value, in tally order
pub fn leaders(tally: &[(String, u32)]) -> Vec<String> {
    let max = tally.iter().map(|(_, value)| *value).max().unwrap_or(0);
    if max == 0 {
        return Vec::new();
    }

    tally
        .iter()
        .filter(|(_, value)| *value == max)
        .map(|(player_id, _)| player_id.clone())
        .collect()
}

fn counts_toward(stat: SeasonStat, player_id: &str, game: &Game) -> bool {
    let Some(result) = game.result_for(player_id) else {
        return false;
    };

    match stat {
        SeasonStat::Wins => result.rank == 1,
        SeasonStat::LastPlaces => result.rank == game.field_size(),
        SeasonStat::SecondPlaces => result.rank == 2,
        SeasonStat::ZeroChips => result.chip_count == 0 && !result.eliminated,
        SeasonStat::Appearances | SeasonStat::AppearanceStreak => true,
    }
}

/// Consecutive games attended, counted back from the season's latest game
fn current_streak(player_id: &str, season_games: &[Game]) -> u32 {
    let mut ordered: Vec<&Game> = season_games.iter().collect();
    ordered.sort_by_key(|game| game.date);

    ordered
        .iter()
        .rev()
        .take_while(|game| game.has_player(player_id))
        .count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::collectors::test_support::{game, roster};
    use chrono::{Duration, Utc};
    use rstest::rstest;

    fn season() -> Vec<Game> {
        let start = Utc::now() - Duration::days(10);
        let mut games = vec![
            game(&[("a", 300, false), ("b", 0, false), ("c", 0, true)]),
            game(&[("b", 300, false), ("a", 100, false), ("c", 0, true)]),
            game(&[("a", 300, false), ("c", 0, false)]),
        ];
        for (index, g) in games.iter_mut().enumerate() {
            g.date = start + Duration::days(index as i64);
        }
        games
    }

    #[rstest]
    #[case(SeasonStat::Wins, vec![2, 1, 0])]
    #[case(SeasonStat::LastPlaces, vec![0, 0, 3])]
    #[case(SeasonStat::SecondPlaces, vec![1, 1, 1])]
    #[case(SeasonStat::ZeroChips, vec![0, 1, 1])]
    #[case(SeasonStat::Appearances, vec![3, 2, 3])]
    #[case(SeasonStat::AppearanceStreak, vec![3, 0, 3])]
    fn tallies_each_season_stat(#[case] stat: SeasonStat, #[case] expected: Vec<u32>) {
        let players = roster(&["a", "b", "c"]);
        let tally = season_tally(stat, &players, &season()).unwrap();

        let values: Vec<u32> = tally.iter().map(|(_, v)| *v).collect();
        assert_eq!(values, expected);
    }

    #[test]
    fn streak_follows_game_dates_not_storage_order() {
        let players = roster(&["a", "b", "c"]);
        let mut games = season();
        games.reverse();

        let tally = season_tally(SeasonStat::AppearanceStreak, &players, &games).unwrap();
        assert_eq!(tally[1], ("b".to_string(), 0));
    }

    #[test]
    fn leaders_are_everyone_at_the_maximum() {
        let tally = vec![
            ("a".to_string(), 2),
            ("b".to_string(), 1),
            ("c".to_string(), 2),
        ];
        assert_eq!(leaders(&tally), vec!["a".to_string(), "c".to_string()]);
    }

    #[test]
    fn no_leader_when_everyone_is_at_zero() {
        let tally = vec![("a".to_string(), 0), ("b".to_string(), 0)];
        assert!(leaders(&tally).is_empty());
        assert!(leaders(&[]).is_empty());
    }

    #[test]
    fn malformed_game_is_reported() {
        let players = roster(&["a", "b"]);
        let mut broken = game(&[("a", 10, false), ("b", 0, true)]);
        broken.results[1].rank = 1;

        let result = season_tally(SeasonStat::Wins, &players, &[broken]);
        assert!(matches!(result, Err(AchievementError::MalformedHistory(_))));
    }
}
