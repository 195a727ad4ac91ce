use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument, warn};

use crate::models::{Game, NewsItem, Player, PlayerAchievement};

use super::{
    catalog::{Counter, GameFeat},
    seasonal::{leaders, season_tally},
    Achievement, AchievementError, AchievementId, AchievementOutcome, Criterion,
};

/// State after a game has been scored and applied to the counters.
pub struct GameEvaluation<'a> {
    /// Every known player, counters already including `game`
    pub roster: &'a [Player],
    pub game: &'a Game,
    /// Full history across seasons, `game` included
    pub all_games: &'a [Game],
    /// Games of the active season, `game` included
    pub season_games: &'a [Game],
    pub grants: &'a [PlayerAchievement],
    pub now: DateTime<Utc>,
}

/// State after a season has been closed and its winner credited.
pub struct RolloverEvaluation<'a> {
    /// Every known player; the winner's season counters already updated
    pub roster: &'a [Player],
    pub winner_id: Option<&'a str>,
    pub grants: &'a [PlayerAchievement],
    pub now: DateTime<Utc>,
}

/// Decides which badges to grant, revoke and announce.
///
/// Each rule is evaluated on its own: a rule that fails is logged and
/// skipped, the others still apply.
pub struct AchievementEvaluator {
    catalog: &'static [Achievement],
}

impl Default for AchievementEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl AchievementEvaluator {
    pub fn new() -> Self {
        Self {
            catalog: super::catalog(),
        }
    }

    #[instrument(skip_all, fields(game_id = %input.game.id))]
    pub fn evaluate_game(&self, input: &GameEvaluation<'_>) -> AchievementOutcome {
        let mut outcome = AchievementOutcome::default();

        for achievement in self.catalog {
            let result = match achievement.criterion {
                Criterion::SeasonLeader(_) => self.evaluate_title(achievement, input),
                criterion if criterion.is_rollover_only() => continue,
                _ => self.evaluate_permanent_for_game(achievement, input, &outcome),
            };

            match result {
                Ok(partial) => outcome.extend(partial),
                Err(err) => {
                    warn!(achievement = %achievement.id, error = %err, "Skipping achievement rule");
                }
            }
        }

        debug!(
            grants = outcome.grants.len(),
            revocations = outcome.revocations.len(),
            news = outcome.news.len(),
            "Evaluated achievements for game"
        );
        outcome
    }

    /// Season-win badges for the winner, and the end of every seasonal title.
    #[instrument(skip_all, fields(winner_id = ?input.winner_id))]
    pub fn evaluate_rollover(&self, input: &RolloverEvaluation<'_>) -> AchievementOutcome {
        let mut outcome = AchievementOutcome::default();

        if let Some(winner) = input
            .winner_id
            .and_then(|id| input.roster.iter().find(|p| p.id == id))
        {
            for achievement in self.catalog {
                let earned = match achievement.criterion {
                    Criterion::SeasonWins(min) => winner.season_wins >= min,
                    Criterion::ConsecutiveSeasonWins(min) => winner.consecutive_season_wins >= min,
                    _ => continue,
                };

                if earned && !holds(input.grants, &winner.id, achievement.id) {
                    grant(&mut outcome, achievement, winner, input.now);
                }
            }
        }

        // Titles end with their season instead of carrying into the next one
        outcome.revocations.extend(
            input
                .grants
                .iter()
                .filter(|g| g.achievement_id.definition().is_some_and(|a| a.is_seasonal()))
                .cloned(),
        );

        debug!(
            grants = outcome.grants.len(),
            revocations = outcome.revocations.len(),
            "Evaluated achievements for rollover"
        );
        outcome
    }

    fn evaluate_permanent_for_game(
        &self,
        achievement: &Achievement,
        input: &GameEvaluation<'_>,
        so_far: &AchievementOutcome,
    ) -> Result<AchievementOutcome, AchievementError> {
        let mut outcome = AchievementOutcome::default();

        for player in input.roster {
            if holds(input.grants, &player.id, achievement.id) {
                continue;
            }

            if !self.meets(&achievement.criterion, player, input)? {
                continue;
            }

            if let Criterion::ChipsAmassed {
                superseded_by: Some(higher),
                ..
            } = achievement.criterion
            {
                let higher_def = higher
                    .definition()
                    .ok_or(AchievementError::UnknownAchievement(higher))?;
                let higher_reached = holds(input.grants, &player.id, higher)
                    || so_far.grants_of(higher).contains(&player.id.as_str())
                    || self.meets(&higher_def.criterion, player, input)?;
                if higher_reached {
                    continue;
                }
            }

            grant(&mut outcome, achievement, player, input.now);
        }

        Ok(outcome)
    }

    fn meets(
        &self,
        criterion: &Criterion,
        player: &Player,
        input: &GameEvaluation<'_>,
    ) -> Result<bool, AchievementError> {
        let met = match *criterion {
            Criterion::GamesPlayed(min) => {
                let played = input
                    .all_games
                    .iter()
                    .filter(|g| g.has_player(&player.id))
                    .count() as u32;
                played >= min
            }
            Criterion::SingleGame(feat) => game_feat(feat, &player.id, input.game)?,
            Criterion::Counter { counter, min } => counter_value(counter, player) >= min,
            Criterion::ChipsAmassed { min, .. } => player.total_chips_amassed >= min,
            Criterion::SeasonWins(_)
            | Criterion::ConsecutiveSeasonWins(_)
            | Criterion::SeasonLeader(_) => false,
        };
        Ok(met)
    }

    fn evaluate_title(
        &self,
        achievement: &Achievement,
        input: &GameEvaluation<'_>,
    ) -> Result<AchievementOutcome, AchievementError> {
        let Criterion::SeasonLeader(stat) = achievement.criterion else {
            return Ok(AchievementOutcome::default());
        };

        let tally = season_tally(stat, input.roster, input.season_games)?;
        let new_leaders = leaders(&tally);
        if new_leaders.is_empty() {
            return Ok(AchievementOutcome::default());
        }

        let holders: Vec<&PlayerAchievement> = input
            .grants
            .iter()
            .filter(|g| g.achievement_id == achievement.id)
            .collect();

        let new_set: HashSet<&str> = new_leaders.iter().map(String::as_str).collect();
        let old_set: HashSet<&str> = holders.iter().map(|g| g.player_id.as_str()).collect();

        let mut outcome = AchievementOutcome::default();
        if new_set == old_set {
            return Ok(outcome);
        }

        let first_leader_name = display_name(input.roster, &new_leaders[0], "A new player");

        for holder in holders.iter().filter(|g| !new_set.contains(g.player_id.as_str())) {
            outcome.revocations.push((*holder).clone());

            let former_name = display_name(input.roster, &holder.player_id, "A former holder");
            if let Some(text) = achievement.loss_news(&former_name, &first_leader_name) {
                outcome.news.push(NewsItem::new(text, input.now));
            }
            info!(
                achievement = %achievement.id,
                player_id = %holder.player_id,
                "Seasonal title lost"
            );
        }

        for leader_id in new_leaders.iter().filter(|id| !old_set.contains(id.as_str())) {
            if let Some(leader) = input.roster.iter().find(|p| &p.id == leader_id) {
                grant(&mut outcome, achievement, leader, input.now);
            }
        }

        Ok(outcome)
    }
}

fn holds(grants: &[PlayerAchievement], player_id: &str, achievement_id: AchievementId) -> bool {
    grants
        .iter()
        .any(|g| g.player_id == player_id && g.achievement_id == achievement_id)
}

fn grant(
    outcome: &mut AchievementOutcome,
    achievement: &Achievement,
    player: &Player,
    now: DateTime<Utc>,
) {
    info!(achievement = %achievement.id, player_id = %player.id, "Achievement granted");
    outcome
        .grants
        .push(PlayerAchievement::new(player.id.clone(), achievement.id, now));
    outcome
        .news
        .push(NewsItem::new(achievement.news(&player.name), now));
}

fn display_name(roster: &[Player], player_id: &str, fallback: &str) -> String {
    roster
        .iter()
        .find(|p| p.id == player_id)
        .map(|p| p.name.clone())
        .unwrap_or_else(|| fallback.to_string())
}

fn counter_value(counter: Counter, player: &Player) -> u32 {
    match counter {
        Counter::SecondPlaces => player.second_place_count,
        Counter::ZeroChips => player.zero_chip_count,
        Counter::FirstBlood => player.first_blood_count,
        Counter::InvincibleStreak => player.invincible_streak,
        Counter::VentreMou => player.ventre_mou_count,
    }
}

fn game_feat(feat: GameFeat, player_id: &str, game: &Game) -> Result<bool, AchievementError> {
    if !game.has_consistent_ranks() {
        return Err(AchievementError::MalformedHistory(format!(
            "game {} has inconsistent ranks",
            game.id
        )));
    }

    let Some(result) = game.result_for(player_id) else {
        return Ok(false);
    };
    if result.eliminated {
        return Ok(false);
    }

    let chips = result.chip_count;
    let met = match feat {
        GameFeat::BigStack { min_chips } => chips >= min_chips,
        GameFeat::RoundStack { multiple } => chips > 0 && multiple > 0 && chips % multiple == 0,
        GameFeat::RepeatedDigits { min_digits } => has_repeated_digits(chips, min_digits),
        GameFeat::LastStanding { min_players } => {
            let survivors = game.results.iter().filter(|r| !r.eliminated).count();
            game.field_size() >= min_players && result.rank == 1 && survivors == 1
        }
        GameFeat::ScrapedBy {
            max_chips,
            min_players,
        } => game.field_size() >= min_players && (1..=max_chips).contains(&chips),
    };
    Ok(met)
}

fn has_repeated_digits(chips: u64, min_digits: u32) -> bool {
    let digits = chips.to_string();
    let mut chars = digits.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    digits.len() >= min_digits as usize && chars.all(|c| c == first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GameResult;
    use crate::stats::collectors::test_support::{game, roster};
    use rstest::rstest;

    fn evaluate(
        players: &[Player],
        game: &Game,
        history: &[Game],
        grants: &[PlayerAchievement],
    ) -> AchievementOutcome {
        let evaluator = AchievementEvaluator::new();
        evaluator.evaluate_game(&GameEvaluation {
            roster: players,
            game,
            all_games: history,
            season_games: history,
            grants,
            now: Utc::now(),
        })
    }

    fn held(player_id: &str, achievement_id: AchievementId) -> PlayerAchievement {
        PlayerAchievement::new(player_id, achievement_id, Utc::now())
    }

    #[rstest]
    #[case(100_000, true)]
    #[case(99_999, false)]
    fn big_stack(#[case] chips: u64, #[case] expected: bool) {
        let g = game(&[("a", chips, false), ("b", 0, true)]);
        assert_eq!(
            game_feat(GameFeat::BigStack { min_chips: 100_000 }, "a", &g).unwrap(),
            expected
        );
    }

    #[rstest]
    #[case(7777, true)]
    #[case(111, true)]
    #[case(11, false)]
    #[case(7770, false)]
    #[case(0, false)]
    fn repeated_digits(#[case] chips: u64, #[case] expected: bool) {
        assert_eq!(has_repeated_digits(chips, 3), expected);
    }

    #[rstest]
    #[case(30_000, true)]
    #[case(35_000, false)]
    #[case(0, false)]
    fn round_stack(#[case] chips: u64, #[case] expected: bool) {
        let g = game(&[("a", chips, false), ("b", 0, false)]);
        assert_eq!(
            game_feat(GameFeat::RoundStack { multiple: 10_000 }, "a", &g).unwrap(),
            expected
        );
    }

    #[test]
    fn last_standing_needs_five_players_and_a_lone_survivor() {
        let five = game(&[
            ("a", 9000, false),
            ("b", 0, true),
            ("c", 0, true),
            ("d", 0, true),
            ("e", 0, true),
        ]);
        let feat = GameFeat::LastStanding { min_players: 5 };
        assert!(game_feat(feat, "a", &five).unwrap());
        assert!(!game_feat(feat, "b", &five).unwrap());

        let two_survivors = game(&[
            ("a", 9000, false),
            ("b", 10, false),
            ("c", 0, true),
            ("d", 0, true),
            ("e", 0, true),
        ]);
        assert!(!game_feat(feat, "a", &two_survivors).unwrap());

        let four = game(&[("a", 9000, false), ("b", 0, true), ("c", 0, true), ("d", 0, true)]);
        assert!(!game_feat(feat, "a", &four).unwrap());
    }

    #[test]
    fn scraped_by_needs_a_small_positive_stack_at_a_big_table() {
        let lines: Vec<(&str, u64, bool)> = vec![
            ("a", 50_000, false),
            ("b", 2_500, false),
            ("c", 0, false),
            ("d", 0, true),
            ("e", 0, true),
            ("f", 0, true),
        ];
        let g = game(&lines);
        let feat = GameFeat::ScrapedBy {
            max_chips: 3_000,
            min_players: 6,
        };

        assert!(game_feat(feat, "b", &g).unwrap());
        assert!(!game_feat(feat, "c", &g).unwrap());
        assert!(!game_feat(feat, "d", &g).unwrap());
        assert!(!game_feat(feat, "a", &g).unwrap());
    }

    #[test]
    fn veteran_granted_on_tenth_game_and_not_twice() {
        let players = roster(&["a", "b"]);
        let history: Vec<Game> = (0..10)
            .map(|_| game(&[("a", 100, false), ("b", 0, true)]))
            .collect();
        let last = history.last().unwrap().clone();

        let outcome = evaluate(&players, &last, &history, &[]);
        let veterans = outcome.grants_of(AchievementId::Veteran);
        assert_eq!(veterans, vec!["a", "b"]);
        assert!(outcome.news.iter().any(|n| n.text.contains('A')));

        let granted: Vec<PlayerAchievement> = outcome.grants.clone();
        let again = evaluate(&players, &last, &history, &granted);
        assert!(again.grants_of(AchievementId::Veteran).is_empty());
        assert!(again.grants.is_empty());
    }

    #[test]
    fn counter_thresholds_grant_badges() {
        let mut players = roster(&["a", "b"]);
        players[0].first_blood_count = 5;
        players[0].invincible_streak = 0;
        players[1].invincible_streak = 8;
        players[1].second_place_count = 10;

        let g = game(&[("b", 100, false), ("a", 0, true)]);
        let outcome = evaluate(&players, &g, &[g.clone()], &[]);

        assert_eq!(outcome.grants_of(AchievementId::FirstBlood), vec!["a"]);
        assert_eq!(outcome.grants_of(AchievementId::Invincible), vec!["b"]);
        assert_eq!(outcome.grants_of(AchievementId::RunnerUp), vec!["b"]);
        assert_eq!(outcome.grants_of(AchievementId::SilverCollector), vec!["b"]);
    }

    #[test]
    fn chip_tiers_are_mutually_exclusive() {
        let mut players = roster(&["jumper", "climber", "holder"]);
        players[0].total_chips_amassed = 1_200_000;
        players[1].total_chips_amassed = 600_000;
        players[2].total_chips_amassed = 1_000_000;

        let g = game(&[("jumper", 100, false), ("climber", 50, false), ("holder", 0, true)]);
        let outcome = evaluate(
            &players,
            &g,
            &[g.clone()],
            &[held("holder", AchievementId::Millionaire)],
        );

        assert_eq!(outcome.grants_of(AchievementId::Millionaire), vec!["jumper"]);
        assert_eq!(outcome.grants_of(AchievementId::ChipHoarder), vec!["climber"]);
    }

    #[test]
    fn conqueror_moves_from_old_leader_to_new_leader() {
        let players = roster(&["a", "b"]);
        let history = vec![
            game(&[("a", 100, false), ("b", 0, true)]),
            game(&[("b", 100, false), ("a", 0, true)]),
            game(&[("b", 100, false), ("a", 0, true)]),
        ];
        let last = history.last().unwrap().clone();
        let grants = vec![
            held("a", AchievementId::Conqueror),
            held("b", AchievementId::RedLantern),
        ];

        let outcome = evaluate(&players, &last, &history, &grants);

        let revoked_conqueror: Vec<&str> = outcome
            .revocations
            .iter()
            .filter(|g| g.achievement_id == AchievementId::Conqueror)
            .map(|g| g.player_id.as_str())
            .collect();
        assert_eq!(revoked_conqueror, vec!["a"]);
        assert_eq!(outcome.grants_of(AchievementId::Conqueror), vec!["b"]);

        let loss = AchievementId::Conqueror
            .definition()
            .unwrap()
            .loss_news("A", "B")
            .unwrap();
        let gain = AchievementId::Conqueror.definition().unwrap().news("B");
        assert_eq!(outcome.news.iter().filter(|n| n.text == loss).count(), 1);
        assert_eq!(outcome.news.iter().filter(|n| n.text == gain).count(), 1);
    }

    #[test]
    fn unchanged_leaders_produce_nothing() {
        let players = roster(&["a", "b"]);
        let history = vec![game(&[("a", 100, false), ("b", 0, true)])];
        let grants = vec![
            held("a", AchievementId::Conqueror),
            held("b", AchievementId::RedLantern),
            held("b", AchievementId::EternalSecond),
            held("a", AchievementId::Assidu),
            held("b", AchievementId::Assidu),
            held("a", AchievementId::Metronome),
            held("b", AchievementId::Metronome),
        ];

        let outcome = evaluate(&players, &history[0], &history, &grants);
        assert!(outcome.revocations.is_empty());
        assert!(outcome.grants.is_empty(), "{:?}", outcome.grants);
    }

    #[test]
    fn tied_leaders_share_the_title() {
        let players = roster(&["a", "b", "c"]);
        let history = vec![
            game(&[("a", 100, false), ("c", 0, true)]),
            game(&[("b", 100, false), ("c", 0, true)]),
        ];

        let outcome = evaluate(&players, &history[1], &history, &[]);
        assert_eq!(outcome.grants_of(AchievementId::Conqueror), vec!["a", "b"]);
        assert_eq!(outcome.grants_of(AchievementId::RedLantern), vec!["c"]);
    }

    #[test]
    fn malformed_season_game_skips_titles_but_keeps_permanent_rules() {
        let mut players = roster(&["a", "b"]);
        players[0].first_blood_count = 5;

        let mut broken = game(&[("a", 100, false), ("b", 0, true)]);
        broken.results[1].rank = 1;
        let current = game(&[("b", 100, false), ("a", 0, true)]);

        let evaluator = AchievementEvaluator::new();
        let outcome = evaluator.evaluate_game(&GameEvaluation {
            roster: &players,
            game: &current,
            all_games: &[broken.clone(), current.clone()],
            season_games: &[broken, current.clone()],
            grants: &[],
            now: Utc::now(),
        });

        assert!(outcome.grants_of(AchievementId::Conqueror).is_empty());
        assert_eq!(outcome.grants_of(AchievementId::FirstBlood), vec!["a"]);
    }

    #[test]
    fn rollover_grants_season_milestones_once_and_clears_titles() {
        let mut players = roster(&["champ", "other"]);
        players[0].season_wins = 2;
        players[0].consecutive_season_wins = 2;

        let grants = vec![
            held("champ", AchievementId::Champion),
            held("other", AchievementId::Conqueror),
            held("other", AchievementId::Veteran),
        ];

        let evaluator = AchievementEvaluator::new();
        let outcome = evaluator.evaluate_rollover(&RolloverEvaluation {
            roster: &players,
            winner_id: Some("champ"),
            grants: &grants,
            now: Utc::now(),
        });

        let granted: Vec<AchievementId> = outcome.grants.iter().map(|g| g.achievement_id).collect();
        assert_eq!(
            granted,
            vec![AchievementId::DoubleChampion, AchievementId::BackToBack]
        );
        assert_eq!(outcome.news.len(), 2);

        let revoked: Vec<AchievementId> =
            outcome.revocations.iter().map(|g| g.achievement_id).collect();
        assert_eq!(revoked, vec![AchievementId::Conqueror]);
    }

    #[test]
    fn rollover_without_winner_only_clears_titles() {
        let players = roster(&["a"]);
        let evaluator = AchievementEvaluator::new();
        let outcome = evaluator.evaluate_rollover(&RolloverEvaluation {
            roster: &players,
            winner_id: None,
            grants: &[held("a", AchievementId::Kamikaze)],
            now: Utc::now(),
        });

        assert!(outcome.grants.is_empty());
        assert_eq!(outcome.revocations.len(), 1);
    }

    #[test]
    fn eliminated_lines_never_earn_stack_badges() {
        let g = Game::new(
            "s",
            Utc::now(),
            vec![
                GameResult {
                    player_id: "a".into(),
                    name: "A".into(),
                    chip_count: 0,
                    score: 0,
                    rank: 1,
                    eliminated: true,
                },
            ],
        );
        assert!(!game_feat(GameFeat::RoundStack { multiple: 10 }, "a", &g).unwrap());
    }
}
