use std::sync::Arc;

use chrono::{Duration, Utc};
use pokerleague::{
    achievements::AchievementId,
    league::{PlayerCreateRequest, SeasonCreateRequest},
    models::{Player, Season},
    scoring::PositionalScoreCalculator,
    InMemoryStore, LeagueError, LeagueService, ParticipantEntry,
};

async fn setup(names: &[&str], points_per_place: u64) -> (LeagueService, Vec<Player>, Season) {
    let league = LeagueService::builder(Arc::new(InMemoryStore::new()))
        .with_calculator(Arc::new(PositionalScoreCalculator::new(points_per_place)))
        .build();

    let mut players = Vec::new();
    for name in names {
        let player = league
            .add_player(PlayerCreateRequest {
                name: name.to_string(),
                image_url: None,
            })
            .await
            .expect("add player");
        players.push(player);
    }

    let season = league
        .create_season(season_request("Spring"))
        .await
        .expect("create season");
    assert!(season.is_active, "first season starts active");

    (league, players, season)
}

fn season_request(name: &str) -> SeasonCreateRequest {
    SeasonCreateRequest {
        name: name.to_string(),
        image_url: None,
        end_date: Utc::now() + Duration::days(60),
        prize: "Golden chip".to_string(),
    }
}

/// Winner survives with chips, everyone else is eliminated in reverse order
fn finish(players: &[Player], order: &[usize]) -> Vec<ParticipantEntry> {
    let field = order.len();
    order
        .iter()
        .enumerate()
        .map(|(position, index)| {
            let p = &players[*index];
            if position == 0 {
                ParticipantEntry::survivor(&p.id, &p.name, 4321)
            } else {
                ParticipantEntry::eliminated(&p.id, &p.name, (field - position) as u32)
            }
        })
        .collect()
}

async fn holders(league: &LeagueService, achievement: AchievementId) -> Vec<String> {
    league
        .achievement_grants()
        .await
        .unwrap()
        .into_iter()
        .filter(|g| g.achievement_id == achievement)
        .map(|g| g.player_id)
        .collect()
}

#[tokio::test]
async fn veteran_is_granted_once_on_the_tenth_game() {
    let (league, players, season) = setup(&["Ann", "Bob", "Cid", "Dee"], 10).await;
    let rotations = [[0, 1, 2, 3], [1, 2, 3, 0], [2, 3, 0, 1], [3, 0, 1, 2]];

    for game_number in 0..9 {
        league
            .record_game(&season.id, finish(&players, &rotations[game_number % 4]))
            .await
            .unwrap();
    }
    assert!(holders(&league, AchievementId::Veteran).await.is_empty());

    league
        .record_game(&season.id, finish(&players, &rotations[1]))
        .await
        .unwrap();
    assert_eq!(holders(&league, AchievementId::Veteran).await.len(), 4);

    league
        .record_game(&season.id, finish(&players, &rotations[2]))
        .await
        .unwrap();
    assert_eq!(holders(&league, AchievementId::Veteran).await.len(), 4);

    let veteran = AchievementId::Veteran.definition().unwrap();
    let news = league.news().await.unwrap();
    for player in &players {
        let announcements = news
            .iter()
            .filter(|n| n.text == veteran.news(&player.name))
            .count();
        assert_eq!(announcements, 1, "{} announced once", player.name);
    }

    let profile = league.player_profile(&players[0].id).await.unwrap();
    assert_eq!(profile.profile.games_played, 11);
}

#[tokio::test]
async fn conqueror_title_changes_hands_with_one_loss_and_one_gain() {
    let (league, players, season) = setup(&["Ann", "Bob", "Cid"], 10).await;
    let (ann, bob) = (&players[0], &players[1]);

    league
        .record_game(&season.id, finish(&players, &[0, 1, 2]))
        .await
        .unwrap();
    assert_eq!(holders(&league, AchievementId::Conqueror).await, vec![ann.id.clone()]);

    league
        .record_game(&season.id, finish(&players, &[1, 0, 2]))
        .await
        .unwrap();
    let mut co_leaders = holders(&league, AchievementId::Conqueror).await;
    co_leaders.sort();
    let mut expected = vec![ann.id.clone(), bob.id.clone()];
    expected.sort();
    assert_eq!(co_leaders, expected);

    league
        .record_game(&season.id, finish(&players, &[1, 2, 0]))
        .await
        .unwrap();
    assert_eq!(holders(&league, AchievementId::Conqueror).await, vec![bob.id.clone()]);

    let conqueror = AchievementId::Conqueror.definition().unwrap();
    let loss = conqueror.loss_news(&ann.name, &bob.name).unwrap();
    let gain = conqueror.news(&bob.name);
    let news = league.news().await.unwrap();
    assert_eq!(news.iter().filter(|n| n.text == loss).count(), 1);
    assert_eq!(news.iter().filter(|n| n.text == gain).count(), 1);
}

#[tokio::test]
async fn rollover_archives_tied_leaderboard_and_resets_scores() {
    let (league, players, spring) = setup(&["Ann", "Bob", "Cid"], 100).await;

    league
        .record_game(&spring.id, finish(&players, &[0, 1, 2]))
        .await
        .unwrap();
    league
        .record_game(&spring.id, finish(&players, &[1, 2, 0]))
        .await
        .unwrap();
    league
        .record_game(&spring.id, finish(&players, &[0, 1]))
        .await
        .unwrap();

    let scores: Vec<u64> = league
        .players()
        .await
        .unwrap()
        .iter()
        .map(|p| p.total_score)
        .collect();
    assert_eq!(scores, vec![300, 300, 100]);

    let summer = league.create_season(season_request("Summer")).await.unwrap();
    league.activate_season(&summer.id).await.unwrap();

    let seasons = league.seasons().await.unwrap();
    let closed = seasons.iter().find(|s| s.id == spring.id).unwrap();
    assert!(closed.is_closed && !closed.is_active);
    assert_eq!(closed.winner_id.as_deref(), Some(players[0].id.as_str()));

    let archive: Vec<(String, u64, Option<u32>)> = closed
        .final_leaderboard
        .as_ref()
        .unwrap()
        .iter()
        .map(|e| (e.player.id.clone(), e.player.total_score, e.rank))
        .collect();
    assert_eq!(
        archive,
        vec![
            (players[0].id.clone(), 300, Some(1)),
            (players[1].id.clone(), 300, Some(2)),
            (players[2].id.clone(), 100, Some(3)),
        ]
    );
    assert!(seasons.iter().find(|s| s.id == summer.id).unwrap().is_active);

    let roster = league.players().await.unwrap();
    assert!(roster.iter().all(|p| p.total_score == 0));
    assert_eq!(roster[0].season_wins, 1);
    assert_eq!(roster[0].consecutive_season_wins, 1);
    assert_eq!(roster[1].season_wins, 0);

    assert_eq!(holders(&league, AchievementId::Champion).await, vec![players[0].id.clone()]);
    for title in [
        AchievementId::Conqueror,
        AchievementId::RedLantern,
        AchievementId::Assidu,
    ] {
        assert!(holders(&league, title).await.is_empty(), "{title} revoked");
    }

    let news = league.news().await.unwrap();
    assert!(news
        .iter()
        .any(|n| n.text.contains("Ann") && n.text.contains("Spring")));

    let board = league.leaderboard().await.unwrap();
    assert_eq!(board.season.unwrap().id, summer.id);
    assert!(board.standings.iter().all(|s| s.games_played == 0));
}

#[tokio::test]
async fn closed_season_rejects_new_games() {
    let (league, players, spring) = setup(&["Ann", "Bob"], 10).await;
    league
        .record_game(&spring.id, finish(&players, &[0, 1]))
        .await
        .unwrap();

    let summer = league.create_season(season_request("Summer")).await.unwrap();
    league.activate_season(&summer.id).await.unwrap();

    let result = league
        .record_game(&spring.id, finish(&players, &[1, 0]))
        .await;
    assert!(matches!(result, Err(LeagueError::SeasonClosed(_))));

    league
        .record_game(&summer.id, finish(&players, &[1, 0]))
        .await
        .unwrap();
    assert_eq!(league.games(Some(summer.id.as_str())).await.unwrap().len(), 1);
    assert_eq!(league.games(None).await.unwrap().len(), 2);
}

#[tokio::test]
async fn back_to_back_champion() {
    let (league, players, spring) = setup(&["Ann", "Bob"], 10).await;

    let mut current = spring;
    for name in ["Summer", "Autumn"] {
        league
            .record_game(&current.id, finish(&players, &[1, 0]))
            .await
            .unwrap();
        let next = league.create_season(season_request(name)).await.unwrap();
        league.activate_season(&next.id).await.unwrap();
        current = next;
    }

    let roster = league.players().await.unwrap();
    assert_eq!(roster[1].season_wins, 2);
    assert_eq!(roster[1].consecutive_season_wins, 2);

    let bob = players[1].id.clone();
    assert_eq!(holders(&league, AchievementId::DoubleChampion).await, vec![bob.clone()]);
    assert_eq!(holders(&league, AchievementId::BackToBack).await, vec![bob]);
}
