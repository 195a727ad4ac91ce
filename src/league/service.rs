use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{Mutex as AsyncMutex, RwLock};
use tracing::{debug, error, info, instrument, warn};

use super::{
    types::{
        LeaderboardResponse, PlayerCreateRequest, PlayerProfileResponse, PlayerUpdateRequest,
        SeasonCreateRequest, SeasonUpdateRequest,
    },
    LeagueError,
};
use crate::{
    achievements::{
        catalog, AchievementEvaluator, AchievementOutcome, AchievementView, GameEvaluation,
        RolloverEvaluation,
    },
    models::{Game, NewsItem, Player, PlayerAchievement, Season},
    scoring::{rank_participants, ParticipantEntry, PositionalScoreCalculator, ScoreCalculator},
    season::{roll_over, RolloverInput},
    stats::{player_profile, season_standings, StatsAggregator},
    store::{Store, Write},
};

/// Orchestrates reads, the pure engine and one atomic commit per operation.
///
/// Mutations of a season are serialized through a per-season lock. Season
/// administration and rollover also hold the league-wide lock.
pub struct LeagueService {
    store: Arc<dyn Store>,
    calculator: Arc<dyn ScoreCalculator>,
    aggregator: StatsAggregator,
    evaluator: AchievementEvaluator,
    season_mutexes: Arc<RwLock<HashMap<String, Arc<AsyncMutex<()>>>>>,
    league_mutex: AsyncMutex<()>,
}

impl LeagueService {
    pub fn builder(store: Arc<dyn Store>) -> LeagueServiceBuilder {
        LeagueServiceBuilder::new(store)
    }

    /// Scores a finished game of the active season and commits it together
    /// with counter updates and achievement changes.
    #[instrument(skip(self, entries), fields(participants = entries.len()))]
    pub async fn record_game(
        &self,
        season_id: &str,
        entries: Vec<ParticipantEntry>,
    ) -> Result<Game, LeagueError> {
        let season_lock = self.season_lock(season_id).await;
        let _guard = season_lock.lock().await;

        let seasons = self.store.read_seasons().await?;
        ensure_recordable(&seasons, season_id)?;

        let roster = self.store.read_players().await?;
        if let Some(unknown) = entries
            .iter()
            .find(|e| !roster.iter().any(|p| p.id == e.player_id))
        {
            return Err(LeagueError::NotFound(format!("player {}", unknown.player_id)));
        }

        let entries = with_roster_names(entries, &roster);
        let results = rank_participants(&entries, self.calculator.as_ref())?;
        let now = Utc::now();
        let game = Game::new(season_id, now, results);

        let mut updated = roster.clone();
        self.aggregator.apply_game(&mut updated, &game)?;

        let mut all_games = self.store.read_games(None).await?;
        all_games.push(game.clone());
        let season_games: Vec<Game> = all_games
            .iter()
            .filter(|g| g.season_id == season_id)
            .cloned()
            .collect();
        let grants = self.store.read_achievement_grants().await?;

        let outcome = self.evaluator.evaluate_game(&GameEvaluation {
            roster: &updated,
            game: &game,
            all_games: &all_games,
            season_games: &season_games,
            grants: &grants,
            now,
        });

        let mut writes = vec![Write::InsertGame(game.clone())];
        writes.extend(changed_players(&roster, updated));
        let badge_writes = outcome_writes(outcome);

        if badge_writes.is_empty() {
            self.commit(writes).await?;
        } else {
            let mut batch = writes.clone();
            batch.extend(badge_writes);
            if let Err(err) = self.store.commit_batch(batch).await {
                warn!(
                    error = %err,
                    game_id = %game.id,
                    "Achievement writes rejected, committing the game without them"
                );
                self.commit(writes).await?;
            }
        }

        info!(game_id = %game.id, season_id = %season_id, "Game recorded");
        Ok(game)
    }

    /// Re-scores a stored game and moves season points by the difference.
    ///
    /// Lifetime counters and achievements are left as they were when the game
    /// was first recorded.
    #[instrument(skip(self, entries), fields(participants = entries.len()))]
    pub async fn edit_game(
        &self,
        game_id: &str,
        entries: Vec<ParticipantEntry>,
    ) -> Result<Game, LeagueError> {
        let existing = self
            .store
            .read_games(None)
            .await?
            .into_iter()
            .find(|g| g.id == game_id)
            .ok_or_else(|| LeagueError::NotFound(format!("game {game_id}")))?;

        let season_lock = self.season_lock(&existing.season_id).await;
        let _guard = season_lock.lock().await;

        // Re-read under the lock
        let existing = self
            .store
            .read_games(Some(existing.season_id.as_str()))
            .await?
            .into_iter()
            .find(|g| g.id == game_id)
            .ok_or_else(|| LeagueError::NotFound(format!("game {game_id}")))?;

        let seasons = self.store.read_seasons().await?;
        let season = seasons.iter().find(|s| s.id == existing.season_id);
        if season.is_some_and(|s| s.is_closed) {
            return Err(LeagueError::SeasonClosed(existing.season_id.clone()));
        }

        let roster = self.store.read_players().await?;
        if let Some(unknown) = entries.iter().find(|e| {
            !existing.has_player(&e.player_id) && !roster.iter().any(|p| p.id == e.player_id)
        }) {
            return Err(LeagueError::NotFound(format!("player {}", unknown.player_id)));
        }

        let entries = with_roster_names(entries, &roster);
        let results = rank_participants(&entries, self.calculator.as_ref())?;
        let revised = Game {
            results,
            ..existing.clone()
        };

        let mut writes = vec![Write::ReplaceGame(revised.clone())];

        if season.is_some_and(|s| s.is_active) {
            let updated: Vec<Player> = roster
                .iter()
                .map(|player| {
                    let removed = existing.result_for(&player.id).map_or(0, |r| r.score);
                    let added = revised.result_for(&player.id).map_or(0, |r| r.score);
                    let mut player = player.clone();
                    player.total_score = player.total_score.saturating_sub(removed) + added;
                    player
                })
                .collect();
            writes.extend(changed_players(&roster, updated));
        }

        self.commit(writes).await?;

        info!(game_id = %game_id, "Game edited");
        Ok(revised)
    }

    /// Makes `season_id` the active season, closing the current one first.
    #[instrument(skip(self))]
    pub async fn activate_season(&self, season_id: &str) -> Result<(), LeagueError> {
        let _league_guard = self.league_mutex.lock().await;

        let seasons = self.store.read_seasons().await?;
        let target = seasons
            .iter()
            .find(|s| s.id == season_id)
            .ok_or_else(|| LeagueError::NotFound(format!("season {season_id}")))?;

        if target.is_closed {
            return Err(LeagueError::SeasonClosed(season_id.to_string()));
        }
        if target.is_active {
            debug!("Season already active");
            return Ok(());
        }

        let Some(outgoing) = seasons.iter().find(|s| s.is_active) else {
            let activated = Season {
                is_active: true,
                ..target.clone()
            };
            self.commit(vec![Write::UpsertSeason(activated)]).await?;
            info!("Season activated");
            return Ok(());
        };

        let outgoing_lock = self.season_lock(&outgoing.id).await;
        let _season_guard = outgoing_lock.lock().await;

        let roster = self.store.read_players().await?;
        let outgoing_games = self.store.read_games(Some(outgoing.id.as_str())).await?;
        let grants = self.store.read_achievement_grants().await?;
        let now = Utc::now();

        let rollover = roll_over(&RolloverInput {
            roster: &roster,
            outgoing,
            outgoing_games: &outgoing_games,
            seasons: &seasons,
            incoming: target,
            now,
        });

        let outcome = self.evaluator.evaluate_rollover(&RolloverEvaluation {
            roster: &rollover.players,
            winner_id: rollover.winner_id.as_deref(),
            grants: &grants,
            now,
        });

        let mut writes = vec![
            Write::UpsertSeason(rollover.closed),
            Write::UpsertSeason(rollover.activated),
        ];
        writes.extend(changed_players(&roster, rollover.players));
        writes.extend(rollover.champion_news.map(Write::InsertNews));
        writes.extend(outcome_writes(outcome));

        self.commit(writes).await?;

        info!(
            closed_season = %outgoing.id,
            winner_id = ?rollover.winner_id,
            "Season rolled over"
        );
        Ok(())
    }

    #[instrument(skip(self, request))]
    pub async fn add_player(&self, request: PlayerCreateRequest) -> Result<Player, LeagueError> {
        let name = validated_name(&request.name)?;
        let player = Player::new(name, request.image_url);

        self.commit(vec![Write::UpsertPlayer(player.clone())]).await?;

        info!(player_id = %player.id, "Player added");
        Ok(player)
    }

    #[instrument(skip(self, request))]
    pub async fn update_player(
        &self,
        player_id: &str,
        request: PlayerUpdateRequest,
    ) -> Result<Player, LeagueError> {
        let mut player = self.find_player(player_id).await?;

        if let Some(name) = request.name {
            player.name = validated_name(&name)?;
        }
        if let Some(image_url) = request.image_url {
            player.image_url = Some(image_url).filter(|url| !url.trim().is_empty());
        }

        self.commit(vec![Write::UpsertPlayer(player.clone())]).await?;

        info!(player_id = %player.id, "Player updated");
        Ok(player)
    }

    /// Removes a player and their badges. Recorded games keep their name.
    ///
    /// Holds the active season's lock so a game commit cannot re-insert the
    /// removed player.
    #[instrument(skip(self))]
    pub async fn remove_player(&self, player_id: &str) -> Result<(), LeagueError> {
        let _league_guard = self.league_mutex.lock().await;
        let active = self
            .store
            .read_seasons()
            .await?
            .into_iter()
            .find(|s| s.is_active);
        let season_lock = match &active {
            Some(season) => Some(self.season_lock(&season.id).await),
            None => None,
        };
        let _guard = match &season_lock {
            Some(lock) => Some(lock.lock().await),
            None => None,
        };

        let player = self.find_player(player_id).await?;
        let grants = self.store.read_achievement_grants().await?;

        let mut writes = vec![Write::DeletePlayer(player.id.clone())];
        writes.extend(
            grants
                .into_iter()
                .filter(|g| g.player_id == player.id)
                .map(|g| Write::DeleteAchievement(g.id)),
        );

        self.commit(writes).await?;

        info!(player_id = %player_id, "Player removed");
        Ok(())
    }

    /// Creates a season. The very first season of the league starts active.
    #[instrument(skip(self, request))]
    pub async fn create_season(&self, request: SeasonCreateRequest) -> Result<Season, LeagueError> {
        let _league_guard = self.league_mutex.lock().await;

        let name = validated_name(&request.name)?;
        let mut season = Season::new(name, request.image_url, request.end_date, request.prize);
        season.is_active = self.store.read_seasons().await?.is_empty();

        self.commit(vec![Write::UpsertSeason(season.clone())]).await?;

        info!(season_id = %season.id, active = season.is_active, "Season created");
        Ok(season)
    }

    #[instrument(skip(self, request))]
    pub async fn update_season(
        &self,
        season_id: &str,
        request: SeasonUpdateRequest,
    ) -> Result<Season, LeagueError> {
        let _league_guard = self.league_mutex.lock().await;

        let mut season = self.find_season(season_id).await?;
        if season.is_closed {
            return Err(LeagueError::SeasonClosed(season_id.to_string()));
        }

        if let Some(name) = request.name {
            season.name = validated_name(&name)?;
        }
        if let Some(image_url) = request.image_url {
            season.image_url = Some(image_url).filter(|url| !url.trim().is_empty());
        }
        if let Some(end_date) = request.end_date {
            season.end_date = end_date;
        }
        if let Some(prize) = request.prize {
            season.prize = prize;
        }

        self.commit(vec![Write::UpsertSeason(season.clone())]).await?;

        info!(season_id = %season.id, "Season updated");
        Ok(season)
    }

    #[instrument(skip(self))]
    pub async fn delete_season(&self, season_id: &str) -> Result<(), LeagueError> {
        let _league_guard = self.league_mutex.lock().await;

        let season = self.find_season(season_id).await?;
        if season.is_active {
            return Err(LeagueError::Validation(
                "the active season cannot be deleted".to_string(),
            ));
        }

        self.commit(vec![Write::DeleteSeason(season.id)]).await?;
        self.clear_season_lock(season_id).await;

        info!(season_id = %season_id, "Season deleted");
        Ok(())
    }

    /// Wipes games, seasons, news and badges; players stay with a zero score.
    #[instrument(skip(self))]
    pub async fn general_reset(&self) -> Result<(), LeagueError> {
        let _league_guard = self.league_mutex.lock().await;

        let players = self.store.read_players().await?;
        let games = self.store.read_games(None).await?;
        let seasons = self.store.read_seasons().await?;
        let grants = self.store.read_achievement_grants().await?;
        let news = self.store.read_news().await?;

        let mut writes: Vec<Write> = Vec::new();
        writes.extend(games.into_iter().map(|g| Write::DeleteGame(g.id)));
        writes.extend(seasons.into_iter().map(|s| Write::DeleteSeason(s.id)));
        writes.extend(grants.into_iter().map(|g| Write::DeleteAchievement(g.id)));
        writes.extend(news.into_iter().map(|n| Write::DeleteNews(n.id)));
        writes.extend(
            players
                .into_iter()
                .filter(|p| p.total_score != 0)
                .map(|p| Write::UpsertPlayer(Player { total_score: 0, ..p })),
        );

        let write_count = writes.len();
        self.commit(writes).await?;
        self.season_mutexes.write().await.clear();

        info!(writes = write_count, "League reset");
        Ok(())
    }

    pub async fn players(&self) -> Result<Vec<Player>, LeagueError> {
        Ok(self.store.read_players().await?)
    }

    pub async fn seasons(&self) -> Result<Vec<Season>, LeagueError> {
        Ok(self.store.read_seasons().await?)
    }

    /// Standings of the active season; scores only when no season is active
    #[instrument(skip(self))]
    pub async fn leaderboard(&self) -> Result<LeaderboardResponse, LeagueError> {
        let season = self
            .store
            .read_seasons()
            .await?
            .into_iter()
            .find(|s| s.is_active);
        let roster = self.store.read_players().await?;
        let games = match &season {
            Some(s) => self.store.read_games(Some(s.id.as_str())).await?,
            None => Vec::new(),
        };

        let standings = season_standings(&roster, &games);
        debug!(players = standings.len(), "Leaderboard computed");
        Ok(LeaderboardResponse { season, standings })
    }

    /// Game history, newest first
    pub async fn games(&self, season_id: Option<&str>) -> Result<Vec<Game>, LeagueError> {
        let mut games: Vec<Game> = self
            .store
            .read_games(season_id)
            .await?
            .into_iter()
            .rev()
            .collect();
        games.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(games)
    }

    pub async fn news(&self) -> Result<Vec<NewsItem>, LeagueError> {
        Ok(self.store.read_news().await?)
    }

    #[instrument(skip(self))]
    pub async fn player_profile(&self, player_id: &str) -> Result<PlayerProfileResponse, LeagueError> {
        let player = self.find_player(player_id).await?;
        let games = self.store.read_games(None).await?;
        let achievements = self
            .store
            .read_achievement_grants()
            .await?
            .into_iter()
            .filter(|g| g.player_id == player.id)
            .collect();

        Ok(PlayerProfileResponse {
            profile: player_profile(&player, &games),
            achievements,
        })
    }

    pub fn achievement_catalog(&self) -> Vec<AchievementView> {
        catalog().iter().map(AchievementView::from).collect()
    }

    pub async fn achievement_grants(&self) -> Result<Vec<PlayerAchievement>, LeagueError> {
        Ok(self.store.read_achievement_grants().await?)
    }

    async fn commit(&self, writes: Vec<Write>) -> Result<(), LeagueError> {
        let count = writes.len();
        self.store.commit_batch(writes).await.map_err(|err| {
            error!(error = %err, writes = count, "Commit failed");
            LeagueError::Store(err)
        })
    }

    async fn find_player(&self, player_id: &str) -> Result<Player, LeagueError> {
        self.store
            .read_players()
            .await?
            .into_iter()
            .find(|p| p.id == player_id)
            .ok_or_else(|| LeagueError::NotFound(format!("player {player_id}")))
    }

    async fn find_season(&self, season_id: &str) -> Result<Season, LeagueError> {
        self.store
            .read_seasons()
            .await?
            .into_iter()
            .find(|s| s.id == season_id)
            .ok_or_else(|| LeagueError::NotFound(format!("season {season_id}")))
    }

    async fn season_lock(&self, season_id: &str) -> Arc<AsyncMutex<()>> {
        {
            let guard = self.season_mutexes.read().await;
            if let Some(lock) = guard.get(season_id) {
                return lock.clone();
            }
        }

        let mut guard = self.season_mutexes.write().await;
        guard
            .entry(season_id.to_string())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }

    async fn clear_season_lock(&self, season_id: &str) {
        let mut guard = self.season_mutexes.write().await;
        guard.remove(season_id);
    }
}

fn ensure_recordable(seasons: &[Season], season_id: &str) -> Result<(), LeagueError> {
    if !seasons.iter().any(|s| s.is_active) {
        return Err(LeagueError::NoActiveSeason);
    }

    let season = seasons
        .iter()
        .find(|s| s.id == season_id)
        .ok_or_else(|| LeagueError::NotFound(format!("season {season_id}")))?;

    if season.is_closed {
        return Err(LeagueError::SeasonClosed(season_id.to_string()));
    }
    if !season.is_active {
        return Err(LeagueError::SeasonNotActive(season_id.to_string()));
    }
    Ok(())
}

/// Game lines carry the roster name at the time of play
fn with_roster_names(entries: Vec<ParticipantEntry>, roster: &[Player]) -> Vec<ParticipantEntry> {
    entries
        .into_iter()
        .map(|mut entry| {
            if let Some(player) = roster.iter().find(|p| p.id == entry.player_id) {
                entry.name = player.name.clone();
            }
            entry
        })
        .collect()
}

fn validated_name(name: &str) -> Result<String, LeagueError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(LeagueError::Validation("name cannot be empty".to_string()));
    }
    Ok(trimmed.to_string())
}

/// Upserts for the players whose document differs from what was read
fn changed_players(before: &[Player], after: Vec<Player>) -> Vec<Write> {
    after
        .into_iter()
        .filter(|player| !before.iter().any(|old| old == player))
        .map(Write::UpsertPlayer)
        .collect()
}

fn outcome_writes(outcome: AchievementOutcome) -> Vec<Write> {
    let AchievementOutcome {
        grants,
        revocations,
        news,
    } = outcome;

    revocations
        .into_iter()
        .map(|g| Write::DeleteAchievement(g.id))
        .chain(grants.into_iter().map(Write::InsertAchievement))
        .chain(news.into_iter().map(Write::InsertNews))
        .collect()
}

pub struct LeagueServiceBuilder {
    store: Arc<dyn Store>,
    calculator: Arc<dyn ScoreCalculator>,
    aggregator: StatsAggregator,
    evaluator: AchievementEvaluator,
}

impl LeagueServiceBuilder {
    fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            calculator: Arc::new(PositionalScoreCalculator::default()),
            aggregator: StatsAggregator::default(),
            evaluator: AchievementEvaluator::new(),
        }
    }

    pub fn with_calculator(mut self, calculator: Arc<dyn ScoreCalculator>) -> Self {
        self.calculator = calculator;
        self
    }

    pub fn with_aggregator(mut self, aggregator: StatsAggregator) -> Self {
        self.aggregator = aggregator;
        self
    }

    pub fn build(self) -> LeagueService {
        LeagueService {
            store: self.store,
            calculator: self.calculator,
            aggregator: self.aggregator,
            evaluator: self.evaluator,
            season_mutexes: Arc::new(RwLock::new(HashMap::new())),
            league_mutex: AsyncMutex::new(()),
        }
    }
}
