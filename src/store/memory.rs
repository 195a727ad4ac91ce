use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, instrument};

use super::{Store, StoreError, Write};
use crate::models::{Game, NewsItem, Player, PlayerAchievement, Season};

#[derive(Debug, Clone, Default)]
struct LeagueState {
    players: Vec<Player>,
    games: Vec<Game>,
    seasons: Vec<Season>,
    grants: Vec<PlayerAchievement>,
    news: Vec<NewsItem>,
}

impl LeagueState {
    fn apply(&mut self, write: Write) -> Result<(), StoreError> {
        match write {
            Write::UpsertPlayer(player) => upsert(&mut self.players, player, |p| &p.id),
            Write::DeletePlayer(id) => remove(&mut self.players, &id, "player", |p| &p.id)?,
            Write::InsertGame(game) => {
                if self.games.iter().any(|g| g.id == game.id) {
                    return Err(StoreError::Conflict(format!("game {} already exists", game.id)));
                }
                self.games.push(game);
            }
            Write::ReplaceGame(game) => {
                let slot = self
                    .games
                    .iter_mut()
                    .find(|g| g.id == game.id)
                    .ok_or_else(|| StoreError::NotFound(format!("game {}", game.id)))?;
                *slot = game;
            }
            Write::DeleteGame(id) => remove(&mut self.games, &id, "game", |g| &g.id)?,
            Write::UpsertSeason(season) => upsert(&mut self.seasons, season, |s| &s.id),
            Write::DeleteSeason(id) => remove(&mut self.seasons, &id, "season", |s| &s.id)?,
            Write::InsertAchievement(grant) => {
                let duplicate = self.grants.iter().any(|g| {
                    g.id == grant.id
                        || (g.player_id == grant.player_id
                            && g.achievement_id == grant.achievement_id)
                });
                if duplicate {
                    return Err(StoreError::Conflict(format!(
                        "player {} already holds {}",
                        grant.player_id, grant.achievement_id
                    )));
                }
                self.grants.push(grant);
            }
            Write::DeleteAchievement(id) => {
                remove(&mut self.grants, &id, "achievement grant", |g| &g.id)?
            }
            Write::InsertNews(item) => self.news.push(item),
            Write::DeleteNews(id) => remove(&mut self.news, &id, "news item", |n| &n.id)?,
        }
        Ok(())
    }
}

fn upsert<T>(items: &mut Vec<T>, item: T, key: impl Fn(&T) -> &String) {
    match items.iter().position(|existing| key(existing) == key(&item)) {
        Some(index) => items[index] = item,
        None => items.push(item),
    }
}

fn remove<T>(
    items: &mut Vec<T>,
    id: &str,
    what: &str,
    key: impl Fn(&T) -> &String,
) -> Result<(), StoreError> {
    let index = items
        .iter()
        .position(|item| key(item) == id)
        .ok_or_else(|| StoreError::NotFound(format!("{what} {id}")))?;
    items.remove(index);
    Ok(())
}

/// In-memory implementation of Store for development and testing.
///
/// A batch is applied to a copy of the state, which replaces the live state
/// only when every write succeeded.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    state: Arc<RwLock<LeagueState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    #[instrument(skip(self))]
    async fn read_players(&self) -> Result<Vec<Player>, StoreError> {
        let state = self.state.read().await;
        debug!(count = state.players.len(), "Read players");
        Ok(state.players.clone())
    }

    #[instrument(skip(self))]
    async fn read_games(&self, season_id: Option<&str>) -> Result<Vec<Game>, StoreError> {
        let state = self.state.read().await;
        let games: Vec<Game> = state
            .games
            .iter()
            .filter(|g| season_id.map_or(true, |id| g.season_id == id))
            .cloned()
            .collect();
        debug!(count = games.len(), "Read games");
        Ok(games)
    }

    #[instrument(skip(self))]
    async fn read_seasons(&self) -> Result<Vec<Season>, StoreError> {
        let state = self.state.read().await;
        Ok(state.seasons.clone())
    }

    #[instrument(skip(self))]
    async fn read_achievement_grants(&self) -> Result<Vec<PlayerAchievement>, StoreError> {
        let state = self.state.read().await;
        Ok(state.grants.clone())
    }

    #[instrument(skip(self))]
    async fn read_news(&self) -> Result<Vec<NewsItem>, StoreError> {
        let state = self.state.read().await;
        let mut news: Vec<NewsItem> = state.news.iter().rev().cloned().collect();
        news.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(news)
    }

    #[instrument(skip(self, writes), fields(writes = writes.len()))]
    async fn commit_batch(&self, writes: Vec<Write>) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let mut next = state.clone();

        for write in writes {
            let kind = write.kind();
            if let Err(err) = next.apply(write) {
                error!(write = kind, error = %err, "Batch rejected, nothing applied");
                return Err(err);
            }
        }

        *state = next;
        debug!("Batch committed");
        Ok(())
    }
}
